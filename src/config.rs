use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use serde::{Deserialize, Serialize};

/// Settings for the terminal driver. Every field falls back to its default
/// when missing from the config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DriverConfig {
    /// Fixed surface width in cells; the terminal width when unset.
    pub width: Option<u16>,
    /// Fixed surface height in cells; the terminal height when unset.
    pub height: Option<u16>,
    /// Time between two frames.
    pub frame_interval_ms: u64,
    pub quit: String,
    /// Capture mouse events for the event bus.
    pub mouse: bool,
    /// Stop at the first frame that fails instead of dropping it.
    pub fail_fast: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            width: None,
            height: None,
            frame_interval_ms: 16,
            quit: "q".into(),
            mouse: true,
            fail_fast: false,
        }
    }
}

impl DriverConfig {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// A missing file yields the defaults silently; an unreadable or invalid
    /// one yields them with a warning.
    pub fn load_from(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), "unreadable driver config ({e}), using defaults");
                return Self::default();
            }
        };
        match serde_json::from_str::<DriverConfig>(&json) {
            Ok(config) if config.frame_interval_ms == 0 => {
                tracing::warn!(path = %path.display(), "frameIntervalMs must be positive, using 16");
                DriverConfig {
                    frame_interval_ms: 16,
                    ..config
                }
            }
            Ok(config) => config,
            Err(e) => {
                tracing::warn!(path = %path.display(), "invalid driver config ({e}), using defaults");
                Self::default()
            }
        }
    }

    fn config_path() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("canvas-driver");
        path.push("driver.json");
        path
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Alt-") {
        return event.modifiers.contains(KeyModifiers::ALT) && matches_key(rest, event.code);
    }
    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        return event.modifiers.contains(KeyModifiers::CONTROL) && matches_key(rest, event.code);
    }

    // Plain bindings must not fire on Ctrl or Alt chords.
    if event.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return false;
    }
    matches_key(binding, event.code)
}

fn matches_key(name: &str, code: KeyCode) -> bool {
    match name {
        "Right" => code == KeyCode::Right,
        "Left" => code == KeyCode::Left,
        "Up" => code == KeyCode::Up,
        "Down" => code == KeyCode::Down,
        "Enter" => code == KeyCode::Enter,
        "Esc" => code == KeyCode::Esc,
        "Space" => code == KeyCode::Char(' '),
        "Tab" => code == KeyCode::Tab,
        "Backspace" => code == KeyCode::Backspace,
        s => {
            if let Some(n) = s.strip_prefix('F').and_then(|rest| rest.parse::<u8>().ok()) {
                return code == KeyCode::F(n);
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => code == KeyCode::Char(c),
                _ => false,
            }
        }
    }
}

/// Name a key the way bindings and `keydown` events spell it.
pub fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Right => "Right",
        KeyCode::Left => "Left",
        KeyCode::Up => "Up",
        KeyCode::Down => "Down",
        KeyCode::Enter => "Enter",
        KeyCode::Esc => "Esc",
        KeyCode::Tab => "Tab",
        KeyCode::Backspace => "Backspace",
        KeyCode::Char(' ') => "Space",
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::F(n) => return Some(format!("F{n}")),
        _ => return None,
    };
    Some(name.to_owned())
}
