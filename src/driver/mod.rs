//! Driver — owns the terminal and feeds frames through the player.
//!
//! Each tick the driver takes the next frame root from its producer, renders
//! it onto a `GridSurface` and redraws only the cells that changed. Between
//! ticks it pumps terminal input into the `EventBus`.

pub mod events;

use std::io::{self, Write};
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::{cursor, event, execute, queue, style, terminal};

use crate::compiler::source::Element;
use crate::config::{DriverConfig, matches_binding};
use crate::player::Player;
use crate::renderer::{GridSurface, diff};
use crate::types::{Cell, Color, NamedColor, Style};
use events::{EventBus, InputTranslator};

pub struct TerminalDriver {
    config: DriverConfig,
    surface: GridSurface,
    /// What the terminal currently shows.
    shown: Vec<Vec<Cell>>,
    bus: EventBus,
    input: InputTranslator,
    frame: u64,
}

enum Flow {
    Continue,
    Quit,
}

impl TerminalDriver {
    /// Size the surface from the config, falling back to the terminal size.
    pub fn new(config: DriverConfig) -> Result<Self> {
        let (term_w, term_h) = match (config.width, config.height) {
            (Some(w), Some(h)) => (w, h),
            _ => terminal::size().context("Failed to query terminal size")?,
        };
        let width = config.width.unwrap_or(term_w);
        let height = config.height.unwrap_or(term_h);
        Ok(TerminalDriver {
            config,
            surface: GridSurface::new(width, height),
            shown: blank(width, height),
            bus: EventBus::new(),
            input: InputTranslator::default(),
            frame: 0,
        })
    }

    /// Current surface size in cells.
    pub fn size(&self) -> (u16, u16) {
        let width = self.shown.first().map_or(0, Vec::len);
        (width as u16, self.shown.len() as u16)
    }

    /// A handle on the event bus; subscribe before calling `run`.
    pub fn events(&self) -> EventBus {
        self.bus.clone()
    }

    /// The surface frames are drawn on, e.g. to register images.
    pub fn surface_mut(&mut self) -> &mut GridSurface {
        &mut self.surface
    }

    /// Drive the terminal until `frames` ends or the quit binding is pressed.
    ///
    /// Sets up the terminal and restores it on exit, even on error.
    pub fn run<I>(&mut self, frames: I) -> Result<()>
    where
        I: IntoIterator<Item = Option<Element>>,
    {
        let mut stdout = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(
            stdout,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::Clear(terminal::ClearType::All),
        )?;
        if self.config.mouse {
            execute!(stdout, event::EnableMouseCapture)?;
        }

        let result = self.run_loop(&mut stdout, frames.into_iter());

        // Always restore terminal state.
        if self.config.mouse {
            let _ = execute!(stdout, event::DisableMouseCapture);
        }
        let _ = execute!(stdout, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();

        result
    }

    fn run_loop(
        &mut self,
        stdout: &mut io::Stdout,
        mut frames: impl Iterator<Item = Option<Element>>,
    ) -> Result<()> {
        let interval = Duration::from_millis(self.config.frame_interval_ms.max(1));
        loop {
            let tick = Instant::now();
            let Some(root) = frames.next() else {
                tracing::debug!(frames = self.frame, "producer finished");
                return Ok(());
            };
            if self.draw(root.as_ref())? {
                self.present(stdout)?;
            }

            while let Some(left) = interval.checked_sub(tick.elapsed()) {
                if !event::poll(left)? {
                    break;
                }
                if let Flow::Quit = self.handle(stdout, event::read()?)? {
                    return Ok(());
                }
            }
        }
    }

    /// Render one frame onto the surface. A failed frame is dropped unless
    /// the config asks to stop; returns whether there is anything to show.
    fn draw(&mut self, root: Option<&Element>) -> Result<bool> {
        self.frame += 1;
        match Player::render(root, &mut self.surface) {
            Ok(()) => Ok(true),
            Err(e) if self.config.fail_fast => {
                Err(e).with_context(|| format!("Frame {} failed", self.frame))
            }
            Err(e) => {
                tracing::warn!(frame = self.frame, error = %e, "dropping frame");
                self.surface.reset_state();
                Ok(false)
            }
        }
    }

    fn handle(&mut self, stdout: &mut io::Stdout, ev: event::Event) -> Result<Flow> {
        if let event::Event::Key(key) = &ev {
            if key.kind != event::KeyEventKind::Release && matches_binding(&self.config.quit, key)
            {
                return Ok(Flow::Quit);
            }
        }
        if let event::Event::Resize(w, h) = ev {
            let width = self.config.width.unwrap_or(w);
            let height = self.config.height.unwrap_or(h);
            self.surface.resize(width, height);
            self.shown = blank(width, height);
            queue!(stdout, terminal::Clear(terminal::ClearType::All))?;
            stdout.flush()?;
        }
        for translated in self.input.translate(&ev) {
            self.bus.publish(&translated);
        }
        Ok(Flow::Continue)
    }

    fn present(&mut self, stdout: &mut io::Stdout) -> Result<()> {
        let changes = diff(&self.shown, self.surface.cells());
        for change in &changes {
            let cs = to_content_style(&change.cell.style);
            queue!(
                stdout,
                cursor::MoveTo(change.x, change.y),
                style::PrintStyledContent(style::StyledContent::new(cs, change.cell.ch)),
            )?;
        }
        stdout.flush()?;
        tracing::trace!(frame = self.frame, changed = changes.len(), "presented");
        self.shown = self.surface.cells().to_vec();
        Ok(())
    }
}

fn blank(width: u16, height: u16) -> Vec<Vec<Cell>> {
    vec![vec![Cell::default(); width as usize]; height as usize]
}

// ---------------------------------------------------------------------------
// Style conversion
// ---------------------------------------------------------------------------

pub fn to_content_style(s: &Style) -> style::ContentStyle {
    let mut cs = style::ContentStyle::default();
    if let Some(fg) = &s.fg {
        cs.foreground_color = Some(to_ct_color(fg));
    }
    if let Some(bg) = &s.bg {
        cs.background_color = Some(to_ct_color(bg));
    }
    if s.bold {
        cs.attributes.set(style::Attribute::Bold);
    }
    cs
}

pub fn to_ct_color(c: &Color) -> style::Color {
    match c {
        Color::Named(n) => match n {
            NamedColor::Black => style::Color::Black,
            NamedColor::Red => style::Color::Red,
            NamedColor::Green => style::Color::Green,
            NamedColor::Yellow => style::Color::Yellow,
            NamedColor::Blue => style::Color::Blue,
            NamedColor::Magenta => style::Color::Magenta,
            NamedColor::Cyan => style::Color::Cyan,
            NamedColor::White => style::Color::White,
        },
        Color::Rgb { r, g, b } => style::Color::Rgb {
            r: *r,
            g: *g,
            b: *b,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::events::Event;
    use super::*;

    #[test]
    fn styles_convert_to_crossterm() {
        let cs = to_content_style(&Style {
            fg: Some(Color::Rgb { r: 1, g: 2, b: 3 }),
            bg: Some(Color::Named(NamedColor::Black)),
            bold: true,
        });

        assert_eq!(cs.foreground_color, Some(style::Color::Rgb { r: 1, g: 2, b: 3 }));
        assert_eq!(cs.background_color, Some(style::Color::Black));
        assert!(cs.attributes.has(style::Attribute::Bold));
    }

    #[test]
    fn configured_size_skips_the_terminal() {
        let driver = TerminalDriver::new(DriverConfig {
            width: Some(30),
            height: Some(10),
            ..DriverConfig::default()
        })
        .unwrap();

        assert_eq!(driver.size(), (30, 10));
    }

    #[test]
    fn failed_frames_are_dropped_or_fatal() {
        use crate::builders::{PolygonOptions, polygon};

        let broken = polygon(PolygonOptions::default());
        let config = DriverConfig {
            width: Some(4),
            height: Some(2),
            ..DriverConfig::default()
        };

        let mut lenient = TerminalDriver::new(config.clone()).unwrap();
        assert!(!lenient.draw(Some(&broken)).unwrap());
        assert!(lenient.draw(None).unwrap());

        let mut strict = TerminalDriver::new(DriverConfig {
            fail_fast: true,
            ..config
        })
        .unwrap();
        let err = strict.draw(Some(&broken)).unwrap_err();
        assert!(format!("{err:#}").contains("Frame 1 failed"));
    }

    #[test]
    fn quit_binding_ends_the_run() {
        let mut driver = TerminalDriver::new(DriverConfig {
            width: Some(2),
            height: Some(2),
            ..DriverConfig::default()
        })
        .unwrap();
        let keys = driver.events().subscribe("keydown");
        let mut sink = io::stdout();

        let other = event::Event::Key(event::KeyEvent::new(
            event::KeyCode::Char('a'),
            event::KeyModifiers::NONE,
        ));
        let quit = event::Event::Key(event::KeyEvent::new(
            event::KeyCode::Char('q'),
            event::KeyModifiers::NONE,
        ));

        assert!(matches!(driver.handle(&mut sink, other).unwrap(), Flow::Continue));
        assert!(matches!(driver.handle(&mut sink, quit).unwrap(), Flow::Quit));
        assert_eq!(keys.try_recv().unwrap(), Event::KeyDown { key: "a".into() });
        assert!(keys.try_recv().is_err());
    }
}
