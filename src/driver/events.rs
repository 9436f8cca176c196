//! Input events and their broadcast to subscribers.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, PoisonError};

use crossterm::event::{self as ct, KeyEventKind, MouseEventKind};

use crate::config::key_name;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl From<ct::MouseButton> for MouseButton {
    fn from(b: ct::MouseButton) -> Self {
        match b {
            ct::MouseButton::Left => MouseButton::Left,
            ct::MouseButton::Right => MouseButton::Right,
            ct::MouseButton::Middle => MouseButton::Middle,
        }
    }
}

/// A user input event, positioned in surface cells where it has a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    KeyDown { key: String },
    KeyUp { key: String },
    MouseDown { x: u16, y: u16, button: MouseButton },
    MouseUp { x: u16, y: u16, button: MouseButton },
    Click { x: u16, y: u16, button: MouseButton },
    MouseMove { x: u16, y: u16 },
    /// `delta` is positive when scrolling down.
    Wheel { x: u16, y: u16, delta: i8 },
    Resize { width: u16, height: u16 },
}

impl Event {
    /// The name subscribers select this event by.
    pub fn name(&self) -> &'static str {
        match self {
            Event::KeyDown { .. } => "keydown",
            Event::KeyUp { .. } => "keyup",
            Event::MouseDown { .. } => "mousedown",
            Event::MouseUp { .. } => "mouseup",
            Event::Click { .. } => "click",
            Event::MouseMove { .. } => "mousemove",
            Event::Wheel { .. } => "wheel",
            Event::Resize { .. } => "resize",
        }
    }
}

struct Subscriber {
    name: String,
    tx: Sender<Event>,
}

/// Broadcasts events to every receiver subscribed to their name.
///
/// Clones share the same subscriber list, so a frame producer can keep one
/// while the driver publishes into another.
#[derive(Clone, Default)]
pub struct EventBus {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, name: &str) -> Receiver<Event> {
        let (tx, rx) = mpsc::channel();
        self.lock().push(Subscriber {
            name: name.to_owned(),
            tx,
        });
        rx
    }

    /// Send `event` to its subscribers. Subscribers whose receiver was
    /// dropped are detached.
    pub fn publish(&self, event: &Event) {
        let name = event.name();
        self.lock()
            .retain(|s| s.name != name || s.tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Subscriber>> {
        self.subscribers.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Turns crossterm events into `Event`s, synthesising `click` from a
/// matching press and release.
#[derive(Debug, Default)]
pub(crate) struct InputTranslator {
    pressed: Option<MouseButton>,
}

impl InputTranslator {
    pub fn translate(&mut self, event: &ct::Event) -> Vec<Event> {
        match event {
            ct::Event::Key(key) => {
                let Some(name) = key_name(key.code) else {
                    return Vec::new();
                };
                match key.kind {
                    KeyEventKind::Press | KeyEventKind::Repeat => vec![Event::KeyDown { key: name }],
                    KeyEventKind::Release => vec![Event::KeyUp { key: name }],
                }
            }
            ct::Event::Mouse(m) => {
                let (x, y) = (m.column, m.row);
                match m.kind {
                    MouseEventKind::Down(b) => {
                        let button = b.into();
                        self.pressed = Some(button);
                        vec![Event::MouseDown { x, y, button }]
                    }
                    MouseEventKind::Up(b) => {
                        let button = b.into();
                        let mut out = vec![Event::MouseUp { x, y, button }];
                        if self.pressed.take() == Some(button) {
                            out.push(Event::Click { x, y, button });
                        }
                        out
                    }
                    MouseEventKind::Moved | MouseEventKind::Drag(_) => {
                        vec![Event::MouseMove { x, y }]
                    }
                    MouseEventKind::ScrollDown => vec![Event::Wheel { x, y, delta: 1 }],
                    MouseEventKind::ScrollUp => vec![Event::Wheel { x, y, delta: -1 }],
                    MouseEventKind::ScrollLeft | MouseEventKind::ScrollRight => Vec::new(),
                }
            }
            ct::Event::Resize(width, height) => vec![Event::Resize {
                width: *width,
                height: *height,
            }],
            _ => Vec::new(),
        }
    }
}
