//! Shared boundary types for the canvas driver.
//!
//! This module defines the two key data contracts:
//! - Compiler → Player (in-memory or JSON): `Instruction`s against a drawing surface
//! - Renderer → Driver (in-memory): `Cell` grids and `CellChange` diffs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PlayError;

// ---------------------------------------------------------------------------
// Compiler → Player boundary
// ---------------------------------------------------------------------------

/// Opaque reference to an image known by the drawing surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageHandle(pub String);

impl ImageHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single positional argument or property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Bool(bool),
    Text(String),
    Image { image: ImageHandle },
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Number(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Text(v.to_owned())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Text(v)
    }
}

impl From<ImageHandle> for Value {
    fn from(image: ImageHandle) -> Self {
        Value::Image { image }
    }
}

/// Generates a closed name enum with canvas-style camelCase names, a
/// `FromStr` that rejects unknown names and string-based serde.
macro_rules! surface_names {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = PlayError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(PlayError::UnsupportedSurfaceOperation(other.to_owned())),
                }
            }
        }

        impl Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
                s.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
                let name = String::deserialize(d)?;
                name.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

surface_names! {
    /// Surface properties an instruction may assign.
    Property {
        LineWidth => "lineWidth",
        FillStyle => "fillStyle",
        StrokeStyle => "strokeStyle",
        TextAlign => "textAlign",
        Font => "font",
        LineCap => "lineCap",
        LineJoin => "lineJoin",
    }
}

surface_names! {
    /// Surface operations an instruction may invoke.
    Operation {
        FillRect => "fillRect",
        StrokeRect => "strokeRect",
        ClearRect => "clearRect",
        FillText => "fillText",
        StrokeText => "strokeText",
        MoveTo => "moveTo",
        LineTo => "lineTo",
        BeginPath => "beginPath",
        ClosePath => "closePath",
        Stroke => "stroke",
        Fill => "fill",
        SetLineDash => "setLineDash",
        DrawImage => "drawImage",
        Arc => "arc",
        Save => "save",
        Restore => "restore",
        Translate => "translate",
        Rotate => "rotate",
        Scale => "scale",
    }
}

/// One atomic directive against a drawing surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Instruction {
    Set { set: Property, value: Value },
    Call { call: Operation, args: Vec<Value> },
}

impl Instruction {
    pub fn set(property: Property, value: impl Into<Value>) -> Self {
        Instruction::Set {
            set: property,
            value: value.into(),
        }
    }

    pub fn call<I>(operation: Operation, args: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        Instruction::Call {
            call: operation,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// A call without arguments (`save`, `beginPath`, ...).
    pub fn bare(operation: Operation) -> Self {
        Instruction::Call {
            call: operation,
            args: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Enumerated property values
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

macro_rules! keyword_value {
    ($name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl FromStr for $name {
            type Err = String;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    other => Err(format!("unknown {} `{other}`", stringify!($name))),
                }
            }
        }

        impl From<$name> for Value {
            fn from(v: $name) -> Self {
                Value::Text(v.as_str().to_owned())
            }
        }
    };
}

keyword_value!(TextAlign { Left => "left", Center => "center", Right => "right" });
keyword_value!(LineCap { Butt => "butt", Round => "round", Square => "square" });
keyword_value!(LineJoin { Miter => "miter", Round => "round", Bevel => "bevel" });

// ---------------------------------------------------------------------------
// Renderer → Driver boundary (in-memory only, never serialized)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Named(NamedColor),
    Rgb { r: u8, g: u8, b: u8 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamedColor {
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Style {
    pub fg: Option<Color>,
    pub bg: Option<Color>,
    pub bold: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub ch: char,
    pub style: Style,
}

impl Default for Cell {
    fn default() -> Self {
        Cell {
            ch: ' ',
            style: Style::default(),
        }
    }
}

impl Cell {
    /// A blank cell painted with a background colour.
    pub fn painted(color: Color) -> Self {
        Cell {
            ch: ' ',
            style: Style {
                bg: Some(color),
                ..Style::default()
            },
        }
    }

    pub fn is_blank(&self) -> bool {
        *self == Cell::default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellChange {
    pub x: u16,
    pub y: u16,
    pub cell: Cell,
}
