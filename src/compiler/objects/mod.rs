//! Element kinds and their translations into surface instructions.
//!
//! Each kind lives in its own module with its struct definition and
//! `Translate` implementation side by side.

mod arc;
mod image;
mod line;
mod polygon;
mod rect;
mod text;

pub use arc::Arc;
pub use image::Image;
pub use line::{Line, LineStyle};
pub use polygon::Polygon;
pub use rect::Rect;
pub use text::{Text, default_text_draw};

use crate::error::CompileError;
use crate::types::Instruction;

use super::source::{ElementKind, Paint, Point, Shape};

/// What a kind translator may read from the element being compiled.
pub struct Context<'a> {
    /// Resolved absolute origin of the element.
    pub origin: Point,
    pub draw: &'a [Paint],
    pub font: Option<&'a str>,
}

/// Translate one element's own paint into instructions.
pub trait Translate {
    fn translate(&self, cx: &Context<'_>, out: &mut Vec<Instruction>) -> Result<(), CompileError>;
}

impl Translate for Shape {
    fn translate(&self, cx: &Context<'_>, out: &mut Vec<Instruction>) -> Result<(), CompileError> {
        match self {
            Shape::Rect(o) => o.translate(cx, out),
            Shape::Line(o) => o.translate(cx, out),
            Shape::Text(o) => o.translate(cx, out),
            Shape::Polygon(o) => o.translate(cx, out),
            Shape::Image(o) => o.translate(cx, out),
            Shape::Arc(o) => o.translate(cx, out),
        }
    }
}

/// Unwrap a field the kind cannot be drawn without.
fn required(kind: ElementKind, field: &str, value: Option<f64>) -> Result<f64, CompileError> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        Some(v) => Err(CompileError::malformed(kind, format!("`{field}` is {v}"))),
        None => Err(CompileError::malformed(kind, format!("missing `{field}`"))),
    }
}
