use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::types::{Instruction, Operation, Property};

use super::super::source::ElementKind;
use super::{Context, Translate, required};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl Translate for Rect {
    fn translate(&self, cx: &Context<'_>, out: &mut Vec<Instruction>) -> Result<(), CompileError> {
        let w = required(ElementKind::Rect, "width", self.width)?;
        let h = required(ElementKind::Rect, "height", self.height)?;
        let bounds = [cx.origin.x, cx.origin.y, w, h];

        for paint in cx.draw {
            // Clear-only passes leave the line width alone.
            if paint.fill.is_some() || paint.stroke.is_some() {
                out.push(Instruction::set(
                    Property::LineWidth,
                    paint.line_width.unwrap_or(1.0),
                ));
            }
            if paint.clear {
                out.push(Instruction::call(Operation::ClearRect, bounds));
            }
            if let Some(fill) = &paint.fill {
                out.push(Instruction::set(Property::FillStyle, fill.as_str()));
                out.push(Instruction::call(Operation::FillRect, bounds));
            }
            if let Some(stroke) = &paint.stroke {
                out.push(Instruction::set(Property::StrokeStyle, stroke.as_str()));
                out.push(Instruction::call(Operation::StrokeRect, bounds));
            }
        }
        Ok(())
    }
}
