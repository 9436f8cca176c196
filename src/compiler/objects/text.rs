use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::types::{Instruction, Operation, Property, TextAlign, Value};

use super::super::source::Paint;
use super::{Context, Translate};

/// Paint used when a text element gives no `draw`.
pub fn default_text_draw() -> Vec<Paint> {
    vec![Paint::fill("black")]
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub value: String,
    /// Maximum rendered width, passed to the surface when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default)]
    pub text_align: TextAlign,
}

impl Translate for Text {
    fn translate(&self, cx: &Context<'_>, out: &mut Vec<Instruction>) -> Result<(), CompileError> {
        let mut args: Vec<Value> = vec![
            self.value.as_str().into(),
            cx.origin.x.into(),
            cx.origin.y.into(),
        ];
        if let Some(width) = self.width {
            args.push(width.into());
        }

        for paint in cx.draw {
            out.push(Instruction::set(Property::TextAlign, self.text_align));
            if let Some(font) = cx.font {
                out.push(Instruction::set(Property::Font, font));
            }
            if let Some(width) = paint.line_width {
                out.push(Instruction::set(Property::LineWidth, width));
            }
            if let Some(fill) = &paint.fill {
                out.push(Instruction::set(Property::FillStyle, fill.as_str()));
                out.push(Instruction::call(Operation::FillText, args.clone()));
            }
            if let Some(stroke) = &paint.stroke {
                out.push(Instruction::set(Property::StrokeStyle, stroke.as_str()));
                out.push(Instruction::call(Operation::StrokeText, args.clone()));
            }
        }
        Ok(())
    }
}
