use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::types::{Instruction, Operation, Property, Value};

use super::super::source::ElementKind;
use super::{Context, Translate};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arc {
    pub radius: f64,
    #[serde(default)]
    pub start_angle: f64,
    #[serde(default)]
    pub end_angle: f64,
    #[serde(default)]
    pub anticlockwise: bool,
}

impl Translate for Arc {
    fn translate(&self, cx: &Context<'_>, out: &mut Vec<Instruction>) -> Result<(), CompileError> {
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(CompileError::malformed(
                ElementKind::Arc,
                format!("radius must be a non-negative number, got {}", self.radius),
            ));
        }
        if !self.start_angle.is_finite() || !self.end_angle.is_finite() {
            return Err(CompileError::malformed(
                ElementKind::Arc,
                format!(
                    "angles must be finite, got {} to {}",
                    self.start_angle, self.end_angle
                ),
            ));
        }

        // The centre sits on the resolved origin, like every other kind.
        let args: [Value; 6] = [
            cx.origin.x.into(),
            cx.origin.y.into(),
            self.radius.into(),
            self.start_angle.into(),
            self.end_angle.into(),
            self.anticlockwise.into(),
        ];
        out.push(Instruction::bare(Operation::BeginPath));
        out.push(Instruction::call(Operation::Arc, args));

        for paint in cx.draw {
            if let Some(fill) = &paint.fill {
                out.push(Instruction::set(Property::FillStyle, fill.as_str()));
                out.push(Instruction::bare(Operation::Fill));
            }
            if let Some(stroke) = &paint.stroke {
                out.push(Instruction::set(Property::StrokeStyle, stroke.as_str()));
                out.push(Instruction::bare(Operation::Stroke));
            }
        }
        Ok(())
    }
}
