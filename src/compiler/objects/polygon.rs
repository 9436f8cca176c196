use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::types::{Instruction, Operation, Property};

use super::super::source::{ElementKind, Point};
use super::{Context, Translate};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Polygon {
    #[serde(default)]
    pub points: Vec<Point>,
}

impl Translate for Polygon {
    fn translate(&self, cx: &Context<'_>, out: &mut Vec<Instruction>) -> Result<(), CompileError> {
        let [first, rest @ ..] = self.points.as_slice() else {
            return Err(CompileError::malformed(ElementKind::Polygon, "no points"));
        };
        if rest.is_empty() {
            return Err(CompileError::malformed(
                ElementKind::Polygon,
                "needs at least 2 points",
            ));
        }

        out.push(Instruction::bare(Operation::BeginPath));
        let start = first.offset(cx.origin);
        out.push(Instruction::call(Operation::MoveTo, [start.x, start.y]));
        for point in rest {
            let p = point.offset(cx.origin);
            out.push(Instruction::call(Operation::LineTo, [p.x, p.y]));
        }
        out.push(Instruction::bare(Operation::ClosePath));

        // One action per pass; fill wins over stroke.
        for paint in cx.draw {
            if let Some(fill) = &paint.fill {
                out.push(Instruction::set(Property::FillStyle, fill.as_str()));
                out.push(Instruction::bare(Operation::Fill));
            } else if let Some(stroke) = &paint.stroke {
                out.push(Instruction::set(Property::StrokeStyle, stroke.as_str()));
                out.push(Instruction::bare(Operation::Stroke));
            }
        }
        Ok(())
    }
}
