use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::types::{Instruction, LineCap, LineJoin, Operation, Property};

use super::super::source::Point;
use super::{Context, Translate};

/// Stroke settings for a line. Every field falls back to its default on its
/// own, so `{"lineCap": "square"}` still strokes 1 wide in black.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LineStyle {
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub stroke_style: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub line_dash: Vec<f64>,
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle {
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            stroke_style: "black".into(),
            line_dash: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Line {
    #[serde(default)]
    pub points: Vec<Point>,
    #[serde(default)]
    pub style: LineStyle,
}

impl Translate for Line {
    fn translate(&self, cx: &Context<'_>, out: &mut Vec<Instruction>) -> Result<(), CompileError> {
        let style = &self.style;
        out.push(Instruction::set(Property::LineWidth, style.line_width));
        out.push(Instruction::set(Property::LineCap, style.line_cap));
        out.push(Instruction::set(Property::LineJoin, style.line_join));
        out.push(Instruction::set(Property::StrokeStyle, style.stroke_style.as_str()));
        if !style.line_dash.is_empty() {
            out.push(Instruction::call(
                Operation::SetLineDash,
                style.line_dash.iter().copied(),
            ));
        }

        out.push(Instruction::call(Operation::MoveTo, [cx.origin.x, cx.origin.y]));
        out.push(Instruction::bare(Operation::BeginPath));
        for point in &self.points {
            let p = point.offset(cx.origin);
            out.push(Instruction::call(Operation::LineTo, [p.x, p.y]));
        }
        out.push(Instruction::bare(Operation::Stroke));
        out.push(Instruction::bare(Operation::SetLineDash));
        Ok(())
    }
}
