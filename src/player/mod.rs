//! Player — replays instructions against a drawing surface.
//!
//! The player does not interpret scenes or make drawing decisions; it
//! treats the instruction list as an authoritative script and forwards each
//! entry, in order, to the surface it was handed.

use std::str::FromStr;

use crate::compiler::Compiler;
use crate::compiler::source::{Element, Paint, Shape};
use crate::error::{PlayError, RenderError};
use crate::types::{
    ImageHandle, Instruction, LineCap, LineJoin, Operation, Property, TextAlign, Value,
};

/// Where `drawImage` puts an image. Mirrors the three canvas call shapes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImagePlacement {
    At { dx: f64, dy: f64 },
    Scaled { dx: f64, dy: f64, dw: f64, dh: f64 },
    Sliced {
        sx: f64,
        sy: f64,
        sw: f64,
        sh: f64,
        dx: f64,
        dy: f64,
        dw: f64,
        dh: f64,
    },
}

/// A stateful 2D drawing target.
///
/// Each method is one member of the closed surface vocabulary. They all
/// default to `UnsupportedSurfaceOperation`, so a surface implements only
/// what it can actually do.
#[allow(unused_variables)]
pub trait Surface {
    /// Surface extent in its own units.
    fn size(&self) -> (f64, f64);

    fn set_line_width(&mut self, width: f64) -> Result<(), PlayError> {
        unsupported(Property::LineWidth)
    }
    fn set_fill_style(&mut self, style: &str) -> Result<(), PlayError> {
        unsupported(Property::FillStyle)
    }
    fn set_stroke_style(&mut self, style: &str) -> Result<(), PlayError> {
        unsupported(Property::StrokeStyle)
    }
    fn set_text_align(&mut self, align: TextAlign) -> Result<(), PlayError> {
        unsupported(Property::TextAlign)
    }
    fn set_font(&mut self, font: &str) -> Result<(), PlayError> {
        unsupported(Property::Font)
    }
    fn set_line_cap(&mut self, cap: LineCap) -> Result<(), PlayError> {
        unsupported(Property::LineCap)
    }
    fn set_line_join(&mut self, join: LineJoin) -> Result<(), PlayError> {
        unsupported(Property::LineJoin)
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), PlayError> {
        unsupported(Operation::FillRect)
    }
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), PlayError> {
        unsupported(Operation::StrokeRect)
    }
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), PlayError> {
        unsupported(Operation::ClearRect)
    }
    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<(), PlayError> {
        unsupported(Operation::FillText)
    }
    fn stroke_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<(), PlayError> {
        unsupported(Operation::StrokeText)
    }
    fn move_to(&mut self, x: f64, y: f64) -> Result<(), PlayError> {
        unsupported(Operation::MoveTo)
    }
    fn line_to(&mut self, x: f64, y: f64) -> Result<(), PlayError> {
        unsupported(Operation::LineTo)
    }
    fn begin_path(&mut self) -> Result<(), PlayError> {
        unsupported(Operation::BeginPath)
    }
    fn close_path(&mut self) -> Result<(), PlayError> {
        unsupported(Operation::ClosePath)
    }
    fn stroke(&mut self) -> Result<(), PlayError> {
        unsupported(Operation::Stroke)
    }
    fn fill(&mut self) -> Result<(), PlayError> {
        unsupported(Operation::Fill)
    }
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), PlayError> {
        unsupported(Operation::SetLineDash)
    }
    fn draw_image(
        &mut self,
        image: &ImageHandle,
        placement: ImagePlacement,
    ) -> Result<(), PlayError> {
        unsupported(Operation::DrawImage)
    }
    #[allow(clippy::too_many_arguments)]
    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<(), PlayError> {
        unsupported(Operation::Arc)
    }
    fn save(&mut self) -> Result<(), PlayError> {
        unsupported(Operation::Save)
    }
    fn restore(&mut self) -> Result<(), PlayError> {
        unsupported(Operation::Restore)
    }
    fn translate(&mut self, x: f64, y: f64) -> Result<(), PlayError> {
        unsupported(Operation::Translate)
    }
    fn rotate(&mut self, radians: f64) -> Result<(), PlayError> {
        unsupported(Operation::Rotate)
    }
    fn scale(&mut self, x: f64, y: f64) -> Result<(), PlayError> {
        unsupported(Operation::Scale)
    }
}

fn unsupported(name: impl ToString) -> Result<(), PlayError> {
    Err(PlayError::UnsupportedSurfaceOperation(name.to_string()))
}

pub struct Player;

impl Player {
    /// Apply instructions to `surface` strictly in order.
    ///
    /// Stops at the first failing instruction; earlier instructions stay
    /// applied.
    pub fn apply<S: Surface + ?Sized>(
        instructions: &[Instruction],
        surface: &mut S,
    ) -> Result<(), PlayError> {
        for instruction in instructions {
            match instruction {
                Instruction::Set { set, value } => Self::assign(surface, *set, value)?,
                Instruction::Call { call, args } => Self::invoke(surface, *call, args)?,
            }
        }
        tracing::debug!(count = instructions.len(), "applied instructions");
        Ok(())
    }

    /// Compile one frame's root and apply it. Missing root fields are filled
    /// from `RootDefaults` sized to the surface, so the surface is cleared
    /// unless the root says otherwise.
    pub fn render<S: Surface + ?Sized>(
        root: Option<&Element>,
        surface: &mut S,
    ) -> Result<(), RenderError> {
        let (width, height) = surface.size();
        let root = RootDefaults { width, height }.apply(root);
        let instructions = Compiler::compile(Some(&root))?;
        Self::apply(&instructions, surface)?;
        Ok(())
    }

    fn assign<S: Surface + ?Sized>(
        surface: &mut S,
        property: Property,
        value: &Value,
    ) -> Result<(), PlayError> {
        let mut args = Args::new(property.as_str(), std::slice::from_ref(value));
        match property {
            Property::LineWidth => surface.set_line_width(args.number()?),
            Property::FillStyle => surface.set_fill_style(args.text()?),
            Property::StrokeStyle => surface.set_stroke_style(args.text()?),
            Property::TextAlign => surface.set_text_align(args.keyword()?),
            Property::Font => surface.set_font(args.text()?),
            Property::LineCap => surface.set_line_cap(args.keyword()?),
            Property::LineJoin => surface.set_line_join(args.keyword()?),
        }
    }

    fn invoke<S: Surface + ?Sized>(
        surface: &mut S,
        operation: Operation,
        values: &[Value],
    ) -> Result<(), PlayError> {
        let mut a = Args::new(operation.as_str(), values);
        match operation {
            Operation::FillRect => {
                let [x, y, w, h] = a.numbers()?;
                surface.fill_rect(x, y, w, h)
            }
            Operation::StrokeRect => {
                let [x, y, w, h] = a.numbers()?;
                surface.stroke_rect(x, y, w, h)
            }
            Operation::ClearRect => {
                let [x, y, w, h] = a.numbers()?;
                surface.clear_rect(x, y, w, h)
            }
            Operation::FillText | Operation::StrokeText => {
                let text = a.text()?;
                let [x, y] = a.numbers()?;
                let max_width = a.optional_number()?;
                a.finish()?;
                if operation == Operation::FillText {
                    surface.fill_text(text, x, y, max_width)
                } else {
                    surface.stroke_text(text, x, y, max_width)
                }
            }
            Operation::MoveTo => {
                let [x, y] = a.numbers()?;
                surface.move_to(x, y)
            }
            Operation::LineTo => {
                let [x, y] = a.numbers()?;
                surface.line_to(x, y)
            }
            Operation::BeginPath => a.none().and_then(|()| surface.begin_path()),
            Operation::ClosePath => a.none().and_then(|()| surface.close_path()),
            Operation::Stroke => a.none().and_then(|()| surface.stroke()),
            Operation::Fill => a.none().and_then(|()| surface.fill()),
            Operation::SetLineDash => {
                let segments = a.rest_numbers()?;
                surface.set_line_dash(&segments)
            }
            Operation::DrawImage => {
                let image = a.image()?;
                let placement = match values.len() {
                    3 => {
                        let [dx, dy] = a.numbers()?;
                        ImagePlacement::At { dx, dy }
                    }
                    5 => {
                        let [dx, dy, dw, dh] = a.numbers()?;
                        ImagePlacement::Scaled { dx, dy, dw, dh }
                    }
                    9 => {
                        let [sx, sy, sw, sh, dx, dy, dw, dh] = a.numbers()?;
                        ImagePlacement::Sliced {
                            sx,
                            sy,
                            sw,
                            sh,
                            dx,
                            dy,
                            dw,
                            dh,
                        }
                    }
                    n => return Err(a.invalid(format!("expected 3, 5 or 9 arguments, got {n}"))),
                };
                surface.draw_image(image, placement)
            }
            Operation::Arc => {
                let [x, y, radius, start, end] = a.numbers()?;
                let anticlockwise = a.optional_bool()?.unwrap_or(false);
                a.finish()?;
                surface.arc(x, y, radius, start, end, anticlockwise)
            }
            Operation::Save => a.none().and_then(|()| surface.save()),
            Operation::Restore => a.none().and_then(|()| surface.restore()),
            Operation::Translate => {
                let [x, y] = a.numbers()?;
                surface.translate(x, y)
            }
            Operation::Rotate => {
                let [radians] = a.numbers()?;
                surface.rotate(radians)
            }
            Operation::Scale => {
                let [x, y] = a.numbers()?;
                surface.scale(x, y)
            }
        }
    }
}

/// Positional argument reader for one instruction.
struct Args<'a> {
    name: &'static str,
    values: &'a [Value],
    next: usize,
}

impl<'a> Args<'a> {
    fn new(name: &'static str, values: &'a [Value]) -> Self {
        Args {
            name,
            values,
            next: 0,
        }
    }

    fn invalid(&self, reason: impl Into<String>) -> PlayError {
        PlayError::InvalidArguments {
            operation: self.name,
            reason: reason.into(),
        }
    }

    fn take(&mut self) -> Result<&'a Value, PlayError> {
        let values = self.values;
        let value = values
            .get(self.next)
            .ok_or_else(|| self.invalid(format!("missing argument {}", self.next + 1)))?;
        self.next += 1;
        Ok(value)
    }

    fn number(&mut self) -> Result<f64, PlayError> {
        match self.take()? {
            Value::Number(n) => Ok(*n),
            other => Err(self.invalid(format!("expected a number, got {other:?}"))),
        }
    }

    /// Exactly `N` numbers. For fixed-arity calls this also rejects extra
    /// arguments once the last one is read.
    fn numbers<const N: usize>(&mut self) -> Result<[f64; N], PlayError> {
        let mut out = [0.0; N];
        for slot in &mut out {
            *slot = self.number()?;
        }
        if self.is_fixed_arity() {
            self.finish()?;
        }
        Ok(out)
    }

    fn optional_number(&mut self) -> Result<Option<f64>, PlayError> {
        if self.next < self.values.len() {
            self.number().map(Some)
        } else {
            Ok(None)
        }
    }

    fn optional_bool(&mut self) -> Result<Option<bool>, PlayError> {
        let values = self.values;
        match values.get(self.next) {
            None => Ok(None),
            Some(Value::Bool(b)) => {
                self.next += 1;
                Ok(Some(*b))
            }
            Some(other) => Err(self.invalid(format!("expected a boolean, got {other:?}"))),
        }
    }

    fn rest_numbers(&mut self) -> Result<Vec<f64>, PlayError> {
        let mut out = Vec::with_capacity(self.values.len() - self.next);
        while self.next < self.values.len() {
            out.push(self.number()?);
        }
        Ok(out)
    }

    fn text(&mut self) -> Result<&'a str, PlayError> {
        match self.take()? {
            Value::Text(s) => Ok(s),
            other => Err(self.invalid(format!("expected a string, got {other:?}"))),
        }
    }

    fn keyword<T: FromStr<Err = String>>(&mut self) -> Result<T, PlayError> {
        let text = self.text()?;
        text.parse().map_err(|e: String| self.invalid(e))
    }

    fn image(&mut self) -> Result<&'a ImageHandle, PlayError> {
        match self.take()? {
            Value::Image { image } => Ok(image),
            other => Err(self.invalid(format!("expected an image, got {other:?}"))),
        }
    }

    fn none(&mut self) -> Result<(), PlayError> {
        self.finish()
    }

    fn finish(&self) -> Result<(), PlayError> {
        if self.next == self.values.len() {
            Ok(())
        } else {
            Err(self.invalid(format!(
                "expected {} arguments, got {}",
                self.next,
                self.values.len()
            )))
        }
    }

    /// Calls whose optional trailing arguments are read after `numbers`.
    fn is_fixed_arity(&self) -> bool {
        !matches!(self.name, "fillText" | "strokeText" | "arc")
    }
}

/// Fields a frame root falls back to when the producer leaves them out:
/// a rect covering the whole surface that clears it.
#[derive(Debug, Clone, Copy)]
pub struct RootDefaults {
    pub width: f64,
    pub height: f64,
}

impl RootDefaults {
    /// Merge the defaults underneath `root`; fields the root sets win.
    pub fn apply(self, root: Option<&Element>) -> Element {
        let Some(root) = root else {
            return self.default_root();
        };

        let mut root = root.clone();
        match &mut root.shape {
            Shape::Rect(r) => {
                r.width.get_or_insert(self.width);
                r.height.get_or_insert(self.height);
            }
            Shape::Text(t) => {
                t.width.get_or_insert(self.width);
            }
            Shape::Image(i) => {
                i.width.get_or_insert(self.width);
                i.height.get_or_insert(self.height);
            }
            Shape::Line(_) | Shape::Polygon(_) | Shape::Arc(_) => {}
        }
        if root.draw.is_empty() {
            root.draw = vec![Paint::clear()];
        }
        root
    }

    fn default_root(self) -> Element {
        crate::builders::rect(crate::builders::RectOptions {
            width: Some(self.width),
            height: Some(self.height),
            draw: vec![Paint::clear()],
            ..Default::default()
        })
    }
}

/// A surface that accepts the whole vocabulary and records every call as
/// the instruction that would reproduce it.
#[derive(Debug, Clone)]
pub struct Recorder {
    width: f64,
    height: f64,
    log: Vec<Instruction>,
}

impl Recorder {
    pub fn new(width: f64, height: f64) -> Self {
        Recorder {
            width,
            height,
            log: Vec::new(),
        }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.log
    }

    pub fn reset(&mut self) {
        self.log.clear();
    }

    fn set(&mut self, property: Property, value: impl Into<Value>) -> Result<(), PlayError> {
        self.log.push(Instruction::set(property, value));
        Ok(())
    }

    fn call<I>(&mut self, operation: Operation, args: I) -> Result<(), PlayError>
    where
        I: IntoIterator,
        I::Item: Into<Value>,
    {
        self.log.push(Instruction::call(operation, args));
        Ok(())
    }

    fn text_call(
        &mut self,
        operation: Operation,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<(), PlayError> {
        let mut args: Vec<Value> = vec![text.into(), x.into(), y.into()];
        args.extend(max_width.map(Value::from));
        self.call(operation, args)
    }
}

impl Surface for Recorder {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn set_line_width(&mut self, width: f64) -> Result<(), PlayError> {
        self.set(Property::LineWidth, width)
    }
    fn set_fill_style(&mut self, style: &str) -> Result<(), PlayError> {
        self.set(Property::FillStyle, style)
    }
    fn set_stroke_style(&mut self, style: &str) -> Result<(), PlayError> {
        self.set(Property::StrokeStyle, style)
    }
    fn set_text_align(&mut self, align: TextAlign) -> Result<(), PlayError> {
        self.set(Property::TextAlign, align)
    }
    fn set_font(&mut self, font: &str) -> Result<(), PlayError> {
        self.set(Property::Font, font)
    }
    fn set_line_cap(&mut self, cap: LineCap) -> Result<(), PlayError> {
        self.set(Property::LineCap, cap)
    }
    fn set_line_join(&mut self, join: LineJoin) -> Result<(), PlayError> {
        self.set(Property::LineJoin, join)
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), PlayError> {
        self.call(Operation::FillRect, [x, y, w, h])
    }
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), PlayError> {
        self.call(Operation::StrokeRect, [x, y, w, h])
    }
    fn clear_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), PlayError> {
        self.call(Operation::ClearRect, [x, y, w, h])
    }
    fn fill_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<(), PlayError> {
        self.text_call(Operation::FillText, text, x, y, max_width)
    }
    fn stroke_text(
        &mut self,
        text: &str,
        x: f64,
        y: f64,
        max_width: Option<f64>,
    ) -> Result<(), PlayError> {
        self.text_call(Operation::StrokeText, text, x, y, max_width)
    }
    fn move_to(&mut self, x: f64, y: f64) -> Result<(), PlayError> {
        self.call(Operation::MoveTo, [x, y])
    }
    fn line_to(&mut self, x: f64, y: f64) -> Result<(), PlayError> {
        self.call(Operation::LineTo, [x, y])
    }
    fn begin_path(&mut self) -> Result<(), PlayError> {
        self.call(Operation::BeginPath, Vec::<Value>::new())
    }
    fn close_path(&mut self) -> Result<(), PlayError> {
        self.call(Operation::ClosePath, Vec::<Value>::new())
    }
    fn stroke(&mut self) -> Result<(), PlayError> {
        self.call(Operation::Stroke, Vec::<Value>::new())
    }
    fn fill(&mut self) -> Result<(), PlayError> {
        self.call(Operation::Fill, Vec::<Value>::new())
    }
    fn set_line_dash(&mut self, segments: &[f64]) -> Result<(), PlayError> {
        self.call(Operation::SetLineDash, segments.iter().copied())
    }
    fn draw_image(
        &mut self,
        image: &ImageHandle,
        placement: ImagePlacement,
    ) -> Result<(), PlayError> {
        let mut args: Vec<Value> = vec![image.clone().into()];
        let numbers: Vec<f64> = match placement {
            ImagePlacement::At { dx, dy } => vec![dx, dy],
            ImagePlacement::Scaled { dx, dy, dw, dh } => vec![dx, dy, dw, dh],
            ImagePlacement::Sliced {
                sx,
                sy,
                sw,
                sh,
                dx,
                dy,
                dw,
                dh,
            } => vec![sx, sy, sw, sh, dx, dy, dw, dh],
        };
        args.extend(numbers.into_iter().map(Value::from));
        self.call(Operation::DrawImage, args)
    }
    fn arc(
        &mut self,
        x: f64,
        y: f64,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
        anticlockwise: bool,
    ) -> Result<(), PlayError> {
        let args: [Value; 6] = [
            x.into(),
            y.into(),
            radius.into(),
            start_angle.into(),
            end_angle.into(),
            anticlockwise.into(),
        ];
        self.call(Operation::Arc, args)
    }
    fn save(&mut self) -> Result<(), PlayError> {
        self.call(Operation::Save, Vec::<Value>::new())
    }
    fn restore(&mut self) -> Result<(), PlayError> {
        self.call(Operation::Restore, Vec::<Value>::new())
    }
    fn translate(&mut self, x: f64, y: f64) -> Result<(), PlayError> {
        self.call(Operation::Translate, [x, y])
    }
    fn rotate(&mut self, radians: f64) -> Result<(), PlayError> {
        self.call(Operation::Rotate, [radians])
    }
    fn scale(&mut self, x: f64, y: f64) -> Result<(), PlayError> {
        self.call(Operation::Scale, [x, y])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builders::{PolygonOptions, RectOptions, TextOptions, polygon, rect, text};
    use crate::compiler::source::{Point, decode_root};
    use crate::error::CompileError;

    /// Surface that only knows how to fill rectangles.
    #[derive(Default)]
    struct FillOnly {
        line_width: Option<f64>,
        fill_style: Option<String>,
        fills: Vec<[f64; 4]>,
    }

    impl Surface for FillOnly {
        fn size(&self) -> (f64, f64) {
            (200.0, 200.0)
        }
        fn set_line_width(&mut self, width: f64) -> Result<(), PlayError> {
            self.line_width = Some(width);
            Ok(())
        }
        fn set_fill_style(&mut self, style: &str) -> Result<(), PlayError> {
            self.fill_style = Some(style.to_owned());
            Ok(())
        }
        fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64) -> Result<(), PlayError> {
            self.fills.push([x, y, w, h]);
            Ok(())
        }
    }

    #[test]
    fn sets_properties_and_invokes_calls() {
        let mut surface = FillOnly::default();
        let instructions = [
            Instruction::set(Property::LineWidth, 1.0),
            Instruction::set(Property::FillStyle, "black"),
            Instruction::call(Operation::FillRect, [0.0, 0.0, 200.0, 200.0]),
        ];

        Player::apply(&instructions, &mut surface).unwrap();

        assert_eq!(surface.line_width, Some(1.0));
        assert_eq!(surface.fill_style.as_deref(), Some("black"));
        assert_eq!(surface.fills, vec![[0.0, 0.0, 200.0, 200.0]]);
    }

    #[test]
    fn unsupported_operation_stops_after_partial_application() {
        let mut surface = FillOnly::default();
        let instructions = [
            Instruction::call(Operation::FillRect, [1.0, 1.0, 1.0, 1.0]),
            Instruction::bare(Operation::Save),
            Instruction::call(Operation::FillRect, [2.0, 2.0, 2.0, 2.0]),
        ];

        let err = Player::apply(&instructions, &mut surface).unwrap_err();

        assert!(matches!(err, PlayError::UnsupportedSurfaceOperation(name) if name == "save"));
        assert_eq!(surface.fills, vec![[1.0, 1.0, 1.0, 1.0]]);
    }

    #[test]
    fn wrong_arguments_are_rejected() {
        let mut recorder = Recorder::new(10.0, 10.0);
        let cases = [
            Instruction::call(Operation::FillRect, [1.0, 2.0, 3.0]),
            Instruction::call(Operation::FillRect, [1.0, 2.0, 3.0, 4.0, 5.0]),
            Instruction::call(Operation::MoveTo, [Value::from("a"), Value::from(1.0)]),
            Instruction::call(Operation::Save, [1.0]),
            Instruction::call(Operation::DrawImage, [1.0, 2.0, 3.0]),
            Instruction::set(Property::TextAlign, "justify"),
            Instruction::set(Property::LineWidth, "wide"),
        ];

        for instruction in cases {
            let result = Player::apply(std::slice::from_ref(&instruction), &mut recorder);
            assert!(
                matches!(result, Err(PlayError::InvalidArguments { .. })),
                "{instruction:?} was accepted"
            );
        }
    }

    #[test]
    fn image_call_shapes() {
        let mut recorder = Recorder::new(10.0, 10.0);
        let img = || Value::from(ImageHandle::new("bird"));
        let calls = [
            Instruction::call(Operation::DrawImage, [img(), Value::from(0.0), Value::from(0.0)]),
            Instruction::call(
                Operation::DrawImage,
                [img(), Value::from(0.0), Value::from(0.0), Value::from(8.0), Value::from(8.0)],
            ),
            Instruction::call(
                Operation::DrawImage,
                std::iter::once(img()).chain([16.0, 16.0, 128.0, 128.0, 0.0, 0.0, 8.0, 8.0].map(Value::from)),
            ),
        ];

        Player::apply(&calls, &mut recorder).unwrap();
        assert_eq!(recorder.instructions(), calls);

        let four = Instruction::call(
            Operation::DrawImage,
            [img(), Value::from(0.0), Value::from(0.0), Value::from(8.0)],
        );
        assert!(Player::apply(&[four], &mut recorder).is_err());
    }

    #[test]
    fn text_and_arc_optional_arguments() {
        let mut recorder = Recorder::new(10.0, 10.0);
        let calls = [
            Instruction::call(Operation::FillText, [Value::from("Hi"), Value::from(0.0), Value::from(0.0)]),
            Instruction::call(
                Operation::StrokeText,
                [Value::from("Hi"), Value::from(0.0), Value::from(0.0), Value::from(200.0)],
            ),
            Instruction::call(Operation::SetLineDash, [5.0, 15.0]),
            Instruction::bare(Operation::SetLineDash),
        ];
        Player::apply(&calls, &mut recorder).unwrap();
        assert_eq!(recorder.instructions(), calls);

        recorder.reset();
        let without_direction =
            Instruction::call(Operation::Arc, [10.0, 10.0, 10.0, 100.0, 0.0]);
        Player::apply(&[without_direction], &mut recorder).unwrap();
        assert_eq!(
            recorder.instructions()[0],
            Instruction::call(
                Operation::Arc,
                [
                    Value::from(10.0),
                    Value::from(10.0),
                    Value::from(10.0),
                    Value::from(100.0),
                    Value::from(0.0),
                    Value::from(false),
                ]
            )
        );
    }

    #[test]
    fn omitted_root_clears_the_whole_surface() {
        let mut recorder = Recorder::new(200.0, 200.0);
        Player::render(None, &mut recorder).unwrap();

        assert_eq!(
            recorder.instructions(),
            [
                Instruction::bare(Operation::Save),
                Instruction::call(Operation::ClearRect, [0.0, 0.0, 200.0, 200.0]),
                Instruction::bare(Operation::Restore),
            ]
        );
    }

    #[test]
    fn explicit_root_fields_win_over_defaults() {
        let root = decode_root(serde_json::json!({
            "width": 50,
            "draw": [{"fill": "blue"}]
        }))
        .unwrap();
        let mut recorder = Recorder::new(200.0, 100.0);
        Player::render(root.as_ref(), &mut recorder).unwrap();

        assert_eq!(
            recorder.instructions()[3],
            Instruction::call(Operation::FillRect, [0.0, 0.0, 50.0, 100.0])
        );
        assert!(
            !recorder
                .instructions()
                .contains(&Instruction::call(Operation::ClearRect, [0.0, 0.0, 50.0, 100.0]))
        );
    }

    #[test]
    fn root_without_draw_gets_a_clearing_pass() {
        let root = rect(RectOptions {
            x: 10.0,
            ..RectOptions::default()
        })
        .with_children([text(TextOptions {
            value: "score".into(),
            ..TextOptions::default()
        })]);
        let mut recorder = Recorder::new(20.0, 10.0);
        Player::render(Some(&root), &mut recorder).unwrap();

        assert_eq!(
            recorder.instructions()[1],
            Instruction::call(Operation::ClearRect, [10.0, 0.0, 20.0, 10.0])
        );
    }

    #[test]
    fn compile_errors_surface_from_render() {
        let root = polygon(PolygonOptions {
            points: vec![Point::new(0.0, 0.0)],
            ..PolygonOptions::default()
        });
        let mut recorder = Recorder::new(10.0, 10.0);

        let err = Player::render(Some(&root), &mut recorder).unwrap_err();
        assert!(matches!(
            err,
            RenderError::Compile(CompileError::MalformedElement { .. })
        ));
        assert!(recorder.instructions().is_empty());
    }

    #[test]
    fn replaying_compiled_tree_reproduces_it_every_time() {
        let tree = rect(RectOptions {
            width: Some(100.0),
            height: Some(100.0),
            draw: vec![Paint::fill("black"), Paint::stroke("white").line_width(2.0)],
            ..RectOptions::default()
        })
        .with_children([
            polygon(PolygonOptions {
                x: 5.0,
                y: 5.0,
                points: vec![Point::new(0.0, 0.0), Point::new(4.0, 0.0), Point::new(2.0, 3.0)],
                draw: vec![Paint::fill("orange"), Paint::stroke("black")],
                ..PolygonOptions::default()
            }),
            text(TextOptions {
                value: "score: 3".into(),
                width: Some(40.0),
                font: Some("8px mono".into()),
                ..TextOptions::default()
            }),
        ]);
        let instructions = Compiler::compile(Some(&tree)).unwrap();

        let mut recorder = Recorder::new(100.0, 100.0);
        for _ in 0..3 {
            recorder.reset();
            Player::apply(&instructions, &mut recorder).unwrap();
            assert_eq!(recorder.instructions(), instructions.as_slice());
        }
    }
}
