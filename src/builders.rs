//! Element constructors with the default values each kind is drawn with.
//!
//! Every `*Options` struct carries the kind's defaults in its `Default`
//! impl, so callers override only what they need:
//!
//! ```
//! use canvas_driver::builders::{text, TextOptions};
//!
//! let label = text(TextOptions {
//!     value: "Score: 3".into(),
//!     x: 10.0,
//!     y: 20.0,
//!     ..TextOptions::default()
//! });
//! assert_eq!(label.draw[0].fill.as_deref(), Some("black"));
//! ```
//!
//! Children can be given in the options or attached afterwards with
//! `Element::with_children`, which replaces whatever the options held.

use crate::compiler::objects::default_text_draw;
use crate::compiler::source::{
    Arc, Element, Image, Line, LineStyle, Paint, Point, Polygon, Rect, Shape, Text,
    Transformation,
};
use crate::types::{ImageHandle, TextAlign};

/// Fields every kind shares.
fn assemble(
    shape: Shape,
    x: f64,
    y: f64,
    draw: Vec<Paint>,
    transformations: Vec<Transformation>,
    font: Option<String>,
    children: Vec<Option<Element>>,
) -> Element {
    Element {
        shape,
        x,
        y,
        draw,
        transformations,
        font,
        children,
    }
}

#[derive(Debug, Clone, Default)]
pub struct RectOptions {
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub draw: Vec<Paint>,
    pub transformations: Vec<Transformation>,
    pub font: Option<String>,
    pub children: Vec<Option<Element>>,
}

pub fn rect(o: RectOptions) -> Element {
    let shape = Shape::Rect(Rect {
        width: o.width,
        height: o.height,
    });
    assemble(shape, o.x, o.y, o.draw, o.transformations, o.font, o.children)
}

#[derive(Debug, Clone)]
pub struct TextOptions {
    pub x: f64,
    pub y: f64,
    pub value: String,
    pub width: Option<f64>,
    pub text_align: TextAlign,
    pub font: Option<String>,
    pub draw: Vec<Paint>,
    pub transformations: Vec<Transformation>,
    pub children: Vec<Option<Element>>,
}

impl Default for TextOptions {
    fn default() -> Self {
        TextOptions {
            x: 0.0,
            y: 0.0,
            value: String::new(),
            width: None,
            text_align: TextAlign::Left,
            font: None,
            draw: default_text_draw(),
            transformations: Vec::new(),
            children: Vec::new(),
        }
    }
}

pub fn text(o: TextOptions) -> Element {
    let shape = Shape::Text(Text {
        value: o.value,
        width: o.width,
        text_align: o.text_align,
    });
    assemble(shape, o.x, o.y, o.draw, o.transformations, o.font, o.children)
}

/// `style` defaults to 1 wide, butt caps, miter joins, black.
#[derive(Debug, Clone, Default)]
pub struct LineOptions {
    pub x: f64,
    pub y: f64,
    pub points: Vec<Point>,
    pub style: LineStyle,
    pub transformations: Vec<Transformation>,
    pub children: Vec<Option<Element>>,
}

pub fn line(o: LineOptions) -> Element {
    let shape = Shape::Line(Line {
        points: o.points,
        style: o.style,
    });
    assemble(shape, o.x, o.y, Vec::new(), o.transformations, None, o.children)
}

#[derive(Debug, Clone, Default)]
pub struct PolygonOptions {
    pub x: f64,
    pub y: f64,
    pub points: Vec<Point>,
    pub draw: Vec<Paint>,
    pub transformations: Vec<Transformation>,
    pub children: Vec<Option<Element>>,
}

pub fn polygon(o: PolygonOptions) -> Element {
    let shape = Shape::Polygon(Polygon { points: o.points });
    assemble(shape, o.x, o.y, o.draw, o.transformations, None, o.children)
}

#[derive(Debug, Clone)]
pub struct ImageOptions {
    pub image: ImageHandle,
    pub x: f64,
    pub y: f64,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub sx: Option<f64>,
    pub sy: Option<f64>,
    pub s_width: Option<f64>,
    pub s_height: Option<f64>,
    pub transformations: Vec<Transformation>,
    pub children: Vec<Option<Element>>,
}

impl ImageOptions {
    /// Options for drawing `image` unscaled at the parent origin.
    pub fn new(image: ImageHandle) -> Self {
        ImageOptions {
            image,
            x: 0.0,
            y: 0.0,
            width: None,
            height: None,
            sx: None,
            sy: None,
            s_width: None,
            s_height: None,
            transformations: Vec::new(),
            children: Vec::new(),
        }
    }
}

pub fn image(o: ImageOptions) -> Element {
    let shape = Shape::Image(Image {
        width: o.width,
        height: o.height,
        sx: o.sx,
        sy: o.sy,
        s_width: o.s_width,
        s_height: o.s_height,
        ..Image::new(o.image)
    });
    assemble(shape, o.x, o.y, Vec::new(), o.transformations, None, o.children)
}

#[derive(Debug, Clone, Default)]
pub struct ArcOptions {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub anticlockwise: bool,
    pub draw: Vec<Paint>,
    pub transformations: Vec<Transformation>,
    pub children: Vec<Option<Element>>,
}

pub fn arc(o: ArcOptions) -> Element {
    let shape = Shape::Arc(Arc {
        radius: o.radius,
        start_angle: o.start_angle,
        end_angle: o.end_angle,
        anticlockwise: o.anticlockwise,
    });
    assemble(shape, o.x, o.y, o.draw, o.transformations, None, o.children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::source::ElementKind;
    use crate::types::{LineCap, LineJoin};

    #[test]
    fn text_defaults_to_black_fill_left_aligned() {
        let element = text(TextOptions {
            value: "Hi".into(),
            ..TextOptions::default()
        });

        assert_eq!(element.draw, vec![Paint::fill("black")]);
        assert!(matches!(&element.shape, Shape::Text(t) if t.text_align == TextAlign::Left));
    }

    #[test]
    fn line_style_defaults() {
        let element = line(LineOptions::default());
        let Shape::Line(l) = &element.shape else {
            panic!("expected a line");
        };

        assert_eq!(l.style.line_width, 1.0);
        assert_eq!(l.style.line_cap, LineCap::Butt);
        assert_eq!(l.style.line_join, LineJoin::Miter);
        assert_eq!(l.style.stroke_style, "black");
        assert!(l.style.line_dash.is_empty());
    }

    #[test]
    fn arc_runs_clockwise_by_default() {
        let element = arc(ArcOptions {
            radius: 3.0,
            ..ArcOptions::default()
        });
        assert!(matches!(&element.shape, Shape::Arc(a) if !a.anticlockwise));
    }

    #[test]
    fn explicit_children_replace_option_children() {
        let from_options = rect(RectOptions::default());
        let explicit = polygon(PolygonOptions::default());

        let element = rect(RectOptions {
            children: vec![Some(from_options)],
            ..RectOptions::default()
        })
        .with_children([explicit]);

        assert_eq!(element.children.len(), 1);
        assert_eq!(
            element.children[0].as_ref().map(Element::kind),
            Some(ElementKind::Polygon)
        );
    }

    #[test]
    fn option_children_are_kept_when_none_are_attached() {
        let element = rect(RectOptions {
            children: vec![Some(text(TextOptions::default())), None],
            ..RectOptions::default()
        });
        assert_eq!(element.children.len(), 2);
    }
}
