//! Element tree types — the producer-authored declarative format.
//!
//! These types define *what* should be drawn, never *how*. The compiler
//! reads them and translates each node into surface instructions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use crate::error::CompileError;

// Re-export kind types so they remain accessible via `compiler::source::*`.
pub use super::objects::{Arc, Image, Line, LineStyle, Polygon, Rect, Text};

/// A node of the declarative drawing tree.
///
/// Offsets are relative to the parent's resolved origin. `transformations`
/// only change surface state for this node's own paint; children are placed
/// from the untransformed origin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    #[serde(flatten)]
    pub shape: Shape,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub draw: Vec<Paint>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub transformations: Vec<Transformation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Option<Element>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Shape {
    Rect(Rect),
    Line(Line),
    Text(Text),
    Polygon(Polygon),
    Image(Image),
    Arc(Arc),
}

impl Shape {
    pub fn kind(&self) -> ElementKind {
        match self {
            Shape::Rect(_) => ElementKind::Rect,
            Shape::Line(_) => ElementKind::Line,
            Shape::Text(_) => ElementKind::Text,
            Shape::Polygon(_) => ElementKind::Polygon,
            Shape::Image(_) => ElementKind::Image,
            Shape::Arc(_) => ElementKind::Arc,
        }
    }
}

impl Element {
    pub fn new(shape: Shape) -> Self {
        Element {
            shape,
            x: 0.0,
            y: 0.0,
            draw: Vec::new(),
            transformations: Vec::new(),
            font: None,
            children: Vec::new(),
        }
    }

    pub fn kind(&self) -> ElementKind {
        self.shape.kind()
    }

    /// Replace the children with an explicit list.
    pub fn with_children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children = children.into_iter().map(Some).collect();
        self
    }

    /// Resolve this element's absolute origin from its parent's.
    pub fn origin(&self, parent: Point) -> Point {
        Point {
            x: parent.x + self.x,
            y: parent.y + self.y,
        }
    }
}

/// The closed set of element kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Rect,
    Line,
    Text,
    Polygon,
    Image,
    Arc,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Rect => "rect",
            ElementKind::Line => "line",
            ElementKind::Text => "text",
            ElementKind::Polygon => "polygon",
            ElementKind::Image => "image",
            ElementKind::Arc => "arc",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = CompileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rect" => Ok(ElementKind::Rect),
            "line" => Ok(ElementKind::Line),
            "text" => Ok(ElementKind::Text),
            "polygon" => Ok(ElementKind::Polygon),
            "image" => Ok(ElementKind::Image),
            "arc" => Ok(ElementKind::Arc),
            other => Err(CompileError::UnknownElementKind(other.to_owned())),
        }
    }
}

// ---------------------------------------------------------------------------
// Shared geometry and paint primitives
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    pub fn offset(self, by: Point) -> Point {
        Point {
            x: self.x + by.x,
            y: self.y + by.y,
        }
    }
}

/// One paint pass over an element. Passes run in list order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_width: Option<f64>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub clear: bool,
}

impl Paint {
    pub fn fill(color: impl Into<String>) -> Self {
        Paint {
            fill: Some(color.into()),
            ..Paint::default()
        }
    }

    pub fn stroke(color: impl Into<String>) -> Self {
        Paint {
            stroke: Some(color.into()),
            ..Paint::default()
        }
    }

    pub fn clear() -> Self {
        Paint {
            clear: true,
            ..Paint::default()
        }
    }

    pub fn line_width(mut self, width: f64) -> Self {
        self.line_width = Some(width);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Transformation {
    Translate(Point),
    /// Radians.
    Rotate(f64),
    Scale(Point),
}

// ---------------------------------------------------------------------------
// JSON decoding
// ---------------------------------------------------------------------------

/// Decode one element (and its subtree) from JSON.
///
/// Kinds are checked before the schema so an unrecognised `kind` reports
/// `UnknownElementKind` instead of a generic decode failure.
pub fn decode_element(value: Json) -> Result<Element, CompileError> {
    let mut fields = match value {
        Json::Object(fields) => fields,
        other => {
            return Err(CompileError::Decode(format!(
                "expected an element object, found {}",
                json_type(&other)
            )));
        }
    };

    let kind = match fields.get("kind") {
        Some(Json::String(name)) => name.parse::<ElementKind>()?,
        Some(other) => {
            return Err(CompileError::UnknownElementKind(other.to_string()));
        }
        None => return Err(CompileError::Decode("element is missing `kind`".into())),
    };

    let children = match fields.remove("children") {
        None | Some(Json::Null) => Vec::new(),
        Some(Json::Array(items)) => items
            .into_iter()
            .map(decode_child)
            .collect::<Result<Vec<_>, _>>()?,
        Some(other) => {
            return Err(CompileError::malformed(
                kind,
                format!("`children` must be an array, found {}", json_type(&other)),
            ));
        }
    };

    if fields.get("draw") == Some(&Json::Null) {
        fields.remove("draw");
    }
    let default_draw = kind == ElementKind::Text && !fields.contains_key("draw");

    let mut element: Element = serde_json::from_value(Json::Object(fields))
        .map_err(|e| CompileError::malformed(kind, e.to_string()))?;
    if default_draw {
        element.draw = super::objects::default_text_draw();
    }
    element.children = children;
    Ok(element)
}

fn decode_child(value: Json) -> Result<Option<Element>, CompileError> {
    match value {
        Json::Null => Ok(None),
        other => decode_element(other).map(Some),
    }
}

/// Decode a root element. `null` means "no root"; an object without a
/// `kind` is a rect, so the root defaults can fill in the rest.
pub fn decode_root(value: Json) -> Result<Option<Element>, CompileError> {
    match value {
        Json::Null => Ok(None),
        Json::Object(mut fields) => {
            fields
                .entry("kind")
                .or_insert_with(|| Json::String(ElementKind::Rect.as_str().into()));
            decode_element(Json::Object(fields)).map(Some)
        }
        other => Err(CompileError::Decode(format!(
            "expected a root element, found {}",
            json_type(&other)
        ))),
    }
}

/// Decode a scene document: either one root or an array of roots, one per
/// frame.
pub fn decode_frames(text: &str) -> Result<Vec<Option<Element>>, CompileError> {
    let value: Json =
        serde_json::from_str(text).map_err(|e| CompileError::Decode(e.to_string()))?;
    match value {
        Json::Array(frames) => frames.into_iter().map(decode_root).collect(),
        single => Ok(vec![decode_root(single)?]),
    }
}

fn json_type(value: &Json) -> &'static str {
    match value {
        Json::Null => "null",
        Json::Bool(_) => "a boolean",
        Json::Number(_) => "a number",
        Json::String(_) => "a string",
        Json::Array(_) => "an array",
        Json::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Instruction, Operation};
    use serde_json::json;

    #[test]
    fn decodes_nested_tree_with_absent_children() {
        let element = decode_element(json!({
            "kind": "rect",
            "x": 10,
            "width": 25,
            "height": 25,
            "draw": [{"fill": "black"}, {"stroke": "red", "lineWidth": 4}],
            "children": [
                null,
                {"kind": "text", "value": "Hi", "textAlign": "center"}
            ]
        }))
        .unwrap();

        assert_eq!(element.kind(), ElementKind::Rect);
        assert_eq!(element.x, 10.0);
        assert_eq!(element.y, 0.0);
        assert_eq!(element.draw[1].line_width, Some(4.0));
        assert_eq!(element.children.len(), 2);
        assert!(element.children[0].is_none());
        let child = element.children[1].as_ref().unwrap();
        assert!(matches!(&child.shape, Shape::Text(t) if t.value == "Hi"));
    }

    #[test]
    fn unknown_kind_is_reported_by_name() {
        let err = decode_element(json!({
            "kind": "rect",
            "width": 1,
            "height": 1,
            "children": [{"kind": "hexagon"}]
        }))
        .unwrap_err();

        assert!(matches!(err, CompileError::UnknownElementKind(kind) if kind == "hexagon"));
    }

    #[test]
    fn schema_errors_name_the_offending_kind() {
        let err = decode_element(json!({"kind": "arc", "x": 1})).unwrap_err();
        assert!(matches!(
            err,
            CompileError::MalformedElement { kind: ElementKind::Arc, .. }
        ));
    }

    #[test]
    fn fields_of_other_kinds_are_ignored() {
        let element = decode_element(json!({
            "kind": "polygon",
            "points": [{"x": 0, "y": 0}, {"x": 1, "y": 1}],
            "value": "not a polygon field",
            "radius": 4
        }))
        .unwrap();
        assert_eq!(element.kind(), ElementKind::Polygon);
    }

    #[test]
    fn root_without_kind_is_a_rect() {
        let root = decode_root(json!({"draw": [{"fill": "blue"}]})).unwrap().unwrap();
        assert_eq!(root.kind(), ElementKind::Rect);
        assert!(decode_root(json!(null)).unwrap().is_none());
    }

    #[test]
    fn frames_accept_single_root_or_array() {
        assert_eq!(decode_frames(r#"{"kind": "rect"}"#).unwrap().len(), 1);
        let frames = decode_frames(r#"[null, {"kind": "rect"}, {}]"#).unwrap();
        assert_eq!(frames.len(), 3);
        assert!(frames[0].is_none());
    }

    #[test]
    fn transformations_use_single_key_objects() {
        let element = decode_element(json!({
            "kind": "rect",
            "transformations": [
                {"translate": {"x": 10, "y": 5}},
                {"rotate": 0.5},
                {"scale": {"x": 2, "y": 2}}
            ]
        }))
        .unwrap();

        assert_eq!(
            element.transformations,
            vec![
                Transformation::Translate(Point::new(10.0, 5.0)),
                Transformation::Rotate(0.5),
                Transformation::Scale(Point::new(2.0, 2.0)),
            ]
        );
    }

    #[test]
    fn text_without_draw_is_filled_black() {
        let element = decode_element(json!({"kind": "text", "value": "Hi"})).unwrap();
        assert_eq!(element.draw, vec![Paint::fill("black")]);

        let nulled = decode_element(json!({"kind": "text", "value": "Hi", "draw": null})).unwrap();
        assert_eq!(nulled.draw, vec![Paint::fill("black")]);

        let instructions = crate::compiler::Compiler::compile(Some(&element)).unwrap();
        assert!(instructions.iter().any(|i| matches!(
            i,
            Instruction::Call { call: Operation::FillText, .. }
        )));
    }

    #[test]
    fn explicit_draw_on_text_is_kept() {
        let empty = decode_element(json!({"kind": "text", "value": "Hi", "draw": []})).unwrap();
        assert!(empty.draw.is_empty());

        let stroked = decode_element(json!({
            "kind": "text",
            "value": "Hi",
            "draw": [{"stroke": "red"}]
        }))
        .unwrap();
        assert_eq!(stroked.draw, vec![Paint::stroke("red")]);

        let rect = decode_element(json!({"kind": "rect"})).unwrap();
        assert!(rect.draw.is_empty());
    }

    #[test]
    fn elements_serialize_back_to_the_same_shape() {
        let source = json!({
            "kind": "line",
            "x": 3.0,
            "y": 4.0,
            "points": [{"x": 1.0, "y": 2.0}],
            "style": {"lineWidth": 2.0, "lineCap": "round", "lineJoin": "bevel", "strokeStyle": "red"}
        });
        let element = decode_element(source.clone()).unwrap();
        assert_eq!(serde_json::to_value(&element).unwrap(), source);
    }
}
