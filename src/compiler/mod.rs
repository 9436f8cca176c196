//! Compiler — the scene-to-instruction translator.
//!
//! Turns an `Element` tree (what to draw) into a flat, ordered list of
//! `Instruction`s (how to draw it) for a stateful 2D surface.
//!
//! The compiler is pure and stateless. Given the same tree it always
//! produces the same instructions. It never touches a surface.

pub mod objects;
pub mod source;

use std::ops::{Deref, DerefMut};

use crate::error::CompileError;
use crate::types::{Instruction, Operation, Property};
use objects::{Context, Translate};
use source::{Element, ElementKind, Point, Transformation};

pub struct Compiler;

impl Compiler {
    /// Compile a tree rooted at the surface origin. An absent element
    /// compiles to nothing.
    pub fn compile(element: Option<&Element>) -> Result<Vec<Instruction>, CompileError> {
        Self::compile_at(element, Point::ORIGIN)
    }

    /// Compile a tree whose parent origin is `parent`.
    pub fn compile_at(
        element: Option<&Element>,
        parent: Point,
    ) -> Result<Vec<Instruction>, CompileError> {
        let mut out = Vec::new();
        Self::emit(element, parent, &mut out)?;
        Ok(out)
    }

    fn emit(
        element: Option<&Element>,
        parent: Point,
        out: &mut Vec<Instruction>,
    ) -> Result<(), CompileError> {
        let Some(element) = element else {
            return Ok(());
        };
        let kind = element.kind();
        if !element.x.is_finite() || !element.y.is_finite() {
            return Err(CompileError::malformed(
                kind,
                format!("offset ({}, {}) is not finite", element.x, element.y),
            ));
        }
        let origin = element.origin(parent);
        tracing::trace!(%kind, x = origin.x, y = origin.y, "compiling element");

        {
            let mut frame = StateFrame::open(out);
            for transformation in &element.transformations {
                frame.push(transform_instruction(transformation));
            }
            // Text sets its font per draw pass.
            if kind != ElementKind::Text {
                if let Some(font) = &element.font {
                    frame.push(Instruction::set(Property::Font, font.as_str()));
                }
            }
            let cx = Context {
                origin,
                draw: &element.draw,
                font: element.font.as_deref(),
            };
            element.shape.translate(&cx, &mut frame)?;
        }

        // Children are drawn after the parent's state is restored.
        for child in &element.children {
            Self::emit(child.as_ref(), origin, out)?;
        }
        Ok(())
    }
}

fn transform_instruction(transformation: &Transformation) -> Instruction {
    match *transformation {
        Transformation::Translate(by) => Instruction::call(Operation::Translate, [by.x, by.y]),
        Transformation::Rotate(radians) => Instruction::call(Operation::Rotate, [radians]),
        Transformation::Scale(by) => Instruction::call(Operation::Scale, [by.x, by.y]),
    }
}

/// One `save` … `restore` bracket on the instruction list.
///
/// `restore` is emitted when the frame is dropped, so every path out of an
/// element, including `?` returns, closes exactly the bracket it opened.
struct StateFrame<'a> {
    out: &'a mut Vec<Instruction>,
}

impl<'a> StateFrame<'a> {
    fn open(out: &'a mut Vec<Instruction>) -> Self {
        out.push(Instruction::bare(Operation::Save));
        StateFrame { out }
    }
}

impl Deref for StateFrame<'_> {
    type Target = Vec<Instruction>;

    fn deref(&self) -> &Self::Target {
        self.out
    }
}

impl DerefMut for StateFrame<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.out
    }
}

impl Drop for StateFrame<'_> {
    fn drop(&mut self) {
        self.out.push(Instruction::bare(Operation::Restore));
    }
}
