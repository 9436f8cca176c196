use serde::{Deserialize, Serialize};

use crate::error::CompileError;
use crate::types::{ImageHandle, Instruction, Operation, Value};

use super::super::source::ElementKind;
use super::{Context, Translate, required};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Image {
    pub image: ImageHandle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sy: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s_height: Option<f64>,
}

impl Image {
    pub fn new(image: ImageHandle) -> Self {
        Image {
            image,
            width: None,
            height: None,
            sx: None,
            sy: None,
            s_width: None,
            s_height: None,
        }
    }
}

impl Translate for Image {
    fn translate(&self, cx: &Context<'_>, out: &mut Vec<Instruction>) -> Result<(), CompileError> {
        const KIND: ElementKind = ElementKind::Image;

        let mut args: Vec<Value> = vec![self.image.clone().into()];
        if self.sx.is_some() {
            if self.width.is_none() {
                return Err(CompileError::malformed(
                    KIND,
                    "a source rectangle needs a destination width and height",
                ));
            }
            args.push(required(KIND, "sx", self.sx)?.into());
            args.push(required(KIND, "sy", self.sy)?.into());
            args.push(required(KIND, "sWidth", self.s_width)?.into());
            args.push(required(KIND, "sHeight", self.s_height)?.into());
        }
        args.push(cx.origin.x.into());
        args.push(cx.origin.y.into());
        if self.width.is_some() {
            args.push(required(KIND, "width", self.width)?.into());
            args.push(required(KIND, "height", self.height)?.into());
        }

        out.push(Instruction::call(Operation::DrawImage, args));
        Ok(())
    }
}
