use crate::compiler::source::ElementKind;

/// Failure to turn an element tree into instructions. No instructions are
/// produced for a frame that fails to compile.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("unknown element kind `{0}`")]
    UnknownElementKind(String),
    #[error("malformed {kind} element: {reason}")]
    MalformedElement { kind: ElementKind, reason: String },
    #[error("invalid scene document: {0}")]
    Decode(String),
}

impl CompileError {
    pub(crate) fn malformed(kind: ElementKind, reason: impl Into<String>) -> Self {
        CompileError::MalformedElement {
            kind,
            reason: reason.into(),
        }
    }
}

/// Failure while replaying instructions. The surface keeps whatever state
/// the instructions before the failing one left behind.
#[derive(Debug, thiserror::Error)]
pub enum PlayError {
    #[error("surface does not support `{0}`")]
    UnsupportedSurfaceOperation(String),
    #[error("invalid arguments for `{operation}`: {reason}")]
    InvalidArguments {
        operation: &'static str,
        reason: String,
    },
    #[error("unknown image `{0}`")]
    UnknownImage(String),
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Play(#[from] PlayError),
}
