//! Compile trees of drawing elements into canvas-style instructions and
//! replay them against a drawing surface.

pub mod builders;
pub mod compiler;
pub mod config;
pub mod driver;
pub mod error;
pub mod player;
pub mod renderer;
pub mod types;
