//! Shader loading into bump-allocated code memory.

mod arena;
mod error;

pub use arena::{CodeArena, ShaderCode};
pub use error::ShaderError;
