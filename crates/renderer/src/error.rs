use thiserror::Error;

use crate::shader::ShaderStage;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Failed to compile {stage} shader: {log}")]
    ShaderCompile { stage: ShaderStage, log: String },

    #[error("Failed to link shader program: {log}")]
    ShaderLink { log: String },

    #[error("Failed to create {what}: {message}")]
    ObjectCreation { what: &'static str, message: String },

    #[error("{what} of {len} elements is too large to upload")]
    TooLarge { what: &'static str, len: usize },
}

pub type RenderResult<T> = Result<T, RenderError>;
