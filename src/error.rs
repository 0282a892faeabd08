use thiserror::Error;

use crate::gl::ShaderStage;

/// Why a renderer mount attempt stopped before reaching `Running`.
///
/// None of these are retried; the page has to be reloaded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RenderError {
    #[error("WebGL not supported: no shader-capable drawing context")]
    ContextUnavailable,

    #[error("{stage} shader failed to compile: {log}")]
    Compile { stage: ShaderStage, log: String },

    #[error("program failed to link: {log}")]
    Link { log: String },

    #[error("vertex attribute `{name}` not found in linked program")]
    AttributeUnresolved { name: String },

    #[error("could not create {what}")]
    ResourceCreation { what: &'static str },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown shader variant `{0}`")]
    UnknownVariant(String),

    #[error("invalid value `{value}` for `{key}`")]
    InvalidValue { key: String, value: String },
}
