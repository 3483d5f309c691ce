use std::sync::Arc;

use serde::Serialize;

use crate::core::data_loader;

#[derive(Debug, Clone, thiserror::Error)]
pub enum ResolveError {
    #[error("Unknown field: {0}")]
    UnknownField(String),

    #[error(transparent)]
    Load(#[from] data_loader::Error<Arc<anyhow::Error>>),
}

/// A field that resolved to `null` because its lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub path: Vec<String>,
    pub message: String,
}
