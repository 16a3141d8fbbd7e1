use crate::store::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("authentication required to {0}")]
    Unauthenticated(&'static str),

    #[error("no permission to access {0} '{1}'")]
    PermissionDenied(&'static str, String),

    #[error("{0} '{1}' not found")]
    NotFound(&'static str, String),

    // The store cannot serve a compound query without a composite index.
    // Distinct from a generic read failure: the fix is provisioning, not retry.
    #[error("composite index required for '{0}': {1}")]
    IndexRequired(String, String),

    #[error("store read failed while {0}: {1}")]
    StoreReadFailed(&'static str, String),

    #[error("store write failed while {0}: {1}")]
    StoreWriteFailed(&'static str, String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid language '{0}'")]
    InvalidLanguage(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml_ng::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TemplateError {
    /// Map a store error raised while reading on behalf of `operation`.
    pub(crate) fn from_read(operation: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::IndexRequired {
                collection,
                message,
            } => TemplateError::IndexRequired(collection, message),
            other => TemplateError::StoreReadFailed(operation, other.to_string()),
        }
    }

    /// Map a store error raised while writing `kind` on behalf of `operation`.
    pub(crate) fn from_write(operation: &'static str, kind: &'static str, err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_, id) => TemplateError::NotFound(kind, id),
            other => TemplateError::StoreWriteFailed(operation, other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TemplateError>;
