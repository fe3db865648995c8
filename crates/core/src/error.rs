use codemodel_api::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodeModelError {
    #[error("Invalid identifier: {0:?}")]
    InvalidIdentifier(String),
    #[error("Invalid qualified name: {0:?}")]
    InvalidQualifiedName(String),
    #[error("Class already exists: {0}")]
    ClassAlreadyExists(String),
    #[error("Unknown class: #{0}")]
    UnknownClass(u32),
    #[error("Duplicate member `{member}` in {owner}")]
    DuplicateMember { owner: String, member: String },
    #[error("Illegal modifiers `{modifiers}` on {target}: {reason}")]
    IllegalModifiers {
        target: &'static str,
        modifiers: String,
        reason: &'static str,
    },
    #[error("Invalid type usage: {0}")]
    InvalidType(String),
    #[error("Invalid resource: {0}")]
    InvalidResource(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type Result<T> = std::result::Result<T, CodeModelError>;

/// Validate a declared name.
pub(crate) fn check_identifier(name: &str) -> Result<()> {
    if codemodel_api::is_identifier(name) {
        Ok(())
    } else {
        Err(CodeModelError::InvalidIdentifier(name.to_string()))
    }
}
