use crate::field_path::FieldPath;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ComposeError {
    #[error("compose file not found: {}", path.display())]
    FileNotFound { path: PathBuf },
    #[error("yaml parse error: {message}")]
    Parse { message: String },
    #[error("schema mismatch at {path}: {message}")]
    SchemaMismatch { path: FieldPath, message: String },
    #[error("serialization failed: {message}")]
    Serialization { message: String },
}

impl ComposeError {
    pub fn parse(message: impl Into<String>) -> Self {
        ComposeError::Parse { message: message.into() }
    }

    pub fn mismatch(path: FieldPath, message: impl Into<String>) -> Self {
        ComposeError::SchemaMismatch {
            path,
            message: message.into(),
        }
    }

    pub fn serialization(message: impl Into<String>) -> Self {
        ComposeError::Serialization { message: message.into() }
    }

    pub fn field_path(&self) -> Option<&FieldPath> {
        match self {
            ComposeError::SchemaMismatch { path, .. } => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;
