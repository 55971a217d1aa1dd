use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid account id or password")]
    InvalidCredentials,

    #[error("Account '{0}' already exists")]
    DuplicateAccount(String),

    #[error("Account id must not be empty")]
    EmptyAccountId,

    #[error("Password must not be empty")]
    EmptyPassword,

    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Malformed file {file}: {reason}")]
    MalformedFile { file: String, reason: String },

    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is malformed: {reason}")]
    Malformed { path: PathBuf, reason: String },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl InfraError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn malformed(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Malformed {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl From<InfraError> for DomainError {
    fn from(err: InfraError) -> Self {
        match err {
            InfraError::Io { path, source } if source.kind() == std::io::ErrorKind::NotFound => {
                DomainError::FileNotFound(path.display().to_string())
            }
            InfraError::Malformed { path, reason } => DomainError::MalformedFile {
                file: path.display().to_string(),
                reason,
            },
            other => DomainError::Storage(other.to_string()),
        }
    }
}
