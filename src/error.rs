use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("invalid snapshot identifier `{code}`: {reason}")]
    InvalidIdentifier { code: String, reason: String },
    #[error("current snapshot not found or unreadable: {}", .0.display())]
    MissingCurrentSnapshot(PathBuf),
    #[error("archive directory not found or unreadable: {}", .0.display())]
    MissingArchive(PathBuf),
    #[error("marker not found: {0}")]
    MarkerNotFound(String),
    #[error("config file invalid or unreadable: {0}")]
    InvalidConfig(String),
}

impl HistoryError {
    pub fn invalid_identifier(code: &str, reason: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            code: code.to_string(),
            reason: reason.into(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidIdentifier { .. } => "E001_INVALID_IDENTIFIER",
            Self::MissingCurrentSnapshot(_) => "E002_MISSING_CURRENT",
            Self::MissingArchive(_) => "E003_MISSING_ARCHIVE",
            Self::MarkerNotFound(_) => "E004_MARKER_NOT_FOUND",
            Self::InvalidConfig(_) => "E005_CONFIG_INVALID",
        }
    }
}
