//! Error type shared by every megagraph module.

use thiserror::Error;

/// Everything that can go wrong while resolving relatives or answering
/// ancestor queries.
#[derive(Debug, Error)]
pub enum MegaGraphError {
    /// A caller passed a value outside the accepted domain (for example an
    /// unknown traversal direction).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The node loader could not find `kind` with `id`.
    #[error("{kind} with id {id} not found")]
    NotFound { kind: String, id: i64 },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(String),
}

impl MegaGraphError {
    /// Shorthand for [`MegaGraphError::NotFound`].
    pub fn not_found(kind: impl Into<String>, id: i64) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id,
        }
    }

    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, MegaGraphError>;
