use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading resources or ranking against them.
#[derive(Error, Debug)]
pub enum RetrievalError {
    #[error("failed to load {}: {reason}", path.display())]
    Load { path: PathBuf, reason: String },

    #[error("thread index for tag '{tag}' has no entries")]
    EmptyIndex { tag: String },

    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },
}

impl RetrievalError {
    pub fn load(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Load {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Short machine-readable name, used in host error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Load { .. } => "load",
            Self::EmptyIndex { .. } => "emptyIndex",
            Self::DimensionMismatch { .. } => "dimensionMismatch",
        }
    }
}

pub type Result<T> = std::result::Result<T, RetrievalError>;
