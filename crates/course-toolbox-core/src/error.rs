//! Error types for the toolbox core.

use std::fmt;

/// The main error type for core operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// No tokio runtime is running and the fallback runtime could not be built.
    RuntimeUnavailable(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RuntimeUnavailable(msg) => {
                write!(f, "No async runtime available: {msg}")
            }
        }
    }
}

impl std::error::Error for CoreError {}

/// A specialized Result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
