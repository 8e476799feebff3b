//! Error types for the toolbox engine.

use std::path::PathBuf;

use course_toolbox_core::CoreError;
use course_toolbox_net::NetworkError;

use crate::model::ItemId;
use crate::transport::MutationResponse;

/// Errors raised while loading or validating a [`ToolboxConfig`](crate::ToolboxConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parsing error.
    #[error("Failed to parse toolbox config: {0}")]
    Parse(#[from] toml::de::Error),

    /// File I/O error.
    #[error("Failed to read toolbox config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A field holds an unusable value.
    #[error("Invalid value for '{field}': {message}")]
    Invalid { field: &'static str, message: String },

    /// The HTTP client could not be built.
    #[error("Failed to build HTTP client: {0}")]
    Client(#[from] NetworkError),
}

impl ConfigError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            message: message.into(),
        }
    }
}

/// Why a mutation did not succeed.
///
/// Every variant is reported to the user the same way. The optimistic UI
/// change that preceded the request is left in place.
#[derive(Debug, Clone, thiserror::Error)]
pub enum MutationFailure {
    /// Network or HTTP-level failure.
    #[error("Request failed: {0}")]
    Transport(#[from] NetworkError),

    /// The server answered with an `error` field.
    #[error("Server reported an error: {message}")]
    Application {
        message: String,
        response: Box<MutationResponse>,
    },

    /// The request could not be scheduled at all.
    #[error("Request not sent: {0}")]
    Runtime(#[from] CoreError),
}

impl MutationFailure {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::Runtime(_))
    }

    pub fn is_application(&self) -> bool {
        matches!(self, Self::Application { .. })
    }
}

/// Document lookups that found nothing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("No activity with id {0}")]
    UnknownItem(ItemId),
}
