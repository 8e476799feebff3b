//! Errors raised while posting a form.

use std::fmt;

/// Why a form post failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetworkError {
    /// The request could not be built or sent.
    Request(String),
    InvalidUrl(String),
    Timeout,
    /// Connection refused or dropped.
    Connection(String),
    InvalidHeader(String),
    /// The endpoint answered with a 4xx or 5xx status.
    HttpStatus {
        status: u16,
        /// Reply body, when it was not empty.
        message: Option<String>,
    },
    TooManyRedirects,
}

impl NetworkError {
    /// The HTTP status code, for status errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The reply body that came with an error status.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::HttpStatus { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Request(msg) => write!(f, "HTTP request error: {msg}"),
            Self::InvalidUrl(msg) => write!(f, "Invalid URL: {msg}"),
            Self::Timeout => write!(f, "Request timed out"),
            Self::Connection(msg) => write!(f, "Connection error: {msg}"),
            Self::InvalidHeader(msg) => write!(f, "Invalid header: {msg}"),
            Self::HttpStatus { status, message } => match message {
                Some(msg) => write!(f, "HTTP {status}: {msg}"),
                None => write!(f, "HTTP {status}"),
            },
            Self::TooManyRedirects => write!(f, "Too many redirects"),
        }
    }
}

impl std::error::Error for NetworkError {}

impl From<reqwest::Error> for NetworkError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connection(err.to_string())
        } else if err.is_redirect() {
            Self::TooManyRedirects
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<url::ParseError> for NetworkError {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidUrl(err.to_string())
    }
}

/// A specialized Result type for form posts.
pub type Result<T> = std::result::Result<T, NetworkError>;
