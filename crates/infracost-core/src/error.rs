//! Error types for infracost-mcp

use thiserror::Error;

/// Main error type for tool execution
#[derive(Error, Debug)]
pub enum Error {
    /// A cloud tool was called but no service token was configured
    #[error("INFRACOST_SERVICE_TOKEN is not configured for Infracost Cloud API operations")]
    NotConfigured,

    /// Neither the call nor the process configuration named an organization
    #[error("Organization slug is required. Provide it via orgSlug parameter or set INFRACOST_ORG environment variable")]
    MissingOrganization,

    /// The external program is missing or cannot be run
    #[error("{0}")]
    BackendUnavailable(String),

    /// The backend ran and reported a failure
    #[error("{0}")]
    Backend(String),

    /// Connection level failure talking to a backend
    #[error("{0}")]
    Transport(String),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification surfaced to protocol clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Configuration,
    BackendUnavailable,
    Backend,
    Transport,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::Configuration => "configuration",
            ErrorKind::BackendUnavailable => "backend_unavailable",
            ErrorKind::Backend => "backend",
            ErrorKind::Transport => "transport",
            ErrorKind::Internal => "internal",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Error {
    /// Create a backend failure error
    pub fn backend(msg: impl Into<String>) -> Self {
        Error::Backend(msg.into())
    }

    /// Create a backend unavailable error
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Error::BackendUnavailable(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Error::Internal(msg.into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NotConfigured | Error::MissingOrganization | Error::Config(_) => {
                ErrorKind::Configuration
            }
            Error::BackendUnavailable(_) => ErrorKind::BackendUnavailable,
            Error::Backend(_) => ErrorKind::Backend,
            Error::Transport(_) => ErrorKind::Transport,
            Error::Serialization(_) | Error::Io(_) | Error::Internal(_) => ErrorKind::Internal,
        }
    }
}
