//! Error types for hub-api.

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during API operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Operation needs credentials but the session has none.
    #[error("authentication required - set a token or a client_id/client_secret pair")]
    AuthenticationRequired,

    /// The service rejected the supplied credentials (HTTP 401).
    #[error("authentication failed - the service rejected the supplied credentials")]
    AuthenticationFailed,

    /// A required field was missing from caller-supplied arguments.
    #[error("missing required field: {field}")]
    Validation { field: String },

    /// Client application identity could not be determined.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Caller passed a value lacking a required capability.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// API error with status code.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// Network error, propagated unchanged from the HTTP layer.
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON parsing error.
    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    /// Config file could not be parsed.
    #[error("failed to parse config: {0}")]
    ConfigFile(#[from] toml::de::Error),

    /// IO error (e.g., reading an upload source or config file).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
