use thiserror::Error;

/// Main error type for YNCA operations
#[derive(Error, Debug)]
pub enum YncaError {
    /// The transport could not be opened, or the link is no longer usable
    #[error("Connection error: {0}")]
    Connection(#[from] std::io::Error),

    /// The transport opened but the reader/writer tasks could not be set up
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// A synchronization marker was not observed within the scaled timeout
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Conversion error: {0}")]
    Conversion(String),

    /// GET on a PUT-only function, PUT on a GET-only function, unknown
    /// function or double initialization
    #[error("Usage error: {0}")]
    Usage(String),
}

impl YncaError {
    /// Shorthand for a `Connection` error with `NotConnected` kind
    pub fn not_connected(message: &str) -> Self {
        YncaError::Connection(std::io::Error::new(
            std::io::ErrorKind::NotConnected,
            message.to_string(),
        ))
    }
}

/// Result type alias for YNCA operations
pub type YncaResult<T> = Result<T, YncaError>;
