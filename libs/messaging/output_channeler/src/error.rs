/// Failure reported by an [`Outputter`](crate::Outputter)
///
/// The channeler does not distinguish between variants: any error from
/// `connect()` is retried after the retry interval, and any error from
/// `output()` invalidates the connection.
#[derive(Debug, Clone, thiserror::Error)]
pub enum OutputError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Not connected")]
    NotConnected,

    #[error("Send failed: {error} (size: {size}B, host: {host})")]
    SendFailed {
        error: String,
        size: usize,
        host: String,
    },

    #[error("Encoding failed: {0}")]
    Encode(String),

    #[error("Timeout after {0} seconds")]
    Timeout(u64),

    #[error("IO error: {0}")]
    Io(String),
}

impl OutputError {
    /// Check if this is a connection-related error
    pub fn is_connection_error(&self) -> bool {
        matches!(
            self,
            OutputError::ConnectionFailed(_) | OutputError::NotConnected | OutputError::Timeout(_)
        )
    }

    /// Create a connection failed error
    pub fn connection_failed(msg: impl Into<String>) -> Self {
        OutputError::ConnectionFailed(msg.into())
    }

    /// Create a send failed error for the record that could not be delivered
    pub fn send_failed(msg: impl Into<String>, record: &types::SyslogMsg) -> Self {
        OutputError::SendFailed {
            error: msg.into(),
            size: record.size_hint(),
            host: record.host.clone(),
        }
    }

    /// Create a timeout error
    pub fn timeout(seconds: u64) -> Self {
        OutputError::Timeout(seconds)
    }
}

impl From<std::io::Error> for OutputError {
    fn from(err: std::io::Error) -> Self {
        OutputError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for OutputError {
    fn from(err: serde_json::Error) -> Self {
        OutputError::Encode(err.to_string())
    }
}

/// Errors surfaced to callers of the channeler and its configuration
#[derive(Debug, thiserror::Error)]
pub enum ChannelerError {
    /// The actor has stopped; sending on either endpoint is a caller bug
    #[error("Endpoint closed: the channeler has stopped")]
    EndpointClosed,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Config parse error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChannelerError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        ChannelerError::InvalidConfig(msg.into())
    }
}
