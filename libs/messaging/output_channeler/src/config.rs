//! TOML configuration for socket outputters
//!
//! ```toml
//! name = "central-syslog"
//! transport = "tcp"          # tcp | unix
//! endpoint = "10.0.0.5:5514"
//! format = "rfc3164"         # rfc3164 | json
//! retry_interval_secs = 5
//! connect_timeout_secs = 5
//! ```

use crate::outputters::SocketOutputter;
use crate::ChannelerError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Seconds between failed connect attempts when not configured
pub const DEFAULT_RETRY_INTERVAL_SECS: u64 = 10;

/// Seconds a single connect attempt may take when not configured
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 5;

/// Stream transport used to reach the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// `host:port`
    #[default]
    Tcp,
    /// Filesystem path of a stream socket
    Unix,
}

/// How each record is framed on the wire; both are newline terminated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordFormat {
    #[default]
    Rfc3164,
    Json,
}

/// Configuration for a single socket outputter
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct OutputterConfig {
    /// Name used in diagnostics
    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default)]
    pub transport: Transport,

    /// `host:port` for TCP, socket path for Unix
    pub endpoint: String,

    #[serde(default)]
    pub format: RecordFormat,

    #[serde(default = "default_retry_interval_secs")]
    pub retry_interval_secs: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

fn default_name() -> String {
    "output".to_string()
}

fn default_retry_interval_secs() -> u64 {
    DEFAULT_RETRY_INTERVAL_SECS
}

fn default_connect_timeout_secs() -> u64 {
    DEFAULT_CONNECT_TIMEOUT_SECS
}

impl OutputterConfig {
    /// TCP outputter with default settings
    pub fn tcp(endpoint: impl Into<String>) -> Self {
        Self {
            name: default_name(),
            transport: Transport::Tcp,
            endpoint: endpoint.into(),
            format: RecordFormat::default(),
            retry_interval_secs: DEFAULT_RETRY_INTERVAL_SECS,
            connect_timeout_secs: DEFAULT_CONNECT_TIMEOUT_SECS,
        }
    }

    /// Unix socket outputter with default settings
    pub fn unix(path: impl Into<String>) -> Self {
        Self {
            transport: Transport::Unix,
            ..Self::tcp(path)
        }
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, ChannelerError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ChannelerError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ChannelerError> {
        if self.endpoint.trim().is_empty() {
            return Err(ChannelerError::invalid_config(format!(
                "outputter '{}': endpoint cannot be empty",
                self.name
            )));
        }

        if self.transport == Transport::Tcp && !self.endpoint.contains(':') {
            return Err(ChannelerError::invalid_config(format!(
                "outputter '{}': TCP endpoint '{}' must be host:port",
                self.name, self.endpoint
            )));
        }

        if self.connect_timeout_secs == 0 {
            return Err(ChannelerError::invalid_config(format!(
                "outputter '{}': connect_timeout_secs must be positive",
                self.name
            )));
        }

        Ok(())
    }

    /// Validate and build the outputter this config describes
    pub fn build(&self) -> Result<SocketOutputter, ChannelerError> {
        self.validate()?;
        Ok(SocketOutputter::new(self.clone()))
    }
}
