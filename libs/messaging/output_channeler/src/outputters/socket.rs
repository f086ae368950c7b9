//! Stream socket outputter for TCP and Unix socket sinks
//!
//! Each record is written as one newline-terminated line, either in RFC 3164
//! text form or as a JSON object, and flushed before `output()` returns.

use crate::{OutputError, Outputter, OutputterConfig, RecordFormat, Transport};
use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use types::SyslogMsg;

/// Established stream for either transport
#[derive(Debug)]
enum Connection {
    Tcp(tokio::net::TcpStream),
    #[cfg(unix)]
    Unix(tokio::net::UnixStream),
}

impl Connection {
    async fn write_all(&mut self, data: &[u8]) -> std::io::Result<()> {
        match self {
            Connection::Tcp(stream) => stream.write_all(data).await,
            #[cfg(unix)]
            Connection::Unix(stream) => stream.write_all(data).await,
        }
    }

    async fn flush(&mut self) -> std::io::Result<()> {
        match self {
            Connection::Tcp(stream) => stream.flush().await,
            #[cfg(unix)]
            Connection::Unix(stream) => stream.flush().await,
        }
    }

    async fn shutdown(&mut self) -> std::io::Result<()> {
        match self {
            Connection::Tcp(stream) => stream.shutdown().await,
            #[cfg(unix)]
            Connection::Unix(stream) => stream.shutdown().await,
        }
    }
}

/// Outputter writing newline-delimited records to a stream socket
#[derive(Debug)]
pub struct SocketOutputter {
    config: OutputterConfig,
    connection: Option<Connection>,
}

impl SocketOutputter {
    pub fn new(config: OutputterConfig) -> Self {
        Self {
            config,
            connection: None,
        }
    }

    pub fn config(&self) -> &OutputterConfig {
        &self.config
    }

    pub fn is_connected(&self) -> bool {
        self.connection.is_some()
    }

    /// Render one record as a newline-terminated line
    pub fn encode(&self, record: &SyslogMsg) -> Result<Vec<u8>, OutputError> {
        let mut line = match self.config.format {
            RecordFormat::Rfc3164 => record.to_rfc3164(),
            RecordFormat::Json => record.to_json()?,
        }
        .into_bytes();
        line.push(b'\n');
        Ok(line)
    }

    async fn connect_tcp(&self, address: &str) -> Result<Connection, OutputError> {
        let stream = tokio::time::timeout(
            self.config.connect_timeout(),
            tokio::net::TcpStream::connect(address),
        )
        .await
        .map_err(|_| OutputError::timeout(self.config.connect_timeout_secs))?
        .map_err(|e| {
            OutputError::connection_failed(format!("TCP connection to {} failed: {}", address, e))
        })?;

        Ok(Connection::Tcp(stream))
    }

    #[cfg(unix)]
    async fn connect_unix(&self, path: &str) -> Result<Connection, OutputError> {
        let stream = tokio::time::timeout(
            self.config.connect_timeout(),
            tokio::net::UnixStream::connect(path),
        )
        .await
        .map_err(|_| OutputError::timeout(self.config.connect_timeout_secs))?
        .map_err(|e| {
            OutputError::connection_failed(format!(
                "Unix socket connection to {} failed: {}",
                path, e
            ))
        })?;

        Ok(Connection::Unix(stream))
    }

    #[cfg(not(unix))]
    async fn connect_unix(&self, path: &str) -> Result<Connection, OutputError> {
        Err(OutputError::connection_failed(format!(
            "Unix sockets are not supported on this platform: {}",
            path
        )))
    }
}

#[async_trait]
impl Outputter for SocketOutputter {
    async fn connect(&mut self) -> Result<(), OutputError> {
        // A reconnect replaces whatever stream is left from the last cycle.
        self.connection = None;

        tracing::debug!(
            outputter = %self.config.name,
            endpoint = %self.config.endpoint,
            "Connecting socket outputter"
        );

        let connection = match self.config.transport {
            Transport::Tcp => self.connect_tcp(&self.config.endpoint).await?,
            Transport::Unix => self.connect_unix(&self.config.endpoint).await?,
        };
        self.connection = Some(connection);
        Ok(())
    }

    async fn output(&mut self, record: &SyslogMsg) -> Result<usize, OutputError> {
        let line = self.encode(record)?;
        let connection = self.connection.as_mut().ok_or(OutputError::NotConnected)?;

        let written = async {
            connection.write_all(&line).await?;
            connection.flush().await
        }
        .await;

        match written {
            Ok(()) => Ok(line.len()),
            Err(e) => {
                self.connection = None;
                Err(OutputError::send_failed(e.to_string(), record))
            }
        }
    }

    async fn close(&mut self) -> Result<(), OutputError> {
        match self.connection.take() {
            Some(mut connection) => connection.shutdown().await.map_err(OutputError::from),
            None => Ok(()),
        }
    }

    fn retry_interval(&self) -> u64 {
        self.config.retry_interval_secs
    }
}
