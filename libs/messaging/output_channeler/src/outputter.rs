//! Delivery adapter capability driven by the channeler actor

use crate::OutputError;
use async_trait::async_trait;
use std::fmt::Debug;
use types::SyslogMsg;

/// A destination for log records that owns its transport and encoding
///
/// The channeler holds its outputter exclusively for its whole lifetime, so
/// implementations take `&mut self` and need no interior locking.
/// Implementations own any timeouts on `connect()` and `output()`; the actor
/// waits for each call to return.
#[async_trait]
pub trait Outputter: Send + Debug {
    /// Establish the sink connection. Called again after every failure, so
    /// it must tolerate being retried indefinitely.
    async fn connect(&mut self) -> Result<(), OutputError>;

    /// Deliver one record over the established connection, returning the
    /// number of bytes written. Any error invalidates the connection.
    async fn output(&mut self, record: &SyslogMsg) -> Result<usize, OutputError>;

    /// Release the connection and any resources. Called exactly once.
    async fn close(&mut self) -> Result<(), OutputError>;

    /// Whole seconds to wait between failed connect attempts
    fn retry_interval(&self) -> u64;
}

#[async_trait]
impl<O: Outputter + ?Sized> Outputter for Box<O> {
    async fn connect(&mut self) -> Result<(), OutputError> {
        (**self).connect().await
    }

    async fn output(&mut self, record: &SyslogMsg) -> Result<usize, OutputError> {
        (**self).output(record).await
    }

    async fn close(&mut self) -> Result<(), OutputError> {
        (**self).close().await
    }

    fn retry_interval(&self) -> u64 {
        (**self).retry_interval()
    }
}
