//! Diagnostic hooks for the channeler actor
//!
//! The actor never logs directly. Every notable event goes through the
//! [`ChannelerObserver`] it was built with, so tests can capture events and
//! deployments pick the logging backend.

use crate::{ChannelerState, OutputError};
use std::fmt::Debug;
use std::time::Duration;

/// Something that happened inside a channeler actor
#[derive(Debug, Clone, Copy)]
pub enum ChannelerEvent<'a> {
    /// The actor moved between lifecycle states
    StateChanged {
        from: ChannelerState,
        to: ChannelerState,
    },
    /// A `connect()` attempt failed; the next one follows after `retry_in`
    ConnectFailed {
        attempt: u64,
        error: &'a OutputError,
        retry_in: Duration,
    },
    /// A `connect()` attempt succeeded
    Connected { attempt: u64 },
    /// A record could not be delivered and was discarded
    DeliveryFailed { error: &'a OutputError },
    /// `close()` failed during shutdown; the failure is otherwise ignored
    CloseFailed { error: &'a OutputError },
    /// Terminal cleanup finished
    Stopped,
}

/// Receiver of [`ChannelerEvent`]s
pub trait ChannelerObserver: Send + Sync + Debug {
    fn on_event(&self, event: ChannelerEvent<'_>);
}

/// Emits channeler events as structured `tracing` events
#[derive(Debug, Clone)]
pub struct TracingObserver {
    name: String,
}

impl TracingObserver {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::new("output-channeler")
    }
}

impl ChannelerObserver for TracingObserver {
    fn on_event(&self, event: ChannelerEvent<'_>) {
        match event {
            ChannelerEvent::StateChanged { from, to } => {
                tracing::debug!(channeler = %self.name, %from, %to, "Channeler state transition");
            }
            ChannelerEvent::ConnectFailed {
                attempt,
                error,
                retry_in,
            } => {
                tracing::warn!(
                    channeler = %self.name,
                    attempt,
                    retry_in_secs = retry_in.as_secs(),
                    %error,
                    "Could not connect"
                );
            }
            ChannelerEvent::Connected { attempt } => {
                tracing::info!(channeler = %self.name, attempt, "Connected");
            }
            ChannelerEvent::DeliveryFailed { error } => {
                tracing::warn!(channeler = %self.name, %error, "Could not send message, reconnecting");
            }
            ChannelerEvent::CloseFailed { error } => {
                tracing::debug!(channeler = %self.name, %error, "Close failed during shutdown");
            }
            ChannelerEvent::Stopped => {
                tracing::info!(channeler = %self.name, "Channeler stopped");
            }
        }
    }
}

/// Discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl ChannelerObserver for NoopObserver {
    fn on_event(&self, _event: ChannelerEvent<'_>) {}
}
