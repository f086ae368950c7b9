//! # Output Channeler
//!
//! The outbound link of a log forwarding pipeline: accepts [`SyslogMsg`]
//! records from an upstream stage and delivers them one at a time through a
//! pluggable [`Outputter`], reconnecting whenever the sink fails.
//!
//! - [`OutputChanneler`]: actor handle with a command and a data endpoint
//! - [`Outputter`]: delivery adapter capability (connect, output, close)
//! - [`SocketOutputter`]: TCP / Unix socket adapter built from [`OutputterConfig`]
//! - [`ChannelerObserver`]: injected diagnostics, [`TracingObserver`] by default
//!
//! Delivery is fire-and-forget: a record whose delivery fails is dropped and
//! only the connection is retried.

pub mod channeler;
pub mod command;
pub mod config;
pub mod endpoint;
pub mod error;
pub mod metrics;
pub mod observer;
pub mod outputter;
pub mod outputters;
pub mod state;
pub mod test_utils;

pub use channeler::OutputChanneler;
pub use command::ChannelerCmd;
pub use config::{OutputterConfig, RecordFormat, Transport};
pub use endpoint::Endpoint;
pub use error::{ChannelerError, OutputError};
pub use metrics::{ChannelerMetrics, MetricsSnapshot};
pub use observer::{ChannelerEvent, ChannelerObserver, NoopObserver, TracingObserver};
pub use outputter::Outputter;
pub use outputters::SocketOutputter;
pub use state::ChannelerState;
pub use types::SyslogMsg;
