//! # Log Record Types
//!
//! Shared record types for the log forwarding pipeline.
//!
//! ## Design Philosophy
//!
//! - **Owned Records**: a `SyslogMsg` is moved from stage to stage, never shared mutably
//! - **Typed Priority**: facility and severity are enums, the packed value is derived
//! - **Two Renderings**: RFC 3164 text lines and JSON objects via serde
//!
//! ## Quick Start
//!
//! ```rust
//! use types::{Facility, Severity, SyslogMsg, Tag};
//!
//! let msg = SyslogMsg::new("web-01", Tag::new("nginx").with_pid("812"), "worker started")
//!     .with_priority(Facility::Daemon, Severity::Info);
//!
//! assert!(msg.to_rfc3164().starts_with("<30>"));
//! ```

pub mod common;
pub mod syslog;

pub use common::errors::TypesError;
pub use syslog::{
    Facility, Priority, Severity, SyslogMsg, Tag, CEE_COOKIE, MAX_PRIORITY, RFC3164_TIME_FORMAT,
};
