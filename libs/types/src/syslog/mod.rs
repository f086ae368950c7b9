//! Syslog record types

pub mod message;
pub mod priority;

pub use message::{SyslogMsg, Tag, CEE_COOKIE, RFC3164_TIME_FORMAT};
pub use priority::{Facility, Priority, Severity, MAX_PRIORITY};
