//! Error types for syslog record validation
//!
//! Raised when decoding numeric priority, facility, or severity values that
//! fall outside the ranges defined by RFC 3164.

use thiserror::Error;

/// Errors that can occur while building or decoding syslog records
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TypesError {
    /// Encoded priority exceeds `local7.debug`
    #[error("Priority value {value} exceeds maximum allowed value 191")]
    PriorityOutOfRange { value: u8 },

    /// Facility code not defined by RFC 3164
    #[error("Unknown facility code {value}")]
    InvalidFacility { value: u8 },

    /// Severity code not defined by RFC 3164
    #[error("Unknown severity code {value}")]
    InvalidSeverity { value: u8 },
}
