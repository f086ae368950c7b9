//! Syslog priority: facility and severity packed into a single value
//!
//! The priority value written between angle brackets at the start of a
//! syslog line is `facility * 8 + severity`, so valid values are `0..=191`.

use crate::common::errors::TypesError;
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Highest valid encoded priority (`local7.debug`)
pub const MAX_PRIORITY: u8 = 191;

/// Origin of a syslog message (RFC 3164 section 4.1.1)
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Facility {
    Kern = 0,
    User = 1,
    Mail = 2,
    Daemon = 3,
    Auth = 4,
    Syslog = 5,
    Lpr = 6,
    News = 7,
    Uucp = 8,
    Cron = 9,
    Authpriv = 10,
    Ftp = 11,
    Ntp = 12,
    Security = 13,
    Console = 14,
    SolarisCron = 15,
    Local0 = 16,
    Local1 = 17,
    Local2 = 18,
    Local3 = 19,
    Local4 = 20,
    Local5 = 21,
    Local6 = 22,
    Local7 = 23,
}

/// Importance of a syslog message, `Emerg` being the most severe
#[repr(u8)]
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, TryFromPrimitive, IntoPrimitive, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Emerg = 0,
    Alert = 1,
    Crit = 2,
    Err = 3,
    Warning = 4,
    Notice = 5,
    Info = 6,
    Debug = 7,
}

impl Facility {
    /// Keyword used by syslog.conf selectors
    pub fn name(self) -> &'static str {
        match self {
            Facility::Kern => "kern",
            Facility::User => "user",
            Facility::Mail => "mail",
            Facility::Daemon => "daemon",
            Facility::Auth => "auth",
            Facility::Syslog => "syslog",
            Facility::Lpr => "lpr",
            Facility::News => "news",
            Facility::Uucp => "uucp",
            Facility::Cron => "cron",
            Facility::Authpriv => "authpriv",
            Facility::Ftp => "ftp",
            Facility::Ntp => "ntp",
            Facility::Security => "security",
            Facility::Console => "console",
            Facility::SolarisCron => "solaris-cron",
            Facility::Local0 => "local0",
            Facility::Local1 => "local1",
            Facility::Local2 => "local2",
            Facility::Local3 => "local3",
            Facility::Local4 => "local4",
            Facility::Local5 => "local5",
            Facility::Local6 => "local6",
            Facility::Local7 => "local7",
        }
    }
}

impl Severity {
    /// Keyword used by syslog.conf selectors
    pub fn name(self) -> &'static str {
        match self {
            Severity::Emerg => "emerg",
            Severity::Alert => "alert",
            Severity::Crit => "crit",
            Severity::Err => "err",
            Severity::Warning => "warning",
            Severity::Notice => "notice",
            Severity::Info => "info",
            Severity::Debug => "debug",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = TypesError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Priority::from_value(value)
    }
}

/// Facility and severity of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Priority {
    pub facility: Facility,
    pub severity: Severity,
}

impl Priority {
    pub fn new(facility: Facility, severity: Severity) -> Self {
        Self { facility, severity }
    }

    /// Decode the numeric value found between `<` and `>`
    pub fn from_value(value: u8) -> Result<Self, TypesError> {
        if value > MAX_PRIORITY {
            return Err(TypesError::PriorityOutOfRange { value });
        }

        let facility = Facility::try_from(value >> 3)
            .map_err(|e| TypesError::InvalidFacility { value: e.number })?;
        let severity = Severity::try_from(value & 0x07)
            .map_err(|e| TypesError::InvalidSeverity { value: e.number })?;

        Ok(Self { facility, severity })
    }

    /// Encoded `facility * 8 + severity`
    pub fn value(self) -> u8 {
        (u8::from(self.facility) << 3) | u8::from(self.severity)
    }
}

impl Default for Priority {
    fn default() -> Self {
        Self::new(Facility::User, Severity::Notice)
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.facility.name(), self.severity.name())
    }
}
