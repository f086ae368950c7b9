//! Structured syslog message forwarded between pipeline stages

use super::priority::{Facility, Priority, Severity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Timestamp layout of an RFC 3164 header, e.g. `Jan  2 15:04:05`
pub const RFC3164_TIME_FORMAT: &str = "%b %e %H:%M:%S";

/// Marker that flags the content as a CEE (JSON) payload
pub const CEE_COOKIE: &str = "@cee:";

/// Program name and optional process id of the sender
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub program: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pid: Option<String>,
}

impl Tag {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            pid: None,
        }
    }

    pub fn with_pid(mut self, pid: impl Into<String>) -> Self {
        self.pid = Some(pid.into());
        self
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.pid {
            Some(pid) => write!(f, "{}[{}]:", self.program, pid),
            None => write!(f, "{}:", self.program),
        }
    }
}

/// A single structured log record
///
/// Upstream stages build these and move them into an output channeler;
/// nothing downstream mutates a record once it has been sent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyslogMsg {
    pub pri: Priority,
    pub time: DateTime<Utc>,
    pub host: String,
    pub tag: Tag,
    /// Content carries a CEE JSON payload
    #[serde(default)]
    pub cee: bool,
    pub content: String,
    /// Fields decoded from a CEE payload
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub json_values: Map<String, Value>,
}

impl SyslogMsg {
    /// New `user.notice` message stamped with the current time
    pub fn new(host: impl Into<String>, tag: Tag, content: impl Into<String>) -> Self {
        Self {
            pri: Priority::default(),
            time: Utc::now(),
            host: host.into(),
            tag,
            cee: false,
            content: content.into(),
            json_values: Map::new(),
        }
    }

    pub fn with_priority(mut self, facility: Facility, severity: Severity) -> Self {
        self.pri = Priority::new(facility, severity);
        self
    }

    pub fn with_time(mut self, time: DateTime<Utc>) -> Self {
        self.time = time;
        self
    }

    /// Attach CEE fields; the rendered content becomes the JSON object
    pub fn with_cee(mut self, values: Map<String, Value>) -> Self {
        self.cee = true;
        self.content = Value::Object(values.clone()).to_string();
        self.json_values = values;
        self
    }

    /// Render the message as a single RFC 3164 line without trailing newline
    pub fn to_rfc3164(&self) -> String {
        self.to_string()
    }

    /// Render the message as a single JSON object
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Approximate size in bytes of the rendered line
    pub fn size_hint(&self) -> usize {
        // "<191>" + timestamp + separators
        5 + 15 + 3 + self.host.len() + self.tag.program.len() + 8 + self.content.len()
    }
}

impl fmt::Display for SyslogMsg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}>{} {} {} ",
            self.pri.value(),
            self.time.format(RFC3164_TIME_FORMAT),
            self.host,
            self.tag
        )?;
        if self.cee {
            f.write_str(CEE_COOKIE)?;
        }
        f.write_str(&self.content)
    }
}
