//! Scripted outputters for exercising the channeler without a real sink

use crate::{OutputError, Outputter};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::time::Instant;
use types::{SyslogMsg, Tag};

/// One call made by the channeler on a [`ScriptedOutputter`]
#[derive(Debug, Clone, PartialEq)]
pub enum OutputterCall {
    Connect { ok: bool },
    Output { record: SyslogMsg, ok: bool },
    Close,
}

/// A recorded call and the (tokio) time it was made
#[derive(Debug, Clone)]
pub struct TraceEntry {
    pub call: OutputterCall,
    pub at: Instant,
}

/// Shared, append-only log of outputter calls
///
/// Cloned out of the outputter before it is moved into a channeler, so tests
/// can inspect what the actor did.
#[derive(Debug, Clone, Default)]
pub struct OutputterTrace {
    entries: Arc<Mutex<Vec<TraceEntry>>>,
}

impl OutputterTrace {
    fn push(&self, call: OutputterCall) {
        self.entries.lock().unwrap().push(TraceEntry {
            call,
            at: Instant::now(),
        });
    }

    pub fn entries(&self) -> Vec<TraceEntry> {
        self.entries.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<OutputterCall> {
        self.entries().into_iter().map(|e| e.call).collect()
    }

    pub fn connect_attempts(&self) -> usize {
        self.count(|call| matches!(call, OutputterCall::Connect { .. }))
    }

    pub fn close_count(&self) -> usize {
        self.count(|call| matches!(call, OutputterCall::Close))
    }

    /// Content of every record passed to `output()`, in call order
    pub fn attempted(&self) -> Vec<String> {
        self.outputs(|_| true)
    }

    /// Content of every record whose `output()` succeeded, in call order
    pub fn delivered(&self) -> Vec<String> {
        self.outputs(|ok| ok)
    }

    /// Times at which `connect()` was called
    pub fn connect_times(&self) -> Vec<Instant> {
        self.entries()
            .into_iter()
            .filter(|e| matches!(e.call, OutputterCall::Connect { .. }))
            .map(|e| e.at)
            .collect()
    }

    fn count(&self, pred: impl Fn(&OutputterCall) -> bool) -> usize {
        self.entries
            .lock()
            .unwrap()
            .iter()
            .filter(|e| pred(&e.call))
            .count()
    }

    fn outputs(&self, pred: impl Fn(bool) -> bool) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                OutputterCall::Output { record, ok } if pred(ok) => Some(record.content),
                _ => None,
            })
            .collect()
    }
}

/// An outputter whose connect and output outcomes follow a script
///
/// Each `connect()` and `output()` call pops the next outcome from its
/// script; once a script runs dry the call succeeds.
#[derive(Debug)]
pub struct ScriptedOutputter {
    connect_script: VecDeque<bool>,
    output_script: VecDeque<bool>,
    connect_fails_forever: bool,
    close_fails: bool,
    retry_interval: u64,
    connected: bool,
    trace: OutputterTrace,
}

impl ScriptedOutputter {
    /// Outputter where every call succeeds and the retry interval is 1s
    pub fn new() -> Self {
        Self {
            connect_script: VecDeque::new(),
            output_script: VecDeque::new(),
            connect_fails_forever: false,
            close_fails: false,
            retry_interval: 1,
            connected: false,
            trace: OutputterTrace::default(),
        }
    }

    /// Fail the next `count` connect attempts
    pub fn fail_connects(mut self, count: usize) -> Self {
        self.connect_script.extend(std::iter::repeat(false).take(count));
        self
    }

    /// Never connect
    pub fn fail_connects_forever(mut self) -> Self {
        self.connect_fails_forever = true;
        self
    }

    /// Outcomes of successive `output()` calls, `false` meaning failure
    pub fn with_output_script(mut self, outcomes: impl IntoIterator<Item = bool>) -> Self {
        self.output_script.extend(outcomes);
        self
    }

    pub fn fail_close(mut self) -> Self {
        self.close_fails = true;
        self
    }

    pub fn with_retry_interval(mut self, seconds: u64) -> Self {
        self.retry_interval = seconds;
        self
    }

    /// Handle on the call log, valid after the outputter is moved away
    pub fn trace(&self) -> OutputterTrace {
        self.trace.clone()
    }
}

impl Default for ScriptedOutputter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Outputter for ScriptedOutputter {
    async fn connect(&mut self) -> Result<(), OutputError> {
        let ok = !self.connect_fails_forever && self.connect_script.pop_front().unwrap_or(true);
        self.trace.push(OutputterCall::Connect { ok });
        self.connected = ok;

        if ok {
            Ok(())
        } else {
            Err(OutputError::connection_failed("scripted connect failure"))
        }
    }

    async fn output(&mut self, record: &SyslogMsg) -> Result<usize, OutputError> {
        if !self.connected {
            self.trace.push(OutputterCall::Output {
                record: record.clone(),
                ok: false,
            });
            return Err(OutputError::NotConnected);
        }

        let ok = self.output_script.pop_front().unwrap_or(true);
        self.trace.push(OutputterCall::Output {
            record: record.clone(),
            ok,
        });

        if ok {
            Ok(record.content.len())
        } else {
            self.connected = false;
            Err(OutputError::send_failed("scripted send failure", record))
        }
    }

    async fn close(&mut self) -> Result<(), OutputError> {
        self.trace.push(OutputterCall::Close);
        self.connected = false;

        if self.close_fails {
            Err(OutputError::Io("scripted close failure".to_string()))
        } else {
            Ok(())
        }
    }

    fn retry_interval(&self) -> u64 {
        self.retry_interval
    }
}

/// Record with the given content from a fixed test host
pub fn test_record(content: impl Into<String>) -> SyslogMsg {
    SyslogMsg::new("test-host", Tag::new("test").with_pid("42"), content)
}
