//! Output Channeler Actor
//!
//! The outgoing end of a chain of channelers. An [`OutputChanneler`] owns a
//! single tokio task that drives an [`Outputter`] through its connection
//! lifecycle while multiplexing control commands against log records.
//!
//! ## Lifecycle
//!
//! ```text
//!              connect() fails: sleep retry_interval, retry
//!                      ┌──────┐
//!                      ▼      │
//!  start ──► Connecting/Recovering ──connect() ok──► Running ──Stop──► Stopped
//!                      ▲                               │  ▲
//!                      └──── output() fails ───────────┘  └─ output() ok
//! ```
//!
//! - Failed connects are retried forever with a fixed delay
//! - A record whose `output()` fails is dropped, never retried
//! - `Stop` is only observed while `Running`; connect and delivery calls run
//!   to completion first
//! - On `Stop` pending records are not drained: `close()` runs once, then
//!   both endpoints are closed
//!
//! ## Usage
//!
//! ```rust,no_run
//! use output_channeler::{OutputChanneler, OutputterConfig};
//! use types::{SyslogMsg, Tag};
//!
//! # async fn example() -> Result<(), output_channeler::ChannelerError> {
//! let config = OutputterConfig::from_toml_str(r#"endpoint = "127.0.0.1:5514""#)?;
//! let channeler = OutputChanneler::new(config.build()?);
//!
//! channeler
//!     .send(SyslogMsg::new("web-01", Tag::new("nginx"), "worker started"))
//!     .await?;
//! channeler.stop().await?;
//! channeler.join().await.ok();
//! # Ok(())
//! # }
//! ```

use crate::endpoint::{endpoint, Inbox};
use crate::{
    ChannelerCmd, ChannelerError, ChannelerEvent, ChannelerMetrics, ChannelerObserver,
    ChannelerState, Endpoint, Outputter, TracingObserver,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use types::SyslogMsg;

/// Caller-side handle of a running channeler actor
///
/// Holds the two send-only endpoints, a read-only status signal and the
/// actor's metrics. The outputter itself is only reachable from the actor.
#[derive(Debug)]
pub struct OutputChanneler {
    commands: Endpoint<ChannelerCmd>,
    output: Endpoint<SyslogMsg>,
    status: watch::Receiver<ChannelerState>,
    metrics: Arc<ChannelerMetrics>,
    task: JoinHandle<()>,
}

impl OutputChanneler {
    /// Start a channeler that reports through a [`TracingObserver`]
    ///
    /// Returns immediately; the actor begins connecting in the background.
    /// Must be called from within a tokio runtime.
    pub fn new<O>(outputter: O) -> Self
    where
        O: Outputter + 'static,
    {
        Self::with_observer(outputter, Arc::new(TracingObserver::default()))
    }

    /// Start a channeler that reports through `observer`
    pub fn with_observer<O>(outputter: O, observer: Arc<dyn ChannelerObserver>) -> Self
    where
        O: Outputter + 'static,
    {
        let (commands, command_inbox) = endpoint();
        let (output, record_inbox) = endpoint();
        let (status_tx, status) = watch::channel(ChannelerState::Connecting);
        let metrics = Arc::new(ChannelerMetrics::default());

        let actor = ChannelerActor {
            outputter,
            commands: command_inbox,
            records: record_inbox,
            commands_open: true,
            records_open: true,
            status: status_tx,
            observer,
            metrics: metrics.clone(),
            cycle_attempts: 0,
        };
        let task = tokio::spawn(actor.run());

        Self {
            commands,
            output,
            status,
            metrics,
            task,
        }
    }

    /// Command endpoint; clone it to hand to other tasks
    pub fn commands(&self) -> &Endpoint<ChannelerCmd> {
        &self.commands
    }

    /// Data endpoint; clone it to hand to other tasks
    pub fn output(&self) -> &Endpoint<SyslogMsg> {
        &self.output
    }

    /// Hand one record to the actor, waiting until it is accepted
    pub async fn send(&self, record: SyslogMsg) -> Result<(), ChannelerError> {
        self.output.send(record).await
    }

    /// Send [`ChannelerCmd::Stop`], waiting until the actor accepts it
    pub async fn stop(&self) -> Result<(), ChannelerError> {
        self.commands.send(ChannelerCmd::Stop).await
    }

    /// Current lifecycle state
    pub fn state(&self) -> ChannelerState {
        *self.status.borrow()
    }

    /// Receiver notified on every state transition
    pub fn status(&self) -> watch::Receiver<ChannelerState> {
        self.status.clone()
    }

    pub fn metrics(&self) -> Arc<ChannelerMetrics> {
        self.metrics.clone()
    }

    /// Whether the actor task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Drop this handle's endpoints and wait for the actor to exit
    ///
    /// The actor exits after a `Stop`, or once every clone of both endpoints
    /// is gone and it is back in `Running`.
    pub async fn join(self) -> Result<(), JoinError> {
        let Self {
            commands,
            output,
            task,
            ..
        } = self;
        drop(commands);
        drop(output);
        task.await
    }
}

/// Actor side of a channeler: the only owner of the outputter
struct ChannelerActor<O> {
    outputter: O,
    commands: Inbox<ChannelerCmd>,
    records: Inbox<SyslogMsg>,
    commands_open: bool,
    records_open: bool,
    status: watch::Sender<ChannelerState>,
    observer: Arc<dyn ChannelerObserver>,
    metrics: Arc<ChannelerMetrics>,
    /// Connect attempts since the actor last left `Running`
    cycle_attempts: u64,
}

impl<O: Outputter> ChannelerActor<O> {
    async fn run(mut self) {
        let mut state = ChannelerState::Connecting;

        loop {
            let next = match state {
                ChannelerState::Connecting | ChannelerState::Recovering => {
                    self.connect(state).await
                }
                ChannelerState::Running => self.serve().await,
                ChannelerState::Stopped => break,
            };

            if next.is_terminal() {
                self.shutdown().await;
            }
            self.transition(state, next);
            state = next;
        }
    }

    /// One connect attempt; on failure sleeps and stays in `current`
    async fn connect(&mut self, current: ChannelerState) -> ChannelerState {
        self.cycle_attempts += 1;
        let attempt = self.cycle_attempts;

        match self.outputter.connect().await {
            Ok(()) => {
                self.metrics.record_connect_attempt(true);
                self.observer.on_event(ChannelerEvent::Connected { attempt });
                self.cycle_attempts = 0;
                ChannelerState::Running
            }
            Err(error) => {
                self.metrics.record_connect_attempt(false);
                let retry_in = Duration::from_secs(self.outputter.retry_interval());
                self.observer.on_event(ChannelerEvent::ConnectFailed {
                    attempt,
                    error: &error,
                    retry_in,
                });
                tokio::time::sleep(retry_in).await;
                current
            }
        }
    }

    /// Wait on whichever endpoint is ready first
    async fn serve(&mut self) -> ChannelerState {
        tokio::select! {
            cmd = self.commands.recv(), if self.commands_open => match cmd {
                Some(cmd) => self.handle_command(cmd),
                None => {
                    self.commands_open = false;
                    ChannelerState::Running
                }
            },
            record = self.records.recv(), if self.records_open => match record {
                Some(record) => self.deliver(record).await,
                None => {
                    self.records_open = false;
                    ChannelerState::Running
                }
            },
            // Every endpoint hung up, so no Stop can ever arrive.
            else => ChannelerState::Stopped,
        }
    }

    fn handle_command(&self, cmd: ChannelerCmd) -> ChannelerState {
        match cmd {
            ChannelerCmd::Stop => ChannelerState::Stopped,
        }
    }

    async fn deliver(&mut self, record: SyslogMsg) -> ChannelerState {
        match self.outputter.output(&record).await {
            Ok(bytes) => {
                self.metrics.record_delivered(bytes);
                ChannelerState::Running
            }
            Err(error) => {
                self.metrics.record_dropped();
                self.observer
                    .on_event(ChannelerEvent::DeliveryFailed { error: &error });
                ChannelerState::Recovering
            }
        }
    }

    async fn shutdown(&mut self) {
        if let Err(error) = self.outputter.close().await {
            self.observer
                .on_event(ChannelerEvent::CloseFailed { error: &error });
        }
        self.commands.close();
        self.records.close();
        self.observer.on_event(ChannelerEvent::Stopped);
    }

    fn transition(&self, from: ChannelerState, to: ChannelerState) {
        if from != to {
            self.observer
                .on_event(ChannelerEvent::StateChanged { from, to });
            self.status.send_replace(to);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{test_record, OutputterCall, ScriptedOutputter};
    use crate::NoopObserver;
    use std::sync::Mutex;

    /// Captures state transitions and stop notifications
    #[derive(Debug, Default)]
    struct RecordingObserver {
        events: Mutex<Vec<String>>,
    }

    impl RecordingObserver {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ChannelerObserver for RecordingObserver {
        fn on_event(&self, event: ChannelerEvent<'_>) {
            let line = match event {
                ChannelerEvent::StateChanged { from, to } => format!("{from}->{to}"),
                ChannelerEvent::ConnectFailed { attempt, .. } => format!("connect-failed#{attempt}"),
                ChannelerEvent::Connected { attempt } => format!("connected#{attempt}"),
                ChannelerEvent::DeliveryFailed { .. } => "delivery-failed".to_string(),
                ChannelerEvent::CloseFailed { .. } => "close-failed".to_string(),
                ChannelerEvent::Stopped => "stopped".to_string(),
            };
            self.events.lock().unwrap().push(line);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_observer_sees_full_lifecycle() {
        let outputter = ScriptedOutputter::new()
            .fail_connects(1)
            .with_output_script([false]);
        let observer = Arc::new(RecordingObserver::default());
        let channeler = OutputChanneler::with_observer(outputter, observer.clone());

        channeler.send(test_record("dropped")).await.unwrap();
        channeler.send(test_record("kept")).await.unwrap();
        channeler.stop().await.unwrap();
        channeler.join().await.unwrap();

        assert_eq!(
            observer.events(),
            vec![
                "connect-failed#1",
                "connected#2",
                "connecting->running",
                "delivery-failed",
                "running->recovering",
                "connected#1",
                "recovering->running",
                "stopped",
                "running->stopped",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_status_signal_tracks_transitions() {
        let channeler =
            OutputChanneler::with_observer(ScriptedOutputter::new(), Arc::new(NoopObserver));
        assert_eq!(channeler.state(), ChannelerState::Connecting);

        let mut status = channeler.status();
        status
            .wait_for(|state| *state == ChannelerState::Running)
            .await
            .unwrap();

        channeler.stop().await.unwrap();
        status
            .wait_for(|state| state.is_terminal())
            .await
            .unwrap();
        assert!(channeler.output().is_closed());
        assert!(channeler.commands().is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_close_failure_is_ignored() {
        let outputter = ScriptedOutputter::new().fail_close();
        let trace = outputter.trace();
        let observer = Arc::new(RecordingObserver::default());
        let channeler = OutputChanneler::with_observer(outputter, observer.clone());

        channeler.stop().await.unwrap();
        let output = channeler.output().clone();
        channeler.join().await.unwrap();

        assert_eq!(trace.close_count(), 1);
        assert!(output.is_closed());
        assert!(observer.events().contains(&"close-failed".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stops_when_all_endpoints_dropped() {
        let outputter = ScriptedOutputter::new();
        let trace = outputter.trace();
        let channeler =
            OutputChanneler::with_observer(outputter, Arc::new(NoopObserver));

        channeler.send(test_record("only")).await.unwrap();
        channeler.join().await.unwrap();

        assert_eq!(trace.delivered(), vec!["only"]);
        assert_eq!(trace.calls().last(), Some(&OutputterCall::Close));
    }

    #[tokio::test(start_paused = true)]
    async fn test_keeps_serving_data_after_command_endpoint_dropped() {
        let outputter = ScriptedOutputter::new();
        let trace = outputter.trace();
        let channeler =
            OutputChanneler::with_observer(outputter, Arc::new(NoopObserver));
        let output = channeler.output().clone();
        let state = channeler.status();

        // Dropping the handle drops the only command endpoint.
        drop(channeler);

        output.send(test_record("after-drop")).await.unwrap();
        assert_eq!(*state.borrow(), ChannelerState::Running);
        assert_eq!(trace.delivered(), vec!["after-drop"]);

        drop(output);
        let mut state = state;
        state.wait_for(|s| s.is_terminal()).await.unwrap();
        assert_eq!(trace.close_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_metrics_count_deliveries_and_drops() {
        let outputter = ScriptedOutputter::new()
            .fail_connects(2)
            .with_output_script([true, false, true]);
        let channeler =
            OutputChanneler::with_observer(outputter, Arc::new(NoopObserver));
        let metrics = channeler.metrics();

        for content in ["a", "b", "c"] {
            channeler.send(test_record(content)).await.unwrap();
        }
        channeler.stop().await.unwrap();
        channeler.join().await.unwrap();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.connect_attempts, 4);
        assert_eq!(snapshot.failed_connects, 2);
        assert_eq!(snapshot.records_delivered, 2);
        assert_eq!(snapshot.records_dropped, 1);
        assert_eq!(snapshot.reconnects, 1);
        assert_eq!(snapshot.bytes_delivered, 2);
    }
}
