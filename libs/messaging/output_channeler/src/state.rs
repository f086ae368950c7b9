use std::fmt;

/// Lifecycle state of a channeler actor
///
/// Published through [`OutputChanneler::status`](crate::OutputChanneler::status)
/// on every transition. Callers can observe it but never drive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChannelerState {
    /// Attempting the initial connect (initial state)
    Connecting,
    /// Connected and waiting on the command and data endpoints
    Running,
    /// Reconnecting after a delivery failure
    Recovering,
    /// Outputter closed and both endpoints closed (terminal)
    Stopped,
}

impl ChannelerState {
    /// Whether the actor is inside its connect loop
    pub fn is_connecting(self) -> bool {
        matches!(self, ChannelerState::Connecting | ChannelerState::Recovering)
    }

    pub fn is_terminal(self) -> bool {
        self == ChannelerState::Stopped
    }

    pub fn name(self) -> &'static str {
        match self {
            ChannelerState::Connecting => "connecting",
            ChannelerState::Running => "running",
            ChannelerState::Recovering => "recovering",
            ChannelerState::Stopped => "stopped",
        }
    }
}

impl Default for ChannelerState {
    fn default() -> Self {
        ChannelerState::Connecting
    }
}

impl fmt::Display for ChannelerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
