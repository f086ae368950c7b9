//! Rendezvous endpoints between callers and the channeler actor
//!
//! An [`Endpoint`] behaves like an unbuffered channel: `send()` resolves only
//! once the actor has taken the value out, which happens solely while the
//! actor waits in the `Running` state. Callers are therefore backpressured by
//! the actor's connect and delivery cycle.
//!
//! Each handoff carries a oneshot acknowledgment that the [`Inbox`] fires as
//! it receives the value. If the inbox is closed before that, the sender
//! observes [`ChannelerError::EndpointClosed`].
//!
//! A `send()` future dropped after its value entered the handoff slot does
//! not retract the value; the actor may still receive it.

use crate::ChannelerError;
use tokio::sync::{mpsc, oneshot};

/// Values waiting in an endpoint beyond the one being handed off
const HANDOFF_SLOTS: usize = 1;

struct Handoff<T> {
    value: T,
    accepted: oneshot::Sender<()>,
}

/// Caller-side, send-only half of a channeler endpoint
#[derive(Debug)]
pub struct Endpoint<T> {
    tx: mpsc::Sender<Handoff<T>>,
}

impl<T> Clone for Endpoint<T> {
    fn clone(&self) -> Self {
        Self {
            tx: self.tx.clone(),
        }
    }
}

impl<T> Endpoint<T> {
    /// Hand `value` to the actor, waiting until it has been received
    ///
    /// Sending after the channeler stopped is a caller bug and returns
    /// [`ChannelerError::EndpointClosed`]; the value is dropped.
    pub async fn send(&self, value: T) -> Result<(), ChannelerError> {
        let (accepted, ack) = oneshot::channel();
        self.tx
            .send(Handoff { value, accepted })
            .await
            .map_err(|_| ChannelerError::EndpointClosed)?;
        ack.await.map_err(|_| ChannelerError::EndpointClosed)
    }

    /// Whether the actor has closed this endpoint
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Wait until the actor closes this endpoint
    pub async fn closed(&self) {
        self.tx.closed().await
    }
}

/// Actor-side, receive-only half of a channeler endpoint
#[derive(Debug)]
pub(crate) struct Inbox<T> {
    rx: mpsc::Receiver<Handoff<T>>,
}

impl<T> Inbox<T> {
    /// Receive the next value and release its sender
    ///
    /// Returns `None` once every [`Endpoint`] has been dropped. Cancel safe:
    /// nothing after the inner `recv` awaits.
    pub(crate) async fn recv(&mut self) -> Option<T> {
        let Handoff { value, accepted } = self.rx.recv().await?;
        // The sender may have given up waiting; the value is still ours.
        let _ = accepted.send(());
        Some(value)
    }

    /// Close the endpoint and drop anything still waiting in it
    pub(crate) fn close(&mut self) {
        self.rx.close();
        while self.rx.try_recv().is_ok() {}
    }
}

/// Create a connected endpoint/inbox pair
pub(crate) fn endpoint<T>() -> (Endpoint<T>, Inbox<T>) {
    let (tx, rx) = mpsc::channel(HANDOFF_SLOTS);
    (Endpoint { tx }, Inbox { rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_send_waits_for_receiver() {
        let (endpoint, mut inbox) = endpoint::<u32>();

        let sender = tokio::spawn(async move { endpoint.send(7).await });
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!sender.is_finished());

        assert_eq!(inbox.recv().await, Some(7));
        assert!(sender.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_send_after_close_fails() {
        let (endpoint, mut inbox) = endpoint::<u32>();
        inbox.close();

        assert!(endpoint.is_closed());
        assert!(matches!(
            endpoint.send(1).await,
            Err(ChannelerError::EndpointClosed)
        ));
    }

    #[tokio::test]
    async fn test_pending_send_fails_when_inbox_closes() {
        let (endpoint, mut inbox) = endpoint::<u32>();
        let sender = {
            let endpoint = endpoint.clone();
            tokio::spawn(async move { endpoint.send(3).await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        inbox.close();
        drop(inbox);

        assert!(matches!(
            sender.await.unwrap(),
            Err(ChannelerError::EndpointClosed)
        ));
        endpoint.closed().await;
    }

    #[tokio::test]
    async fn test_recv_returns_none_when_all_endpoints_dropped() {
        let (endpoint, mut inbox) = endpoint::<u32>();
        drop(endpoint);
        assert_eq!(inbox.recv().await, None);
    }
}
