//! # Subscriber channels.
//!
//! A subscriber is a bounded `mpsc` channel plus a close token, split into a
//! sending half ([`Subscriber`]) and a receiving half ([`Subscription`]).
//!
//! ## Ownership
//! ```text
//! Subscriber::channel(cap)
//!     ├──► Subscriber   (sender)  ──► moved into a Connect command
//!     └──► Subscription (receiver) ─► kept by the caller, drained with recv()
//! ```
//!
//! Handing a [`Subscriber`] to the hub transfers close ownership: the hub
//! closes the channel when the subscriber loses its last topic, exhausts its
//! message budget, or the hub itself shuts down. Connecting with `keep_alive`
//! returns that ownership to the caller; keep a [`Subscriber`] clone around to
//! send directly and to close the channel by dropping it.
//!
//! ## Rules
//! - The hub closes a channel **at most once**, and never when `keep_alive`.
//! - [`Subscription::recv`] drains buffered messages before reporting closure.
//! - [`Subscriber::send`] fails with [`ChannelClosed`] after the hub has
//!   closed the channel. Sending at that point is a contract violation by the
//!   caller, not something the hub recovers from.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::error::ChannelClosed;

/// Global sequence counter for subscriber identities.
static SUBSCRIBER_SEQ: AtomicU64 = AtomicU64::new(0);

/// Identity of a subscriber channel.
///
/// Allocated once per [`Subscriber::channel`] call; every clone of the
/// sending half shares it. Commands that target an existing subscriber
/// (disconnects, reconnects) address it by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub-{}", self.0)
    }
}

/// Sending half of a subscriber channel.
///
/// Move it into a connect command to attach it to topics. Clone it first if
/// you connect with `keep_alive` and intend to send on the channel yourself.
pub struct Subscriber<M> {
    id: SubscriberId,
    tx: mpsc::Sender<M>,
    closed: CancellationToken,
}

impl<M> Subscriber<M> {
    /// Creates a subscriber channel with the given buffer capacity
    /// (clamped to at least 1).
    pub fn channel(capacity: usize) -> (Subscriber<M>, Subscription<M>) {
        let id = SubscriberId(SUBSCRIBER_SEQ.fetch_add(1, AtomicOrdering::Relaxed));
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let closed = CancellationToken::new();

        (
            Subscriber {
                id,
                tx,
                closed: closed.clone(),
            },
            Subscription { id, rx, closed },
        )
    }

    /// Identity shared by all clones of this sending half.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Sends a message on the channel, waiting for buffer space.
    ///
    /// Fails once the hub has closed the channel or the receiving half is
    /// gone. Intended for `keep_alive` subscribers whose owner writes to the
    /// channel directly.
    pub async fn send(&self, message: M) -> Result<(), ChannelClosed> {
        tokio::select! {
            _ = self.closed.cancelled() => Err(ChannelClosed),
            sent = self.tx.send(message) => sent.map_err(|_| ChannelClosed),
        }
    }

    /// Marks the channel closed. Idempotent; called by the routing core only.
    pub(crate) fn close(&self) {
        self.closed.cancel();
    }
}

impl<M> Clone for Subscriber<M> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            tx: self.tx.clone(),
            closed: self.closed.clone(),
        }
    }
}

impl<M> fmt::Debug for Subscriber<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber").field("id", &self.id).finish()
    }
}

/// Receiving half of a subscriber channel.
pub struct Subscription<M> {
    id: SubscriberId,
    rx: mpsc::Receiver<M>,
    closed: CancellationToken,
}

impl<M> Subscription<M> {
    /// Identity of the subscriber this half belongs to.
    pub fn id(&self) -> SubscriberId {
        self.id
    }

    /// Receives the next message.
    ///
    /// Buffered messages are delivered even after the hub has closed the
    /// channel; `None` is returned once the channel is both closed and empty.
    pub async fn recv(&mut self) -> Option<M> {
        tokio::select! {
            biased;
            message = self.rx.recv() => message,
            _ = self.closed.cancelled() => None,
        }
    }
}

impl<M> fmt::Debug for Subscription<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ids_are_unique_and_shared_by_clones() {
        let (a, _rx_a) = Subscriber::<u32>::channel(1);
        let (b, _rx_b) = Subscriber::<u32>::channel(1);

        assert_ne!(a.id(), b.id());
        assert_eq!(a.id(), a.clone().id());
    }

    #[tokio::test]
    async fn send_fails_after_close() {
        let (sub, mut rx) = Subscriber::channel(2);

        sub.send("before").await.unwrap();
        sub.close();

        assert_eq!(sub.send("after").await, Err(ChannelClosed));
        // the buffered message is still drained before closure is reported
        assert_eq!(rx.recv().await, Some("before"));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn recv_ends_when_all_senders_drop() {
        let (sub, mut rx) = Subscriber::channel(2);

        sub.send("only").await.unwrap();
        drop(sub);

        assert_eq!(rx.recv().await, Some("only"));
        assert_eq!(rx.recv().await, None);
    }
}
