//! # Hub: the cloneable command-input handle.
//!
//! A [`Hub`] wraps the sending end of the command queue. Clones are cheap and
//! every clone feeds the same loop; the queue serializes them. Dropping the
//! last clone closes the input, which is the hub's only shutdown signal.
//!
//! The shortcut methods build the obvious command and enqueue it. Anything
//! they cannot express (per-topic quotas, keep-alive, pre-built subscriber
//! channels) goes through [`Hub::command`] with a hand-built command.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::command::{Command, Connect};
use crate::config::HubConfig;
use crate::core::dispatcher::Dispatcher;
use crate::error::HubError;
use crate::subscriber::{Subscriber, SubscriberId, Subscription};
use crate::topic::Topic;

/// Command input to a running hub.
pub struct Hub<M> {
    commands: mpsc::Sender<Command<M>>,
    subscriber_capacity: usize,
}

impl<M> Clone for Hub<M> {
    fn clone(&self) -> Self {
        Self {
            commands: self.commands.clone(),
            subscriber_capacity: self.subscriber_capacity,
        }
    }
}

impl<M: Clone + Send + 'static> Hub<M> {
    /// Creates a hub and its dispatcher without running anything.
    ///
    /// The caller drives the loop by awaiting [`Dispatcher::run`], typically
    /// on a task of its own. Most callers want [`Hub::spawn`] instead.
    pub fn channel(config: HubConfig) -> (Hub<M>, Dispatcher<M>) {
        let (tx, rx) = mpsc::channel(config.command_capacity_clamped());
        let hub = Hub {
            commands: tx,
            subscriber_capacity: config.subscriber_capacity_clamped(),
        };
        (hub, Dispatcher::new(rx))
    }

    /// Creates a hub and runs its loop on a new task.
    ///
    /// The returned handle resolves exactly once, after the last [`Hub`]
    /// clone has been dropped *and* teardown has finished; awaiting it is how
    /// callers wait for full drain.
    pub fn spawn(config: HubConfig) -> (Hub<M>, JoinHandle<()>) {
        let (hub, dispatcher) = Hub::channel(config);
        let done = tokio::spawn(dispatcher.run());
        (hub, done)
    }

    /// Enqueues a command, waiting for queue space.
    ///
    /// Accepts anything convertible into a [`Command`]: the command structs,
    /// a bare [`Subscriber`] (connect to the default topic), or a bare
    /// payload value (broadcast to the default topic).
    pub async fn command(&self, command: impl Into<Command<M>>) -> Result<(), HubError> {
        self.commands
            .send(command.into())
            .await
            .map_err(|_| HubError::Closed)
    }

    /// Creates a fresh subscriber channel and connects it to the given
    /// topics (default topic when none), returning the receiving half.
    ///
    /// The channel uses [`HubConfig::subscriber_capacity`]; the hub owns its
    /// closure. Use [`Subscription::id`] with the disconnect shortcuts.
    pub async fn connect(
        &self,
        topics: impl IntoIterator<Item = Topic>,
    ) -> Result<Subscription<M>, HubError> {
        let (subscriber, subscription) = Subscriber::channel(self.subscriber_capacity);
        self.command(Connect::new(subscriber, topics)).await?;
        Ok(subscription)
    }

    /// Detaches a subscriber from the given topics (default topic when none).
    pub async fn disconnect(
        &self,
        subscriber: SubscriberId,
        topics: impl IntoIterator<Item = Topic>,
    ) -> Result<(), HubError> {
        self.command(Command::Disconnect {
            subscriber,
            topics: topics.into_iter().collect(),
        })
        .await
    }

    /// Detaches a subscriber from every topic it is on.
    pub async fn disconnect_all(&self, subscriber: SubscriberId) -> Result<(), HubError> {
        self.command(Command::DisconnectAll(subscriber)).await
    }

    /// Fans a payload out to the given topics (default topic when none).
    pub async fn publish(
        &self,
        payload: M,
        topics: impl IntoIterator<Item = Topic>,
    ) -> Result<(), HubError> {
        self.command(Command::Publish {
            payload,
            topics: topics.into_iter().collect(),
        })
        .await
    }

    /// Drops the given topics (default topic when none), evicting
    /// subscribers orphaned by it.
    pub async fn close_topics(
        &self,
        topics: impl IntoIterator<Item = Topic>,
    ) -> Result<(), HubError> {
        self.command(Command::CloseTopics(topics.into_iter().collect()))
            .await
    }

    /// Drops every topic currently routed.
    pub async fn close_all(&self) -> Result<(), HubError> {
        self.command(Command::CloseAll).await
    }
}
