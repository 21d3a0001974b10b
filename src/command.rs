//! # Commands accepted by the hub.
//!
//! The [`Command`] enum is the complete input vocabulary of the command loop.
//! Producers build a command (directly or through the [`Hub`](crate::Hub)
//! shortcuts), enqueue it, and the loop applies it in arrival order.
//!
//! ## Input contract
//! | Input | Meaning |
//! |-------|---------|
//! | [`Command::Publish`] | fan the payload out to the listed topics |
//! | [`Command::Connect`] / [`Command::ConnectEach`] | attach (or merge into) a subscriber |
//! | [`Command::Disconnect`] | detach from the listed topics |
//! | [`Command::DisconnectAll`] | detach from every topic |
//! | [`Command::CloseTopics`] / [`Command::CloseAll`] | drop whole topics |
//! | [`Command::Subscribe`] | a bare subscriber: connect it to the default topic |
//! | any payload value | shorthand for a publish to the default topic |
//!
//! The last two rows are conversions: `Command::from(subscriber)` connects
//! with no quotas and no keep-alive, and `Command::from(payload)` broadcasts
//! to the default topic. Everywhere a command is accepted,
//! `impl Into<Command<M>>` lets these shorthands be passed as-is.
//!
//! Commands that list no topics act on [`Topic::Default`]; for connects this
//! applies only when the subscriber is not yet known.

use crate::subscriber::{Subscriber, SubscriberId};
use crate::topic::Topic;

/// A delivery budget carried by connect commands.
///
/// Budgets exist at two levels: per subscriber (total messages across all
/// topics) and per edge (messages from one specific topic). Zero remaining
/// budget never occurs; a budget of [`Quota::Limit`]`(0)` behaves like
/// [`Quota::Unlimited`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Quota {
    /// No budget; messages flow until disconnected.
    #[default]
    Unlimited,
    /// At most this many further deliveries.
    Limit(u64),
    /// On a reconnect, leave the existing budget untouched. On a first
    /// connect this behaves like [`Quota::Unlimited`].
    Keep,
}

/// A topic paired with the per-edge delivery budget for it.
///
/// Used by [`ConnectEach`] to describe how a subscriber attaches to each
/// topic individually.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicQuota {
    pub topic: Topic,
    /// Messages the subscriber should receive from this topic. Re-sending a
    /// connect for the same subscriber resets the budget to the new value.
    pub quota: Quota,
}

/// Attaches a subscriber to the given topics.
///
/// After connecting, the subscriber receives messages from all listed topics
/// until it disconnects, the topics are closed, or the hub shuts down.
/// Re-connecting a known subscriber merges: listed topics are added or
/// refreshed, unlisted topics are left alone, and `keep_alive` plus the total
/// budget are overwritten (use [`Quota::Keep`] to preserve the budget).
#[derive(Debug)]
pub struct Connect<M> {
    pub subscriber: Subscriber<M>,
    pub topics: Vec<Topic>,
    /// Total number of messages the subscriber should receive across all of
    /// its topics.
    pub quota: Quota,
    /// When set, the hub never closes this subscriber's channel; its owner
    /// keeps that responsibility.
    pub keep_alive: bool,
}

impl<M> Connect<M> {
    /// Creates a connect command with unlimited budget and no keep-alive.
    pub fn new(subscriber: Subscriber<M>, topics: impl IntoIterator<Item = Topic>) -> Self {
        Self {
            subscriber,
            topics: topics.into_iter().collect(),
            quota: Quota::default(),
            keep_alive: false,
        }
    }

    /// Sets the total delivery budget.
    pub fn with_quota(mut self, quota: Quota) -> Self {
        self.quota = quota;
        self
    }

    /// Suppresses hub-initiated channel close for this subscriber.
    pub fn with_keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }

    /// Re-expresses this command in the per-topic vocabulary, with an
    /// unlimited budget on every edge.
    pub fn into_each(self) -> ConnectEach<M> {
        let topics = self
            .topics
            .into_iter()
            .map(|topic| TopicQuota {
                topic,
                quota: Quota::default(),
            })
            .collect();

        ConnectEach {
            subscriber: self.subscriber,
            topics,
            quota: self.quota,
            keep_alive: self.keep_alive,
        }
    }
}

/// Like [`Connect`], but with an individual delivery budget per topic.
#[derive(Debug)]
pub struct ConnectEach<M> {
    pub subscriber: Subscriber<M>,
    pub topics: Vec<TopicQuota>,
    /// Total budget across all topics; see [`Connect::quota`].
    pub quota: Quota,
    /// See [`Connect::keep_alive`].
    pub keep_alive: bool,
}

impl<M> ConnectEach<M> {
    /// Creates a per-topic connect command with no topics listed yet.
    ///
    /// Enqueued as-is for an unknown subscriber, it attaches to the default
    /// topic.
    pub fn new(subscriber: Subscriber<M>) -> Self {
        Self {
            subscriber,
            topics: Vec::new(),
            quota: Quota::default(),
            keep_alive: false,
        }
    }

    /// Adds one topic with its per-edge budget.
    pub fn with_topic(mut self, topic: Topic, quota: Quota) -> Self {
        self.topics.push(TopicQuota { topic, quota });
        self
    }

    /// Sets the total delivery budget.
    pub fn with_quota(mut self, quota: Quota) -> Self {
        self.quota = quota;
        self
    }

    /// Suppresses hub-initiated channel close for this subscriber.
    pub fn with_keep_alive(mut self, keep_alive: bool) -> Self {
        self.keep_alive = keep_alive;
        self
    }
}

/// One instruction for the command loop.
#[derive(Debug)]
pub enum Command<M> {
    /// Fan the payload out to each listed topic (default topic when empty).
    Publish { payload: M, topics: Vec<Topic> },
    /// Attach a subscriber to topics.
    Connect(Connect<M>),
    /// Attach a subscriber with per-topic budgets.
    ConnectEach(ConnectEach<M>),
    /// Detach a subscriber from the listed topics (default topic when empty).
    Disconnect {
        subscriber: SubscriberId,
        topics: Vec<Topic>,
    },
    /// Detach a subscriber from every topic it is on.
    DisconnectAll(SubscriberId),
    /// Drop the listed topics and evict subscribers orphaned by it
    /// (default topic when empty).
    CloseTopics(Vec<Topic>),
    /// Drop every topic currently routed.
    CloseAll,
    /// A bare subscriber: connect to the default topic, no quotas, no
    /// keep-alive.
    Subscribe(Subscriber<M>),
}

impl<M> From<Connect<M>> for Command<M> {
    fn from(connect: Connect<M>) -> Self {
        Command::Connect(connect)
    }
}

impl<M> From<ConnectEach<M>> for Command<M> {
    fn from(connect: ConnectEach<M>) -> Self {
        Command::ConnectEach(connect)
    }
}

impl<M> From<Subscriber<M>> for Command<M> {
    fn from(subscriber: Subscriber<M>) -> Self {
        Command::Subscribe(subscriber)
    }
}

/// Any payload value enqueued directly is a broadcast to the default topic.
impl<M> From<M> for Command<M> {
    fn from(payload: M) -> Self {
        Command::Publish {
            payload,
            topics: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_converts_to_default_topic_publish() {
        let command: Command<&str> = "hello".into();
        match command {
            Command::Publish { payload, topics } => {
                assert_eq!(payload, "hello");
                assert!(topics.is_empty());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn bare_subscriber_converts_to_subscribe() {
        let (subscriber, _subscription) = Subscriber::<&str>::channel(1);
        let id = subscriber.id();

        let command: Command<&str> = subscriber.into();
        match command {
            Command::Subscribe(s) => assert_eq!(s.id(), id),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn connect_expands_to_unlimited_edges() {
        let (subscriber, _subscription) = Subscriber::<&str>::channel(1);
        let each = Connect::new(subscriber, [Topic::from("a"), Topic::from("b")])
            .with_quota(Quota::Limit(3))
            .with_keep_alive(true)
            .into_each();

        assert_eq!(each.quota, Quota::Limit(3));
        assert!(each.keep_alive);
        assert_eq!(each.topics.len(), 2);
        assert!(each.topics.iter().all(|tq| tq.quota == Quota::Unlimited));
    }
}
