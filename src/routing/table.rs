//! # The double-indexed routing table.
//!
//! State shared by every routing operation:
//!
//! ```text
//! topics:      Topic ──► { SubscriberId ──► Counter }   (per-edge budget)
//! subscribers: SubscriberId ──► SubscriberEntry
//!                                 ├─► channel       (the hub's sending half)
//!                                 ├─► topic_refs    (edges currently held)
//!                                 ├─► message_refs  (total budget)
//!                                 └─► keep_alive
//! ```
//!
//! ## Rules
//! - Every edge is present in both indexes, or in neither.
//! - `topic_refs` equals the number of topics holding the subscriber.
//! - A topic with no members is removed from the map, never kept empty.
//! - Evicting the last edge closes the channel, unless `keep_alive`.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::command::Quota;
use crate::routing::counter::Counter;
use crate::subscriber::{Subscriber, SubscriberId};
use crate::topic::Topic;

/// Book-keeping for one known subscriber.
pub(crate) struct SubscriberEntry<M> {
    /// The hub's clone of the sending half; dropped on eviction.
    pub(crate) channel: Subscriber<M>,
    /// Number of topics this subscriber currently has an edge on.
    pub(crate) topic_refs: Counter,
    /// Remaining messages across all topics; 0 means unlimited.
    pub(crate) message_refs: Counter,
    /// When set, eviction and shutdown leave the channel open.
    pub(crate) keep_alive: bool,
}

impl<M> SubscriberEntry<M> {
    /// Closes the channel unless the owner kept that right.
    fn close_unless_kept(&self) {
        if !self.keep_alive {
            self.channel.close();
        }
    }
}

/// Topic and subscriber indexes, always mutated together.
pub(crate) struct RoutingTable<M> {
    topics: HashMap<Topic, HashMap<SubscriberId, Counter>>,
    subscribers: HashMap<SubscriberId, SubscriberEntry<M>>,
}

impl<M> RoutingTable<M> {
    pub(crate) fn new() -> Self {
        Self {
            topics: HashMap::new(),
            subscribers: HashMap::new(),
        }
    }

    // ---------------------------
    // Subscriber index
    // ---------------------------

    pub(crate) fn contains(&self, id: SubscriberId) -> bool {
        self.subscribers.contains_key(&id)
    }

    pub(crate) fn entry_mut(&mut self, id: SubscriberId) -> Option<&mut SubscriberEntry<M>> {
        self.subscribers.get_mut(&id)
    }

    pub(crate) fn insert_subscriber(&mut self, id: SubscriberId, entry: SubscriberEntry<M>) {
        self.subscribers.insert(id, entry);
    }

    /// Removes the entry without touching the topic index.
    pub(crate) fn take_subscriber(&mut self, id: SubscriberId) -> Option<SubscriberEntry<M>> {
        self.subscribers.remove(&id)
    }

    /// Removes every entry, yielding them for final teardown.
    pub(crate) fn drain_subscribers(
        &mut self,
    ) -> impl Iterator<Item = (SubscriberId, SubscriberEntry<M>)> + '_ {
        self.subscribers.drain()
    }

    // ---------------------------
    // Topic index
    // ---------------------------

    pub(crate) fn has_topic(&self, topic: &Topic) -> bool {
        self.topics.contains_key(topic)
    }

    pub(crate) fn has_edge(&self, topic: &Topic, id: SubscriberId) -> bool {
        self.topics
            .get(topic)
            .is_some_and(|members| members.contains_key(&id))
    }

    /// Current topics, in no particular order.
    pub(crate) fn all_topics(&self) -> Vec<Topic> {
        self.topics.keys().cloned().collect()
    }

    /// Snapshot of a topic's members, in no particular order.
    pub(crate) fn topic_members(&self, topic: &Topic) -> Option<Vec<SubscriberId>> {
        self.topics
            .get(topic)
            .map(|members| members.keys().copied().collect())
    }

    /// Drops a whole topic, yielding its former members.
    pub(crate) fn take_topic(&mut self, topic: &Topic) -> Option<Vec<SubscriberId>> {
        self.topics
            .remove(topic)
            .map(|members| members.into_keys().collect())
    }

    pub(crate) fn edge_counter_mut(
        &mut self,
        topic: &Topic,
        id: SubscriberId,
    ) -> Option<&mut Counter> {
        self.topics.get_mut(topic)?.get_mut(&id)
    }

    // ---------------------------
    // Edge operations
    // ---------------------------

    /// Adds or refreshes an edge. Returns `true` when the edge is new; the
    /// caller is then responsible for incrementing `topic_refs`. An existing
    /// edge has its budget reset instead.
    pub(crate) fn insert_edge(&mut self, topic: &Topic, id: SubscriberId, quota: Quota) -> bool {
        let members = self.topics.entry(topic.clone()).or_default();
        match members.entry(id) {
            Entry::Occupied(mut edge) => {
                edge.get_mut().reset(quota);
                false
            }
            Entry::Vacant(slot) => {
                slot.insert(Counter::new(quota));
                true
            }
        }
    }

    /// Deletes an edge from the topic index only, garbage-collecting the
    /// topic if it became empty. Returns whether an edge was actually there.
    pub(crate) fn unlink_edge(&mut self, topic: &Topic, id: SubscriberId) -> bool {
        let Some(members) = self.topics.get_mut(topic) else {
            return false;
        };
        if members.remove(&id).is_none() {
            return false;
        }
        if members.is_empty() {
            self.topics.remove(topic);
        }
        true
    }

    /// Gives back one topic reference. When it was the last one, the
    /// subscriber is evicted and its channel closed unless `keep_alive`.
    /// Returns whether the subscriber was evicted.
    pub(crate) fn release_ref(&mut self, id: SubscriberId) -> bool {
        let Some(entry) = self.subscribers.get_mut(&id) else {
            return false;
        };
        if !entry.topic_refs.dec() {
            return false;
        }

        if let Some(entry) = self.subscribers.remove(&id) {
            entry.close_unless_kept();
        }
        true
    }

    /// Removes an edge and gives back its topic reference; see
    /// [`release_ref`](Self::release_ref) for the eviction side. An absent
    /// edge is a no-op reported as `false`.
    pub(crate) fn remove_edge(&mut self, topic: &Topic, id: SubscriberId) -> bool {
        if !self.unlink_edge(topic, id) {
            return false;
        }
        self.release_ref(id)
    }

    // ---------------------------
    // Introspection (used by the manager and by tests)
    // ---------------------------

    pub(crate) fn topic_count(&self) -> usize {
        self.topics.len()
    }

    pub(crate) fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
