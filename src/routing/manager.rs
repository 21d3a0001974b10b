//! # Manager: command semantics over the routing table.
//!
//! The manager executes one command at a time on behalf of the
//! [`Dispatcher`](crate::core::Dispatcher). It is the only writer of the
//! routing table and the only closer of subscriber channels.
//!
//! ## Command flow
//! ```text
//! Publish{payload, topics} ──► broadcast()
//!   for each target topic:
//!     for each member (snapshot):
//!       ├─► deliver payload (blocking send)
//!       ├─► total budget exhausted?  → detach from every topic → close
//!       └─► else edge budget exhausted? → detach from this topic
//!                                          └─► last edge → evict → close
//!
//! Connect / ConnectEach ──► connect_each()
//!   unknown subscriber → install entry, insert listed edges
//!   known subscriber   → add-or-refresh listed edges,
//!                        overwrite keep_alive, reset total budget
//!
//! Disconnect        ──► remove listed edges, stop once evicted
//! DisconnectAll     ──► close (unless keep_alive), unlink everywhere
//! CloseTopics       ──► drop topic maps, evict orphaned members
//! CloseAll          ──► CloseTopics over every topic
//! input closed      ──► shutdown(): close every non-keep-alive channel
//! ```
//!
//! ## Rules
//! - Unknown subscribers and unknown topics are silent no-ops.
//! - Empty topic lists mean the default topic (for connects, only when the
//!   subscriber is unknown).
//! - Reconnecting merges; topics not listed are left untouched.
//! - Within a fan-out, total-budget exhaustion wins over per-edge exhaustion.
//! - Delivery order across subscribers of one topic is unspecified.

use tracing::{debug, trace};

use crate::command::{Connect, ConnectEach, Quota, TopicQuota};
use crate::routing::counter::Counter;
use crate::routing::table::{RoutingTable, SubscriberEntry};
use crate::subscriber::{Subscriber, SubscriberId};
use crate::topic::Topic;

/// Substitutes the default topic for an empty target list.
fn targets(topics: Vec<Topic>) -> Vec<Topic> {
    if topics.is_empty() {
        vec![Topic::Default]
    } else {
        topics
    }
}

/// Executes commands against the routing table.
pub(crate) struct Manager<M> {
    table: RoutingTable<M>,
}

impl<M: Clone> Manager<M> {
    pub(crate) fn new() -> Self {
        Self {
            table: RoutingTable::new(),
        }
    }

    /// Attaches a subscriber to plain topics; see [`connect_each`](Self::connect_each).
    pub(crate) fn connect(&mut self, command: Connect<M>) {
        self.connect_each(command.into_each());
    }

    /// Attaches a bare subscriber to the default topic.
    pub(crate) fn subscribe(&mut self, subscriber: Subscriber<M>) {
        self.connect_each(ConnectEach::new(subscriber));
    }

    /// Attaches or re-attaches a subscriber, with a budget per topic.
    ///
    /// A reconnect is a merging upsert: listed topics are added (incrementing
    /// the topic refcount) or refreshed (resetting the edge budget); topics
    /// not listed keep their edges. `keep_alive` is overwritten and the total
    /// budget is reset, where [`Quota::Keep`] preserves the previous total
    /// while still applying the per-topic updates.
    pub(crate) fn connect_each(&mut self, command: ConnectEach<M>) {
        let ConnectEach {
            subscriber,
            mut topics,
            quota,
            keep_alive,
        } = command;
        let id = subscriber.id();

        if self.table.contains(id) {
            for TopicQuota { topic, quota } in topics {
                if self.table.insert_edge(&topic, id, quota) {
                    if let Some(entry) = self.table.entry_mut(id) {
                        entry.topic_refs.inc();
                    }
                }
            }
            if let Some(entry) = self.table.entry_mut(id) {
                entry.keep_alive = keep_alive;
                entry.message_refs.reset(quota);
            }
            debug!(subscriber = %id, "subscriber reconnected");
            return;
        }

        if topics.is_empty() {
            topics.push(TopicQuota {
                topic: Topic::Default,
                quota: Quota::default(),
            });
        }

        self.table.insert_subscriber(
            id,
            SubscriberEntry {
                channel: subscriber,
                topic_refs: Counter::from_len(topics.len()),
                message_refs: Counter::new(quota),
                keep_alive,
            },
        );
        for TopicQuota { topic, quota } in &topics {
            self.table.insert_edge(topic, id, *quota);
        }
        debug!(subscriber = %id, topics = topics.len(), "subscriber connected");
    }

    /// Detaches a subscriber from the listed topics (default topic when the
    /// list is empty).
    ///
    /// Unknown subscribers and unlisted topics are tolerated silently.
    /// Removing the last edge evicts the subscriber, at which point the
    /// remaining list entries are meaningless and processing stops.
    pub(crate) fn disconnect(&mut self, id: SubscriberId, topics: Vec<Topic>) {
        if !self.table.contains(id) {
            return;
        }

        for topic in targets(topics) {
            if !self.table.has_topic(&topic) {
                continue;
            }
            if self.table.remove_edge(&topic, id) {
                debug!(subscriber = %id, "subscriber evicted on disconnect");
                break;
            }
        }
    }

    /// Detaches a subscriber from every topic it is on.
    pub(crate) fn disconnect_all(&mut self, id: SubscriberId) {
        let Some(entry) = self.table.take_subscriber(id) else {
            return;
        };
        if !entry.keep_alive {
            entry.channel.close();
        }
        drop(entry);

        // the entry is gone; unlink edges without refcounting
        for topic in self.table.all_topics() {
            self.table.unlink_edge(&topic, id);
        }
        debug!(subscriber = %id, "subscriber fully disconnected");
    }

    /// Drops the listed topics (default topic when the list is empty) and
    /// evicts every subscriber left without a topic by it.
    pub(crate) fn close_topics(&mut self, topics: Vec<Topic>) {
        for topic in targets(topics) {
            let Some(members) = self.table.take_topic(&topic) else {
                continue;
            };
            debug!(topic = %topic, members = members.len(), "topic closed");
            for id in members {
                self.table.release_ref(id);
            }
        }
    }

    /// Drops every topic currently routed.
    pub(crate) fn close_all(&mut self) {
        for topic in self.table.all_topics() {
            if let Some(members) = self.table.take_topic(&topic) {
                debug!(topic = %topic, members = members.len(), "topic closed");
                for id in members {
                    self.table.release_ref(id);
                }
            }
        }
    }

    /// Fans a payload out to each target topic in turn.
    ///
    /// Delivery blocks on the subscriber's buffer, so one slow subscriber
    /// stalls the whole loop; subscribers wanting isolation supply buffered
    /// channels. After each delivery the budgets are settled: an exhausted
    /// total budget detaches the subscriber everywhere, an exhausted edge
    /// budget detaches it from the current topic only. Either detach may be
    /// the last edge and close the channel.
    ///
    /// # Panics
    ///
    /// Panics if a still-attached subscriber's receiving half has been
    /// dropped. Only the hub may close an attached channel; a caller that
    /// drops the receiver early breaks the ownership contract and there is
    /// no meaningful way to continue.
    pub(crate) async fn broadcast(&mut self, payload: M, topics: Vec<Topic>) {
        for topic in targets(topics) {
            let Some(members) = self.table.topic_members(&topic) else {
                trace!(topic = %topic, "publish to unknown topic dropped");
                continue;
            };

            for id in members {
                // earlier deliveries in this fan-out may have detached the
                // member or dropped the topic
                if !self.table.has_edge(&topic, id) {
                    continue;
                }
                let Some(entry) = self.table.entry_mut(id) else {
                    continue;
                };
                let channel = entry.channel.clone();

                if channel.send(payload.clone()).await.is_err() {
                    panic!("subscriber {id} dropped its receiver while still attached");
                }
                trace!(subscriber = %id, topic = %topic, "message delivered");

                let total_exhausted = match self.table.entry_mut(id) {
                    Some(entry) => entry.message_refs.dec(),
                    None => continue,
                };
                if total_exhausted {
                    self.detach_everywhere(id);
                } else if let Some(edge) = self.table.edge_counter_mut(&topic, id) {
                    if edge.dec() {
                        self.table.remove_edge(&topic, id);
                    }
                }
            }
        }
    }

    /// Final teardown once the command input has closed: every channel the
    /// hub still owns is closed, and the table is left empty.
    pub(crate) fn shutdown(&mut self) {
        let mut closed = 0usize;
        for (_, entry) in self.table.drain_subscribers() {
            if !entry.keep_alive {
                entry.channel.close();
                closed += 1;
            }
        }
        debug!(closed, "routing table torn down");
    }

    /// Removes a subscriber's edge on every topic; the last removal evicts
    /// it and closes its channel unless `keep_alive`.
    fn detach_everywhere(&mut self, id: SubscriberId) {
        for topic in self.table.all_topics() {
            self.table.remove_edge(&topic, id);
        }
        debug!(subscriber = %id, "message budget exhausted");
    }

    #[cfg(test)]
    pub(crate) fn table(&self) -> &RoutingTable<M> {
        &self.table
    }
}
