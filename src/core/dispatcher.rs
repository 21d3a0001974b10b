//! # Dispatcher: the single-writer command loop.
//!
//! One dispatcher drains one command queue. It is the only task that touches
//! the routing table, which is why none of the routing code needs a lock.
//!
//! ## Loop
//! ```text
//! loop {
//!   ├─► receive next command (suspends when the queue is empty)
//!   ├─► classify and hand to the Manager
//!   │     └─► Publish suspends again on each subscriber send
//!   └─► queue closed (all Hub clones dropped)?
//!         └─► Manager::shutdown() → return
//! }
//! ```
//!
//! ## Rules
//! - Commands apply in queue-arrival order; the loop cannot be preempted
//!   mid-command.
//! - A slow subscriber inside a publish stalls every other subscriber and
//!   every queued command. That is the intended trade for strict ordering.
//! - After `run` returns, no further message is written to any subscriber
//!   channel.

use tokio::sync::mpsc;
use tracing::debug;

use crate::command::Command;
use crate::routing::Manager;

/// Owns the receiving end of the command queue and the routing state.
///
/// Returned by [`Hub::channel`](crate::Hub::channel) for callers that want to
/// drive the loop themselves; [`Hub::spawn`](crate::Hub::spawn) runs it on a
/// fresh task instead.
pub struct Dispatcher<M> {
    commands: mpsc::Receiver<Command<M>>,
    manager: Manager<M>,
}

impl<M: Clone> Dispatcher<M> {
    pub(crate) fn new(commands: mpsc::Receiver<Command<M>>) -> Self {
        Self {
            commands,
            manager: Manager::new(),
        }
    }

    /// Runs the loop until the command input closes, then tears down.
    ///
    /// Completion of the returned future is the hub's shutdown signal: the
    /// input is closed, every hub-owned channel has been closed, and no
    /// further sends will happen.
    pub async fn run(mut self) {
        debug!("command loop started");
        while let Some(command) = self.commands.recv().await {
            self.apply(command).await;
        }
        self.manager.shutdown();
        debug!("command loop stopped");
    }

    async fn apply(&mut self, command: Command<M>) {
        match command {
            Command::Publish { payload, topics } => self.manager.broadcast(payload, topics).await,
            Command::Connect(connect) => self.manager.connect(connect),
            Command::ConnectEach(connect) => self.manager.connect_each(connect),
            Command::Disconnect { subscriber, topics } => {
                self.manager.disconnect(subscriber, topics)
            }
            Command::DisconnectAll(subscriber) => self.manager.disconnect_all(subscriber),
            Command::CloseTopics(topics) => self.manager.close_topics(topics),
            Command::CloseAll => self.manager.close_all(),
            Command::Subscribe(subscriber) => self.manager.subscribe(subscriber),
        }
    }
}
