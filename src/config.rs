//! # Hub configuration.
//!
//! [`HubConfig`] sizes the two kinds of channels the hub creates: the command
//! queue feeding the loop, and the subscriber channels built by
//! [`Hub::connect`](crate::Hub::connect).
//!
//! # Example
//! ```
//! use hubcast::HubConfig;
//!
//! let mut cfg = HubConfig::default();
//! cfg.command_capacity = 128;
//! cfg.subscriber_capacity = 16;
//!
//! assert_eq!(cfg.subscriber_capacity, 16);
//! ```

/// Configuration for a hub instance.
///
/// Both capacities are clamped to at least 1 when the hub is built.
#[derive(Clone, Copy, Debug)]
pub struct HubConfig {
    /// Capacity of the command queue. Producers that outrun the loop block on
    /// enqueue once this many commands are pending.
    pub command_capacity: usize,
    /// Buffer size of subscriber channels created by the connect shortcut.
    /// With the minimum capacity, fan-out to a subscriber blocks until the
    /// previous message has been taken, which serializes the whole loop on
    /// that subscriber's pace.
    pub subscriber_capacity: usize,
}

impl Default for HubConfig {
    /// Provides a default configuration:
    /// - `command_capacity = 64`
    /// - `subscriber_capacity = 1` (rendezvous-like delivery)
    fn default() -> Self {
        Self {
            command_capacity: 64,
            subscriber_capacity: 1,
        }
    }
}

impl HubConfig {
    pub(crate) fn command_capacity_clamped(&self) -> usize {
        self.command_capacity.max(1)
    }

    pub(crate) fn subscriber_capacity_clamped(&self) -> usize {
        self.subscriber_capacity.max(1)
    }
}
