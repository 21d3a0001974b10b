//! # Error types used by the hub and its subscriber channels.
//!
//! This module defines two error types:
//!
//! - [`HubError`] errors raised by the command input surface.
//! - [`ChannelClosed`] raised when sending on a subscriber channel that the
//!   hub has already closed.
//!
//! The command loop itself has no error surface: unknown subscribers, unknown
//! topics and redundant disconnects are silent no-ops by contract.

use thiserror::Error;

/// # Errors produced by the command input surface.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HubError {
    /// The command loop has terminated and no longer accepts commands.
    #[error("hub is closed; command was not enqueued")]
    Closed,
}

impl HubError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            HubError::Closed => "hub_closed",
        }
    }
}

/// The subscriber channel was closed before or during a send.
///
/// Returned by [`Subscriber::send`](crate::Subscriber::send) once the hub has
/// closed the channel, or once the receiving half has been dropped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("subscriber channel closed")]
pub struct ChannelClosed;
