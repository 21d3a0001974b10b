//! # hubcast
//!
//! **Hubcast** is an in-process publish/subscribe hub.
//!
//! Producers enqueue commands onto a single loop that owns the whole routing
//! state: which subscriber listens on which topic, how many messages each one
//! still expects, and when each subscriber channel gets closed. Because one
//! task applies every command, routing needs no locks and every subscriber
//! observes messages in command order.
//!
//! ## Features
//!
//! | Area            | Description                                                        | Key types                                  |
//! |-----------------|--------------------------------------------------------------------|--------------------------------------------|
//! | **Commands**    | Tagged instructions applied in arrival order.                      | [`Command`], [`Connect`], [`ConnectEach`]  |
//! | **Topics**      | Opaque routing keys with an implicit default.                      | [`Topic`]                                  |
//! | **Quotas**      | Per-subscriber and per-topic delivery budgets.                     | [`Quota`], [`TopicQuota`]                  |
//! | **Subscribers** | Bounded channels whose closure the hub manages.                    | [`Subscriber`], [`Subscription`]           |
//! | **Lifecycle**   | Spawn, drain, and await full teardown.                             | [`Hub`], [`Dispatcher`]                    |
//! | **Errors**      | Typed errors for the input surface and direct sends.               | [`HubError`], [`ChannelClosed`]            |
//!
//! ## Delivery contract
//!
//! - Within one publish, a subscriber sees topics in the listed order; the
//!   order *across* subscribers of one topic is unspecified.
//! - Exhausting a budget detaches the subscriber (everywhere for the total
//!   budget, from one topic for an edge budget); losing the last topic closes
//!   its channel unless it connected with `keep_alive`.
//! - Delivery blocks on a full subscriber buffer, stalling the loop. Size the
//!   buffers for the isolation you want.
//!
//! ```no_run
//! use hubcast::{Hub, HubConfig, Topic};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (hub, done) = Hub::spawn(HubConfig::default());
//!
//!     let mut updates = hub.connect([Topic::from("updates")]).await?;
//!     let reader = tokio::spawn(async move {
//!         while let Some(message) = updates.recv().await {
//!             println!("{message}");
//!         }
//!     });
//!
//!     hub.publish("hello", [Topic::from("updates")]).await?;
//!     hub.publish("goodbye", [Topic::from("updates")]).await?;
//!
//!     // Close the input and wait for teardown; the reader ends with it.
//!     drop(hub);
//!     done.await?;
//!     reader.await?;
//!     Ok(())
//! }
//! ```
//!
//! ---

mod command;
mod config;
mod core;
mod error;
mod routing;
mod subscriber;
mod topic;

// ---- Public re-exports ----

pub use command::{Command, Connect, ConnectEach, Quota, TopicQuota};
pub use config::HubConfig;
pub use self::core::{Dispatcher, Hub};
pub use error::{ChannelClosed, HubError};
pub use subscriber::{Subscriber, SubscriberId, Subscription};
pub use topic::Topic;
