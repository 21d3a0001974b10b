//! Runtime core: the command loop and its handle.
//!
//! ## Files & responsibilities
//! - **handle.rs**: public facade; builds the command queue, hands out the
//!   cloneable [`Hub`] sender with its enqueue shortcuts, and spawns (or hands
//!   over) the loop.
//! - **dispatcher.rs**: the single-writer loop; drains the command queue,
//!   applies each command through the routing manager, and tears the table
//!   down when the input closes.
//!
//! ## Wiring (module-level flow)
//! ```text
//! Application code
//!   └─ Hub::spawn(cfg) ──► (Hub, JoinHandle)
//!                              │
//! producers ─ enqueue ─► [command queue] ─► Dispatcher::run()
//!   (Hub clones)                               │
//!                                              ├─► Manager mutates RoutingTable
//!                                              ├─► Manager writes subscriber channels
//!                                              └─► input closed → Manager::shutdown()
//!                                                    └─► JoinHandle resolves
//! ```
//!
//! ## Notes
//! - Exactly one task mutates the routing table and closes channels.
//! - The queue serializes arbitrarily many concurrent producers.
//! - Dropping the last [`Hub`] clone closes the input and ends the loop.

mod dispatcher;
mod handle;

pub use dispatcher::Dispatcher;
pub use handle::Hub;
