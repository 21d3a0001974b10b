//! # Routing state and the operations that mutate it.
//!
//! Everything in this module is owned by the command loop and mutated from a
//! single task:
//!
//! - [`Counter`](counter::Counter) the saturating budget primitive
//! - [`RoutingTable`](table::RoutingTable) the double-indexed topic/subscriber store
//! - [`Manager`](manager::Manager) command semantics on top of the table

pub(crate) mod counter;
pub(crate) mod manager;
pub(crate) mod table;

pub(crate) use manager::Manager;
