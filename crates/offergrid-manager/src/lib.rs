//! offergrid-manager — matches cluster offers to pending tasks.
//!
//! The resource manager receives batches of offers, keeps them in an
//! [`OfferPool`], and assigns them to tasks one at a time by greedily
//! consuming scalar capacity (`cpus`, `mem`) and attaching disk
//! descriptors. Per-task filters and strategies come from a shared
//! [`ConstraintRegistry`](offergrid_constraints::ConstraintRegistry).
//!
//! # Architecture
//!
//! ```text
//! DefaultResourceManager
//!   ├── OfferPool (rebuilt on every offer batch, swap-remove on match)
//!   ├── Arc<ConstraintRegistry> (filters + strategy per task)
//!   └── filter::admits (attribute matching, per FilterMode)
//! ```
//!
//! The pool is driven by a single scheduling loop: one offer batch,
//! many `assign` calls, then `offers()` to decline what is left.
//! Filter registration may happen concurrently from other threads.

pub mod error;
pub mod filter;
pub mod manager;
pub mod pool;

pub use error::{ManagerError, ManagerResult};
pub use manager::{DefaultResourceManager, ResourceManager};
pub use pool::{OfferPool, ResourceOffer};
