//! offergrid-constraints — per-task placement constraints.
//!
//! Holds, for every task name, an ordered list of attribute filters and
//! an optional retention strategy. Both bindings live in independent
//! lock-protected maps and have independent lifecycles: they are set by
//! `add_filter`, removed by `clear_filters`, and never expire on their own.
//!
//! The registry is `Send + Sync` and meant to be shared as
//! `Arc<ConstraintRegistry>` between the workers that register filters
//! and the resource manager that reads them during assignment.

pub mod error;
pub mod map;
pub mod registry;

pub use error::{ConstraintError, ConstraintResult};
pub use map::ConcurrentMap;
pub use registry::{Constraint, ConstraintRegistry};
