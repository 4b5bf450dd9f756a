pub mod config;
pub mod types;

pub use config::{AllocatorConfig, FilterMode, ManagerConfig};
pub use types::*;
