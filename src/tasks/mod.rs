//! Background Tasks Module
//!
//! Contains background tasks that run for the lifetime of a registry.
//!
//! # Tasks
//! - Janitor: removes expired entries from every namespace at a fixed interval

mod janitor;

pub use janitor::{spawn_janitor, DEFAULT_SWEEP_INTERVAL};
