//! Remote snapshot synchronization.
//!
//! # Responsibility
//! - Fetch remote quotes through an injected transport.
//! - Apply them through the service merge policy, one sync at a time.
//! - Drive periodic syncs with an explicit start/stop lifecycle.
//!
//! # Invariants
//! - A failed fetch never mutates local state.
//! - Two syncs never run concurrently against the same reconciler.

pub mod config;
pub mod reconciler;
pub mod scheduler;
pub mod transport;
