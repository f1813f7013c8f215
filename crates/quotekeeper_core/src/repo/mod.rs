//! Persistence collaborator contracts and implementations.
//!
//! # Responsibility
//! - Define the load/save contract the service persists through.
//! - Keep SQL details out of the store and service layers.
//!
//! # Invariants
//! - "Never saved" (`None`) stays distinguishable from "saved empty".
//! - Read paths reject invalid persisted quotes instead of masking them.

pub mod quote_repo;
