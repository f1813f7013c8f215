//! Core use-case services.
//!
//! # Responsibility
//! - Pair the in-memory store with its persistence collaborator.
//! - Notify presentation listeners after every persisted change.

pub mod quote_service;
