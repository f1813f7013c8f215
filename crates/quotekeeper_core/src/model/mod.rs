//! Domain model for stored quotes.
//!
//! # Responsibility
//! - Define the canonical quote record shared by store, persistence and sync.
//! - Define the category filter selection shape.
//!
//! # Invariants
//! - A quote always carries non-empty, trimmed `text` and `category`.
//! - Quotes have no identity beyond their `text`.

pub mod quote;
