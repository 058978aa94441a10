//! Page store contract and in-memory backend for Mosaic.
//!
//! This crate provides the [`PageStore`] trait for abstracting page and
//! block persistence from the rest of the core. This enables:
//!
//! - **Unit testing** without an external database
//! - **Backend flexibility** (the real repository layer is out of core)
//! - **Optimistic concurrency**: saves compare-and-swap on the page
//!   version, so concurrent publishes of one page surface a conflict
//!   instead of interleaving silently
//!
//! [`MemoryStore`] is the in-process implementation.

mod memory;
mod store;

pub use memory::MemoryStore;
pub use store::{PageRecord, PageStore, StoreError};
