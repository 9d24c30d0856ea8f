//! Record representation for in-memory querying.
//!
//! This module provides:
//! - Dynamically typed values with truthiness and coercion rules
//! - Sparse records (field name to value mappings)
//! - A record store that tracks the union of known field names

pub mod store;
pub mod value;

pub use store::RecordStore;
pub use value::{Record, Value};
