//! # Rulelog Store
//!
//! Ground fact storage for the rulelog engines.
//! `RelStore` holds a duplicate-free set of ground relations indexed by
//! relation name and triple predicate; `combine` layers two sources into
//! a read-only union without copying.

pub mod source;
pub mod store;

pub use source::{combine, Combined, RelSource};
pub use store::{RelStore, RelStoreBuilder, StoreStats};
