//! Catalog cache - the latest poll result plus every item seen so far.
//!
//! The working list (latest poll only) backs sorted/filtered reads; the
//! accumulated id index grows monotonically and is what the watch list is
//! reconciled against.

mod cache;
mod types;

pub use cache::CatalogCache;
pub use types::*;
