//! Products domain module.
//!
//! Plain product records keyed by `(category, name)` and the search filter
//! built over them. Pure data and predicates: no IO, no HTTP, no storage.

pub mod product;
pub mod query;

pub use product::{Product, ProductKey};
pub use query::{Condition, ProductQuery};
