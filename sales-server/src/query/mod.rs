//! Query construction layer
//!
//! Pure translation of loosely-typed HTTP query parameters into SQL
//! predicates and sort specs. Nothing in this module touches the pool;
//! the repository layer applies the output to actual queries.

pub mod filter;
pub mod sort;

pub use filter::{FilterPredicate, ListParams, SaleFilter};
pub use sort::{SortDirection, SortField, SortSpec};
