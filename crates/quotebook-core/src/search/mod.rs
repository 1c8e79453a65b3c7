//! Search over quote collections.

mod filter;
mod model;

pub use filter::{filter, filter_query};
pub use model::{SearchField, SearchQuery};
