//! Quote domain module.
//!
//! - `model`: `Quote` and `QuoteContext` records
//! - `repository`: persistence trait for per-community collections

mod model;
mod repository;

pub use model::{parse_year, Quote, QuoteContext};
pub use repository::QuoteRepository;
