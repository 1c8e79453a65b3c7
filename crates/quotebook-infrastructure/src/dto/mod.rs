//! Storage DTOs and the codec between them and domain records.

mod quote;

pub use quote::{from_collection, into_collection, QuoteContextDto, QuoteDto};
