//! On-disk representation of a community quote collection.
//!
//! ```json
//! [
//!   { "author": "alice", "context": [ { "name": "Bob", "quote": "hi", "year": null } ] }
//! ]
//! ```

use quotebook_core::error::{QuotebookError, Result};
use quotebook_core::quote::{Quote, QuoteContext};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDto {
    pub name: String,
    pub quote: String,
    /// Always written, `null` when the quote has no year.
    pub year: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteContextDto {
    pub author: String,
    pub context: Vec<QuoteDto>,
}

impl From<&Quote> for QuoteDto {
    fn from(quote: &Quote) -> Self {
        Self {
            name: quote.speaker().to_string(),
            quote: quote.text().to_string(),
            year: quote.year(),
        }
    }
}

impl From<QuoteDto> for Quote {
    fn from(dto: QuoteDto) -> Self {
        Quote::new(dto.name, dto.quote, dto.year)
    }
}

impl From<&QuoteContext> for QuoteContextDto {
    fn from(context: &QuoteContext) -> Self {
        Self {
            author: context.added_by().to_string(),
            context: context.quotes().iter().map(QuoteDto::from).collect(),
        }
    }
}

impl TryFrom<QuoteContextDto> for QuoteContext {
    type Error = QuotebookError;

    fn try_from(dto: QuoteContextDto) -> Result<Self> {
        let author = dto.author;
        let quotes = dto.context.into_iter().map(Quote::from).collect();
        QuoteContext::new(author.clone(), quotes).map_err(|_| {
            QuotebookError::serialization(
                "JSON",
                format!("context added by '{}' has no quotes", author),
            )
        })
    }
}

/// Converts decoded DTOs into domain contexts, failing on the first invalid one.
pub fn into_collection(dtos: Vec<QuoteContextDto>) -> Result<Vec<QuoteContext>> {
    dtos.into_iter().map(QuoteContext::try_from).collect()
}

pub fn from_collection(collection: &[QuoteContext]) -> Vec<QuoteContextDto> {
    collection.iter().map(QuoteContextDto::from).collect()
}
