//! Search domain models.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Which part of a quote context a search term is matched against.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SearchField {
    /// Any quote's text
    Content,
    /// Any quote's speaker
    Speaker,
    /// The contributor who added the context
    Author,
    /// Any quote's year; a non-numeric term finds quotes without a year
    Year,
}

/// A search request as selected by a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    pub field: SearchField,
    pub term: String,
}

impl SearchQuery {
    pub fn new(field: SearchField, term: impl Into<String>) -> Self {
        Self {
            field,
            term: term.into(),
        }
    }

    /// Title shown above a page of results.
    pub fn title(&self) -> String {
        format!("Quotes where {} matches \"{}\"", self.field, self.term)
    }
}
