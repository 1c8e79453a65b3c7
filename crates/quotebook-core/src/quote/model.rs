//! Quote domain records.

use crate::error::{QuotebookError, Result};
use std::fmt;

/// A single attributed line.
///
/// `year` is optional; year input that does not parse as an integer is
/// stored as "no year" rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quote {
    speaker: String,
    text: String,
    year: Option<i64>,
}

impl Quote {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>, year: Option<i64>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            year,
        }
    }

    /// Builds a quote from raw user input, parsing `year_input` leniently.
    pub fn from_input(speaker: impl Into<String>, text: impl Into<String>, year_input: &str) -> Self {
        Self::new(speaker, text, parse_year(year_input))
    }

    pub fn speaker(&self) -> &str {
        &self.speaker
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn year(&self) -> Option<i64> {
        self.year
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "\"{}\" - {}, {}", self.text, self.speaker, year),
            None => write!(f, "\"{}\" - {}", self.text, self.speaker),
        }
    }
}

/// Parses a year the way every input path does: trimmed integer or nothing.
pub fn parse_year(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok()
}

/// One submission: an ordered, non-empty run of quotes plus its contributor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuoteContext {
    added_by: String,
    quotes: Vec<Quote>,
}

impl QuoteContext {
    /// Creates a context, rejecting an empty quote list.
    pub fn new(added_by: impl Into<String>, quotes: Vec<Quote>) -> Result<Self> {
        if quotes.is_empty() {
            return Err(QuotebookError::validation(
                "a quote context needs at least one quote",
            ));
        }
        Ok(Self {
            added_by: added_by.into(),
            quotes,
        })
    }

    pub fn added_by(&self) -> &str {
        &self.added_by
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// The multi-line body used wherever a context is shown to users.
    pub fn render_body(&self) -> String {
        self.quotes
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    }
}
