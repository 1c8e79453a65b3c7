//! Pure search over a community collection.

use super::model::{SearchField, SearchQuery};
use crate::quote::{parse_year, Quote, QuoteContext};

/// Returns the contexts matching `term` on `field`, in collection order.
///
/// Each context appears at most once however many of its quotes match.
pub fn filter(collection: &[QuoteContext], field: SearchField, term: &str) -> Vec<QuoteContext> {
    let matcher = Matcher::new(field, term);
    collection
        .iter()
        .filter(|ctx| matcher.matches(ctx))
        .cloned()
        .collect()
}

/// Convenience wrapper taking a [`SearchQuery`].
pub fn filter_query(collection: &[QuoteContext], query: &SearchQuery) -> Vec<QuoteContext> {
    filter(collection, query.field, &query.term)
}

enum Matcher {
    Content(String),
    Speaker(String),
    Author(String),
    Year(i64),
    NoYear,
}

impl Matcher {
    fn new(field: SearchField, term: &str) -> Self {
        let needle = term.to_lowercase();
        match field {
            SearchField::Content => Self::Content(needle),
            SearchField::Speaker => Self::Speaker(needle),
            SearchField::Author => Self::Author(needle),
            SearchField::Year => match parse_year(term) {
                Some(year) => Self::Year(year),
                None => Self::NoYear,
            },
        }
    }

    fn matches(&self, ctx: &QuoteContext) -> bool {
        match self {
            Self::Content(needle) => any_quote(ctx, |q| contains(q.text(), needle)),
            Self::Speaker(needle) => any_quote(ctx, |q| contains(q.speaker(), needle)),
            Self::Author(needle) => contains(ctx.added_by(), needle),
            Self::Year(year) => any_quote(ctx, |q| q.year() == Some(*year)),
            Self::NoYear => any_quote(ctx, |q| q.year().is_none()),
        }
    }
}

fn any_quote(ctx: &QuoteContext, pred: impl Fn(&Quote) -> bool) -> bool {
    ctx.quotes().iter().any(pred)
}

// `needle` is already lowercased
fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
