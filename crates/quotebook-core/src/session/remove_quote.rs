//! Remove-Quote conversation.
//!
//! The candidate set is fixed when the session starts. A bad index aborts
//! the whole session; it is never re-prompted.

use super::step::{is_yes, SessionEffect, Step};
use crate::quote::QuoteContext;
use thiserror::Error;

pub const PROMPT_CONFIRM: &str = "Delete this context? (yes/no)";
pub const NOTICE_KEPT: &str = "Deletion cancelled. Nothing was removed.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveQuoteState {
    ChoosingIndex,
    Confirming { index: usize },
}

/// Why an index choice ended the session.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexRejection {
    #[error("'{0}' is not a number. Deletion aborted.")]
    NotANumber(String),
    #[error("{0} is negative. Deletion aborted.")]
    Negative(i64),
    #[error("There is no entry #{index}; only {len} were listed. Deletion aborted.")]
    OutOfRange { index: i64, len: usize },
}

/// Parses a candidate index, strictly less than `len`.
pub fn parse_index(input: &str, len: usize) -> Result<usize, IndexRejection> {
    let input = input.trim();
    let index = input
        .parse::<i64>()
        .map_err(|_| IndexRejection::NotANumber(input.to_string()))?;
    if index < 0 {
        return Err(IndexRejection::Negative(index));
    }
    match usize::try_from(index) {
        Ok(i) if i < len => Ok(i),
        _ => Err(IndexRejection::OutOfRange { index, len }),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveQuoteSession {
    candidates: Vec<QuoteContext>,
    state: RemoveQuoteState,
}

impl RemoveQuoteSession {
    pub fn new(candidates: Vec<QuoteContext>) -> Self {
        Self {
            candidates,
            state: RemoveQuoteState::ChoosingIndex,
        }
    }

    pub fn state(&self) -> RemoveQuoteState {
        self.state
    }

    pub fn candidates(&self) -> &[QuoteContext] {
        &self.candidates
    }

    pub fn start(self) -> Step<Self> {
        let prompt = format!(
            "Enter the number of the context to delete (0-{}).",
            self.candidates.len().saturating_sub(1)
        );
        Step::proceed(self, vec![SessionEffect::Prompt(prompt)])
    }

    pub fn on_input(mut self, input: &str) -> Step<Self> {
        match self.state {
            RemoveQuoteState::ChoosingIndex => match parse_index(input, self.candidates.len()) {
                Ok(index) => {
                    let chosen = self.candidates[index].clone();
                    self.state = RemoveQuoteState::Confirming { index };
                    Step::proceed(
                        self,
                        vec![
                            SessionEffect::Review(chosen),
                            SessionEffect::Prompt(PROMPT_CONFIRM.to_string()),
                        ],
                    )
                }
                Err(rejection) => Step::finish(vec![SessionEffect::Abort(rejection.to_string())]),
            },
            RemoveQuoteState::Confirming { index } => {
                if is_yes(input) {
                    let target = self.candidates.swap_remove(index);
                    Step::finish(vec![SessionEffect::Remove(target)])
                } else {
                    Step::finish(vec![SessionEffect::Abort(NOTICE_KEPT.to_string())])
                }
            }
        }
    }
}
