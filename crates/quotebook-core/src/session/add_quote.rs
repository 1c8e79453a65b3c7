//! Add-Quote conversation.
//!
//! ```text
//! NEW -> INPUT_NAME -> INPUT_QUOTE -> INPUT_YEAR -> INPUT_MORE --yes--> NEW
//!                                                        |
//!                                                        +--> INPUT_CONFIRM --yes--> committed
//!                                                                   |
//!                                                                   +--> NEW (draft discarded)
//! ```

use super::step::{is_yes, SessionEffect, Step};
use crate::quote::{Quote, QuoteContext};

pub const PROMPT_NAME: &str = "Who said it?";
pub const PROMPT_YEAR: &str = "What year was it said? (anything that is not a number means no year)";
pub const PROMPT_MORE: &str = "Add another quote to this context? (yes/no)";
pub const PROMPT_CONFIRM: &str = "Save this context? (yes/no)";
pub const NOTICE_RESTART: &str = "Discarded. Let's start over.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddQuoteState {
    New,
    InputName,
    InputQuote { speaker: String },
    InputYear { speaker: String, text: String },
    InputMore,
    InputConfirm,
}

/// A context being assembled one quote at a time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddQuoteSession {
    added_by: String,
    state: AddQuoteState,
    draft: Vec<Quote>,
}

impl AddQuoteSession {
    pub fn new(added_by: impl Into<String>) -> Self {
        Self {
            added_by: added_by.into(),
            state: AddQuoteState::New,
            draft: Vec::new(),
        }
    }

    pub fn state(&self) -> &AddQuoteState {
        &self.state
    }

    pub fn draft(&self) -> &[Quote] {
        &self.draft
    }

    /// Leaves `New` by asking for the speaker of the next quote.
    pub fn start(mut self) -> Step<Self> {
        self.state = AddQuoteState::InputName;
        Step::proceed(self, vec![SessionEffect::Prompt(PROMPT_NAME.to_string())])
    }

    pub fn on_input(mut self, input: &str) -> Step<Self> {
        let input = input.trim();
        match std::mem::replace(&mut self.state, AddQuoteState::New) {
            AddQuoteState::New => self.start(),
            AddQuoteState::InputName => {
                if input.is_empty() {
                    self.state = AddQuoteState::InputName;
                    return Step::proceed(self, vec![SessionEffect::Prompt(PROMPT_NAME.to_string())]);
                }
                let prompt = format!("What did {} say?", input);
                self.state = AddQuoteState::InputQuote {
                    speaker: input.to_string(),
                };
                Step::proceed(self, vec![SessionEffect::Prompt(prompt)])
            }
            AddQuoteState::InputQuote { speaker } => {
                if input.is_empty() {
                    let prompt = format!("What did {} say?", speaker);
                    self.state = AddQuoteState::InputQuote { speaker };
                    return Step::proceed(self, vec![SessionEffect::Prompt(prompt)]);
                }
                self.state = AddQuoteState::InputYear {
                    speaker,
                    text: input.to_string(),
                };
                Step::proceed(self, vec![SessionEffect::Prompt(PROMPT_YEAR.to_string())])
            }
            AddQuoteState::InputYear { speaker, text } => {
                self.draft.push(Quote::from_input(speaker, text, input));
                self.state = AddQuoteState::InputMore;
                Step::proceed(self, vec![SessionEffect::Prompt(PROMPT_MORE.to_string())])
            }
            AddQuoteState::InputMore => {
                if is_yes(input) {
                    return self.start();
                }
                match QuoteContext::new(self.added_by.clone(), self.draft.clone()) {
                    Ok(context) => {
                        self.state = AddQuoteState::InputConfirm;
                        Step::proceed(
                            self,
                            vec![
                                SessionEffect::Review(context),
                                SessionEffect::Prompt(PROMPT_CONFIRM.to_string()),
                            ],
                        )
                    }
                    // unreachable in practice: INPUT_MORE is only entered after a push
                    Err(e) => Step::finish(vec![SessionEffect::Abort(e.to_string())]),
                }
            }
            AddQuoteState::InputConfirm => {
                if is_yes(input) {
                    return match QuoteContext::new(self.added_by, self.draft) {
                        Ok(context) => Step::finish(vec![SessionEffect::Commit(context)]),
                        Err(e) => Step::finish(vec![SessionEffect::Abort(e.to_string())]),
                    };
                }
                self.draft.clear();
                let mut step = self.start();
                step.effects
                    .insert(0, SessionEffect::Prompt(NOTICE_RESTART.to_string()));
                step
            }
        }
    }
}
