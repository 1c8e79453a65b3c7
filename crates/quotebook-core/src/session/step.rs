//! Transition results shared by every guided session.

use crate::quote::QuoteContext;

/// Something the session wants done after a transition.
///
/// Effects are plain data; the application layer performs the I/O.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// Ask the user for the next input.
    Prompt(String),
    /// Show a context for the user to review.
    Review(QuoteContext),
    /// Append this context to the community collection and persist it.
    Commit(QuoteContext),
    /// Remove this context from the community collection and persist it.
    Remove(QuoteContext),
    /// Tell the user the session ended without a mutation.
    Abort(String),
}

/// Outcome of feeding one input to a session.
///
/// `state` is `None` when the session reached a terminal state and must be
/// torn down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<S> {
    pub state: Option<S>,
    pub effects: Vec<SessionEffect>,
}

impl<S> Step<S> {
    pub fn proceed(state: S, effects: Vec<SessionEffect>) -> Self {
        Self {
            state: Some(state),
            effects,
        }
    }

    pub fn finish(effects: Vec<SessionEffect>) -> Self {
        Self {
            state: None,
            effects,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.state.is_none()
    }

    pub fn map<U>(self, f: impl FnOnce(S) -> U) -> Step<U> {
        Step {
            state: self.state.map(f),
            effects: self.effects,
        }
    }
}

/// Case-insensitive "yes" check used by every confirmation step.
pub fn is_yes(input: &str) -> bool {
    input.trim().eq_ignore_ascii_case("yes")
}
