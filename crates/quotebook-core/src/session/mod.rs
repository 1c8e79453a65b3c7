//! Guided session domain module.
//!
//! Sessions are pure state machines: `(state, input) -> (state, effects)`.
//! They never touch storage; the application layer applies their effects.
//!
//! # Module Structure
//!
//! - `step`: transition result and effect types
//! - `add_quote`: the Add-Quote conversation
//! - `remove_quote`: the Remove-Quote conversation
//! - `guided`: the session variants plus ownership

mod add_quote;
mod guided;
mod remove_quote;
mod step;

pub use add_quote::{AddQuoteSession, AddQuoteState};
pub use guided::{GuidedSession, SessionOwner};
pub use remove_quote::{parse_index, IndexRejection, RemoveQuoteSession, RemoveQuoteState};
pub use step::{is_yes, SessionEffect, Step};

pub mod prompts {
    pub use super::add_quote::{
        NOTICE_RESTART, PROMPT_CONFIRM as ADD_PROMPT_CONFIRM, PROMPT_MORE, PROMPT_NAME,
        PROMPT_YEAR,
    };
    pub use super::remove_quote::{NOTICE_KEPT, PROMPT_CONFIRM as REMOVE_PROMPT_CONFIRM};
}
