//! Domain layer for Quotebook.
//!
//! Holds the quote records, the repository seam, and the pure pieces of the
//! bot: search, paging, and the guided-session state machines. Nothing in
//! this crate performs I/O.

pub mod config;
pub mod error;
pub mod ids;
pub mod interaction;
pub mod pager;
pub mod quote;
pub mod search;
pub mod session;

// Re-export common error type
pub use error::{QuotebookError, Result};
