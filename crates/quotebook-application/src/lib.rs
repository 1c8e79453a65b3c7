//! Application layer for the quotebook.
//!
//! Wires the pure domain types from `quotebook-core` into running services:
//!
//! - `store`: per-community quote cache with dirty-flag invalidation
//! - `session`: per-user guided sessions, deduplication, idle expiry
//! - `views`: open pagers addressed by view id, dropped when idle
//! - `bot`: the event dispatcher hosts talk to
//! - `reaper`: background expiry of idle sessions and views

pub mod bot;
pub mod reaper;
pub mod session;
pub mod store;
pub mod views;

#[cfg(test)]
mod test_support;

pub use bot::QuoteBot;
pub use reaper::spawn_session_reaper;
pub use session::GuidedSessionManager;
pub use store::{Collection, QuoteStore};
pub use views::PageViews;
