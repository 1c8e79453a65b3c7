//! Session application services.
//!
//! Owns the per-user guided sessions and the guard against processing one
//! inbound message twice.

mod dedup;
mod manager;

pub use dedup::MessageDeduplicator;
pub use manager::{
    EndedSession, GuidedSessionManager, SessionReply, SessionStart, NOTICE_CANCELLED,
    NOTICE_TIMED_OUT,
};
