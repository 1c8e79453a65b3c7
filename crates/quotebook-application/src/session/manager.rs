//! Per-user guided session ownership, cancellation, and idle expiry.

use super::dedup::MessageDeduplicator;
use quotebook_core::config::SessionConfig;
use quotebook_core::ids::{ChannelId, MessageId, UserId, ViewId};
use quotebook_core::session::{GuidedSession, SessionEffect, SessionOwner};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const NOTICE_CANCELLED: &str = "Session cancelled.";
pub const NOTICE_TIMED_OUT: &str = "Your session was idle too long and has been cancelled.";

struct ActiveSession {
    owner: SessionOwner,
    session: GuidedSession,
    /// Page view the session reads its choices from, closed with it.
    view: Option<ViewId>,
    last_activity: Instant,
}

impl ActiveSession {
    fn ended(self) -> EndedSession {
        EndedSession {
            owner: self.owner,
            view: self.view,
        }
    }
}

/// A session that has left the manager, and the view still tied to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndedSession {
    pub owner: SessionOwner,
    pub view: Option<ViewId>,
}

/// Result of starting a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStart {
    pub effects: Vec<SessionEffect>,
    /// The new session finished on its opening step and was not kept.
    pub finished: bool,
    /// The user's previous session, displaced by this one.
    pub replaced: Option<EndedSession>,
}

/// Result of routing one text message into a user's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionReply {
    pub owner: SessionOwner,
    pub effects: Vec<SessionEffect>,
    /// The session was torn down by this message.
    pub finished: bool,
    pub view: Option<ViewId>,
}

/// Owns every in-flight guided session, one per user.
///
/// Sessions are not persisted; a restart loses them.
pub struct GuidedSessionManager {
    sessions: Mutex<HashMap<UserId, ActiveSession>>,
    dedup: Mutex<MessageDeduplicator>,
    idle_timeout: Duration,
    cancel_keyword: String,
}

impl GuidedSessionManager {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            dedup: Mutex::new(MessageDeduplicator::new(config.dedup_capacity)),
            idle_timeout: config.idle_timeout(),
            cancel_keyword: config.cancel_keyword.trim().to_lowercase(),
        }
    }

    /// Starts `session` for its owner, silently replacing any session that
    /// user already had. `view` is the page the session was opened over.
    pub async fn start(
        &self,
        owner: SessionOwner,
        session: GuidedSession,
        view: Option<ViewId>,
    ) -> SessionStart {
        let kind = session.kind();
        let step = session.start();
        let mut sessions = self.sessions.lock().await;

        let Some(session) = step.state else {
            return SessionStart {
                effects: step.effects,
                finished: true,
                replaced: sessions.remove(&owner.user).map(ActiveSession::ended),
            };
        };

        tracing::info!(user = %owner.user, channel = %owner.channel, kind, "Guided session started");
        let replaced = sessions.insert(
            owner.user.clone(),
            ActiveSession {
                owner,
                session,
                view,
                last_activity: Instant::now(),
            },
        );
        if let Some(previous) = &replaced {
            tracing::debug!(user = %previous.owner.user, kind = previous.session.kind(), "Replaced previous session");
        }
        SessionStart {
            effects: step.effects,
            finished: false,
            replaced: replaced.map(ActiveSession::ended),
        }
    }

    /// Routes a text message to its sender's session.
    ///
    /// Returns `None` when the message is ignored: the sender has no
    /// session, the message was already consumed, or it arrived in a
    /// different channel from the one the session was started in.
    pub async fn handle_text(
        &self,
        message: &MessageId,
        user: &UserId,
        channel: &ChannelId,
        text: &str,
    ) -> Option<SessionReply> {
        let mut sessions = self.sessions.lock().await;
        let active = sessions.get(user)?;
        if !active.owner.accepts(user, channel) {
            return None;
        }
        if !self.dedup.lock().await.first_sighting(message) {
            tracing::debug!(%message, "Duplicate message ignored");
            return None;
        }

        let active = sessions.remove(user)?;
        if text.trim().to_lowercase() == self.cancel_keyword {
            tracing::info!(%user, kind = active.session.kind(), "Guided session cancelled");
            return Some(SessionReply {
                owner: active.owner,
                effects: vec![SessionEffect::Abort(NOTICE_CANCELLED.to_string())],
                finished: true,
                view: active.view,
            });
        }

        let step = active.session.on_input(text);
        let finished = step.is_terminal();
        match step.state {
            Some(session) => {
                sessions.insert(
                    user.clone(),
                    ActiveSession {
                        owner: active.owner.clone(),
                        session,
                        view: active.view,
                        last_activity: Instant::now(),
                    },
                );
            }
            None => tracing::info!(%user, "Guided session finished"),
        }

        Some(SessionReply {
            owner: active.owner,
            effects: step.effects,
            finished,
            view: active.view,
        })
    }

    /// Tears down the user's session, if one existed.
    pub async fn cancel(&self, user: &UserId) -> Option<EndedSession> {
        let removed = self.sessions.lock().await.remove(user)?;
        tracing::info!(%user, kind = removed.session.kind(), "Guided session cancelled");
        Some(removed.ended())
    }

    /// Removes every session idle for at least the configured timeout.
    pub async fn expire_idle(&self, now: Instant) -> Vec<EndedSession> {
        let mut sessions = self.sessions.lock().await;
        let expired: Vec<UserId> = sessions
            .iter()
            .filter(|(_, active)| now.saturating_duration_since(active.last_activity) >= self.idle_timeout)
            .map(|(user, _)| user.clone())
            .collect();

        expired
            .into_iter()
            .filter_map(|user| sessions.remove(&user))
            .map(|active| {
                tracing::info!(user = %active.owner.user, kind = active.session.kind(), "Guided session timed out");
                active.ended()
            })
            .collect()
    }

    pub async fn has_session(&self, user: &UserId) -> bool {
        self.sessions.lock().await.contains_key(user)
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.lock().await.len()
    }
}

#[cfg(test)]
#[path = "manager_test.rs"]
mod tests;
