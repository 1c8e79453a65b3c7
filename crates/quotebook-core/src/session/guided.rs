//! The session variants a user can have open, and who owns them.

use super::add_quote::AddQuoteSession;
use super::remove_quote::RemoveQuoteSession;
use super::step::Step;
use crate::ids::{ChannelId, CommunityId, UserId};

/// Where a session was started and by whom.
///
/// Only messages from the same user in the same channel drive the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SessionOwner {
    pub community: CommunityId,
    pub channel: ChannelId,
    pub user: UserId,
}

impl SessionOwner {
    pub fn new(community: CommunityId, channel: ChannelId, user: UserId) -> Self {
        Self {
            community,
            channel,
            user,
        }
    }

    pub fn accepts(&self, user: &UserId, channel: &ChannelId) -> bool {
        &self.user == user && &self.channel == channel
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuidedSession {
    AddQuote(AddQuoteSession),
    RemoveQuote(RemoveQuoteSession),
}

impl GuidedSession {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::AddQuote(_) => "add-quote",
            Self::RemoveQuote(_) => "remove-quote",
        }
    }

    pub fn start(self) -> Step<Self> {
        match self {
            Self::AddQuote(s) => s.start().map(Self::AddQuote),
            Self::RemoveQuote(s) => s.start().map(Self::RemoveQuote),
        }
    }

    pub fn on_input(self, input: &str) -> Step<Self> {
        match self {
            Self::AddQuote(s) => s.on_input(input).map(Self::AddQuote),
            Self::RemoveQuote(s) => s.on_input(input).map(Self::RemoveQuote),
        }
    }
}
