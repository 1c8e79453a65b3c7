//! Events consumed from, and instructions emitted to, the hosting bot.
//!
//! The core never renders anything itself; the host turns [`Outbound`]
//! values into platform messages.

use crate::ids::{ChannelId, CommunityId, MessageId, UserId, ViewId};
use crate::pager::{NavButton, RenderedPage};
use crate::search::SearchQuery;

/// Menu entries the host exposes (slash commands, select menus, ...).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuOption {
    /// Show one random context.
    Random,
    /// Page through the whole collection.
    BrowseAll,
    /// Page through the contexts matching a query.
    Search(SearchQuery),
    /// Start an Add-Quote session.
    AddQuote,
    /// Start a Remove-Quote session over the whole collection.
    RemoveFromAll,
    /// Start a Remove-Quote session over the contexts matching a query.
    RemoveFromSearch(SearchQuery),
    /// End the user's active session, if any.
    Cancel,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundEvent {
    MenuSelected {
        community: CommunityId,
        channel: ChannelId,
        user: UserId,
        option: MenuOption,
    },
    ButtonClicked {
        view: ViewId,
        user: UserId,
        button: NavButton,
    },
    TextMessage {
        message: MessageId,
        community: CommunityId,
        channel: ChannelId,
        user: UserId,
        text: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    SendText { channel: ChannelId, text: String },
    SendPage { channel: ChannelId, page: RenderedPage },
    EditPage { view: ViewId, page: RenderedPage },
    DeletePage { view: ViewId },
}

impl Outbound {
    pub fn text(channel: &ChannelId, text: impl Into<String>) -> Self {
        Self::SendText {
            channel: channel.clone(),
            text: text.into(),
        }
    }
}
