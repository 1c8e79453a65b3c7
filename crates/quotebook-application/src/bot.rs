//! Routes inbound host events to the store, the sessions, and the pagers.

use crate::session::{GuidedSessionManager, SessionStart, NOTICE_CANCELLED, NOTICE_TIMED_OUT};
use crate::store::QuoteStore;
use crate::views::PageViews;
use quotebook_core::config::QuotebookConfig;
use quotebook_core::error::{QuotebookError, Result};
use quotebook_core::ids::{ChannelId, CommunityId, MessageId, UserId, ViewId};
use quotebook_core::interaction::{InboundEvent, MenuOption, Outbound};
use quotebook_core::pager::{NavButton, Pager, PagerOutcome};
use quotebook_core::quote::QuoteContext;
use quotebook_core::search::{filter_query, SearchQuery};
use quotebook_core::session::{
    AddQuoteSession, GuidedSession, RemoveQuoteSession, SessionEffect, SessionOwner,
};
use std::sync::Arc;
use std::time::Instant;

pub const NO_QUOTES_YET: &str = "No quotes yet. Be the first to add one!";
pub const STORAGE_FAILURE: &str =
    "Something went wrong while reading the quotes. Please try again in a moment.";
pub const SAVE_OK: &str = "Quote saved!";
pub const SAVE_FAILED: &str = "Couldn't save the quote right now. Please try again later.";
pub const DELETE_OK: &str = "Quote deleted.";
pub const DELETE_STALE: &str = "That context no longer exists, so nothing was deleted.";
pub const DELETE_FAILED: &str = "Couldn't delete the quote right now. Please try again later.";
pub const NOTHING_TO_DELETE: &str = "There is nothing to delete here.";
pub const NOTHING_TO_CANCEL: &str = "You have no active session.";

const TITLE_ALL: &str = "All quotes";
const TITLE_REMOVE: &str = "Pick a context to delete";

/// The quote bot's single entry point for host events.
///
/// Holds the store by handle and owns the session manager and the open
/// page views; none of them is reachable as ambient state.
pub struct QuoteBot {
    store: Arc<QuoteStore>,
    sessions: GuidedSessionManager,
    views: PageViews<QuoteContext>,
    page_size: usize,
}

impl QuoteBot {
    pub fn new(store: Arc<QuoteStore>, config: &QuotebookConfig) -> Self {
        Self {
            store,
            sessions: GuidedSessionManager::new(&config.session),
            views: PageViews::new(config.pager.view_idle_timeout()),
            page_size: config.pager.page_size.max(1),
        }
    }

    pub fn store(&self) -> &Arc<QuoteStore> {
        &self.store
    }

    pub fn sessions(&self) -> &GuidedSessionManager {
        &self.sessions
    }

    pub fn views(&self) -> &PageViews<QuoteContext> {
        &self.views
    }

    /// Handles one inbound event to completion and returns what to send.
    pub async fn handle(&self, event: InboundEvent) -> Vec<Outbound> {
        match event {
            InboundEvent::MenuSelected {
                community,
                channel,
                user,
                option,
            } => self.on_menu(community, channel, user, option).await,
            InboundEvent::ButtonClicked { view, user, button } => {
                self.on_button(view, &user, button).await
            }
            InboundEvent::TextMessage {
                message,
                community: _,
                channel,
                user,
                text,
            } => self.on_text(&message, &user, &channel, &text).await,
        }
    }

    /// Tears down idle sessions with a notice for each, then drops idle
    /// page views. Every view that goes away is deleted from the host.
    pub async fn expire_idle_sessions(&self, now: Instant) -> Vec<Outbound> {
        let mut outbound = Vec::new();
        for ended in self.sessions.expire_idle(now).await {
            outbound.push(Outbound::text(&ended.owner.channel, NOTICE_TIMED_OUT));
            outbound.extend(self.close_view(ended.view).await);
        }
        for view in self.views.expire_idle(now).await {
            outbound.push(Outbound::DeletePage { view });
        }
        outbound
    }

    async fn on_menu(
        &self,
        community: CommunityId,
        channel: ChannelId,
        user: UserId,
        option: MenuOption,
    ) -> Vec<Outbound> {
        tracing::debug!(%community, %user, ?option, "Menu option selected");
        match option {
            MenuOption::Random => match self.store.random_context(&community).await {
                Ok(Some(context)) => vec![Outbound::text(&channel, render_context(&context))],
                Ok(None) => vec![Outbound::text(&channel, NO_QUOTES_YET)],
                Err(e) => vec![failure(&channel, &e)],
            },
            MenuOption::BrowseAll => {
                let items = self.collection(&community).await;
                self.show_page(&channel, TITLE_ALL.to_string(), items).await
            }
            MenuOption::Search(query) => {
                let items = self.search(&community, &query).await;
                self.show_page(&channel, query.title(), items).await
            }
            MenuOption::AddQuote => {
                let owner = SessionOwner::new(community, channel, user);
                let session = GuidedSession::AddQuote(AddQuoteSession::new(owner.user.as_str()));
                let start = self.sessions.start(owner.clone(), session, None).await;
                self.apply_start(&owner, start, None).await
            }
            MenuOption::RemoveFromAll => {
                let candidates = self.collection(&community).await;
                self.start_removal(SessionOwner::new(community, channel, user), candidates)
                    .await
            }
            MenuOption::RemoveFromSearch(query) => {
                let candidates = self.search(&community, &query).await;
                self.start_removal(SessionOwner::new(community, channel, user), candidates)
                    .await
            }
            MenuOption::Cancel => match self.sessions.cancel(&user).await {
                Some(ended) => {
                    let mut outbound = Vec::new();
                    outbound.extend(self.close_view(ended.view).await);
                    outbound.push(Outbound::text(&ended.owner.channel, NOTICE_CANCELLED));
                    outbound
                }
                None => vec![Outbound::text(&channel, NOTHING_TO_CANCEL)],
            },
        }
    }

    async fn on_button(&self, view: ViewId, user: &UserId, button: NavButton) -> Vec<Outbound> {
        match self.views.navigate(view, button).await {
            Ok(PagerOutcome::Render(page)) => vec![Outbound::EditPage { view, page }],
            Ok(PagerOutcome::Erase(view)) => vec![Outbound::DeletePage { view }],
            Err(e) => {
                tracing::debug!(%view, %user, %button, "Navigation rejected: {}", e);
                Vec::new()
            }
        }
    }

    async fn on_text(
        &self,
        message: &MessageId,
        user: &UserId,
        channel: &ChannelId,
        text: &str,
    ) -> Vec<Outbound> {
        let Some(reply) = self.sessions.handle_text(message, user, channel, text).await else {
            return Vec::new();
        };
        let mut outbound = Vec::new();
        if reply.finished {
            outbound.extend(self.close_view(reply.view).await);
        }
        outbound.extend(self.apply_effects(&reply.owner, reply.effects).await);
        outbound
    }

    /// Drops a view the bot opened on its own, telling the host to delete it.
    async fn close_view(&self, view: Option<ViewId>) -> Option<Outbound> {
        let view = view?;
        self.views.close(view).await.then_some(Outbound::DeletePage { view })
    }

    async fn collection(&self, community: &CommunityId) -> Result<Vec<QuoteContext>> {
        Ok(self.store.get(community).await?.to_vec())
    }

    async fn search(&self, community: &CommunityId, query: &SearchQuery) -> Result<Vec<QuoteContext>> {
        let collection = self.store.get(community).await?;
        Ok(filter_query(&collection, query))
    }

    async fn show_page(
        &self,
        channel: &ChannelId,
        title: String,
        items: Result<Vec<QuoteContext>>,
    ) -> Vec<Outbound> {
        let items = match items {
            Ok(items) => items,
            Err(e) => return vec![failure(channel, &e)],
        };
        match self.views.open(Pager::new(title, items, self.page_size, false)).await {
            Ok(page) => vec![Outbound::SendPage {
                channel: channel.clone(),
                page,
            }],
            Err(e) => vec![failure(channel, &e)],
        }
    }

    async fn start_removal(
        &self,
        owner: SessionOwner,
        candidates: Result<Vec<QuoteContext>>,
    ) -> Vec<Outbound> {
        let candidates = match candidates {
            Ok(candidates) => candidates,
            Err(e) => return vec![failure(&owner.channel, &e)],
        };
        if candidates.is_empty() {
            return vec![Outbound::text(&owner.channel, NOTHING_TO_DELETE)];
        }

        let pager = Pager::new(TITLE_REMOVE, candidates.clone(), self.page_size, true);
        let page = match self.views.open(pager).await {
            Ok(page) => page,
            Err(e) => return vec![failure(&owner.channel, &e)],
        };
        let view = page.control.view;

        let session = GuidedSession::RemoveQuote(RemoveQuoteSession::new(candidates));
        let start = self.sessions.start(owner.clone(), session, Some(view)).await;
        let sent = Outbound::SendPage {
            channel: owner.channel.clone(),
            page,
        };
        self.apply_start(&owner, start, Some((view, sent))).await
    }

    /// Turns a session start into outbound messages: the displaced session's
    /// view goes first, then the new page, then the opening effects.
    async fn apply_start(
        &self,
        owner: &SessionOwner,
        start: SessionStart,
        page: Option<(ViewId, Outbound)>,
    ) -> Vec<Outbound> {
        let mut outbound = Vec::new();
        if let Some(replaced) = start.replaced {
            outbound.extend(self.close_view(replaced.view).await);
        }
        let mut view = None;
        if let Some((opened, sent)) = page {
            outbound.push(sent);
            view = Some(opened);
        }
        outbound.extend(self.apply_effects(owner, start.effects).await);
        if start.finished {
            outbound.extend(self.close_view(view).await);
        }
        outbound
    }

    async fn apply_effects(&self, owner: &SessionOwner, effects: Vec<SessionEffect>) -> Vec<Outbound> {
        let mut outbound = Vec::with_capacity(effects.len());
        for effect in effects {
            let text = match effect {
                SessionEffect::Prompt(text) | SessionEffect::Abort(text) => text,
                SessionEffect::Review(context) => render_context(&context),
                SessionEffect::Commit(context) => self.commit(owner, context).await.to_string(),
                SessionEffect::Remove(context) => self.remove(owner, &context).await.to_string(),
            };
            outbound.push(Outbound::text(&owner.channel, text));
        }
        outbound
    }

    async fn commit(&self, owner: &SessionOwner, context: QuoteContext) -> &'static str {
        match self.store.append(&owner.community, context).await {
            Ok(()) => {
                tracing::info!(community = %owner.community, user = %owner.user, "Quote added");
                SAVE_OK
            }
            Err(e) => {
                tracing::warn!(community = %owner.community, "Failed to add quote: {}", e);
                SAVE_FAILED
            }
        }
    }

    async fn remove(&self, owner: &SessionOwner, target: &QuoteContext) -> &'static str {
        match self.store.remove(&owner.community, target).await {
            Ok(()) => {
                self.store.mark_dirty(&owner.community).await;
                tracing::info!(community = %owner.community, user = %owner.user, "Quote deleted");
                DELETE_OK
            }
            Err(e) if e.is_not_found() => {
                tracing::info!(community = %owner.community, "Deletion target vanished");
                DELETE_STALE
            }
            Err(e) => {
                tracing::warn!(community = %owner.community, "Failed to delete quote: {}", e);
                DELETE_FAILED
            }
        }
    }
}

/// A context as sent in a plain text message.
pub fn render_context(context: &QuoteContext) -> String {
    format!("{}\n(added by {})", context.render_body(), context.added_by())
}

fn failure(channel: &ChannelId, error: &QuotebookError) -> Outbound {
    if error.is_storage() {
        tracing::warn!(%channel, "Storage failure: {}", error);
        Outbound::text(channel, STORAGE_FAILURE)
    } else {
        Outbound::text(channel, error.to_string())
    }
}

#[cfg(test)]
#[path = "bot_test.rs"]
mod tests;
