//! Registry of rendered page views awaiting navigation.

use quotebook_core::config::PagerConfig;
use quotebook_core::error::{QuotebookError, Result};
use quotebook_core::ids::ViewId;
use quotebook_core::pager::{NavButton, PageItem, Pager, PagerOutcome, RenderedPage};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

struct OpenView<T> {
    pager: Pager<T>,
    last_touched: Instant,
}

/// Holds each open pager by its view id until the view is closed or has
/// sat untouched for the idle timeout.
pub struct PageViews<T> {
    views: Mutex<HashMap<ViewId, OpenView<T>>>,
    idle_timeout: Duration,
}

impl<T: PageItem> PageViews<T> {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            views: Mutex::new(HashMap::new()),
            idle_timeout,
        }
    }

    /// Registers `pager` and renders its first page.
    pub async fn open(&self, pager: Pager<T>) -> Result<RenderedPage> {
        let page = pager.render()?;
        self.views.lock().await.insert(
            pager.view_id(),
            OpenView {
                pager,
                last_touched: Instant::now(),
            },
        );
        Ok(page)
    }

    /// Applies a button press. Closing drops the view from the registry;
    /// any later press on it is rejected as `ViewClosed`.
    pub async fn navigate(&self, view: ViewId, button: NavButton) -> Result<PagerOutcome> {
        let mut views = self.views.lock().await;
        let open = views
            .get_mut(&view)
            .ok_or_else(|| QuotebookError::ViewClosed(view.to_string()))?;

        let outcome = open.pager.apply(button)?;
        open.last_touched = Instant::now();
        if matches!(outcome, PagerOutcome::Erase(_)) {
            views.remove(&view);
        }
        Ok(outcome)
    }

    /// Drops a view without a button press. Returns whether it was open.
    pub async fn close(&self, view: ViewId) -> bool {
        self.views.lock().await.remove(&view).is_some()
    }

    /// Drops every view untouched for at least the idle timeout.
    pub async fn expire_idle(&self, now: Instant) -> Vec<ViewId> {
        let mut views = self.views.lock().await;
        let expired: Vec<ViewId> = views
            .iter()
            .filter(|(_, open)| now.saturating_duration_since(open.last_touched) >= self.idle_timeout)
            .map(|(view, _)| *view)
            .collect();
        for view in &expired {
            views.remove(view);
        }
        if !expired.is_empty() {
            tracing::debug!("Dropped {} idle page view(s)", expired.len());
        }
        expired
    }

    pub async fn len(&self) -> usize {
        self.views.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.views.lock().await.is_empty()
    }
}

impl<T: PageItem> Default for PageViews<T> {
    fn default() -> Self {
        Self::new(PagerConfig::default().view_idle_timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::context;
    use quotebook_core::quote::QuoteContext;

    fn pager(n: usize) -> Pager<QuoteContext> {
        let items: Vec<QuoteContext> = (0..n)
            .map(|i| context("alice", &format!("line {i}")))
            .collect();
        Pager::new("All quotes", items, 5, false)
    }

    #[tokio::test]
    async fn test_open_then_navigate() {
        let views = PageViews::default();
        let page = views.open(pager(6)).await.unwrap();
        let view = page.control.view;

        match views.navigate(view, NavButton::Next).await.unwrap() {
            PagerOutcome::Render(page) => assert_eq!(page.control.page, 2),
            other => panic!("expected render, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_close_removes_view_and_rejects_later_presses() {
        let views = PageViews::default();
        let view = views.open(pager(2)).await.unwrap().control.view;

        assert_eq!(
            views.navigate(view, NavButton::Close).await.unwrap(),
            PagerOutcome::Erase(view)
        );
        assert!(views.is_empty().await);
        assert!(matches!(
            views.navigate(view, NavButton::Next).await,
            Err(QuotebookError::ViewClosed(_))
        ));
    }

    #[tokio::test]
    async fn test_unknown_view_is_rejected() {
        let views: PageViews<QuoteContext> = PageViews::default();
        assert!(views.navigate(ViewId::new(), NavButton::Prev).await.is_err());
    }

    #[tokio::test]
    async fn test_close_reports_whether_view_was_open() {
        let views = PageViews::default();
        let view = views.open(pager(2)).await.unwrap().control.view;
        assert!(views.close(view).await);
        assert!(!views.close(view).await);
        assert!(views.navigate(view, NavButton::Next).await.is_err());
    }

    #[tokio::test]
    async fn test_idle_views_expire() {
        let views = PageViews::new(Duration::from_secs(60));
        let view = views.open(pager(6)).await.unwrap().control.view;

        assert!(views.expire_idle(Instant::now()).await.is_empty());
        assert_eq!(views.len().await, 1);

        let later = Instant::now() + Duration::from_secs(61);
        assert_eq!(views.expire_idle(later).await, vec![view]);
        assert!(views.is_empty().await);
        assert!(matches!(
            views.navigate(view, NavButton::Next).await,
            Err(QuotebookError::ViewClosed(_))
        ));
    }

    #[tokio::test]
    async fn test_navigation_keeps_view_alive() {
        let views = PageViews::new(Duration::from_secs(60));
        let stale = views.open(pager(6)).await.unwrap().control.view;
        let busy = views.open(pager(6)).await.unwrap().control.view;
        let opened = Instant::now();

        tokio::time::sleep(Duration::from_millis(20)).await;
        views.navigate(busy, NavButton::Next).await.unwrap();

        assert_eq!(views.expire_idle(opened + Duration::from_secs(60)).await, vec![stale]);
        assert_eq!(views.len().await, 1);
        assert!(views.navigate(busy, NavButton::Prev).await.is_ok());
    }
}
