//! Rendered page shapes handed to the host.

use crate::ids::ViewId;
use crate::quote::QuoteContext;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Anything the pager can lay out as a `(label, body)` field.
pub trait PageItem {
    fn page_label(&self) -> String;
    fn page_body(&self) -> String;
}

impl PageItem for QuoteContext {
    fn page_label(&self) -> String {
        format!("Added by {}", self.added_by())
    }

    fn page_body(&self) -> String {
        self.render_body()
    }
}

/// One field of a rendered page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageField {
    /// Running 0-based index across all pages, present only in indexed views.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
    pub label: String,
    pub body: String,
}

/// Navigation descriptor attached to a rendered page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageControl {
    pub view: ViewId,
    /// 1-indexed current page
    pub page: usize,
    pub max_page: usize,
    pub indexed: bool,
}

impl PageControl {
    pub fn has_next(&self) -> bool {
        self.page < self.max_page
    }

    pub fn has_prev(&self) -> bool {
        self.page > 1
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedPage {
    pub title: String,
    pub fields: Vec<PageField>,
    pub control: PageControl,
}

/// Buttons attached to every page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum NavButton {
    Prev,
    Next,
    Close,
}

/// What the host should do after a navigation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PagerOutcome {
    /// Replace the view's content with this page.
    Render(RenderedPage),
    /// Retract the rendered message; the view is gone.
    Erase(ViewId),
}
