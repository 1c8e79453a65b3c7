//! Fixed-size paging over a snapshot of items.

use super::model::{NavButton, PageControl, PageField, PageItem, PagerOutcome, RenderedPage};
use crate::error::{QuotebookError, Result};
use crate::ids::ViewId;

pub const NOTHING_FOUND_LABEL: &str = "Nothing found";
pub const NOTHING_FOUND_BODY: &str = "No quotes to show here.";

/// Page-at-a-time view over an items snapshot.
///
/// The snapshot is taken at construction; later store changes do not reach
/// an existing pager. Pages are 1-indexed and there is always at least one,
/// so an empty snapshot renders a single placeholder page.
#[derive(Debug, Clone)]
pub struct Pager<T> {
    view: ViewId,
    title: String,
    items: Vec<T>,
    page_size: usize,
    current: usize,
    indexed: bool,
    erased: bool,
}

impl<T: PageItem> Pager<T> {
    /// Creates a pager on page 1. A `page_size` of zero is treated as one.
    pub fn new(title: impl Into<String>, items: Vec<T>, page_size: usize, indexed: bool) -> Self {
        Self {
            view: ViewId::new(),
            title: title.into(),
            items,
            page_size: page_size.max(1),
            current: 1,
            indexed,
            erased: false,
        }
    }

    pub fn view_id(&self) -> ViewId {
        self.view
    }

    pub fn max_page(&self) -> usize {
        self.items.len().div_ceil(self.page_size).max(1)
    }

    /// Renders the current page.
    pub fn render(&self) -> Result<RenderedPage> {
        self.ensure_open()?;

        let fields = if self.items.is_empty() {
            vec![PageField {
                index: None,
                label: NOTHING_FOUND_LABEL.to_string(),
                body: NOTHING_FOUND_BODY.to_string(),
            }]
        } else {
            let start = (self.current - 1) * self.page_size;
            self.items
                .iter()
                .enumerate()
                .skip(start)
                .take(self.page_size)
                .map(|(index, item)| {
                    let index = self.indexed.then_some(index);
                    let label = match index {
                        Some(i) => format!("#{} · {}", i, item.page_label()),
                        None => item.page_label(),
                    };
                    PageField {
                        index,
                        label,
                        body: item.page_body(),
                    }
                })
                .collect()
        };

        Ok(RenderedPage {
            title: self.title.clone(),
            fields,
            control: PageControl {
                view: self.view,
                page: self.current,
                max_page: self.max_page(),
                indexed: self.indexed,
            },
        })
    }

    /// Advances one page; at the last page the current page is re-rendered.
    pub fn next(&mut self) -> Result<RenderedPage> {
        self.ensure_open()?;
        if self.current < self.max_page() {
            self.current += 1;
        }
        self.render()
    }

    /// Goes back one page; at page 1 the current page is re-rendered.
    pub fn prev(&mut self) -> Result<RenderedPage> {
        self.ensure_open()?;
        if self.current > 1 {
            self.current -= 1;
        }
        self.render()
    }

    /// Marks the view erased. Every later call on this pager is rejected.
    pub fn close(&mut self) -> Result<ViewId> {
        self.ensure_open()?;
        self.erased = true;
        Ok(self.view)
    }

    pub fn apply(&mut self, button: NavButton) -> Result<PagerOutcome> {
        match button {
            NavButton::Next => self.next().map(PagerOutcome::Render),
            NavButton::Prev => self.prev().map(PagerOutcome::Render),
            NavButton::Close => self.close().map(PagerOutcome::Erase),
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.erased {
            return Err(QuotebookError::ViewClosed(self.view.to_string()));
        }
        Ok(())
    }
}
