//! Result pager: fixed-size pages over an item snapshot.

mod model;
#[allow(clippy::module_inception)]
mod pager;

pub use model::{NavButton, PageControl, PageField, PageItem, PagerOutcome, RenderedPage};
pub use pager::{Pager, NOTHING_FOUND_BODY, NOTHING_FOUND_LABEL};
