//! Normalized action state dispatched through the filter chains

use std::sync::Arc;

use parking_lot::RwLock;
use url::{Position, Url};

use crate::element::Element;
use crate::event::PageEvent;

/// Last-known document URL, shared between the orchestrator and the
/// handler-local filters.
pub type SharedUrl = Arc<RwLock<Url>>;

/// Predicate deciding whether a captured action should be ignored.
pub type IgnoreFilter = Box<dyn Fn(&ActionState) -> bool + Send + Sync>;

/// One captured action, normalized for dispatch.
///
/// `url` is always absolute: relative `href`/`action` attributes are
/// resolved against the last-known document URL during capture, and
/// [`Url`] cannot hold a relative reference. The event is owned by the
/// dispatch cycle and dropped when it completes.
#[derive(Debug, Clone)]
pub struct ActionState {
    url: Url,
    event: PageEvent,
    submitter: Option<Element>,
}

impl ActionState {
    pub fn new(url: Url, event: PageEvent, submitter: Option<Element>) -> Self {
        Self {
            url,
            event,
            submitter,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn event(&self) -> &PageEvent {
        &self.event
    }

    pub fn submitter(&self) -> Option<&Element> {
        self.submitter.as_ref()
    }

    /// True when the submitter or any element on the event path carries
    /// `attr` equal to `value`.
    pub fn marked(&self, attr: &str, value: &str) -> bool {
        let marked = |e: &Element| e.attr(attr) == Some(value);
        if self.submitter.as_ref().is_some_and(&marked) {
            return true;
        }
        self.event.path().is_some_and(|path| path.any(&marked))
    }

    /// Fragment-insensitive comparison against another URL.
    pub fn same_url(&self, other: &Url) -> bool {
        urls_match(&self.url, other)
    }
}

/// Compare two URLs ignoring their fragments.
pub fn urls_match(a: &Url, b: &Url) -> bool {
    a[..Position::AfterQuery] == b[..Position::AfterQuery]
}
