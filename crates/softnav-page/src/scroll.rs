//! Scroll restoration after a content swap

use std::time::Duration;

use softnav_dom::LiveDocument;
use url::Url;

/// Pause before forcing the scroll position, letting the host's own
/// scroll restoration settle first.
const SCROLL_SETTLE: Duration = Duration::from_millis(10);

/// Scroll to the URL's fragment anchor when one exists, else to the top.
///
/// The top reset momentarily forces instant scroll behavior so a smooth
/// scrolling preference cannot animate the jump, then restores the prior
/// value.
pub async fn reset_scroll(dom: &dyn LiveDocument, url: &Url) {
    if let Some(fragment) = url.fragment() {
        if !fragment.is_empty() && dom.scroll_to_anchor(fragment) {
            return;
        }
    }

    let previous = dom.scroll_behavior();
    dom.set_scroll_behavior(Some("auto"));
    tokio::time::sleep(SCROLL_SETTLE).await;
    dom.scroll_to_top();
    dom.set_scroll_behavior(previous.as_deref());
}
