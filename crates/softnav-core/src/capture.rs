//! Event delegation and destination resolution

use softnav_dom::{ActionState, PageEvent};
use url::Url;

/// Which action families have registered handlers. Capture only claims
/// events some armed family could serve.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Arming {
    pub links: bool,
    pub forms: bool,
    pub downloads: bool,
    pub pops: bool,
}

/// Resolve a raw event into a dispatchable action. `None` means the
/// event is not ours: nothing armed wants it, no delegate on the path
/// matches, or no absolute destination can be derived.
///
/// Relative `href`/`action` values resolve against the last-known
/// document URL. An empty `href` resolves to that URL itself, which the
/// link handler's same-URL filter then declines.
pub(crate) fn resolve(event: &PageEvent, current: &Url, arming: Arming) -> Option<ActionState> {
    match event {
        PageEvent::Click { path, .. } => {
            if !arming.links && !arming.downloads {
                return None;
            }
            // With only downloads armed the delegate narrows to anchors
            // carrying `download`, so plain links never enter dispatch.
            let anchor = if arming.links {
                path.closest("a")
            } else {
                path.closest_with_attr("a", "download")
            }?;
            let href = anchor.attr("href")?;
            let url = current.join(href).ok()?;
            Some(ActionState::new(url, event.clone(), Some(anchor.clone())))
        }
        PageEvent::Submit { form, submitter, .. } => {
            if !arming.forms {
                return None;
            }
            let form_el = form.closest("form")?;
            let submitter_el = submitter.clone().unwrap_or_else(|| form_el.clone());
            let target = submitter_el
                .attr_non_empty("formaction")
                .or_else(|| form_el.attr("action"));
            let url = match target {
                Some(action) => current.join(action).ok()?,
                None => current.clone(),
            };
            Some(ActionState::new(url, event.clone(), Some(submitter_el)))
        }
        PageEvent::PopState { url, .. } => {
            if !arming.pops {
                return None;
            }
            Some(ActionState::new(url.clone(), event.clone(), None))
        }
    }
}
