//! Built-in global veto chain

use std::sync::Arc;

use softnav_dom::{ActionState, IgnoreFilter, MouseButton, SharedUrl};

/// Opt-out attribute. An action whose submitter or path carries
/// `data-softnav="off"` stays native no matter which handlers are
/// registered.
pub const OPT_OUT_ATTR: &str = "data-softnav";
pub const OPT_OUT_VALUE: &str = "off";

/// Filters every dispatch runs before handler scanning: modified
/// clicks, non-primary buttons, cross-origin destinations, and
/// opted-out subtrees are left to the host.
pub(crate) fn global_chain(current: &SharedUrl) -> Vec<IgnoreFilter> {
    let origin_url = Arc::clone(current);
    vec![
        Box::new(|state: &ActionState| state.event().modifiers().any()),
        Box::new(|state: &ActionState| {
            state
                .event()
                .button()
                .is_some_and(|button| button != MouseButton::Left)
        }),
        Box::new(move |state: &ActionState| {
            state.url().origin() != origin_url.read().origin()
        }),
        Box::new(|state: &ActionState| state.marked(OPT_OUT_ATTR, OPT_OUT_VALUE)),
    ]
}
