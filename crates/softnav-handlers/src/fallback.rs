//! Native fallback for actions whose transition failed

use softnav_dom::{ActionState, LiveDocument, PageEvent};
use tracing::warn;

use crate::handler::HandlerKind;

/// Hand the action back to the host, family by family: links and
/// downloads navigate to the destination, forms re-submit natively,
/// pops reload the document. Never fails; the engine has nothing left
/// to do for this action afterwards.
pub(crate) fn native_fallback(kind: HandlerKind, state: &ActionState, dom: &dyn LiveDocument) {
    warn!(kind = %kind, url = %state.url(), "falling back to native navigation");
    match kind {
        HandlerKind::Link | HandlerKind::Download => dom.navigate(state.url()),
        HandlerKind::Form => {
            let form = match state.event() {
                PageEvent::Submit { form, .. } => form.closest("form"),
                _ => None,
            };
            match form {
                Some(form) => dom.submit_form(form.id),
                None => dom.navigate(state.url()),
            }
        }
        HandlerKind::Pop => dom.reload(),
    }
}

#[cfg(test)]
mod tests {
    use softnav_dom::{Element, ElementPath, Modifiers, MouseButton, NodeId};
    use softnav_test_support::{FakeDom, Mutation};
    use url::Url;

    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn click(target: &str) -> ActionState {
        let anchor = Element::new(NodeId(1), "a");
        let event = PageEvent::Click {
            path: ElementPath::new(vec![anchor.clone()]),
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        };
        ActionState::new(url(target), event, Some(anchor))
    }

    #[test]
    fn links_and_downloads_navigate() {
        let dom = FakeDom::new(url("https://x/home"));
        native_fallback(HandlerKind::Link, &click("https://x/a"), &dom);
        native_fallback(HandlerKind::Download, &click("https://x/b"), &dom);
        assert_eq!(
            dom.journal(),
            vec![
                Mutation::Navigate(url("https://x/a")),
                Mutation::Navigate(url("https://x/b")),
            ]
        );
    }

    #[test]
    fn forms_resubmit_through_the_host() {
        let dom = FakeDom::new(url("https://x/home"));
        let form = Element::new(NodeId(7), "form");
        let event = PageEvent::Submit {
            form: ElementPath::new(vec![form]),
            submitter: None,
            fields: vec![],
        };
        let state = ActionState::new(url("https://x/save"), event, None);

        native_fallback(HandlerKind::Form, &state, &dom);
        assert_eq!(dom.journal(), vec![Mutation::SubmitForm(NodeId(7))]);
    }

    #[test]
    fn pops_reload() {
        let dom = FakeDom::new(url("https://x/home"));
        let state = ActionState::new(
            url("https://x/prev"),
            PageEvent::PopState {
                url: url("https://x/prev"),
                state: None,
            },
            None,
        );

        native_fallback(HandlerKind::Pop, &state, &dom);
        assert_eq!(dom.journal(), vec![Mutation::Reload]);
    }
}
