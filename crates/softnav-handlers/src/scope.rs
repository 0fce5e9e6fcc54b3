//! Context handed to an application transition

use std::sync::Arc;

use softnav_cache::ContentCache;
use softnav_dom::{ActionState, Element, LiveDocument, PageEvent};
use softnav_net::Transport;
use softnav_page::Page;
use url::Url;

use crate::handler::HandlerKind;

/// Loading machinery shared by every transition: the transport, the
/// content cache, and extra headers sent with engine requests.
#[derive(Clone)]
pub struct LoadContext {
    pub transport: Arc<dyn Transport>,
    pub cache: ContentCache,
    pub request_headers: Vec<(String, String)>,
}

/// Everything one transition may touch: the claimed action, the live
/// document, and a `load` wired to the owning handler's family.
///
/// The scope is owned by the transition future and dropped with it.
pub struct TransitionScope {
    state: ActionState,
    kind: HandlerKind,
    dom: Arc<dyn LiveDocument>,
    ctx: LoadContext,
}

impl TransitionScope {
    pub fn new(
        state: ActionState,
        kind: HandlerKind,
        dom: Arc<dyn LiveDocument>,
        ctx: LoadContext,
    ) -> Self {
        Self {
            state,
            kind,
            dom,
            ctx,
        }
    }

    /// Destination the action resolved to.
    pub fn url(&self) -> &Url {
        self.state.url()
    }

    pub fn event(&self) -> &PageEvent {
        self.state.event()
    }

    pub fn submitter(&self) -> Option<&Element> {
        self.state.submitter()
    }

    pub fn state(&self) -> &ActionState {
        &self.state
    }

    pub fn dom(&self) -> &dyn LiveDocument {
        self.dom.as_ref()
    }

    /// Load the destination the way this handler family does it: links
    /// and pops go through the content cache, forms serialize their
    /// fields, downloads hand the bytes to the host.
    pub async fn load(&self) -> crate::Result<Page> {
        match self.kind {
            HandlerKind::Link | HandlerKind::Pop => {
                crate::load::load_page(self.state.url(), &self.ctx).await
            }
            HandlerKind::Form => crate::form::load(&self.state, &self.ctx).await,
            HandlerKind::Download => {
                crate::download::load(&self.state, self.dom.as_ref(), &self.ctx).await
            }
        }
    }
}
