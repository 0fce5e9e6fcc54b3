//! Handler registration: action family, local filters, transition

use futures_util::future::BoxFuture;
use softnav_dom::{ActionState, IgnoreFilter, LiveDocument, SharedUrl};

use crate::scope::TransitionScope;

/// Action family a handler serves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HandlerKind {
    Link,
    Form,
    Download,
    Pop,
}

impl HandlerKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerKind::Link => "link",
            HandlerKind::Form => "form",
            HandlerKind::Download => "download",
            HandlerKind::Pop => "pop",
        }
    }
}

impl std::fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Application callback that carries one claimed action to completion.
pub type TransitionFn =
    Box<dyn Fn(TransitionScope) -> BoxFuture<'static, crate::Result<()>> + Send + Sync>;

/// One registered interceptor: local veto filters plus the transition
/// the application runs when this handler claims an action.
///
/// The first registered handler whose filters all decline wins the
/// action; a handler never sees actions already vetoed by the global
/// chain.
pub struct Handler {
    kind: HandlerKind,
    filters: Vec<IgnoreFilter>,
    transition: TransitionFn,
}

impl Handler {
    /// Handler for plain anchor activations. Ignores actions without an
    /// anchor submitter, fragment-only moves within the current URL, and
    /// anchors marked for download or an alternate browsing target.
    pub fn link(transition: TransitionFn, current: SharedUrl) -> Self {
        let mut handler = Self::bare(HandlerKind::Link, transition);
        handler.ignore(Box::new(|state: &ActionState| {
            state.submitter().map_or(true, |el| !el.is("a"))
        }));
        handler.ignore(Box::new(move |state: &ActionState| {
            state.same_url(&current.read())
        }));
        handler.ignore(Box::new(|state: &ActionState| {
            state.submitter().is_some_and(|el| el.has_attr("download"))
        }));
        handler.ignore(Box::new(|state: &ActionState| {
            state.submitter().is_some_and(|el| el.has_attr("target"))
        }));
        handler
    }

    /// Handler for form submissions. Ignores non-submit events and forms
    /// routed to an alternate browsing target, from the submitter's
    /// `formtarget` or the form's own `target`.
    pub fn form(transition: TransitionFn) -> Self {
        let mut handler = Self::bare(HandlerKind::Form, transition);
        handler.ignore(Box::new(|state: &ActionState| !state.event().is_submit()));
        handler.ignore(Box::new(|state: &ActionState| {
            let submitter_target = state
                .submitter()
                .and_then(|el| el.attr_non_empty("formtarget"));
            let form_target = state
                .event()
                .path()
                .and_then(|path| path.closest("form"))
                .and_then(|form| form.attr_non_empty("target"));
            submitter_target.or(form_target).is_some()
        }));
        handler
    }

    /// Handler for anchors with a `download` attribute.
    pub fn download(transition: TransitionFn) -> Self {
        let mut handler = Self::bare(HandlerKind::Download, transition);
        handler.ignore(Box::new(|state: &ActionState| {
            state.submitter().map_or(true, |el| !el.is("a"))
        }));
        handler.ignore(Box::new(|state: &ActionState| {
            state.submitter().map_or(true, |el| !el.has_attr("download"))
        }));
        handler
    }

    /// Handler for history traversal. Ignores pops whose destination is
    /// the current URL up to the fragment; those only need a scroll
    /// pass, which the orchestrator runs when no handler claims the pop.
    pub fn pop(transition: TransitionFn, current: SharedUrl) -> Self {
        let mut handler = Self::bare(HandlerKind::Pop, transition);
        handler.ignore(Box::new(|state: &ActionState| !state.event().is_pop()));
        handler.ignore(Box::new(move |state: &ActionState| {
            state.same_url(&current.read())
        }));
        handler
    }

    fn bare(kind: HandlerKind, transition: TransitionFn) -> Self {
        Self {
            kind,
            filters: Vec::new(),
            transition,
        }
    }

    /// Attach another local veto.
    pub fn ignore(&mut self, filter: IgnoreFilter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// True when no local filter vetoes the action.
    pub fn matches(&self, state: &ActionState) -> bool {
        !self.filters.iter().any(|filter| filter(state))
    }

    pub fn kind(&self) -> HandlerKind {
        self.kind
    }

    /// Invoke the application transition for a claimed action.
    pub fn run(&self, scope: TransitionScope) -> BoxFuture<'static, crate::Result<()>> {
        (self.transition)(scope)
    }

    /// Hand the action back to the host after a failed transition.
    pub fn fallback(&self, state: &ActionState, dom: &dyn LiveDocument) {
        crate::fallback::native_fallback(self.kind, state, dom);
    }
}

impl std::fmt::Debug for Handler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Handler")
            .field("kind", &self.kind)
            .field("filters", &self.filters.len())
            .finish()
    }
}
