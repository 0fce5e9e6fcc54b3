//! Navigation orchestrator
//!
//! One `Navigator` owns the dispatch pipeline for a document: delegated
//! events come in, and each either stays with the host's native
//! navigation, gets dropped by the single-flight guard, or runs exactly
//! one handler transition with fallback on failure.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use softnav_cache::ContentCache;
use softnav_dom::{ActionState, IgnoreFilter, LiveDocument, PageEvent, SharedUrl};
use softnav_handlers::{Handler, HandlerKind, LoadContext, TransitionFn, TransitionScope};
use softnav_net::{HttpTransport, Transport};
use softnav_page::reset_scroll;
use tracing::{debug, error, info, warn};
use url::Url;
use uuid::Uuid;

use crate::capture::{resolve, Arming};
use crate::config::NavigatorConfig;
use crate::filters::global_chain;
use crate::guard::TransitionGuard;
use crate::notify::{publish, Notification, Observer, Signal};

/// What became of one forwarded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// The engine acted on the event: a transition ran (or fell back),
    /// or a history pop was resynchronized. The host must suppress its
    /// native handling.
    Handled,
    /// The event stays with the host's native navigation.
    Native,
    /// The event arrived while a transition was in flight and was
    /// swallowed whole. The host must suppress its native handling.
    Dropped,
}

/// Navigation interception engine for one live document.
///
/// Handlers and observers are registered up front; afterwards the host
/// forwards every delegated event to [`Navigator::handle_event`] and
/// acts on the returned [`Disposition`].
pub struct Navigator {
    dom: Arc<dyn LiveDocument>,
    /// Last-known document URL, shared with the filter chains.
    current: SharedUrl,
    filters: Vec<IgnoreFilter>,
    handlers: Vec<Handler>,
    observers: Vec<Observer>,
    ctx: LoadContext,
    transitioning: Arc<AtomicBool>,
}

impl Navigator {
    pub fn new(dom: Arc<dyn LiveDocument>, transport: Arc<dyn Transport>) -> Self {
        Self::with_config(dom, transport, NavigatorConfig::default())
    }

    pub fn with_config(
        dom: Arc<dyn LiveDocument>,
        transport: Arc<dyn Transport>,
        config: NavigatorConfig,
    ) -> Self {
        let current: SharedUrl = Arc::new(RwLock::new(dom.location()));
        let cache = match config.cache_limit {
            Some(limit) => ContentCache::bounded(limit),
            None => ContentCache::new(),
        };
        Self {
            dom,
            filters: global_chain(&current),
            current,
            handlers: Vec::new(),
            observers: Vec::new(),
            ctx: LoadContext {
                transport,
                cache,
                request_headers: config.request_headers,
            },
            transitioning: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Engine over the default HTTP transport.
    pub fn with_http(
        dom: Arc<dyn LiveDocument>,
        config: NavigatorConfig,
    ) -> softnav_net::Result<Self> {
        let transport = HttpTransport::with_config(&config.transport)?;
        Ok(Self::with_config(dom, Arc::new(transport), config))
    }

    /// Register a handler for plain link activations.
    pub fn links(&mut self, transition: TransitionFn) -> &mut Self {
        let handler = Handler::link(transition, Arc::clone(&self.current));
        self.handle(handler)
    }

    /// Register a handler for form submissions.
    pub fn forms(&mut self, transition: TransitionFn) -> &mut Self {
        self.handle(Handler::form(transition))
    }

    /// Register a handler for anchors carrying `download`.
    pub fn downloads(&mut self, transition: TransitionFn) -> &mut Self {
        self.handle(Handler::download(transition))
    }

    /// Register a handler for history traversal.
    pub fn popstate(&mut self, transition: TransitionFn) -> &mut Self {
        let handler = Handler::pop(transition, Arc::clone(&self.current));
        self.handle(handler)
    }

    /// Register a handler. Dispatch scans handlers in registration
    /// order and the first match wins.
    pub fn handle(&mut self, handler: Handler) -> &mut Self {
        debug!(kind = %handler.kind(), "handler registered");
        self.handlers.push(handler);
        self
    }

    /// Append a veto to the global filter chain.
    pub fn ignore(&mut self, filter: IgnoreFilter) -> &mut Self {
        self.filters.push(filter);
        self
    }

    /// Subscribe to lifecycle notifications.
    pub fn observe(&mut self, observer: Observer) -> &mut Self {
        self.observers.push(observer);
        self
    }

    pub fn cache(&self) -> &ContentCache {
        &self.ctx.cache
    }

    /// The engine's last-known document URL.
    pub fn current_url(&self) -> Url {
        self.current.read().clone()
    }

    pub fn is_transitioning(&self) -> bool {
        self.transitioning.load(Ordering::Acquire)
    }

    /// Dispatch one delegated event through the pipeline: delegation,
    /// single-flight guard, global filters, handler scan, transition.
    pub async fn handle_event(&self, event: PageEvent) -> Disposition {
        let current = self.current.read().clone();
        let Some(state) = resolve(&event, &current, self.arming()) else {
            return Disposition::Native;
        };

        if self.is_transitioning() {
            debug!(url = %state.url(), "action dropped while a transition is in flight");
            return Disposition::Dropped;
        }

        if self.filters.iter().any(|filter| filter(&state)) {
            debug!(url = %state.url(), "action vetoed by the global chain");
            if state.event().is_pop() {
                return self.settle_pop(&state).await;
            }
            return Disposition::Native;
        }

        if publish(&self.observers, &Notification::BeforeFilter { state: &state })
            == Signal::Cancel
        {
            debug!(url = %state.url(), "interception cancelled by an observer");
            return Disposition::Native;
        }

        match self.handlers.iter().find(|h| h.matches(&state)) {
            Some(handler) => self.run_transition(handler, state).await,
            None if state.event().is_pop() => self.settle_pop(&state).await,
            None => {
                // Native navigation may be same-document; track it.
                self.resync();
                Disposition::Native
            }
        }
    }

    async fn run_transition(&self, handler: &Handler, state: ActionState) -> Disposition {
        let Some(_guard) = TransitionGuard::try_acquire(&self.transitioning) else {
            return Disposition::Dropped;
        };

        if publish(&self.observers, &Notification::BeforeLoad { state: &state })
            == Signal::Cancel
        {
            debug!(url = %state.url(), "transition cancelled before load");
            return Disposition::Native;
        }

        let transition_id = Uuid::new_v4();
        info!(%transition_id, kind = %handler.kind(), url = %state.url(), "transition started");

        let scope = TransitionScope::new(
            state.clone(),
            handler.kind(),
            Arc::clone(&self.dom),
            self.ctx.clone(),
        );
        match handler.run(scope).await {
            Ok(()) => {
                info!(%transition_id, "transition finished");
                publish(&self.observers, &Notification::Loaded { state: &state });
            }
            Err(err) => {
                error!(%transition_id, error = %err, "transition failed");
                publish(
                    &self.observers,
                    &Notification::Error {
                        error: &err,
                        state: &state,
                    },
                );
                handler.fallback(&state, self.dom.as_ref());
            }
        }
        self.resync();
        Disposition::Handled
    }

    /// Unclaimed history pop. The document already moved, so the action
    /// cannot be handed back: a pop within the current URL gets the
    /// scroll pass, anything else reloads the document.
    async fn settle_pop(&self, state: &ActionState) -> Disposition {
        let same = state.same_url(&self.current.read());
        if !same {
            warn!(url = %state.url(), "unclaimed history pop, reloading");
            self.dom.reload();
            return Disposition::Handled;
        }
        self.resync();
        reset_scroll(self.dom.as_ref(), state.url()).await;
        Disposition::Handled
    }

    /// Adopt the host's location as the last-known URL.
    fn resync(&self) {
        *self.current.write() = self.dom.location();
    }

    fn arming(&self) -> Arming {
        let mut arming = Arming::default();
        for handler in &self.handlers {
            match handler.kind() {
                HandlerKind::Link => arming.links = true,
                HandlerKind::Form => arming.forms = true,
                HandlerKind::Download => arming.downloads = true,
                HandlerKind::Pop => arming.pops = true,
            }
        }
        arming
    }
}

#[cfg(test)]
mod tests {
    use parking_lot::Mutex;
    use softnav_dom::{Element, ElementPath, Modifiers, MouseButton, NodeId};
    use softnav_test_support::{FakeDom, FakeTransport, Mutation};
    use tokio::sync::Notify;

    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn doc_html(title: &str, body: &str) -> String {
        format!(
            "<html><head><title>{title}</title></head><body><main>{body}</main></body></html>"
        )
    }

    fn anchor_click(href: &str) -> PageEvent {
        PageEvent::Click {
            path: ElementPath::new(vec![Element::new(NodeId(1), "a").with_attr("href", href)]),
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        }
    }

    fn download_click(href: &str, name: &str) -> PageEvent {
        PageEvent::Click {
            path: ElementPath::new(vec![Element::new(NodeId(1), "a")
                .with_attr("href", href)
                .with_attr("download", name)]),
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        }
    }

    fn pop_to(target: &str) -> PageEvent {
        PageEvent::PopState {
            url: url(target),
            state: None,
        }
    }

    fn rig(at: &str) -> (Arc<FakeDom>, Arc<FakeTransport>, Navigator) {
        let dom = Arc::new(FakeDom::new(url(at)));
        dom.add_selector("main");
        let transport = Arc::new(FakeTransport::new());
        let navigator = Navigator::new(
            Arc::clone(&dom) as Arc<dyn LiveDocument>,
            Arc::clone(&transport) as Arc<dyn Transport>,
        );
        (dom, transport, navigator)
    }

    /// Transition most tests use: swap `<main>` and record history.
    fn swap_main() -> TransitionFn {
        Box::new(|scope: TransitionScope| {
            Box::pin(async move {
                let page = scope.load().await?;
                page.replace_content(scope.dom(), "main")?;
                page.update_state(scope.dom(), None);
                Ok(())
            })
        })
    }

    fn load_only() -> TransitionFn {
        Box::new(|scope: TransitionScope| {
            Box::pin(async move {
                scope.load().await?;
                Ok(())
            })
        })
    }

    fn collector(navigator: &mut Navigator) -> Arc<Mutex<Vec<String>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let inner = Arc::clone(&seen);
        navigator.observe(Box::new(move |notification| {
            inner.lock().push(notification.name().to_string());
            Signal::Continue
        }));
        seen
    }

    #[tokio::test]
    async fn eligible_clicks_swap_content_and_update_state() {
        let (dom, transport, mut navigator) = rig("https://x/home");
        transport.route_html("https://x/docs", &doc_html("Docs", "docs body"));
        navigator.links(swap_main());

        let disposition = navigator.handle_event(anchor_click("/docs")).await;

        assert_eq!(disposition, Disposition::Handled);
        assert_eq!(transport.hits("https://x/docs"), 1);
        assert_eq!(dom.count(|m| matches!(m, Mutation::Replace { .. })), 1);
        assert_eq!(dom.count(|m| matches!(m, Mutation::PushHistory { .. })), 1);
        assert_eq!(dom.title(), "Docs");
        assert_eq!(navigator.current_url(), url("https://x/docs"));
        assert!(!navigator.is_transitioning());
    }

    #[tokio::test]
    async fn clicks_need_a_registered_link_handler() {
        let (dom, transport, mut navigator) = rig("https://x/home");
        let seen = collector(&mut navigator);

        let disposition = navigator.handle_event(anchor_click("/docs")).await;

        assert_eq!(disposition, Disposition::Native);
        assert!(transport.requests().is_empty());
        assert!(dom.journal().is_empty());
        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn repeat_visits_come_from_the_cache() {
        let (dom, transport, mut navigator) = rig("https://x/home");
        transport.route_html("https://x/docs", &doc_html("Docs", "docs"));
        transport.route_html("https://x/home", &doc_html("Home", "home"));
        navigator.links(swap_main());

        navigator.handle_event(anchor_click("/docs")).await;
        navigator.handle_event(anchor_click("/home")).await;
        let third = navigator.handle_event(anchor_click("/docs")).await;

        assert_eq!(third, Disposition::Handled);
        assert_eq!(transport.hits("https://x/docs"), 1);
        assert_eq!(dom.count(|m| matches!(m, Mutation::Replace { .. })), 3);
        assert!(navigator.cache().contains(&url("https://x/docs")));
    }

    #[tokio::test]
    async fn fragment_only_clicks_stay_native_without_fetching() {
        let (dom, transport, mut navigator) = rig("https://x/docs");
        navigator.links(swap_main());

        let disposition = navigator.handle_event(anchor_click("#usage")).await;

        assert_eq!(disposition, Disposition::Native);
        assert!(transport.requests().is_empty());
        assert!(dom.journal().is_empty());
    }

    #[tokio::test]
    async fn global_vetoes_precede_notifications() {
        let (_dom, transport, mut navigator) = rig("https://x/home");
        transport.route_html("https://x/docs", &doc_html("Docs", "docs"));
        navigator.links(swap_main());
        let seen = collector(&mut navigator);

        let modified = PageEvent::Click {
            path: ElementPath::new(vec![
                Element::new(NodeId(1), "a").with_attr("href", "/docs")
            ]),
            button: MouseButton::Left,
            modifiers: Modifiers {
                meta: true,
                ..Default::default()
            },
        };
        let disposition = navigator.handle_event(modified).await;

        assert_eq!(disposition, Disposition::Native);
        assert!(transport.requests().is_empty());
        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn beforefilter_cancel_suppresses_interception() {
        let (_dom, transport, mut navigator) = rig("https://x/home");
        transport.route_html("https://x/docs", &doc_html("Docs", "docs"));
        navigator.links(swap_main());
        navigator.observe(Box::new(|notification| {
            match notification {
                Notification::BeforeFilter { .. } => Signal::Cancel,
                _ => Signal::Continue,
            }
        }));

        let disposition = navigator.handle_event(anchor_click("/docs")).await;

        assert_eq!(disposition, Disposition::Native);
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn beforeload_cancel_keeps_native_and_frees_the_slot() {
        let (_dom, transport, mut navigator) = rig("https://x/home");
        transport.route_html("https://x/docs", &doc_html("Docs", "docs"));
        navigator.links(swap_main());
        let seen = collector(&mut navigator);
        navigator.observe(Box::new(|notification| {
            match notification {
                Notification::BeforeLoad { .. } => Signal::Cancel,
                _ => Signal::Continue,
            }
        }));

        let disposition = navigator.handle_event(anchor_click("/docs")).await;

        assert_eq!(disposition, Disposition::Native);
        assert!(transport.requests().is_empty());
        assert!(!navigator.is_transitioning());
        assert_eq!(*seen.lock(), vec!["beforefilter", "beforeload"]);
    }

    #[tokio::test]
    async fn failed_loads_notify_then_fall_back() {
        let (dom, transport, mut navigator) = rig("https://x/home");
        transport.route_error("https://x/broken", "connection reset");
        transport.route_html("https://x/docs", &doc_html("Docs", "docs"));
        navigator.links(swap_main());
        let seen = collector(&mut navigator);

        let failed = navigator.handle_event(anchor_click("/broken")).await;

        assert_eq!(failed, Disposition::Handled);
        assert_eq!(
            *seen.lock(),
            vec!["beforefilter", "beforeload", "error"]
        );
        assert_eq!(
            dom.count(|m| matches!(m, Mutation::Navigate(u) if *u == url("https://x/broken"))),
            1
        );
        assert!(!navigator.is_transitioning());

        // The slot is free again: the next capture is processed.
        let next = navigator.handle_event(anchor_click("/docs")).await;
        assert_eq!(next, Disposition::Handled);
        assert_eq!(transport.hits("https://x/docs"), 1);
    }

    #[tokio::test]
    async fn second_action_during_a_transition_is_dropped() {
        let (_dom, transport, mut navigator) = rig("https://x/home");

        let entered = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let gate_armed = Arc::new(AtomicBool::new(true));
        {
            let entered = Arc::clone(&entered);
            let release = Arc::clone(&release);
            let gate_armed = Arc::clone(&gate_armed);
            navigator.links(Box::new(move |_scope| {
                let entered = Arc::clone(&entered);
                let release = Arc::clone(&release);
                let gate_armed = Arc::clone(&gate_armed);
                Box::pin(async move {
                    // Only the first run blocks; later runs complete at once.
                    if gate_armed.swap(false, Ordering::SeqCst) {
                        entered.notify_one();
                        release.notified().await;
                    }
                    Ok(())
                })
            }));
        }
        let seen = collector(&mut navigator);
        let navigator = Arc::new(navigator);

        let first = tokio::spawn({
            let navigator = Arc::clone(&navigator);
            async move { navigator.handle_event(anchor_click("/slow")).await }
        });
        entered.notified().await;
        assert!(navigator.is_transitioning());
        seen.lock().clear();

        // A second eligible action is swallowed, with no notifications.
        let dropped = navigator.handle_event(anchor_click("/docs")).await;
        assert_eq!(dropped, Disposition::Dropped);
        assert!(seen.lock().is_empty());

        // Events that are not ours stay native even mid-transition.
        let foreign = PageEvent::Click {
            path: ElementPath::new(vec![Element::new(NodeId(9), "button")]),
            button: MouseButton::Left,
            modifiers: Modifiers::default(),
        };
        assert_eq!(navigator.handle_event(foreign).await, Disposition::Native);

        release.notify_one();
        assert_eq!(first.await.unwrap(), Disposition::Handled);
        assert!(!navigator.is_transitioning());

        // The slot is free again afterwards.
        let after = navigator.handle_event(anchor_click("/docs")).await;
        assert_eq!(after, Disposition::Handled);
        assert_eq!(
            *seen.lock(),
            vec!["loaded", "beforefilter", "beforeload", "loaded"]
        );
        assert!(transport.requests().is_empty());
    }

    #[tokio::test]
    async fn get_forms_submit_with_amended_query() {
        let (dom, transport, mut navigator) = rig("https://x/home");
        transport.route_html("https://x/search?q=rust", &doc_html("Results", "hits"));
        navigator.forms(swap_main());

        let submit = PageEvent::Submit {
            form: ElementPath::new(vec![Element::new(NodeId(1), "form")
                .with_attr("action", "/search")
                .with_attr("method", "get")]),
            submitter: None,
            fields: vec![("q".to_string(), "rust".to_string())],
        };
        let disposition = navigator.handle_event(submit).await;

        assert_eq!(disposition, Disposition::Handled);
        assert_eq!(transport.hits("https://x/search?q=rust"), 1);
        assert_eq!(dom.count(|m| matches!(m, Mutation::Replace { .. })), 1);
    }

    #[tokio::test]
    async fn same_url_pops_only_restore_scroll() {
        let (dom, transport, mut navigator) = rig("https://x/docs");
        navigator.popstate(swap_main());
        dom.add_anchor("sec");
        // The host already moved to the fragment before the pop fires.
        dom.set_location(url("https://x/docs#sec"));

        let disposition = navigator.handle_event(pop_to("https://x/docs#sec")).await;

        assert_eq!(disposition, Disposition::Handled);
        assert!(transport.requests().is_empty());
        assert_eq!(dom.journal(), vec![Mutation::ScrollToAnchor("sec".to_string())]);
        assert_eq!(navigator.current_url(), url("https://x/docs#sec"));
    }

    #[tokio::test]
    async fn pops_to_other_urls_run_the_pop_transition() {
        let (dom, transport, mut navigator) = rig("https://x/docs");
        transport.route_html("https://x/prev", &doc_html("Prev", "previous"));
        navigator.popstate(swap_main());
        dom.set_location(url("https://x/prev"));

        let disposition = navigator.handle_event(pop_to("https://x/prev")).await;

        assert_eq!(disposition, Disposition::Handled);
        assert_eq!(transport.hits("https://x/prev"), 1);
        assert_eq!(dom.count(|m| matches!(m, Mutation::Replace { .. })), 1);
        // The document is already at the popped URL, so history is
        // replaced rather than pushed.
        assert_eq!(dom.count(|m| matches!(m, Mutation::ReplaceHistory { .. })), 1);
        assert_eq!(dom.count(|m| matches!(m, Mutation::PushHistory { .. })), 0);
    }

    #[tokio::test]
    async fn vetoed_pops_reload_when_the_document_went_stale() {
        let (dom, transport, mut navigator) = rig("https://x/docs");
        navigator.popstate(swap_main());
        navigator.ignore(Box::new(|state| state.url().path() == "/blocked"));
        dom.set_location(url("https://x/blocked"));

        let disposition = navigator.handle_event(pop_to("https://x/blocked")).await;

        assert_eq!(disposition, Disposition::Handled);
        assert!(transport.requests().is_empty());
        assert_eq!(dom.journal(), vec![Mutation::Reload]);
    }

    #[tokio::test]
    async fn downloads_hand_bytes_to_the_host() {
        let (dom, transport, mut navigator) = rig("https://x/home");
        transport.route(
            "https://x/files/report",
            softnav_net::FetchResponse {
                url: url("https://x/files/report"),
                status: 200,
                content_type: Some("application/pdf".to_string()),
                cache_control: None,
                content_disposition: Some("attachment; filename=\"q3.pdf\"".to_string()),
                body: b"pdf bytes".to_vec(),
            },
        );
        navigator.downloads(load_only());

        let disposition = navigator
            .handle_event(download_click("/files/report", ""))
            .await;

        assert_eq!(disposition, Disposition::Handled);
        assert_eq!(
            dom.count(|m| matches!(
                m,
                Mutation::SaveDownload { file_name, .. } if file_name == "q3.pdf"
            )),
            1
        );
        // Downloads leave history and the current URL alone.
        assert_eq!(dom.count(|m| matches!(m, Mutation::PushHistory { .. })), 0);
        assert_eq!(navigator.current_url(), url("https://x/home"));
    }

    #[tokio::test]
    async fn handlers_scan_in_registration_order() {
        let (dom, transport, mut navigator) = rig("https://x/home");
        transport.route(
            "https://x/files/data.bin",
            softnav_net::FetchResponse {
                url: url("https://x/files/data.bin"),
                status: 200,
                content_type: None,
                cache_control: None,
                content_disposition: None,
                body: b"bin".to_vec(),
            },
        );
        navigator.links(swap_main());
        navigator.downloads(load_only());

        // The link handler is scanned first but declines download
        // anchors, so the download handler claims the click.
        let disposition = navigator
            .handle_event(download_click("/files/data.bin", "data.bin"))
            .await;

        assert_eq!(disposition, Disposition::Handled);
        assert_eq!(dom.count(|m| matches!(m, Mutation::SaveDownload { .. })), 1);
        assert_eq!(dom.count(|m| matches!(m, Mutation::Replace { .. })), 0);
    }
}
