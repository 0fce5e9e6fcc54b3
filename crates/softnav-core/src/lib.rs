//! Softnav Core
//!
//! In-page navigation interception and transition orchestration: the
//! dispatch pipeline that decides whether a captured action is handled,
//! the typed handlers that load its destination, the single-flight
//! guard serializing transitions, and the cache-control-aware content
//! cache behind link and pop loads. Failures always fall back to the
//! host's native navigation.

mod capture;
mod config;
mod filters;
mod guard;
mod navigator;
mod notify;

pub use config::NavigatorConfig;
pub use filters::{OPT_OUT_ATTR, OPT_OUT_VALUE};
pub use navigator::{Disposition, Navigator};
pub use notify::{Notification, Observer, Signal};

// Re-export engine components
pub use softnav_cache::ContentCache;
pub use softnav_dom::{
    urls_match, ActionState, DomError, DownloadPayload, Element, ElementPath, IgnoreFilter,
    LiveDocument, Modifiers, MouseButton, NodeId, PageEvent, ScriptTag, SharedUrl,
};
pub use softnav_handlers::{
    Handler, HandlerKind, LoadContext, TransitionError, TransitionFn, TransitionScope,
};
pub use softnav_net::{
    disposition_filename, FetchRequest, FetchResponse, HttpTransport, Method, NetError,
    RequestBody, Transport, TransportConfig,
};
pub use softnav_page::{reset_scroll, Page};

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
