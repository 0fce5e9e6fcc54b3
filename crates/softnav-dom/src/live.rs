//! The live-document surface the engine writes into
//!
//! Implemented by the embedding shell: a webview bridge, a native engine,
//! or a test double. The engine owns no DOM; every mutation, history
//! entry, scroll, and native navigation goes through this trait.

use async_trait::async_trait;
use url::Url;

use crate::element::NodeId;
use crate::error::DomError;

/// A script element lifted from fetched content, ready for insertion.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScriptTag {
    /// External source, resolved to an absolute URL.
    pub src: Option<String>,
    /// `type` attribute when present.
    pub kind: Option<String>,
    pub defer: bool,
    pub is_async: bool,
    /// Inline source text; empty for external scripts.
    pub source: String,
}

/// A completed download handed to the shell for delivery.
#[derive(Debug, Clone)]
pub struct DownloadPayload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
    /// SHA-256 of `bytes`, hex-encoded.
    pub sha256: String,
}

/// Host-owned live document.
///
/// Mutation methods report contract violations (missing selectors, failed
/// asset loads) as [`DomError`]; the engine funnels those into its
/// fallback path rather than retrying.
#[async_trait]
pub trait LiveDocument: Send + Sync {
    /// Absolute URL the document currently displays.
    fn location(&self) -> Url;

    /// Replace the element matching `selector` with `html`, returning the
    /// id of the inserted node.
    fn replace_element(&self, selector: &str, html: &str) -> Result<NodeId, DomError>;

    /// Append `html` as children of the element matching `selector`,
    /// returning the ids of the inserted nodes.
    fn append_children(&self, selector: &str, html: &str) -> Result<Vec<NodeId>, DomError>;

    /// Remove every element matching `selector`.
    fn remove_elements(&self, selector: &str) -> Result<(), DomError>;

    /// Resolved hrefs of stylesheet links inside `context`.
    fn stylesheet_links(&self, context: &str) -> Vec<String>;

    fn remove_stylesheet(&self, context: &str, href: &str);

    /// Append a stylesheet link, resolving once it has loaded.
    async fn append_stylesheet(&self, context: &str, href: &str) -> Result<(), DomError>;

    /// Replace all inline style blocks inside `context` with `blocks`.
    fn replace_inline_styles(&self, context: &str, blocks: &[String]);

    /// Resolved srcs of external scripts inside `context`.
    fn script_srcs(&self, context: &str) -> Vec<String>;

    fn remove_script(&self, context: &str, src: &str);

    fn remove_inline_scripts(&self, context: &str);

    /// Append a script. External sources resolve once loaded; inline
    /// sources have executed by the time this returns.
    async fn append_script(&self, context: &str, script: &ScriptTag) -> Result<(), DomError>;

    fn set_title(&self, title: &str);

    fn push_history(&self, url: &Url, title: &str, state: Option<&serde_json::Value>);

    fn replace_history(&self, url: &Url, title: &str, state: Option<&serde_json::Value>);

    /// Scroll the element with id `fragment` into view; false when no
    /// such element exists.
    fn scroll_to_anchor(&self, fragment: &str) -> bool;

    /// Current inline scroll-behavior value, if any.
    fn scroll_behavior(&self) -> Option<String>;

    fn set_scroll_behavior(&self, value: Option<&str>);

    fn scroll_to_top(&self);

    /// Full native navigation to `url`.
    fn navigate(&self, url: &Url);

    /// Full reload of the current location.
    fn reload(&self);

    /// Native submit of the form node `form`.
    fn submit_form(&self, form: NodeId);

    /// Deliver a completed download to the user.
    fn save_download(&self, download: &DownloadPayload);
}
