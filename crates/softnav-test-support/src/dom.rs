//! Journal-recording fake of the live document

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::Value;
use softnav_dom::{DomError, DownloadPayload, LiveDocument, NodeId, ScriptTag};
use url::Url;

/// One recorded host call, in the order the engine issued it.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    Replace { selector: String, html: String },
    Append { selector: String, html: String },
    RemoveAll { selector: String },
    RemoveStylesheet { context: String, href: String },
    AppendStylesheet { context: String, href: String },
    ReplaceInlineStyles { context: String, blocks: Vec<String> },
    RemoveScript { context: String, src: String },
    RemoveInlineScripts { context: String },
    AppendScript { context: String, script: ScriptTag },
    SetTitle(String),
    PushHistory { url: Url, title: String, state: Option<Value> },
    ReplaceHistory { url: Url, title: String, state: Option<Value> },
    ScrollToAnchor(String),
    SetScrollBehavior(Option<String>),
    ScrollToTop,
    Navigate(Url),
    Reload,
    SubmitForm(NodeId),
    SaveDownload {
        file_name: String,
        content_type: Option<String>,
        size: usize,
        sha256: String,
    },
}

struct State {
    location: Url,
    title: String,
    selectors: HashSet<String>,
    anchors: HashSet<String>,
    stylesheets: HashMap<String, Vec<String>>,
    scripts: HashMap<String, Vec<String>>,
    scroll_behavior: Option<String>,
    fail_assets: bool,
    journal: Vec<Mutation>,
    next_node: u64,
    last_node: u64,
}

/// In-memory [`LiveDocument`]. Selector presence, anchors, and asset
/// lists are declared up front by the test; every engine call lands in
/// the journal.
pub struct FakeDom {
    state: Mutex<State>,
}

impl FakeDom {
    pub fn new(location: Url) -> Self {
        Self {
            state: Mutex::new(State {
                location,
                title: String::new(),
                selectors: HashSet::new(),
                anchors: HashSet::new(),
                stylesheets: HashMap::new(),
                scripts: HashMap::new(),
                scroll_behavior: None,
                fail_assets: false,
                journal: Vec::new(),
                next_node: 100,
                last_node: 100,
            }),
        }
    }

    /// Mark a selector as present in the live document.
    pub fn add_selector(&self, selector: &str) {
        self.state.lock().selectors.insert(selector.to_string());
    }

    /// Mark an element id as an existing scroll anchor.
    pub fn add_anchor(&self, id: &str) {
        self.state.lock().anchors.insert(id.to_string());
    }

    pub fn set_stylesheets(&self, context: &str, hrefs: &[&str]) {
        self.state.lock().stylesheets.insert(
            context.to_string(),
            hrefs.iter().map(|h| h.to_string()).collect(),
        );
    }

    pub fn set_scripts(&self, context: &str, srcs: &[&str]) {
        self.state.lock().scripts.insert(
            context.to_string(),
            srcs.iter().map(|s| s.to_string()).collect(),
        );
    }

    /// Make subsequent stylesheet and script appends fail their load.
    pub fn fail_asset_loads(&self, fail: bool) {
        self.state.lock().fail_assets = fail;
    }

    /// Point the fake at a different location, as a host would after its
    /// own navigation.
    pub fn set_location(&self, url: Url) {
        self.state.lock().location = url;
    }

    pub fn journal(&self) -> Vec<Mutation> {
        self.state.lock().journal.clone()
    }

    pub fn clear_journal(&self) {
        self.state.lock().journal.clear();
    }

    /// Count of journal entries matching `pred`.
    pub fn count(&self, pred: impl Fn(&Mutation) -> bool) -> usize {
        self.state.lock().journal.iter().filter(|m| pred(m)).count()
    }

    pub fn title(&self) -> String {
        self.state.lock().title.clone()
    }

    /// Id assigned by the most recent insertion.
    pub fn last_inserted(&self) -> NodeId {
        NodeId(self.state.lock().last_node)
    }

    fn fresh_node(state: &mut State) -> NodeId {
        state.next_node += 1;
        state.last_node = state.next_node;
        NodeId(state.next_node)
    }
}

#[async_trait]
impl LiveDocument for FakeDom {
    fn location(&self) -> Url {
        self.state.lock().location.clone()
    }

    fn replace_element(&self, selector: &str, html: &str) -> Result<NodeId, DomError> {
        let mut state = self.state.lock();
        if !state.selectors.contains(selector) {
            return Err(DomError::NoMatch(selector.to_string()));
        }
        let node = Self::fresh_node(&mut state);
        state.journal.push(Mutation::Replace {
            selector: selector.to_string(),
            html: html.to_string(),
        });
        Ok(node)
    }

    fn append_children(&self, selector: &str, html: &str) -> Result<Vec<NodeId>, DomError> {
        let mut state = self.state.lock();
        if !state.selectors.contains(selector) {
            return Err(DomError::NoMatch(selector.to_string()));
        }
        let node = Self::fresh_node(&mut state);
        state.journal.push(Mutation::Append {
            selector: selector.to_string(),
            html: html.to_string(),
        });
        Ok(vec![node])
    }

    fn remove_elements(&self, selector: &str) -> Result<(), DomError> {
        let mut state = self.state.lock();
        if !state.selectors.contains(selector) {
            return Err(DomError::NoMatch(selector.to_string()));
        }
        state.journal.push(Mutation::RemoveAll {
            selector: selector.to_string(),
        });
        Ok(())
    }

    fn stylesheet_links(&self, context: &str) -> Vec<String> {
        self.state
            .lock()
            .stylesheets
            .get(context)
            .cloned()
            .unwrap_or_default()
    }

    fn remove_stylesheet(&self, context: &str, href: &str) {
        let mut state = self.state.lock();
        if let Some(links) = state.stylesheets.get_mut(context) {
            links.retain(|l| l != href);
        }
        state.journal.push(Mutation::RemoveStylesheet {
            context: context.to_string(),
            href: href.to_string(),
        });
    }

    async fn append_stylesheet(&self, context: &str, href: &str) -> Result<(), DomError> {
        let mut state = self.state.lock();
        if state.fail_assets {
            return Err(DomError::AssetFailed(href.to_string()));
        }
        state
            .stylesheets
            .entry(context.to_string())
            .or_default()
            .push(href.to_string());
        state.journal.push(Mutation::AppendStylesheet {
            context: context.to_string(),
            href: href.to_string(),
        });
        Ok(())
    }

    fn replace_inline_styles(&self, context: &str, blocks: &[String]) {
        self.state.lock().journal.push(Mutation::ReplaceInlineStyles {
            context: context.to_string(),
            blocks: blocks.to_vec(),
        });
    }

    fn script_srcs(&self, context: &str) -> Vec<String> {
        self.state
            .lock()
            .scripts
            .get(context)
            .cloned()
            .unwrap_or_default()
    }

    fn remove_script(&self, context: &str, src: &str) {
        let mut state = self.state.lock();
        if let Some(srcs) = state.scripts.get_mut(context) {
            srcs.retain(|s| s != src);
        }
        state.journal.push(Mutation::RemoveScript {
            context: context.to_string(),
            src: src.to_string(),
        });
    }

    fn remove_inline_scripts(&self, context: &str) {
        self.state.lock().journal.push(Mutation::RemoveInlineScripts {
            context: context.to_string(),
        });
    }

    async fn append_script(&self, context: &str, script: &ScriptTag) -> Result<(), DomError> {
        let mut state = self.state.lock();
        if state.fail_assets {
            let what = script.src.clone().unwrap_or_else(|| "inline script".to_string());
            return Err(DomError::AssetFailed(what));
        }
        if let Some(src) = &script.src {
            state
                .scripts
                .entry(context.to_string())
                .or_default()
                .push(src.clone());
        }
        state.journal.push(Mutation::AppendScript {
            context: context.to_string(),
            script: script.clone(),
        });
        Ok(())
    }

    fn set_title(&self, title: &str) {
        let mut state = self.state.lock();
        state.title = title.to_string();
        state.journal.push(Mutation::SetTitle(title.to_string()));
    }

    fn push_history(&self, url: &Url, title: &str, state_value: Option<&Value>) {
        let mut state = self.state.lock();
        state.location = url.clone();
        state.journal.push(Mutation::PushHistory {
            url: url.clone(),
            title: title.to_string(),
            state: state_value.cloned(),
        });
    }

    fn replace_history(&self, url: &Url, title: &str, state_value: Option<&Value>) {
        let mut state = self.state.lock();
        state.location = url.clone();
        state.journal.push(Mutation::ReplaceHistory {
            url: url.clone(),
            title: title.to_string(),
            state: state_value.cloned(),
        });
    }

    fn scroll_to_anchor(&self, fragment: &str) -> bool {
        let mut state = self.state.lock();
        if state.anchors.contains(fragment) {
            state
                .journal
                .push(Mutation::ScrollToAnchor(fragment.to_string()));
            true
        } else {
            false
        }
    }

    fn scroll_behavior(&self) -> Option<String> {
        self.state.lock().scroll_behavior.clone()
    }

    fn set_scroll_behavior(&self, value: Option<&str>) {
        let mut state = self.state.lock();
        state.scroll_behavior = value.map(str::to_string);
        state
            .journal
            .push(Mutation::SetScrollBehavior(value.map(str::to_string)));
    }

    fn scroll_to_top(&self) {
        self.state.lock().journal.push(Mutation::ScrollToTop);
    }

    fn navigate(&self, url: &Url) {
        self.state.lock().journal.push(Mutation::Navigate(url.clone()));
    }

    fn reload(&self) {
        self.state.lock().journal.push(Mutation::Reload);
    }

    fn submit_form(&self, form: NodeId) {
        self.state.lock().journal.push(Mutation::SubmitForm(form));
    }

    fn save_download(&self, download: &DownloadPayload) {
        self.state.lock().journal.push(Mutation::SaveDownload {
            file_name: download.file_name.clone(),
            content_type: download.content_type.clone(),
            size: download.bytes.len(),
            sha256: download.sha256.clone(),
        });
    }
}
