//! The fetched-page type and its transition operations

use scraper::{Html, Selector};
use serde_json::Value;
use softnav_dom::{DomError, LiveDocument, NodeId};
use url::Url;

use crate::assets::{parse_selector, script_plan, style_plan};
use crate::scroll;

/// A fetched page: final URL after redirects, HTTP status, and the raw
/// markup when the response produced one (downloads do not).
///
/// The parsed view is derived per operation and never stored, so a `Page`
/// crosses await points freely.
#[derive(Debug, Clone)]
pub struct Page {
    url: Url,
    status: u16,
    body: Option<String>,
    title: String,
}

impl Page {
    pub fn new(url: Url, status: u16, body: Option<String>) -> Self {
        let title = body.as_deref().map(extract_title).unwrap_or_default();
        Self {
            url,
            status,
            body,
            title,
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Text of the fetched `<title>`, empty when absent.
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn body(&self) -> Option<&str> {
        self.body.as_deref()
    }

    fn parsed(&self) -> Result<Html, DomError> {
        self.body
            .as_deref()
            .map(Html::parse_document)
            .ok_or(DomError::MissingContent)
    }

    /// Serialized outer HTML of the first fetched element matching
    /// `selector`.
    fn fragment(&self, selector: &str) -> Result<String, DomError> {
        let doc = self.parsed()?;
        let parsed = parse_selector(selector)?;
        let element = doc
            .select(&parsed)
            .next()
            .ok_or_else(|| DomError::NoMatch(selector.to_string()))?;
        Ok(element.html())
    }

    /// Serialized children of the first fetched element matching
    /// `selector`.
    fn children(&self, selector: &str) -> Result<String, DomError> {
        let doc = self.parsed()?;
        let parsed = parse_selector(selector)?;
        let element = doc
            .select(&parsed)
            .next()
            .ok_or_else(|| DomError::NoMatch(selector.to_string()))?;
        Ok(element.inner_html())
    }

    /// Replace the live element matching `selector` with the fetched one,
    /// returning the id of the inserted node.
    pub fn replace_content(&self, dom: &dyn LiveDocument, selector: &str) -> Result<NodeId, DomError> {
        let html = self.fragment(selector)?;
        let node = dom.replace_element(selector, &html)?;
        tracing::debug!(selector, node = %node, "content replaced");
        Ok(node)
    }

    /// Append the fetched element's children into the live element
    /// matching `selector`, returning the inserted node ids.
    pub fn append_content(&self, dom: &dyn LiveDocument, selector: &str) -> Result<Vec<NodeId>, DomError> {
        let html = self.children(selector)?;
        let nodes = dom.append_children(selector, &html)?;
        tracing::debug!(selector, count = nodes.len(), "content appended");
        Ok(nodes)
    }

    /// Remove live elements matching `selector`. The fetched side is not
    /// consulted.
    pub fn remove_content(&self, dom: &dyn LiveDocument, selector: &str) -> Result<(), DomError> {
        dom.remove_elements(selector)
    }

    /// Reconcile stylesheet links and inline styles inside `context`.
    /// Newly appended links resolve when the host reports them loaded.
    pub async fn replace_styles(&self, dom: &dyn LiveDocument, context: &str) -> Result<(), DomError> {
        let plan = {
            let doc = self.parsed()?;
            style_plan(&doc, context, &self.url, &dom.stylesheet_links(context))?
        };

        for href in &plan.remove {
            dom.remove_stylesheet(context, href);
        }
        dom.replace_inline_styles(context, &plan.inline);

        let appends = plan.add.iter().map(|href| dom.append_stylesheet(context, href));
        futures_util::future::try_join_all(appends).await?;

        tracing::debug!(
            context,
            removed = plan.remove.len(),
            added = plan.add.len(),
            "styles reconciled"
        );
        Ok(())
    }

    /// Reconcile scripts inside `context`. Live inline scripts are
    /// removed; fetched-only scripts are appended in document order.
    pub async fn replace_scripts(&self, dom: &dyn LiveDocument, context: &str) -> Result<(), DomError> {
        let plan = {
            let doc = self.parsed()?;
            script_plan(&doc, context, &self.url, &dom.script_srcs(context))?
        };

        for src in &plan.remove {
            dom.remove_script(context, src);
        }
        dom.remove_inline_scripts(context);

        let appends = plan.add.iter().map(|tag| dom.append_script(context, tag));
        futures_util::future::try_join_all(appends).await?;

        tracing::debug!(
            context,
            removed = plan.remove.len(),
            added = plan.add.len(),
            "scripts reconciled"
        );
        Ok(())
    }

    /// Push a history entry when the page URL differs from the live
    /// location, else replace the current entry. The title is set either
    /// way.
    pub fn update_state(&self, dom: &dyn LiveDocument, state: Option<Value>) {
        if self.url != dom.location() {
            dom.push_history(&self.url, &self.title, state.as_ref());
        } else {
            dom.replace_history(&self.url, &self.title, state.as_ref());
        }
        dom.set_title(&self.title);
    }

    /// Scroll to the page URL's fragment anchor, or reset to the top.
    pub async fn reset_scroll(&self, dom: &dyn LiveDocument) {
        scroll::reset_scroll(dom, &self.url).await;
    }
}

fn extract_title(html: &str) -> String {
    let doc = Html::parse_document(html);
    let Ok(selector) = Selector::parse("title") else {
        return String::new();
    };
    doc.select(&selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use softnav_test_support::{FakeDom, Mutation};

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn page(body: &str) -> Page {
        Page::new(url("https://x/page"), 200, Some(body.to_string()))
    }

    #[test]
    fn title_is_extracted_and_trimmed() {
        let page = page("<html><head><title> Hello </title></head><body></body></html>");
        assert_eq!(page.title(), "Hello");

        let untitled = page_without_title();
        assert_eq!(untitled.title(), "");
    }

    fn page_without_title() -> Page {
        Page::new(url("https://x/d"), 200, Some("<html><body></body></html>".to_string()))
    }

    #[test]
    fn body_less_page_rejects_content_operations() {
        let download = Page::new(url("https://x/file"), 200, None);
        let dom = FakeDom::new(url("https://x/page"));
        let err = download.replace_content(&dom, "main").unwrap_err();
        assert!(matches!(err, DomError::MissingContent));
    }

    #[test]
    fn replace_content_sends_fetched_fragment() {
        let page = page(r#"<html><body><main id="m">fresh</main></body></html>"#);
        let dom = FakeDom::new(url("https://x/page"));
        dom.add_selector("main");

        let node = page.replace_content(&dom, "main").unwrap();
        let journal = dom.journal();
        match &journal[0] {
            Mutation::Replace { selector, html } => {
                assert_eq!(selector, "main");
                assert!(html.contains("fresh"));
            }
            other => panic!("unexpected mutation: {other:?}"),
        }
        assert_eq!(node, dom.last_inserted());
    }

    #[test]
    fn replace_content_requires_fetched_match() {
        let page = page("<html><body><div>no main here</div></body></html>");
        let dom = FakeDom::new(url("https://x/page"));
        dom.add_selector("main");
        let err = page.replace_content(&dom, "main").unwrap_err();
        assert!(matches!(err, DomError::NoMatch(_)));
    }

    #[test]
    fn append_content_moves_children_only() {
        let page = page("<html><body><ul><li>a</li><li>b</li></ul></body></html>");
        let dom = FakeDom::new(url("https://x/page"));
        dom.add_selector("ul");

        page.append_content(&dom, "ul").unwrap();
        match &dom.journal()[0] {
            Mutation::Append { selector, html } => {
                assert_eq!(selector, "ul");
                assert!(html.contains("<li>a</li>"));
                assert!(!html.contains("<ul>"));
            }
            other => panic!("unexpected mutation: {other:?}"),
        }
    }

    #[tokio::test]
    async fn replace_styles_applies_the_plan() {
        let page = page(
            r#"<html><head>
                <link rel="stylesheet" href="/shared.css">
                <link rel="stylesheet" href="/new.css">
                <style>h1 { color: red }</style>
               </head><body></body></html>"#,
        );
        let dom = FakeDom::new(url("https://x/page"));
        dom.set_stylesheets("head", &["https://x/shared.css", "https://x/old.css"]);

        page.replace_styles(&dom, "head").await.unwrap();

        let journal = dom.journal();
        assert!(journal.contains(&Mutation::RemoveStylesheet {
            context: "head".to_string(),
            href: "https://x/old.css".to_string(),
        }));
        assert!(journal.contains(&Mutation::AppendStylesheet {
            context: "head".to_string(),
            href: "https://x/new.css".to_string(),
        }));
        assert!(journal.contains(&Mutation::ReplaceInlineStyles {
            context: "head".to_string(),
            blocks: vec!["h1 { color: red }".to_string()],
        }));
        // The shared stylesheet is neither removed nor re-appended.
        assert!(!journal.contains(&Mutation::RemoveStylesheet {
            context: "head".to_string(),
            href: "https://x/shared.css".to_string(),
        }));
    }

    #[tokio::test]
    async fn failed_stylesheet_load_surfaces() {
        let page = page(
            r#"<html><head><link rel="stylesheet" href="/broken.css"></head><body></body></html>"#,
        );
        let dom = FakeDom::new(url("https://x/page"));
        dom.fail_asset_loads(true);

        let err = page.replace_styles(&dom, "head").await.unwrap_err();
        assert!(matches!(err, DomError::AssetFailed(_)));
    }

    #[tokio::test]
    async fn replace_scripts_drops_live_inline_scripts() {
        let page = page(r#"<html><body><script src="/app.js"></script></body></html>"#);
        let dom = FakeDom::new(url("https://x/page"));
        dom.set_scripts("body", &["https://x/app.js"]);

        page.replace_scripts(&dom, "body").await.unwrap();

        let journal = dom.journal();
        assert!(journal.contains(&Mutation::RemoveInlineScripts {
            context: "body".to_string(),
        }));
        // The matching external script is left alone.
        assert!(!journal.iter().any(|m| matches!(m, Mutation::RemoveScript { .. })));
        assert!(!journal.iter().any(|m| matches!(m, Mutation::AppendScript { .. })));
    }

    #[test]
    fn update_state_pushes_on_new_url_and_replaces_on_same() {
        let fresh = Page::new(
            url("https://x/next"),
            200,
            Some("<html><head><title>Next</title></head><body></body></html>".to_string()),
        );
        let dom = FakeDom::new(url("https://x/page"));
        fresh.update_state(&dom, None);
        assert!(matches!(dom.journal()[0], Mutation::PushHistory { .. }));
        assert_eq!(dom.location(), url("https://x/next"));
        assert_eq!(dom.title(), "Next");

        let same = Page::new(url("https://x/next"), 200, Some("<html></html>".to_string()));
        same.update_state(&dom, None);
        assert!(dom
            .journal()
            .iter()
            .any(|m| matches!(m, Mutation::ReplaceHistory { .. })));
    }

    #[tokio::test]
    async fn reset_scroll_prefers_the_fragment_anchor() {
        let anchored = Page::new(
            url("https://x/page#section"),
            200,
            Some("<html></html>".to_string()),
        );
        let dom = FakeDom::new(url("https://x/page"));
        dom.add_anchor("section");

        anchored.reset_scroll(&dom).await;
        assert_eq!(dom.journal(), vec![Mutation::ScrollToAnchor("section".to_string())]);
    }

    #[tokio::test]
    async fn reset_scroll_falls_back_to_top_with_behavior_dance() {
        let page = page("<html></html>");
        let dom = FakeDom::new(url("https://x/page"));
        dom.set_scroll_behavior(Some("smooth"));
        dom.clear_journal();

        page.reset_scroll(&dom).await;

        assert_eq!(
            dom.journal(),
            vec![
                Mutation::SetScrollBehavior(Some("auto".to_string())),
                Mutation::ScrollToTop,
                Mutation::SetScrollBehavior(Some("smooth".to_string())),
            ]
        );
    }
}
