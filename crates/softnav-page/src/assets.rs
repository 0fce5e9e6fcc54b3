//! Stylesheet and script reconciliation
//!
//! Both sides are compared by the identity of their resolved URL with the
//! fragment ignored: assets present on both sides stay untouched (no
//! re-fetch, no re-execution), live-only assets are removed, fetched-only
//! assets are appended. Matching consumes pairwise so duplicate
//! references reconcile one-to-one.

use scraper::{Html, Selector};
use softnav_dom::{urls_match, DomError, ScriptTag};
use url::Url;

#[derive(Debug)]
pub(crate) struct StylePlan {
    pub remove: Vec<String>,
    pub add: Vec<String>,
    pub inline: Vec<String>,
}

pub(crate) struct ScriptPlan {
    pub remove: Vec<String>,
    pub add: Vec<ScriptTag>,
}

pub(crate) fn parse_selector(input: &str) -> Result<Selector, DomError> {
    Selector::parse(input).map_err(|e| DomError::InvalidSelector(format!("{input}: {e}")))
}

pub(crate) fn style_plan(
    doc: &Html,
    context: &str,
    page_url: &Url,
    live_hrefs: &[String],
) -> Result<StylePlan, DomError> {
    let context_selector = parse_selector(context)?;
    let scope = doc
        .select(&context_selector)
        .next()
        .ok_or_else(|| DomError::NoMatch(context.to_string()))?;

    let link_selector = parse_selector(r#"link[rel="stylesheet"]"#)?;
    let fetched: Vec<Url> = scope
        .select(&link_selector)
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| page_url.join(href).ok())
        .collect();

    let style_selector = parse_selector("style")?;
    let inline: Vec<String> = scope
        .select(&style_selector)
        .map(|style| style.inner_html())
        .collect();

    let (remove, add) = diff_by_identity(live_hrefs, fetched);
    Ok(StylePlan {
        remove,
        add: add.into_iter().map(|url| url.to_string()).collect(),
        inline,
    })
}

pub(crate) fn script_plan(
    doc: &Html,
    context: &str,
    page_url: &Url,
    live_srcs: &[String],
) -> Result<ScriptPlan, DomError> {
    let context_selector = parse_selector(context)?;
    let scope = doc
        .select(&context_selector)
        .next()
        .ok_or_else(|| DomError::NoMatch(context.to_string()))?;

    let script_selector = parse_selector("script")?;
    // Fetched scripts in document order; only external ones take part in
    // the identity matching.
    let fetched: Vec<(Option<Url>, ScriptTag)> = scope
        .select(&script_selector)
        .map(|el| {
            let value = el.value();
            let raw_src = value.attr("src");
            let resolved = raw_src.and_then(|src| page_url.join(src).ok());
            let tag = ScriptTag {
                src: resolved.as_ref().map(|url| url.to_string()),
                kind: value.attr("type").map(str::to_string),
                defer: value.attr("defer").is_some(),
                is_async: value.attr("async").is_some(),
                source: if raw_src.is_none() {
                    el.inner_html()
                } else {
                    String::new()
                },
            };
            (resolved, tag)
        })
        .collect();

    let mut consumed = vec![false; fetched.len()];
    let mut remove = Vec::new();
    for src in live_srcs {
        let live_url = match Url::parse(src) {
            Ok(url) => url,
            Err(_) => {
                remove.push(src.clone());
                continue;
            }
        };
        let matched = fetched.iter().enumerate().find_map(|(index, (resolved, _))| {
            let hit = !consumed[index]
                && resolved.as_ref().is_some_and(|new| urls_match(new, &live_url));
            hit.then_some(index)
        });
        match matched {
            Some(index) => consumed[index] = true,
            None => remove.push(src.clone()),
        }
    }

    let add = fetched
        .into_iter()
        .zip(consumed)
        .filter(|(_, was_consumed)| !*was_consumed)
        .map(|((_, tag), _)| tag)
        .collect();

    Ok(ScriptPlan { remove, add })
}

/// Pairwise identity diff. Live URLs with no fetched counterpart are
/// removals; fetched URLs not consumed by a live match are additions.
fn diff_by_identity(live: &[String], fetched: Vec<Url>) -> (Vec<String>, Vec<Url>) {
    let mut slots: Vec<Option<Url>> = fetched.into_iter().map(Some).collect();
    let mut remove = Vec::new();

    for href in live {
        let live_url = Url::parse(href).ok();
        let matched = live_url.as_ref().and_then(|live| {
            slots
                .iter()
                .position(|slot| slot.as_ref().is_some_and(|new| urls_match(new, live)))
        });
        match matched {
            Some(index) => slots[index] = None,
            None => remove.push(href.clone()),
        }
    }

    (remove, slots.into_iter().flatten().collect())
}
