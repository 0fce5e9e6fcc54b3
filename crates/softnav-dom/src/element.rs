//! Element snapshots captured by the host at event-dispatch time
//!
//! A snapshot carries the tag name, the attributes, and a host-assigned
//! node id the engine can hand back later (native form submit, inserted
//! node references). Attribute values are raw attribute text; URL-valued
//! attributes (`href`, `action`, `formaction`) are resolved against the
//! last-known document URL during capture, not here.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Host-assigned identifier for a node in the live document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Snapshot of a single element on an event path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Element {
    pub id: NodeId,
    tag: String,
    attrs: HashMap<String, String>,
}

impl Element {
    /// Tag names are stored lowercased; attribute lookups expect
    /// lowercase names.
    pub fn new(id: NodeId, tag: &str) -> Self {
        Self {
            id,
            tag: tag.to_ascii_lowercase(),
            attrs: HashMap::new(),
        }
    }

    /// Builder-style attribute, for hosts assembling snapshots.
    pub fn with_attr(mut self, name: &str, value: &str) -> Self {
        self.attrs
            .insert(name.to_ascii_lowercase(), value.to_string());
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.contains_key(name)
    }

    /// Attribute that is present and non-empty.
    pub fn attr_non_empty(&self, name: &str) -> Option<&str> {
        self.attr(name).filter(|v| !v.is_empty())
    }
}

/// An event target and its ancestors, innermost first.
///
/// The engine runs `closest`-style delegation over this snapshot instead
/// of walking the live tree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElementPath {
    elements: Vec<Element>,
}

impl ElementPath {
    pub fn new(elements: Vec<Element>) -> Self {
        Self { elements }
    }

    /// The element the event fired on.
    pub fn target(&self) -> Option<&Element> {
        self.elements.first()
    }

    /// Nearest element (target included) with the given tag.
    pub fn closest(&self, tag: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.is(tag))
    }

    /// Nearest element (target included) with the given tag that carries
    /// `attr`.
    pub fn closest_with_attr(&self, tag: &str, attr: &str) -> Option<&Element> {
        self.elements
            .iter()
            .find(|e| e.is(tag) && e.has_attr(attr))
    }

    /// True when the target or any ancestor satisfies `pred`.
    pub fn any(&self, pred: impl Fn(&Element) -> bool) -> bool {
        self.elements.iter().any(|e| pred(e))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
