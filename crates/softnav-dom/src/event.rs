//! Raw page events forwarded by the embedding shell

use serde::{Deserialize, Serialize};
use url::Url;

use crate::element::{Element, ElementPath};

/// Modifier keys held when an action fired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse button reported for click events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    Other(u8),
}

/// A document event as captured by the shell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PageEvent {
    /// Pointer click anywhere in the document.
    Click {
        path: ElementPath,
        button: MouseButton,
        modifiers: Modifiers,
    },
    /// Form submission. `fields` is the form's entry list in document
    /// order; duplicate names are preserved.
    Submit {
        form: ElementPath,
        submitter: Option<Element>,
        fields: Vec<(String, String)>,
    },
    /// History traversal; `url` is the location after the pop.
    PopState {
        url: Url,
        state: Option<serde_json::Value>,
    },
}

impl PageEvent {
    pub fn is_submit(&self) -> bool {
        matches!(self, PageEvent::Submit { .. })
    }

    pub fn is_pop(&self) -> bool {
        matches!(self, PageEvent::PopState { .. })
    }

    /// Modifiers held, if the event kind carries them.
    pub fn modifiers(&self) -> Modifiers {
        match self {
            PageEvent::Click { modifiers, .. } => *modifiers,
            _ => Modifiers::default(),
        }
    }

    pub fn button(&self) -> Option<MouseButton> {
        match self {
            PageEvent::Click { button, .. } => Some(*button),
            _ => None,
        }
    }

    /// The snapshot path the event travelled, when it has one.
    pub fn path(&self) -> Option<&ElementPath> {
        match self {
            PageEvent::Click { path, .. } => Some(path),
            PageEvent::Submit { form, .. } => Some(form),
            PageEvent::PopState { .. } => None,
        }
    }
}
