//! Softnav DOM vocabulary
//!
//! The engine never owns a live DOM. The embedding shell snapshots the
//! elements on an event path, forwards the raw event, and receives typed
//! instructions back through the [`LiveDocument`] trait. This crate holds
//! that shared vocabulary:
//! - element snapshots and ancestor paths ([`Element`], [`ElementPath`])
//! - raw page events ([`PageEvent`])
//! - the normalized per-action state ([`ActionState`])
//! - the live-document surface ([`LiveDocument`])

mod action;
mod element;
mod error;
mod event;
mod live;

pub use action::{urls_match, ActionState, IgnoreFilter, SharedUrl};
pub use element::{Element, ElementPath, NodeId};
pub use error::DomError;
pub use event::{Modifiers, MouseButton, PageEvent};
pub use live::{DownloadPayload, LiveDocument, ScriptTag};

pub type Result<T> = std::result::Result<T, DomError>;
