//! Softnav transition handlers
//!
//! Typed handlers for the action families the engine intercepts:
//! - Plain link activations
//! - Form submissions
//! - Anchor downloads
//! - History traversal
//!
//! Each handler pairs local veto filters with an application-supplied
//! transition and a family-specific loader. A failed transition falls
//! back to the host's native navigation for the same action.

mod download;
mod error;
mod fallback;
mod form;
mod handler;
mod load;
mod scope;

pub use error::TransitionError;
pub use handler::{Handler, HandlerKind, TransitionFn};
pub use scope::{LoadContext, TransitionScope};

pub type Result<T> = std::result::Result<T, TransitionError>;
