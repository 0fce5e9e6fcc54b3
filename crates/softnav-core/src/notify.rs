//! Lifecycle notifications published around a transition

use softnav_dom::ActionState;
use softnav_handlers::TransitionError;

/// Observer verdict for cancellable notifications. A `Cancel` on a
/// non-cancellable notification is ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signal {
    Continue,
    Cancel,
}

/// Moments observers see during one dispatch.
pub enum Notification<'a> {
    /// An eligible action entered dispatch; no filter has run yet.
    /// Cancellable: the action stays native.
    BeforeFilter { state: &'a ActionState },
    /// A handler claimed the action and its transition is about to run.
    /// Cancellable: the action stays native.
    BeforeLoad { state: &'a ActionState },
    /// The transition finished.
    Loaded { state: &'a ActionState },
    /// The transition failed; native fallback follows.
    Error {
        error: &'a TransitionError,
        state: &'a ActionState,
    },
}

impl Notification<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Notification::BeforeFilter { .. } => "beforefilter",
            Notification::BeforeLoad { .. } => "beforeload",
            Notification::Loaded { .. } => "loaded",
            Notification::Error { .. } => "error",
        }
    }

    /// The action the notification is about.
    pub fn state(&self) -> &ActionState {
        match self {
            Notification::BeforeFilter { state }
            | Notification::BeforeLoad { state }
            | Notification::Loaded { state }
            | Notification::Error { state, .. } => state,
        }
    }
}

pub type Observer = Box<dyn Fn(&Notification<'_>) -> Signal + Send + Sync>;

/// Run every observer; any `Cancel` wins, but all of them see the
/// notification.
pub(crate) fn publish(observers: &[Observer], notification: &Notification<'_>) -> Signal {
    let mut verdict = Signal::Continue;
    for observer in observers {
        if observer(notification) == Signal::Cancel {
            verdict = Signal::Cancel;
        }
    }
    verdict
}
