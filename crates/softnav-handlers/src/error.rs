//! Transition error types

use thiserror::Error;
use url::Url;

#[derive(Error, Debug)]
pub enum TransitionError {
    #[error("Network error: {0}")]
    Net(#[from] softnav_net::NetError),

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: Url },

    #[error("Document error: {0}")]
    Dom(#[from] softnav_dom::DomError),

    #[error("{0}")]
    App(String),
}

impl TransitionError {
    /// Failure raised by application code inside a transition.
    pub fn app(message: impl Into<String>) -> Self {
        TransitionError::App(message.into())
    }
}
