//! Document error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DomError {
    #[error("No element matches selector: {0}")]
    NoMatch(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("Asset failed to load: {0}")]
    AssetFailed(String),

    #[error("Page has no parsed content")]
    MissingContent,
}
