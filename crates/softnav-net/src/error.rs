//! Network error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NetError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Response body is not UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}
