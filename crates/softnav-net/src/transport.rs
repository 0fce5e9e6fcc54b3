//! Transport trait and the reqwest-backed implementation

use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::redirect::Policy;
use serde::{Deserialize, Serialize};

use crate::error::NetError;
use crate::request::{FetchRequest, RequestBody};
use crate::response::FetchResponse;
use crate::Result;

/// Fetch capability the engine requires from its host environment.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse>;
}

/// Transport tuning. `timeout` is absent by default: a slow request stays
/// in flight until it settles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransportConfig {
    pub user_agent: String,
    pub timeout: Option<Duration>,
    pub redirect_limit: usize,
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            user_agent: format!("softnav/{}", env!("CARGO_PKG_VERSION")),
            timeout: None,
            redirect_limit: 5,
        }
    }
}

/// reqwest-backed transport used by real deployments.
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_config(&TransportConfig::default())
    }

    pub fn with_config(config: &TransportConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder()
            .redirect(Policy::limited(config.redirect_limit))
            .user_agent(&config.user_agent);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an already-configured client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse> {
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .map_err(|e| NetError::Network(e.to_string()))?;
        let mut builder = self.client.request(method, request.url.clone());
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(RequestBody::Multipart(fields)) = request.body {
            let mut form = reqwest::multipart::Form::new();
            for (name, value) in fields {
                form = form.text(name, value);
            }
            builder = builder.multipart(form);
        }

        let response = builder.send().await?;
        let url = response.url().clone();
        let status = response.status().as_u16();
        let content_type = header_string(&response, reqwest::header::CONTENT_TYPE);
        let cache_control = header_string(&response, reqwest::header::CACHE_CONTROL);
        let content_disposition = header_string(&response, reqwest::header::CONTENT_DISPOSITION);

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            body.extend_from_slice(&chunk?);
        }
        tracing::debug!(url = %url, status, bytes = body.len(), "fetch complete");

        Ok(FetchResponse {
            url,
            status,
            content_type,
            cache_control,
            content_disposition,
            body,
        })
    }
}

fn header_string(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
