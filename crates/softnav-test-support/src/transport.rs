//! Scripted transport with request capture

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;
use softnav_net::{FetchRequest, FetchResponse, NetError, Transport};

/// Transport whose responses are scripted per exact URL. Every request
/// is captured for later assertions.
#[derive(Default)]
pub struct FakeTransport {
    routes: Mutex<HashMap<String, Result<FetchResponse, String>>>,
    requests: Mutex<Vec<FetchRequest>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a full response for the given URL.
    pub fn route(&self, url: &str, response: FetchResponse) {
        self.routes.lock().insert(url.to_string(), Ok(response));
    }

    /// Script a plain 200 text/html response for the given URL.
    pub fn route_html(&self, url: &str, html: &str) {
        let response = FetchResponse {
            url: url::Url::parse(url).unwrap(),
            status: 200,
            content_type: Some("text/html".to_string()),
            cache_control: None,
            content_disposition: None,
            body: html.as_bytes().to_vec(),
        };
        self.route(url, response);
    }

    /// Script a network failure for the given URL.
    pub fn route_error(&self, url: &str, message: &str) {
        self.routes
            .lock()
            .insert(url.to_string(), Err(message.to_string()));
    }

    pub fn requests(&self) -> Vec<FetchRequest> {
        self.requests.lock().clone()
    }

    /// Number of requests seen for the given URL.
    pub fn hits(&self, url: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.url.as_str() == url)
            .count()
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, NetError> {
        let key = request.url.to_string();
        self.requests.lock().push(request);
        match self.routes.lock().get(&key) {
            Some(Ok(response)) => Ok(response.clone()),
            Some(Err(message)) => Err(NetError::Network(message.clone())),
            None => Err(NetError::Network(format!("no route for {key}"))),
        }
    }
}
