//! Orchestrator configuration

use serde::{Deserialize, Serialize};
use softnav_net::TransportConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NavigatorConfig {
    /// Extra headers sent with every engine-issued request.
    pub request_headers: Vec<(String, String)>,
    /// Upper bound on cached pages. `None` keeps every cacheable page
    /// for the engine's lifetime.
    pub cache_limit: Option<usize>,
    /// Tuning for the default HTTP transport.
    pub transport: TransportConfig,
}
