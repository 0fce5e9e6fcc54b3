//! Softnav network boundary
//!
//! One trait, [`Transport`], carries every request the engine makes. The
//! default implementation wraps reqwest; tests substitute canned
//! responses. Success policy (which statuses a caller accepts, what may
//! be cached) stays with the caller; the transport only moves bytes and
//! headers.

mod error;
mod request;
mod response;
mod transport;

pub use error::NetError;
pub use request::{FetchRequest, Method, RequestBody};
pub use response::{disposition_filename, FetchResponse};
pub use transport::{HttpTransport, Transport, TransportConfig};

pub type Result<T> = std::result::Result<T, NetError>;
