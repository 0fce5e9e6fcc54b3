//! Softnav test support
//!
//! In-memory stand-ins for the host seams: [`FakeDom`] records every
//! instruction the engine issues as a [`Mutation`] journal, and
//! [`FakeTransport`] serves canned responses while logging requests.
//! Both are shared across the workspace's unit and integration tests.

mod dom;
mod transport;

pub use dom::{FakeDom, Mutation};
pub use transport::FakeTransport;
