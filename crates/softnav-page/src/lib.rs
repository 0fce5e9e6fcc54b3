//! Softnav fetched-page abstraction
//!
//! A [`Page`] wraps the markup a handler fetched, plus the final URL and
//! HTTP status. Its operations write the fetched content into the host's
//! live document: replacing or appending elements, reconciling
//! stylesheets and scripts by resolved-URL identity, updating the history
//! entry, and restoring the scroll position.

mod assets;
mod page;
mod scroll;

pub use page::Page;
pub use scroll::reset_scroll;
