//! Softnav content cache
//!
//! Fragment-stripped URL → raw fetched markup. The cache is pure
//! mechanism: callers decide cacheability (status, `Cache-Control`)
//! before inserting, and the cache validates nothing. Unbounded by
//! default; [`ContentCache::bounded`] adds insertion-order eviction for
//! deployments that need a ceiling.

mod store;

pub use store::ContentCache;
