//! Cache-aware page loading shared by link and pop transitions

use softnav_net::FetchRequest;
use softnav_page::Page;
use url::Url;

use crate::error::TransitionError;
use crate::scope::LoadContext;

/// GET the destination, serving from and feeding the content cache.
///
/// Entries are keyed by the request URL sans fragment, so a redirected
/// response is cached under the URL the action asked for while the page
/// itself reports the final response URL. Non-2xx responses are errors;
/// `Cache-Control: no-cache` and `no-store` keep a response out of the
/// cache without failing the load.
pub(crate) async fn load_page(url: &Url, ctx: &LoadContext) -> crate::Result<Page> {
    if let Some(html) = ctx.cache.get(url) {
        tracing::debug!(%url, "page served from cache");
        return Ok(Page::new(url.clone(), 200, Some(html)));
    }

    let request = FetchRequest::get(url.clone()).with_headers(&ctx.request_headers);
    let response = ctx.transport.fetch(request).await?;
    if !response.is_success() {
        return Err(TransitionError::Status {
            status: response.status,
            url: response.url.clone(),
        });
    }

    let html = response.text()?.to_string();
    if response.is_cacheable() {
        ctx.cache.insert(url, html.clone());
    }
    Ok(Page::new(response.url.clone(), response.status, Some(html)))
}
