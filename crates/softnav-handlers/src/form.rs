//! Form submission loading

use softnav_dom::{ActionState, PageEvent};
use softnav_net::{FetchRequest, Method, RequestBody};
use softnav_page::Page;

use crate::error::TransitionError;
use crate::scope::LoadContext;

/// Submit the form over the transport and parse the response.
///
/// GET submissions replace the action URL's query with the serialized
/// entry list; every other method carries the entries as a multipart
/// body against the unmodified action URL. A named submitter control
/// contributes its own entry after the form's. Form responses never
/// pass through the content cache.
pub(crate) async fn load(state: &ActionState, ctx: &LoadContext) -> crate::Result<Page> {
    let PageEvent::Submit { form, fields, .. } = state.event() else {
        return Err(TransitionError::app("form transition without a submit event"));
    };

    let method = state
        .submitter()
        .and_then(|el| el.attr_non_empty("formmethod"))
        .or_else(|| form.closest("form").and_then(|f| f.attr_non_empty("method")))
        .map(Method::parse)
        .unwrap_or(Method::Get);

    let mut entries = fields.clone();
    if let Some(submitter) = state.submitter() {
        if let Some(name) = submitter.attr_non_empty("name") {
            let value = submitter.attr("value").unwrap_or_default();
            entries.push((name.to_string(), value.to_string()));
        }
    }

    let request = if method.is_get() {
        let mut url = state.url().clone();
        if entries.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(&entries);
        }
        FetchRequest::get(url).with_headers(&ctx.request_headers)
    } else {
        FetchRequest {
            url: state.url().clone(),
            method,
            headers: ctx.request_headers.clone(),
            body: Some(RequestBody::Multipart(entries)),
        }
    };

    tracing::debug!(url = %request.url, method = %request.method, "submitting form");
    let response = ctx.transport.fetch(request).await?;
    if !response.is_success() {
        return Err(TransitionError::Status {
            status: response.status,
            url: response.url.clone(),
        });
    }

    let html = response.text()?.to_string();
    Ok(Page::new(response.url.clone(), response.status, Some(html)))
}
