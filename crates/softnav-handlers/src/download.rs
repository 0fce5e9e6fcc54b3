//! Download loading: fetch the bytes and hand them to the host

use std::path::Path;

use sha2::{Digest, Sha256};
use softnav_dom::{ActionState, DownloadPayload, LiveDocument};
use softnav_net::FetchRequest;
use softnav_page::Page;
use url::Url;

use crate::error::TransitionError;
use crate::scope::LoadContext;

/// Fetch the destination and save it through the host instead of
/// swapping content. The returned page has no body; its URL is the one
/// the action asked for, so history stays on the current document.
///
/// File name preference order: `Content-Disposition`, the anchor's
/// `download` attribute, the last URL path segment.
pub(crate) async fn load(
    state: &ActionState,
    dom: &dyn LiveDocument,
    ctx: &LoadContext,
) -> crate::Result<Page> {
    let request = FetchRequest::get(state.url().clone()).with_headers(&ctx.request_headers);
    let response = ctx.transport.fetch(request).await?;
    if !response.is_success() {
        return Err(TransitionError::Status {
            status: response.status,
            url: response.url.clone(),
        });
    }

    let file_name = response
        .suggested_filename()
        .or_else(|| {
            state
                .submitter()
                .and_then(|el| el.attr_non_empty("download"))
                .map(str::to_string)
        })
        .unwrap_or_else(|| best_effort_file_name(state.url()));
    let file_name = sanitize_file_name(&file_name);

    let status = response.status;
    let payload = DownloadPayload {
        file_name,
        content_type: response.content_type.clone(),
        sha256: sha256_hex(&response.body),
        bytes: response.body,
    };
    tracing::info!(file = %payload.file_name, bytes = payload.bytes.len(), "saving download");
    dom.save_download(&payload);

    Ok(Page::new(state.url().clone(), status, None))
}

fn best_effort_file_name(url: &Url) -> String {
    url.path_segments()
        .and_then(|mut s| s.next_back())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| "download".to_string())
}

fn sanitize_file_name(file_name: &str) -> String {
    let name = Path::new(file_name)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("download")
        .trim();

    if name.is_empty() {
        "download".to_string()
    } else {
        name.to_string()
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
