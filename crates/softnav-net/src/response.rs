//! Response metadata and cache-eligibility helpers

use url::Url;

use crate::error::NetError;

/// A settled response: final URL after redirects, status, the headers the
/// engine cares about, and the full body.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    pub url: Url,
    pub status: u16,
    pub content_type: Option<String>,
    pub cache_control: Option<String>,
    pub content_disposition: Option<String>,
    pub body: Vec<u8>,
}

impl FetchResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Cache-eligibility: a successful status and a `Cache-Control`
    /// header that does not carry `no-cache` or `no-store`.
    pub fn is_cacheable(&self) -> bool {
        if !self.is_success() {
            return false;
        }
        match &self.cache_control {
            Some(value) => {
                let value = value.to_ascii_lowercase();
                !value.contains("no-cache") && !value.contains("no-store")
            }
            None => true,
        }
    }

    /// Body interpreted as UTF-8 text.
    pub fn text(&self) -> Result<&str, NetError> {
        std::str::from_utf8(&self.body).map_err(NetError::from)
    }

    /// Filename suggested by `Content-Disposition`, quoted or token form.
    pub fn suggested_filename(&self) -> Option<String> {
        self.content_disposition
            .as_deref()
            .and_then(disposition_filename)
    }
}

/// Extract the `filename` parameter from a `Content-Disposition` value.
/// The extended `filename*=` form is deliberately not interpreted.
pub fn disposition_filename(value: &str) -> Option<String> {
    let lower = value.to_ascii_lowercase();
    let at = lower.find("filename=")?;
    let mut rest = &value[at + "filename=".len()..];
    rest = rest.strip_prefix('"').unwrap_or(rest);
    let end = rest
        .find(|c| c == '"' || c == ';')
        .unwrap_or(rest.len());
    let name = rest[..end].trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, cache_control: Option<&str>) -> FetchResponse {
        FetchResponse {
            url: Url::parse("https://x/page").unwrap(),
            status,
            content_type: Some("text/html".to_string()),
            cache_control: cache_control.map(str::to_string),
            content_disposition: None,
            body: b"<html></html>".to_vec(),
        }
    }

    #[test]
    fn success_range_is_2xx() {
        assert!(response(200, None).is_success());
        assert!(response(204, None).is_success());
        assert!(!response(301, None).is_success());
        assert!(!response(404, None).is_success());
        assert!(!response(500, None).is_success());
    }

    #[test]
    fn cacheable_requires_success_and_permissive_header() {
        assert!(response(200, None).is_cacheable());
        assert!(response(200, Some("max-age=600")).is_cacheable());
        assert!(!response(200, Some("no-cache")).is_cacheable());
        assert!(!response(200, Some("No-Cache, must-revalidate")).is_cacheable());
        assert!(!response(200, Some("no-store")).is_cacheable());
        assert!(!response(404, Some("max-age=600")).is_cacheable());
    }

    #[test]
    fn text_decodes_utf8() {
        let resp = response(200, None);
        assert_eq!(resp.text().unwrap(), "<html></html>");

        let mut bad = response(200, None);
        bad.body = vec![0xff, 0xfe];
        assert!(bad.text().is_err());
    }

    #[test]
    fn disposition_filename_quoted_and_token() {
        assert_eq!(
            disposition_filename(r#"attachment; filename="report final.pdf""#),
            Some("report final.pdf".to_string())
        );
        assert_eq!(
            disposition_filename("attachment; filename=report.pdf"),
            Some("report.pdf".to_string())
        );
        assert_eq!(
            disposition_filename("attachment; filename=report.pdf; size=3"),
            Some("report.pdf".to_string())
        );
        assert_eq!(disposition_filename("inline"), None);
        assert_eq!(disposition_filename(r#"attachment; filename="""#), None);
    }

    #[test]
    fn disposition_filename_ignores_extended_form() {
        assert_eq!(
            disposition_filename("attachment; filename*=UTF-8''na%C3%AFve.txt"),
            None
        );
    }
}
