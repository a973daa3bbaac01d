use url::Url;

/// Status codes whose payload is a representation of the target resource
/// when the request method is GET or HEAD (RFC 7231 §3.1.4.1).
const REPRESENTATION_STATUSES: [u16; 5] = [200, 203, 204, 206, 304];

/// Request and response facts used to derive the default link context.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseFacts<'a> {
    /// The effective request URI.
    pub request_url: Option<&'a Url>,
    /// The request method, compared case-insensitively.
    pub request_method: Option<&'a str>,
    /// The response status code.
    pub status: Option<u16>,
    /// The raw `Content-Location` header value.
    pub content_location: Option<&'a str>,
    /// The raw `Content-Language` header value. Not consulted yet; kept so
    /// callers can pass the full response description.
    pub content_language: Option<&'a str>,
}

impl ResponseFacts<'_> {
    /// The default context for links in this response.
    pub fn default_context(&self) -> Option<Url> {
        default_context(
            self.request_url,
            self.request_method,
            self.status,
            self.content_location,
        )
    }
}

/// Compute the default link context (the URI of the representation a
/// response carries).
///
/// A successful GET or HEAD describes the request URI itself. Otherwise the
/// `Content-Location` header identifies the representation, resolved against
/// the request URI when it is relative. `Content-Location` is trusted as
/// stated.
pub fn default_context(
    request_url: Option<&Url>,
    request_method: Option<&str>,
    status: Option<u16>,
    content_location: Option<&str>,
) -> Option<Url> {
    let describes_target = request_method
        .is_some_and(|m| m.eq_ignore_ascii_case("GET") || m.eq_ignore_ascii_case("HEAD"))
        && status.is_some_and(|s| REPRESENTATION_STATUSES.contains(&s));

    if describes_target {
        return request_url.cloned();
    }

    let location = content_location?.trim();
    Url::options().base_url(request_url).parse(location).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn get_success_uses_request_url() {
        let request = url("https://example.com/a");
        for status in REPRESENTATION_STATUSES {
            let context = default_context(
                Some(&request),
                Some("get"),
                Some(status),
                Some("https://example.com/other"),
            );
            assert_eq!(context, Some(request.clone()), "status {status}");
        }
    }

    #[test]
    fn head_success_uses_request_url() {
        let request = url("https://example.com/a");
        let context = default_context(Some(&request), Some("HEAD"), Some(304), None);
        assert_eq!(context, Some(request));
    }

    #[test]
    fn get_success_without_request_url_has_no_context() {
        let context = default_context(None, Some("GET"), Some(200), Some("https://x.example/"));
        assert_eq!(context, None);
    }

    #[test]
    fn post_falls_back_to_content_location() {
        let request = url("https://example.com/a");
        let context = default_context(
            Some(&request),
            Some("POST"),
            Some(200),
            Some("https://example.com/created/1"),
        );
        assert_eq!(context, Some(url("https://example.com/created/1")));
    }

    #[test]
    fn other_status_falls_back_to_content_location() {
        let request = url("https://example.com/a");
        let context = default_context(Some(&request), Some("GET"), Some(404), Some("/missing"));
        assert_eq!(context, Some(url("https://example.com/missing")));
    }

    #[test]
    fn relative_content_location_needs_request_url() {
        let context = default_context(None, Some("POST"), Some(201), Some("/created/1"));
        assert_eq!(context, None);
    }

    #[test]
    fn missing_content_location_has_no_context() {
        let request = url("https://example.com/a");
        assert_eq!(default_context(Some(&request), Some("PUT"), Some(200), None), None);
        assert_eq!(default_context(Some(&request), None, None, None), None);
    }

    #[test]
    fn response_facts_delegate() {
        let request = url("https://example.com/a");
        let facts = ResponseFacts {
            request_url: Some(&request),
            request_method: Some("GET"),
            status: Some(206),
            content_language: Some("de"),
            ..ResponseFacts::default()
        };
        assert_eq!(facts.default_context(), Some(request.clone()));
    }
}
