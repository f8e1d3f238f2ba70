//! Resolution of the anti-forgery token sent with mutating requests.
//!
//! Sources are checked in a fixed order: the `csrftoken` cookie, the page's
//! `csrf-token` meta value, then the hidden `csrfmiddlewaretoken` form field.
//! Empty values are skipped.

use common::RedactedToken;

use url::form_urlencoded;

pub const CSRF_COOKIE_NAME: &str = "csrftoken";
pub const CSRF_HEADER_NAME: &str = "X-CSRFToken";

#[derive(Debug, Default)]
pub struct CsrfSources<'a> {
    /// Raw `Cookie` header value for the server origin.
    pub cookie_header: Option<&'a str>,
    pub meta_token: Option<&'a str>,
    pub form_token: Option<&'a str>,
}

pub fn resolve_csrf_token(sources: &CsrfSources<'_>) -> Option<RedactedToken> {
    sources
        .cookie_header
        .and_then(token_from_cookie_header)
        .or_else(|| non_empty(sources.meta_token))
        .or_else(|| non_empty(sources.form_token))
}

/// Extracts and percent-decodes the `csrftoken` value from a cookie header.
pub fn token_from_cookie_header(cookie_header: &str) -> Option<RedactedToken> {
    cookie_header
        .split(';')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .flat_map(|pair| form_urlencoded::parse(pair.as_bytes()).take(1))
        .find(|(name, _)| name == CSRF_COOKIE_NAME)
        .and_then(|(_, value)| non_empty(Some(value.as_ref())))
}

fn non_empty(value: Option<&str>) -> Option<RedactedToken> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(RedactedToken::new)
}
