// Unit tests for CSRF token resolution

use crate::api_client::csrf::{CsrfSources, resolve_csrf_token, token_from_cookie_header};

/// **VALUE**: Verifies the cookie wins when every source has a token.
///
/// **WHY THIS MATTERS**: The server rotates the cookie; the meta tag and form field
/// are rendered once per page load and can be stale.
///
/// **BUG THIS CATCHES**: Would catch a reordering of the fallback chain.
#[test]
fn given_all_sources_when_resolved_then_cookie_takes_precedence() {
    // GIVEN
    let sources = CsrfSources {
        cookie_header: Some("sessionid=abc; csrftoken=from-cookie"),
        meta_token: Some("from-meta"),
        form_token: Some("from-form"),
    };

    // WHEN
    let token = resolve_csrf_token(&sources);

    // THEN
    assert_eq!(token.as_ref().map(|t| t.as_str()), Some("from-cookie"));
}

/// **VALUE**: Verifies meta is consulted before the form field.
///
/// **BUG THIS CATCHES**: Would catch the form field shadowing the meta value.
#[test]
fn given_no_cookie_when_resolved_then_meta_precedes_form() {
    let sources = CsrfSources {
        cookie_header: Some("sessionid=abc"),
        meta_token: Some("from-meta"),
        form_token: Some("from-form"),
    };

    let token = resolve_csrf_token(&sources);

    assert_eq!(token.as_ref().map(|t| t.as_str()), Some("from-meta"));
}

/// **VALUE**: Verifies empty values are skipped rather than sent.
///
/// **WHY THIS MATTERS**: An empty `X-CSRFToken` header is rejected by the server
/// after the request already left; it must fall through to the next source.
///
/// **BUG THIS CATCHES**: Would catch `Some("")` being treated as a resolved token.
#[test]
fn given_empty_cookie_and_meta_when_resolved_then_falls_through_to_form() {
    let sources = CsrfSources {
        cookie_header: Some("csrftoken=; other=1"),
        meta_token: Some("   "),
        form_token: Some("from-form"),
    };

    let token = resolve_csrf_token(&sources);

    assert_eq!(token.as_ref().map(|t| t.as_str()), Some("from-form"));
}

#[test]
fn given_no_sources_when_resolved_then_none() {
    assert!(resolve_csrf_token(&CsrfSources::default()).is_none());
}

/// **VALUE**: Verifies cookie values are percent-decoded.
///
/// **BUG THIS CATCHES**: Would catch the raw encoded value being sent as the header.
#[test]
fn given_encoded_cookie_value_when_parsed_then_value_is_decoded() {
    let token = token_from_cookie_header("a=1;  csrftoken=abc%3D%3D ; b=2");

    assert_eq!(token.as_ref().map(|t| t.as_str()), Some("abc=="));
}

/// **BUG THIS CATCHES**: Would catch prefix matching (`csrftoken_old`) being
/// mistaken for the token cookie.
#[test]
fn given_similarly_named_cookie_when_parsed_then_ignored() {
    assert!(token_from_cookie_header("csrftoken_old=stale; xcsrftoken=nope").is_none());
}
