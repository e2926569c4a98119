use serde_json::json;

use spsync::types::Token;

#[test]
fn test_token_from_response_decodes_all_fields() {
    let body = json!({
        "access_token": "at-123",
        "refresh_token": "rt-456",
        "scope": "playlist-modify-public",
        "expires_in": 1800,
    });

    let token = Token::from_response(&body, None);

    assert_eq!(token.access_token, "at-123");
    assert_eq!(token.refresh_token, "rt-456");
    assert_eq!(token.scope, "playlist-modify-public");
    assert_eq!(token.expires_in, 1800);
    assert!(token.obtained_at > 0);
}

#[test]
fn test_token_from_response_keeps_fallback_refresh_token() {
    // Refresh responses commonly omit the refresh token; the previous one
    // must survive or the next refresh would fail.
    let body = json!({
        "access_token": "at-123",
        "scope": "",
        "expires_in": 3600,
    });

    let token = Token::from_response(&body, Some("rt-old"));

    assert_eq!(token.refresh_token, "rt-old");
}

#[test]
fn test_token_from_response_prefers_fresh_refresh_token() {
    let body = json!({
        "access_token": "at-123",
        "refresh_token": "rt-new",
    });

    let token = Token::from_response(&body, Some("rt-old"));

    assert_eq!(token.refresh_token, "rt-new");
}

#[test]
fn test_token_from_response_defaults() {
    let token = Token::from_response(&json!({}), None);

    assert_eq!(token.access_token, "");
    assert_eq!(token.refresh_token, "");
    assert_eq!(token.expires_in, 3600);
}
