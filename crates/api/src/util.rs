use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header::AUTHORIZATION, request::Parts, HeaderMap};
use storefront_auth::User;

use crate::{ApiError, AppState};

const TOKEN_SCHEMES: [&str; 2] = ["Bearer", "Token"];

/// Pulls the token out of an `Authorization: Bearer <token>` or
/// `Authorization: Token <token>` header. The scheme is case-insensitive.
pub fn require_token(headers: &HeaderMap) -> Result<String, ApiError> {
    let value = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("authentication credentials were not provided"))?;

    let mut parts = value.split_whitespace();
    let scheme = parts.next().unwrap_or("");
    if !TOKEN_SCHEMES
        .iter()
        .any(|known| scheme.eq_ignore_ascii_case(known))
    {
        return Err(ApiError::unauthorized("invalid authorization scheme"));
    }

    let token = parts.next().unwrap_or("");
    if token.is_empty() {
        return Err(ApiError::unauthorized("missing token"));
    }
    if parts.next().is_some() {
        return Err(ApiError::unauthorized("token string should not contain spaces"));
    }

    Ok(token.to_string())
}

/// The authenticated caller. Extracted before any request body, so a missing
/// or bad token always answers 401.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, ApiError> {
        let token = require_token(&parts.headers)?;
        let (user, _) = state.authenticate(&token).await?;
        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, StatusCode};

    #[test]
    fn require_token_extracts_bearer_case_insensitive() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("bearer TOKEN123"));

        let token = require_token(&headers).expect("token should be extracted");
        assert_eq!(token, "TOKEN123");
    }

    #[test]
    fn require_token_accepts_token_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Token abc"));

        assert_eq!(require_token(&headers).unwrap(), "abc");
    }

    #[test]
    fn require_token_rejects_missing_token() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer"));

        let error = require_token(&headers).expect_err("should reject missing token");
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
        assert!(error.message.contains("missing token"));
    }

    #[test]
    fn require_token_rejects_unknown_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic dXNlcjpwYXNz"));

        let error = require_token(&headers).expect_err("basic auth is not supported");
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn require_token_rejects_missing_header() {
        let error = require_token(&HeaderMap::new()).expect_err("no header");
        assert_eq!(error.status, StatusCode::UNAUTHORIZED);
    }
}
