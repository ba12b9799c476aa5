use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use uuid::Uuid;

use crate::auth;
use crate::error::ApiError;
use crate::state::AppState;

/// Header carrying the signed credential on protected routes.
pub const AUTH_HEADER: &str = "x-auth-token";

/// Authenticated caller extracted from the request token. Handlers that take
/// an `AuthUser` argument reject the request with 401 before any handler
/// logic runs when the credential is missing or invalid.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub id: Uuid,
}

#[axum::async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_token(&parts.headers)
            .ok_or_else(|| ApiError::unauthorized("No token, authorization denied"))?;

        let claims = auth::decode_token(token, &state.config.security.jwt_secret)
            .map_err(|_| ApiError::unauthorized("Token is not valid"))?;

        Ok(AuthUser { id: claims.user_id })
    }
}

fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(AUTH_HEADER)?.to_str().ok()?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn reads_the_fixed_header() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, HeaderValue::from_static("abc.def.ghi"));
        assert_eq!(extract_token(&headers), Some("abc.def.ghi"));
    }

    #[test]
    fn missing_or_blank_header_yields_none() {
        assert_eq!(extract_token(&HeaderMap::new()), None);

        let mut headers = HeaderMap::new();
        headers.insert(AUTH_HEADER, HeaderValue::from_static("   "));
        assert_eq!(extract_token(&headers), None);
    }
}
