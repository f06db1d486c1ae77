use axum::{
    extract::Request,
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::auth::{validate_session_token, Claims, SESSION_COOKIE};
use crate::error::ApiError;

/// Authenticated operator context extracted from the session cookie.
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: Uuid,
    pub email: String,
}

impl From<Claims> for AuthUser {
    fn from(claims: Claims) -> Self {
        Self { user_id: claims.sub, email: claims.email }
    }
}

/// Session middleware: validates the `ra_session` cookie and injects
/// `AuthUser` into request extensions. Protected routes 401 without it.
pub async fn session_auth_middleware(
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_session_cookie(&headers)
        .ok_or_else(|| ApiError::unauthorized("Missing session cookie"))?;

    let claims = validate_session_token(&token)?;

    request.extensions_mut().insert(AuthUser::from(claims));
    Ok(next.run(request).await)
}

/// Pull the session token out of the Cookie header.
fn extract_session_cookie(headers: &HeaderMap) -> Option<String> {
    let cookie_header = headers.get(header::COOKIE)?.to_str().ok()?;

    cookie_header.split(';').find_map(|pair| {
        let (name, value) = pair.trim().split_once('=')?;
        if name == SESSION_COOKIE && !value.is_empty() {
            Some(value.to_string())
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn finds_session_among_other_cookies() {
        let headers = headers_with_cookie("theme=dark; ra_session=abc123; lang=it");
        assert_eq!(extract_session_cookie(&headers).as_deref(), Some("abc123"));
    }

    #[test]
    fn empty_or_absent_cookie_yields_none() {
        assert_eq!(extract_session_cookie(&HeaderMap::new()), None);
        let headers = headers_with_cookie("ra_session=");
        assert_eq!(extract_session_cookie(&headers), None);
    }
}
