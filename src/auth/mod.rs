use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::{self, SecurityConfig};

pub mod provider;

/// Name of the session cookie set after any successful sign-in.
pub const SESSION_COOKIE: &str = "ra_session";

/// Claims carried by the session token. `sub` is the provider-side user id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub email: String,
    pub exp: i64,
    pub iat: i64,
}

impl Claims {
    pub fn new(user_id: Uuid, email: String) -> Self {
        let now = Utc::now();
        let days = config::config().security.session_cookie_days;
        Self {
            sub: user_id,
            email,
            exp: (now + Duration::days(days)).timestamp(),
            iat: now.timestamp(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("session secret not configured")]
    MissingSecret,
    #[error("session token generation failed: {0}")]
    TokenGeneration(String),
    #[error("invalid session token")]
    InvalidToken,
}

pub fn generate_session_token(claims: &Claims) -> Result<String, SessionError> {
    let secret = &config::config().security.session_secret;
    if secret.is_empty() {
        return Err(SessionError::MissingSecret);
    }

    encode(&Header::default(), claims, &EncodingKey::from_secret(secret.as_bytes()))
        .map_err(|e| SessionError::TokenGeneration(e.to_string()))
}

pub fn validate_session_token(token: &str) -> Result<Claims, SessionError> {
    let secret = &config::config().security.session_secret;
    if secret.is_empty() {
        return Err(SessionError::MissingSecret);
    }

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| SessionError::InvalidToken)
}

/// Build the `Set-Cookie` value for a fresh session. The cookie contract is
/// fixed: 7-day expiry (configurable only through `SecurityConfig`),
/// `HttpOnly`, `SameSite=Lax`, `Secure` outside local development.
pub fn session_cookie_value(token: &str, security: &SecurityConfig) -> String {
    let max_age = security.session_cookie_days * 24 * 60 * 60;
    let mut cookie = format!(
        "{}={}; Path=/; Max-Age={}; HttpOnly; SameSite=Lax",
        SESSION_COOKIE, token, max_age
    );
    if security.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that clears the session.
pub fn clear_session_cookie_value(security: &SecurityConfig) -> String {
    let mut cookie = format!("{}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax", SESSION_COOKIE);
    if security.secure_cookies {
        cookie.push_str("; Secure");
    }
    cookie
}

/// Short stable digest of an email address for audit logs. Raw addresses
/// never appear in log output.
pub fn email_digest(email: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(email.trim().to_lowercase().as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    hash[..12].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;

    #[test]
    fn session_cookie_carries_the_contractual_attributes() {
        let dev = AppConfig::development().security;
        let cookie = session_cookie_value("tok", &dev);
        assert!(cookie.starts_with("ra_session=tok;"));
        assert!(cookie.contains("Max-Age=604800")); // 7 days
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(!cookie.contains("Secure"));
    }

    #[test]
    fn production_cookie_is_secure() {
        let prod = AppConfig::production().security;
        assert!(session_cookie_value("tok", &prod).ends_with("; Secure"));
        assert!(clear_session_cookie_value(&prod).contains("Max-Age=0"));
    }

    #[test]
    fn email_digest_is_stable_and_case_insensitive() {
        let a = email_digest("Admin@Example.com");
        let b = email_digest(" admin@example.com ");
        assert_eq!(a, b);
        assert_eq!(a.len(), 12);
        assert!(!a.contains('@'));
    }
}
