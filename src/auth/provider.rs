use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use url::Url;
use uuid::Uuid;

use crate::auth::email_digest;
use crate::config::AuthProviderConfig;

/// A user as confirmed by the external authentication service.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub email: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthProviderError {
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("invalid or expired token")]
    InvalidToken,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("provider returned {status}: {message}")]
    Provider { status: u16, message: String },
    #[error("provider not configured: {0}")]
    Misconfigured(String),
}

impl From<reqwest::Error> for AuthProviderError {
    fn from(err: reqwest::Error) -> Self {
        AuthProviderError::Transport(err.to_string())
    }
}

/// Boundary to the authentication-as-a-service backend. Sign-in flows resolve
/// to an `AuthenticatedUser`; session persistence on our side is separate
/// (see `crate::auth`).
#[async_trait]
pub trait AuthProvider: Send + Sync {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthProviderError>;

    /// Ask the provider to email a one-time sign-in link. Resolves to unit:
    /// the provider does not reveal whether the address exists.
    async fn send_magic_link(&self, email: &str) -> Result<(), AuthProviderError>;

    /// Exchange a one-time link token for the user it belongs to.
    async fn verify_magic_link(&self, token: &str) -> Result<AuthenticatedUser, AuthProviderError>;
}

/// JSON-over-HTTP implementation speaking to the hosted provider.
pub struct HttpAuthProvider {
    http: reqwest::Client,
    base_url: Url,
    api_key: String,
    magic_link_redirect: String,
}

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct MagicLinkRequest<'a> {
    email: &'a str,
    redirect_to: &'a str,
}

#[derive(Serialize)]
struct VerifyRequest<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    token: &'a str,
}

#[derive(Deserialize)]
struct SessionResponse {
    user: AuthenticatedUser,
}

impl HttpAuthProvider {
    pub fn from_config(config: &AuthProviderConfig) -> Result<Self, AuthProviderError> {
        if config.base_url.is_empty() {
            return Err(AuthProviderError::Misconfigured("AUTH_PROVIDER_URL is not set".into()));
        }
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| AuthProviderError::Misconfigured(format!("invalid base url: {}", e)))?;

        Ok(Self {
            http: reqwest::Client::new(),
            base_url,
            api_key: config.api_key.clone(),
            magic_link_redirect: config.magic_link_redirect.clone(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, AuthProviderError> {
        self.base_url
            .join(path)
            .map_err(|e| AuthProviderError::Misconfigured(format!("invalid endpoint {}: {}", path, e)))
    }

    async fn post_json<B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<reqwest::Response, AuthProviderError> {
        let url = self.endpoint(path)?;
        let res = self
            .http
            .post(url)
            .header("apikey", &self.api_key)
            .json(body)
            .send()
            .await?;
        Ok(res)
    }

    async fn provider_error(res: reqwest::Response) -> AuthProviderError {
        let status = res.status().as_u16();
        let message = res.text().await.unwrap_or_default();
        AuthProviderError::Provider { status, message }
    }
}

#[async_trait]
impl AuthProvider for HttpAuthProvider {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthenticatedUser, AuthProviderError> {
        let res = self
            .post_json("/token?grant_type=password", &PasswordGrant { email, password })
            .await?;

        match res.status() {
            StatusCode::OK => {
                let session: SessionResponse = res.json().await?;
                tracing::info!(user = %email_digest(email), "password sign-in ok");
                Ok(session.user)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::UNPROCESSABLE_ENTITY => {
                tracing::info!(user = %email_digest(email), "password sign-in rejected");
                Err(AuthProviderError::InvalidCredentials)
            }
            _ => Err(Self::provider_error(res).await),
        }
    }

    async fn send_magic_link(&self, email: &str) -> Result<(), AuthProviderError> {
        let res = self
            .post_json(
                "/magiclink",
                &MagicLinkRequest { email, redirect_to: &self.magic_link_redirect },
            )
            .await?;

        if res.status().is_success() {
            tracing::info!(user = %email_digest(email), "magic link requested");
            Ok(())
        } else {
            Err(Self::provider_error(res).await)
        }
    }

    async fn verify_magic_link(&self, token: &str) -> Result<AuthenticatedUser, AuthProviderError> {
        let res = self
            .post_json("/verify", &VerifyRequest { kind: "magiclink", token })
            .await?;

        match res.status() {
            StatusCode::OK => {
                let session: SessionResponse = res.json().await?;
                tracing::info!(user = %email_digest(&session.user.email), "magic link verified");
                Ok(session.user)
            }
            StatusCode::BAD_REQUEST | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::GONE => {
                Err(AuthProviderError::InvalidToken)
            }
            _ => Err(Self::provider_error(res).await),
        }
    }
}
