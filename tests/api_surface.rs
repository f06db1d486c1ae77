use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use reviews_admin_api::auth::provider::{AuthProvider, AuthProviderError, AuthenticatedUser};
use reviews_admin_api::routes::app;

/// Provider stub that rejects everything, so no test depends on the hosted
/// auth service or a database.
struct RejectingProvider;

#[async_trait]
impl AuthProvider for RejectingProvider {
    async fn sign_in_with_password(
        &self,
        _email: &str,
        _password: &str,
    ) -> Result<AuthenticatedUser, AuthProviderError> {
        Err(AuthProviderError::InvalidCredentials)
    }

    async fn send_magic_link(&self, _email: &str) -> Result<(), AuthProviderError> {
        Ok(())
    }

    async fn verify_magic_link(
        &self,
        _token: &str,
    ) -> Result<AuthenticatedUser, AuthProviderError> {
        Err(AuthProviderError::InvalidToken)
    }
}

fn test_app() -> axum::Router {
    app(Arc::new(RejectingProvider))
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn root_describes_the_service() {
    let response = test_app()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert!(body["data"]["endpoints"]["sectors"].is_string());
}

#[tokio::test]
async fn protected_routes_require_a_session_cookie() {
    for uri in ["/api/sectors", "/api/platforms", "/api/profile"] {
        let response = test_app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "uri: {}", uri);
        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }
}

#[tokio::test]
async fn garbage_session_cookie_is_rejected() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/api/sectors")
                .header(header::COOKIE, "ra_session=not-a-jwt")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn rejected_credentials_surface_as_401() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"email":"admin@example.com","password":"wrong"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_requires_email_and_password() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"email":"  ","password":""}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn expired_magic_link_token_is_unauthorized() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .uri("/auth/callback?token=stale")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn logout_clears_the_session_cookie() {
    let response = test_app()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri("/auth/session")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("ra_session="));
    assert!(cookie.contains("Max-Age=0"));
}
