use std::sync::Arc;

use axum::routing::get;
use axum::{middleware, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::provider::AuthProvider;
use crate::handlers;
use crate::middleware::auth::session_auth_middleware;

/// Full application router. The auth provider is injected so tests can swap
/// in a stub without the hosted service.
pub fn app(provider: Arc<dyn AuthProvider>) -> Router {
    Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes(provider))
        // Protected API
        .merge(api_routes())
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

fn auth_public_routes(provider: Arc<dyn AuthProvider>) -> Router {
    use axum::routing::{delete, post};
    use handlers::public::auth;

    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/magic-link", post(auth::magic_link_request))
        .route("/auth/callback", get(auth::magic_link_callback))
        .route("/auth/session", delete(auth::logout))
        .with_state(provider)
}

fn api_routes() -> Router {
    use handlers::protected::{platforms, profile, sectors};

    Router::new()
        .route("/api/sectors", get(sectors::list).post(sectors::create))
        .route("/api/sectors/:id", get(sectors::get).put(sectors::update))
        .route("/api/platforms", get(platforms::list))
        .route("/api/profile", get(profile::get).put(profile::update))
        .route_layer(middleware::from_fn(session_auth_middleware))
}

async fn root() -> axum::response::Json<Value> {
    let version = env!("CARGO_PKG_VERSION");

    axum::response::Json(json!({
        "success": true,
        "data": {
            "name": "Reviews Admin API",
            "version": version,
            "description": "Sector and profile administration for the reviews platform",
            "endpoints": {
                "home": "/ (public)",
                "auth": "/auth/login, /auth/magic-link, /auth/callback, /auth/session (public)",
                "sectors": "/api/sectors[/:id] (protected)",
                "platforms": "/api/platforms (protected)",
                "profile": "/api/profile (protected)",
            }
        }
    }))
}

async fn health() -> impl axum::response::IntoResponse {
    let now = chrono::Utc::now();

    match crate::database::manager::DatabaseManager::health_check().await {
        Ok(_) => (
            axum::http::StatusCode::OK,
            axum::response::Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => (
            axum::http::StatusCode::SERVICE_UNAVAILABLE,
            axum::response::Json(json!({
                "success": false,
                "error": "database unavailable",
                "data": {
                    "status": "degraded",
                    "timestamp": now,
                    "database_error": e.to_string()
                }
            })),
        ),
    }
}
