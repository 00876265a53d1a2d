use anyhow::Context;
use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware::from_fn_with_state,
    response::{IntoResponse, Json},
    routing::{get, patch, post},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;

use crate::auth::JwtKeys;
use crate::config::{AppConfig, SecurityConfig, StorageBackend};
use crate::database::{BookmarkStore, DatabaseManager, MemoryStore, PgStore, UserStore};
use crate::error::ApiError;
use crate::middleware::{jwt_auth_middleware, validate_user_middleware};
use crate::services::{AuthService, BookmarkService, UserService};

/// Services shared by every request handler
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub users: UserService,
    pub bookmarks: BookmarkService,
    pub keys: JwtKeys,
}

impl AppState {
    pub fn new(user_store: Arc<dyn UserStore>, bookmark_store: Arc<dyn BookmarkStore>, keys: JwtKeys) -> Self {
        Self {
            auth: AuthService::new(user_store.clone(), keys.clone()),
            users: UserService::new(user_store),
            bookmarks: BookmarkService::new(bookmark_store),
            keys,
        }
    }

    /// State over a fresh in-memory store.
    pub fn in_memory(keys: JwtKeys) -> Self {
        let store = Arc::new(MemoryStore::new());
        Self::new(store.clone(), store, keys)
    }

    /// Build the configured backend, running migrations first when enabled.
    pub async fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let keys = JwtKeys::from_config(&config.security).context("invalid JWT configuration")?;

        match config.database.backend {
            StorageBackend::Memory => {
                info!("Using in-memory storage; data is lost on exit");
                Ok(Self::in_memory(keys))
            }
            StorageBackend::Postgres => {
                let pool = DatabaseManager::connect(&config.database)?;
                if config.database.run_migrations {
                    DatabaseManager::migrate(&pool).await?;
                }
                let store = Arc::new(PgStore::new(pool));
                Ok(Self::new(store.clone(), store, keys))
            }
        }
    }
}

/// The full HTTP surface with global middleware applied.
pub fn router(state: AppState, config: &AppConfig) -> Router {
    let mut app = Router::new()
        // Public
        .route("/", get(root))
        .route("/health", get(health))
        .merge(auth_public_routes())
        // Protected
        .merge(user_routes(&state))
        .merge(bookmark_routes(&state))
        .fallback(fallback)
        .layer(
            ServiceBuilder::new()
                // Checked by the body extractors, which reject through `ApiError`.
                .layer(DefaultBodyLimit::max(config.api.max_request_size_bytes))
                .layer(cors_layer(&config.security)),
        );

    if config.api.enable_request_logging {
        app = app.layer(TraceLayer::new_for_http());
    }

    app.with_state(state)
}

fn auth_public_routes() -> Router<AppState> {
    use crate::handlers::public::auth;

    Router::new()
        .route("/auth/signup", post(auth::signup_post))
        .route("/auth/signin", post(auth::signin_post))
}

fn user_routes(state: &AppState) -> Router<AppState> {
    use crate::handlers::protected::users;

    Router::new()
        .route("/users/me", get(users::me_get))
        .route("/users", patch(users::user_patch))
        .route_layer(from_fn_with_state(state.clone(), validate_user_middleware))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn bookmark_routes(state: &AppState) -> Router<AppState> {
    use crate::handlers::protected::bookmarks;

    Router::new()
        .route(
            "/bookmarks",
            get(bookmarks::bookmarks_get).post(bookmarks::bookmarks_post),
        )
        .route(
            "/bookmarks/:id",
            get(bookmarks::bookmark_get)
                .patch(bookmarks::bookmark_patch)
                .delete(bookmarks::bookmark_delete),
        )
        .route_layer(from_fn_with_state(state.clone(), validate_user_middleware))
        .route_layer(from_fn_with_state(state.clone(), jwt_auth_middleware))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    if security.cors_origins.iter().any(|origin| origin == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid CORS origin: {}", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

async fn root() -> Json<Value> {
    Json(json!({
        "name": "Bookmark API",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Multi-user bookmarking REST backend",
        "endpoints": {
            "auth": "/auth/signup, /auth/signin (public)",
            "users": "/users/me, /users (bearer token)",
            "bookmarks": "/bookmarks[/:id] (bearer token)",
            "health": "/health (public)",
        }
    }))
}

async fn fallback(uri: Uri) -> ApiError {
    ApiError::not_found(format!("No route for {}", uri.path()))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = chrono::Utc::now();

    match state.users.ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({
                "status": "ok",
                "timestamp": now,
                "database": "ok"
            })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "status": "degraded",
                    "timestamp": now,
                    "database": "unavailable"
                })),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::ServiceExt;

    fn test_router() -> Router {
        let config = AppConfig::for_tests();
        let keys = JwtKeys::from_config(&config.security).unwrap();
        router(AppState::in_memory(keys), &config)
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_describes_the_service() {
        let response = test_router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["name"], "Bookmark API");
    }

    #[tokio::test]
    async fn health_is_ok_on_memory_store() {
        let response = test_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["database"], "ok");
    }

    #[tokio::test]
    async fn protected_routes_need_a_token() {
        for (method, uri) in [("GET", "/bookmarks"), ("GET", "/users/me"), ("DELETE", "/bookmarks/1")] {
            let response = test_router()
                .oneshot(Request::builder().method(method).uri(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{method} {uri}");
            assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
        }
    }

    #[tokio::test]
    async fn unknown_route_gets_json_not_found() {
        let response = test_router()
            .oneshot(Request::get("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["message"], "No route for /nope");
    }

    #[tokio::test]
    async fn oversized_body_gets_json_payload_too_large() {
        let config = AppConfig::for_tests();
        let oversized = format!(
            r#"{{"email":"a@example.com","password":"{}"}}"#,
            "x".repeat(config.api.max_request_size_bytes)
        );

        let response = test_router()
            .oneshot(
                Request::post("/auth/signup")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(header::CONTENT_LENGTH, oversized.len())
                    .body(Body::from(oversized))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body_json(response).await["code"], "PAYLOAD_TOO_LARGE");
    }

    #[tokio::test]
    async fn token_for_a_vanished_user_is_rejected() {
        let config = AppConfig::for_tests();
        let keys = JwtKeys::from_config(&config.security).unwrap();
        let token = keys.issue(crate::types::UserId::new(42), "ghost@example.com").unwrap();
        let app = router(AppState::in_memory(keys), &config);

        let response = app
            .oneshot(
                Request::get("/bookmarks")
                    .header(header::AUTHORIZATION, format!("Bearer {token}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(body_json(response).await["message"], "User no longer exists");
    }
}
