pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod helpers;
pub mod middleware;
pub mod models;
pub mod openapi;
pub mod schema;
pub mod seeder;
pub mod services;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{HeaderValue, Method, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use diesel::{
    r2d2::{ConnectionManager, Pool},
    PgConnection,
};
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub use config::Config;

use crate::{
    auth::{password::PasswordPolicy, session::SessionKeys, strategies::StrategyRegistry},
    config::LogFormat,
    error::ApiError,
};

pub type DbPool = Pool<ConnectionManager<PgConnection>>;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DbPool,
    pub session_keys: Arc<SessionKeys>,
    pub strategies: Arc<StrategyRegistry>,
    pub password_policy: PasswordPolicy,
    pub password_hash_cost: u32,
}

impl AppState {
    pub fn new(db_pool: DbPool, session_keys: SessionKeys, config: &Config) -> Self {
        let password_policy = if config.security.require_password_complexity {
            PasswordPolicy::complex(config.security.min_password_length)
        } else {
            PasswordPolicy {
                min_length: config.security.min_password_length,
                ..PasswordPolicy::default()
            }
        };

        Self {
            db_pool,
            session_keys: Arc::new(session_keys),
            strategies: Arc::new(StrategyRegistry::new()),
            password_policy,
            password_hash_cost: config.security.password_hash_cost,
        }
    }
}

pub fn create_db_pool(config: &Config) -> DbPool {
    create_db_pool_with_url(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
        config.database.connection_timeout_secs,
        config.database.idle_timeout_secs,
    )
}

pub fn create_db_pool_with_url(
    url: &str,
    max_connections: u32,
    min_connections: u32,
    connection_timeout_secs: u64,
    idle_timeout_secs: u64,
) -> DbPool {
    let manager = ConnectionManager::<PgConnection>::new(url);
    Pool::builder()
        .max_size(max_connections)
        .min_idle(Some(min_connections))
        .connection_timeout(Duration::from_secs(connection_timeout_secs))
        .idle_timeout(Some(Duration::from_secs(idle_timeout_secs)))
        .build(manager)
        .expect("Failed to create database connection pool")
}

pub fn init_tracing(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().pretty())
                .init();
        }
    }
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    let methods: Vec<Method> = config
        .cors
        .allowed_methods
        .iter()
        .filter_map(|m| m.parse().ok())
        .collect();

    let mut layer = CorsLayer::new()
        .allow_methods(methods)
        .max_age(Duration::from_secs(config.cors.max_age_secs));

    if config.cors.allowed_origins.contains(&"*".to_string()) {
        // Wildcard origin cannot be combined with credentials.
        layer = layer.allow_origin(Any).allow_headers(Any);
    } else {
        let origins: Vec<HeaderValue> = config
            .cors
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        layer = layer
            .allow_origin(AllowOrigin::list(origins))
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request());
        if config.cors.allow_credentials {
            layer = layer.allow_credentials(true);
        }
    }

    layer
}

async fn fallback_handler() -> (StatusCode, Json<ApiError>) {
    (
        StatusCode::NOT_FOUND,
        Json(ApiError::new("Resource not found", "NOT_FOUND")),
    )
}

pub fn create_router(state: AppState, config: &Config) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route("/health/status", get(handlers::health::status))
        .route("/health/live", get(handlers::health::live))
        .route("/health/ready", get(handlers::health::ready))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/oauth/google", post(handlers::auth::google_auth));

    if !config.google.is_configured() && !config.server.environment.is_development() {
        warn!("Google OAuth credentials are not configured; /auth/oauth/google will still accept pre-verified profiles");
    }

    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::get_current_user))
        .route("/auth/logout", post(handlers::auth::logout))
        .route(
            "/workspaces/current",
            get(handlers::workspaces::get_current_workspace),
        )
        .route(
            "/workspaces/{workspace_id}/switch",
            put(handlers::workspaces::switch_workspace),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(openapi::swagger_ui())
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(RequestBodyLimitLayer::new(config.server.max_body_size))
        .layer(build_cors_layer(config))
        .with_state(state)
}
