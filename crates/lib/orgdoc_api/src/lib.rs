//! # orgdoc_api
//!
//! HTTP API library for Orgdoc.

pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod services;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};

use orgdoc_core::auth::reset::ResetTokens;
use orgdoc_core::auth::tokens::TokenService;

use crate::config::ApiConfig;
use crate::handlers::{auth, departments, divisions, documents, roles, units, users};
use crate::services::email::{LogMailer, ResetMailer};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool.
    pub pool: PgPool,
    /// API configuration.
    pub config: ApiConfig,
    /// Access and refresh token issuing and verification.
    pub tokens: TokenService,
    /// Password reset token minting and hashing.
    pub reset_tokens: ResetTokens,
    /// Delivery channel for password reset tokens.
    pub mailer: Arc<dyn ResetMailer>,
}

impl AppState {
    /// Builds application state from configuration, wiring the token
    /// services from the configured secrets and lifetimes.
    pub fn new(pool: PgPool, config: ApiConfig) -> Self {
        let tokens = TokenService::with_lifetimes(
            config.jwt_secret.as_bytes(),
            chrono::Duration::seconds(config.access_token_ttl_secs),
            chrono::Duration::seconds(config.refresh_token_ttl_secs),
        );
        let reset_tokens = ResetTokens::new(config.reset_secret.as_bytes());
        Self {
            pool,
            config,
            tokens,
            reset_tokens,
            mailer: Arc::new(LogMailer),
        }
    }

    /// Swap the reset mailer for a real delivery channel.
    pub fn with_mailer(mut self, mailer: Arc<dyn ResetMailer>) -> Self {
        self.mailer = mailer;
        self
    }
}

/// Run embedded database migrations.
///
/// Delegates to `orgdoc_core::migrate::migrate()` which owns the migration files.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    orgdoc_core::migrate::migrate(pool).await
}

/// Builds the Axum router with all routes and shared state.
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public routes (no auth required)
    let public = Router::new()
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/refresh", post(auth::refresh_handler))
        .route("/api/auth/logout", post(auth::logout_handler))
        .route("/api/auth/reset-password", post(auth::request_reset_handler))
        .route(
            "/api/auth/reset-password/confirm",
            post(auth::confirm_reset_handler),
        );

    // Protected routes (require a valid access token)
    let protected = Router::new()
        .route("/api/auth/me", get(auth::me_handler))
        .route(
            "/api/auth/change-password",
            post(auth::change_password_handler),
        )
        .route(
            "/api/users",
            get(users::list_users_handler).post(users::create_user_handler),
        )
        .route(
            "/api/users/{id}",
            get(users::get_user_handler)
                .put(users::update_user_handler)
                .delete(users::delete_user_handler),
        )
        .route(
            "/api/roles",
            get(roles::list_roles_handler).post(roles::create_role_handler),
        )
        .route(
            "/api/roles/{id}",
            get(roles::get_role_handler)
                .put(roles::update_role_handler)
                .delete(roles::delete_role_handler),
        )
        .route(
            "/api/departments",
            get(departments::list_departments_handler).post(departments::create_department_handler),
        )
        .route(
            "/api/departments/{id}",
            get(departments::get_department_handler)
                .put(departments::update_department_handler)
                .delete(departments::delete_department_handler),
        )
        .route(
            "/api/divisions",
            get(divisions::list_divisions_handler).post(divisions::create_division_handler),
        )
        .route(
            "/api/divisions/{id}",
            get(divisions::get_division_handler)
                .put(divisions::update_division_handler)
                .delete(divisions::delete_division_handler),
        )
        .route(
            "/api/units",
            get(units::list_units_handler).post(units::create_unit_handler),
        )
        .route(
            "/api/units/{id}",
            get(units::get_unit_handler)
                .put(units::update_unit_handler)
                .delete(units::delete_unit_handler),
        )
        .route(
            "/api/documents",
            get(documents::list_documents_handler).post(documents::create_document_handler),
        )
        .route(
            "/api/documents/search",
            get(documents::search_documents_handler),
        )
        .route(
            "/api/documents/{id}",
            get(documents::get_document_handler).delete(documents::delete_document_handler),
        )
        .route(
            "/api/documents/{id}/versions",
            get(documents::list_versions_handler).post(documents::add_version_handler),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::require_auth,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(cors)
        .with_state(state)
}
