//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all page handlers
//! - Wire up middleware (tracing, limits, request ID, security)
//! - Construct the shared upstream clients
//! - Bind server to listener, plain or TLS
//! - Serve with graceful shutdown

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{middleware, Router};
use axum_server::tls_rustls::RustlsConfig;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::{
    compression::CompressionLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::http::error::AppError;
use crate::http::request::RequestIdLayer;
use crate::security::csrf::{csrf_middleware, CsrfState};
use crate::security::headers::{headers_middleware, HeaderState};
use crate::security::rate_limit::{rate_limit_middleware, RateLimiterState};
use crate::upstream::{client, AuthApi, PointApi, ThingApi, UserApi};
use crate::web::{assets, auth, home, points, templates, things, users};

/// Errors raised while assembling or running the server.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("upstream URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("bind address: {0}")]
    Addr(#[from] std::net::AddrParseError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub points: PointApi,
    pub things: ThingApi,
    pub users: UserApi,
    pub auth: AuthApi,
}

/// HTTP server for the map frontend.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: AppConfig) -> Result<Self, ServerError> {
        let client = client::build_client(config.upstream.timeout_secs)?;
        let upstream = &config.upstream;

        let state = AppState {
            points: PointApi::new(client.clone(), &upstream.point_api_url)?,
            things: ThingApi::new(
                client.clone(),
                &upstream.thing_api_url,
                &upstream.thing_api_version,
            )?,
            users: UserApi::new(
                client.clone(),
                &upstream.thing_api_url,
                &upstream.thing_api_version,
            )?,
            auth: AuthApi::new(client, &upstream.thing_api_url, &upstream.thing_api_version)?,
            config: Arc::new(config.clone()),
        };

        let router = Self::build_router(&config, state);
        Ok(Self { router, config })
    }

    /// Build the Axum router with all routes and middleware layers.
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        let rate_limiter = Arc::new(RateLimiterState::new(&config.rate_limit));
        let header_state = Arc::new(HeaderState::from_config(&config.security));
        let csrf_state = Arc::new(CsrfState {
            secret: config.security.secret_key.clone(),
            cookie_secure: config.security.cookie_secure,
            enabled: config.security.csrf_enabled,
            max_body_bytes: config.listener.max_body_bytes,
        });

        Router::new()
            .route("/", get(home::index))
            .route("/cookies", get(home::cookies_page).post(home::cookies_submit))
            .route("/auth/login", get(auth::login_form).post(auth::login))
            .route("/points", get(points::list))
            .route("/points/new", get(points::new_form).post(points::create))
            .route("/points/download", get(points::download))
            .route("/points/{id}", get(points::view))
            .route("/points/{id}/edit", get(points::edit_form).post(points::edit))
            .route(
                "/points/{id}/delete",
                get(points::delete_form).post(points::delete),
            )
            .route("/things", get(things::list))
            .route("/things/new", get(things::new_form).post(things::create))
            .route("/things/download", get(things::download))
            .route("/things/{id}", get(things::view))
            .route("/things/{id}/edit", get(things::edit_form).post(things::edit))
            .route(
                "/things/{id}/delete",
                get(things::delete_form).post(things::delete),
            )
            .route("/users", get(users::list))
            .route("/users/new", get(users::new_form).post(users::create))
            .route("/users/download", get(users::download))
            .route("/users/{id}", get(users::view))
            .route("/users/{id}/edit", get(users::edit_form).post(users::edit))
            .route(
                "/users/{id}/delete",
                get(users::delete_form).post(users::delete),
            )
            .route("/healthz", get(healthz))
            .route("/static/style.css", get(assets::stylesheet))
            .fallback(not_found)
            .method_not_allowed_fallback(method_not_allowed)
            .with_state(state)
            .layer(middleware::from_fn_with_state(csrf_state, csrf_middleware))
            .layer(middleware::from_fn_with_state(
                rate_limiter,
                rate_limit_middleware,
            ))
            .layer(middleware::from_fn_with_state(
                header_state,
                headers_middleware,
            ))
            .layer(CompressionLayer::new())
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(RequestBodyLimitLayer::new(config.listener.max_body_bytes))
            .layer(RequestIdLayer)
            .layer(TraceLayer::new_for_http())
    }

    /// The assembled router; integration tests drive this directly.
    pub fn into_router(self) -> Router {
        self.router
    }

    /// Run the server until shutdown.
    pub async fn run(self) -> Result<(), ServerError> {
        let addr: SocketAddr = self.config.listener.bind_address.parse()?;
        let service = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        match &self.config.listener.tls {
            Some(tls) => {
                let rustls = RustlsConfig::from_pem_file(&tls.cert_path, &tls.key_path).await?;
                tracing::info!(address = %addr, "HTTPS server starting");

                let handle = axum_server::Handle::new();
                let watcher = handle.clone();
                tokio::spawn(async move {
                    shutdown_signal().await;
                    watcher.graceful_shutdown(Some(Duration::from_secs(10)));
                });

                axum_server::bind_rustls(addr, rustls)
                    .handle(handle)
                    .serve(service)
                    .await?;
            }
            None => {
                let listener = TcpListener::bind(addr).await?;
                tracing::info!(address = %addr, "HTTP server starting");

                axum::serve(listener, service)
                    .with_graceful_shutdown(shutdown_signal())
                    .await?;
            }
        }

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Liveness probe.
async fn healthz() -> &'static str {
    "ok"
}

/// Unknown route.
async fn not_found() -> AppError {
    AppError::NotFound
}

/// Known route, wrong method.
async fn method_not_allowed() -> Response {
    let body = templates::error_page(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed",
        "That page does not accept this kind of request.",
    );
    (StatusCode::METHOD_NOT_ALLOWED, Html(body)).into_response()
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
