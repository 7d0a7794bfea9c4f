//! HTTP server with HTMX support
//!
//! Routes are organized into modules:
//! - routes::form: Form page, add-row, submit and request preview

pub mod error;
pub mod routes;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::RwLock;
use txform_config::Config;
use txform_core::{BackendRef, FormController, SessionStore};

pub use error::{alert_response, ApiError, ApiResult};

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<RwLock<SessionStore>>,
    pub controller: FormController,
    pub config: Config,
}

impl AppState {
    /// Build the state for a backend, with an empty session store
    pub fn new(config: Config, backend: BackendRef) -> Self {
        let ttl = chrono::Duration::minutes(i64::from(config.form.session_ttl_minutes));
        Self {
            sessions: Arc::new(RwLock::new(SessionStore::new(ttl))),
            controller: FormController::new(backend),
            config,
        }
    }
}

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    use routes::form::{api_preview, htmx_add_row, htmx_submit, page_form};

    Router::new()
        // API endpoints
        .route("/api/health", get(health_check))
        .route("/api/sessions/:id/preview", post(api_preview))
        // HTMX page routes
        .route("/", get(page_form))
        // HTMX partial routes
        .route("/sessions/:id/rows", post(htmx_add_row))
        .route("/sessions/:id/submit", post(htmx_submit))
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

// ==================== Template Functions ====================

/// Base HTML template
pub fn base_html(title: &str, content: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{} - txform</title>
    <script src="https://unpkg.com/htmx.org@1.9.10"></script>
    <script src="https://cdn.tailwindcss.com"></script>
    <style>
        .htmx-indicator {{ opacity: 0; transition: opacity 0.3s; }}
        .htmx-request .htmx-indicator {{ opacity: 1; }}
    </style>
</head>
<body class="bg-gray-50 text-gray-900">
    {}
    <script>
        document.body.addEventListener('{}', function(evt) {{
            alert(evt.detail.value);
        }});
    </script>
</body>
</html>"#,
        title,
        content,
        error::ALERT_EVENT
    )
}

/// Start the HTTP server
///
/// Binds to the configured address and serves until Ctrl-C.
pub async fn start_server(config: Config, backend: BackendRef) -> anyhow::Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let state = AppState::new(config, backend);

    let router = create_router(state);

    let listener = TcpListener::bind(&addr).await?;
    log::info!("Starting txform server on http://{}", addr);
    log::info!("Available routes:");
    log::info!("  - / (Transaction form)");
    log::info!("  - /sessions/:id/* (HTMX form actions)");
    log::info!("  - /api/* (JSON API endpoints)");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    log::info!("Server stopped gracefully");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
