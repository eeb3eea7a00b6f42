//! Web layer module
//!
//! Serves the addon protocol over HTTP. Handlers are thin: they strip the
//! `.json` suffix from the last path segment, call [`AddonService`] and
//! render whatever value comes back. Degraded outcomes are logged here and
//! still answered with `200 OK`.

use anyhow::Result;
use axum::{routing::get, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{config::WebConfig, epg::EpgStore, services::AddonService};

pub mod handlers;

/// Web server configuration and setup
pub struct WebServer {
    app: Router,
    addr: SocketAddr,
}

impl WebServer {
    pub fn new(web: &WebConfig, state: AppState) -> Result<Self> {
        let app = Self::create_router(state);
        let addr: SocketAddr = format!("{}:{}", web.host, web.port).parse()?;
        Ok(Self { app, addr })
    }

    /// Create the router with all routes and middleware
    pub fn create_router(state: AppState) -> Router {
        Router::new()
            .route("/manifest.json", get(handlers::manifest))
            .route("/catalog/{type}/{id}", get(handlers::catalog))
            .route("/catalog/{type}/{id}/{extra}", get(handlers::catalog_with_extra))
            .route("/stream/{type}/{id}", get(handlers::stream))
            .route("/meta/{type}/{id}", get(handlers::meta))
            .route("/health", get(handlers::health_check))
            // Middleware (applied in reverse order)
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }

    /// Start the web server, stopping gracefully once `shutdown` resolves
    pub async fn serve<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = tokio::net::TcpListener::bind(&self.addr).await?;
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }

    pub fn host(&self) -> String {
        self.addr.ip().to_string()
    }

    pub fn port(&self) -> u16 {
        self.addr.port()
    }
}

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub addon: Arc<AddonService>,
    pub epg: EpgStore,
}

impl AppState {
    pub fn new(addon: Arc<AddonService>) -> Self {
        let epg = addon.epg().clone();
        Self { addon, epg }
    }
}
