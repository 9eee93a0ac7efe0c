//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build shared application state (config, upstream client, caches)
//! - Create the Axum router with all middleware layers
//! - Serve until shutdown, then drain background work

use axum::{middleware, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::cache::CacheStorage;
use crate::config::RelayConfig;
use crate::error::RelayResult;
use crate::fonts::FontResolver;
use crate::http::middleware::{deadline, present_errors, pretty_json};
use crate::http::request::{MakeRequestUuid, X_REQUEST_ID};
use crate::lifecycle::shutdown::signalled;
use crate::lifecycle::BackgroundTasks;
use crate::observability::metrics;
use crate::routing;
use crate::upstream::{Fetcher, ReqwestFetcher};

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    pub fetcher: Arc<dyn Fetcher>,
    pub resolver: Arc<FontResolver>,
    pub caches: Arc<CacheStorage>,
    pub background: BackgroundTasks,
}

impl AppState {
    pub fn new(config: RelayConfig, fetcher: Arc<dyn Fetcher>) -> Self {
        let resolver = Arc::new(FontResolver::new(fetcher.clone(), &config.upstream));
        let caches = Arc::new(CacheStorage::new(&config.cache));
        Self {
            config: Arc::new(config),
            fetcher,
            resolver,
            caches,
            background: BackgroundTasks::new(),
        }
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(state: AppState) -> Router {
    routing::routes(state.clone())
        .layer(middleware::from_fn(pretty_json))
        .layer(middleware::from_fn_with_state(state.clone(), deadline))
        .layer(middleware::from_fn_with_state(state, present_errors))
        .layer(middleware::from_fn(metrics::track_requests))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
}

/// HTTP server for the relay.
pub struct HttpServer {
    router: Router,
    state: AppState,
}

impl HttpServer {
    /// Create a server that fetches upstreams over the network.
    pub fn new(config: RelayConfig) -> RelayResult<Self> {
        let fetcher = Arc::new(ReqwestFetcher::new(&config.timeouts)?);
        Ok(Self::with_state(AppState::new(config, fetcher)))
    }

    pub fn with_state(state: AppState) -> Self {
        let router = build_router(state.clone());
        Self { router, state }
    }

    /// Serve until `shutdown` fires, then wait for background tasks.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            environment = %self.state.config.environment,
            caching = self.state.config.environment.caches_responses(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(signalled(shutdown))
            .await?;

        tracing::info!(
            pending = self.state.background.pending(),
            "HTTP server stopped, draining background tasks"
        );
        self.state.background.drain().await;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn config(&self) -> &RelayConfig {
        &self.state.config
    }
}
