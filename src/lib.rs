pub mod booking;
pub mod catalog;
pub mod config;
pub mod controllers;
pub mod error;
pub mod models;
pub mod services;

use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use booking::SessionStore;
use catalog::{CatalogError, CatalogService, MockCatalog};

// Shared state for the whole application
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<dyn CatalogService>,
    pub sessions: SessionStore,
    pub config: config::Config,
}

impl AppState {
    pub fn new(config: config::Config) -> Result<Arc<Self>, CatalogError> {
        let catalog = MockCatalog::from_config(&config.catalog)?;
        Ok(Self::with_catalog(config, Arc::new(catalog)))
    }

    pub fn with_catalog(config: config::Config, catalog: Arc<dyn CatalogService>) -> Arc<Self> {
        Arc::new(Self {
            catalog,
            sessions: SessionStore::new(),
            config,
        })
    }
}

/// Full HTTP surface: health probes plus everything under `/api`.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(|| async { "Cinema Booking API v1.0" }))
        .route("/health", get(|| async { "OK" }))
        .nest("/api", controllers::routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
