use anyhow::Context;
use axum::http::{header, HeaderValue, Method};
use std::net::SocketAddr;
use tokio::task;
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cinema_booking::{config::Config, router, services::cleanup::CleanupService, AppState};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("invalid configuration")?;

    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(&config.app.rust_log));
    if config.is_production() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    info!("Starting Cinema Booking API ({})", config.app.environment);

    // Load the catalog and create the shared application state
    let app_state = AppState::new(config.clone()).context("failed to load catalog")?;
    info!(
        simulate_latency = config.catalog.simulate_latency,
        latency_factor = config.catalog.latency_factor,
        "Catalog ready"
    );

    // --- Start background tasks ---

    // Drop booking sessions that went idle
    let cleanup = CleanupService::new(app_state.clone());
    task::spawn(cleanup.run_forever());

    // --- Start the web server ---

    let mut app = router(app_state);
    if let Some(origin) = &config.app.cors_allow_origin {
        let origin: HeaderValue = origin.parse().context("CORS_ALLOW_ORIGIN is not a valid header value")?;
        app = app.layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
                .allow_origin(origin)
                .allow_headers([header::CONTENT_TYPE]),
        );
    }

    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port)
        .parse()
        .context("HOST/PORT do not form a socket address")?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for shutdown signal: {}", e);
    }
}
