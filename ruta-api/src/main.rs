use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ruta_api::{app, AppState};
use ruta_connect::{
    Config, InMemorySearchProvider, InMemorySessionContext, MockBookingProvider,
    RestBookingProvider, RestSearchProvider,
};
use ruta_core::providers::{BookingProvider, SearchProvider};
use ruta_flow::BookingEngine;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ruta_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::load().context("Failed to load config")?;
    tracing::info!("Starting Ruta API on port {}", config.server.port);

    let timeout = Duration::from_secs(config.upstream.request_timeout_seconds);

    let search: Arc<dyn SearchProvider> = match &config.upstream.search_base_url {
        Some(base_url) => Arc::new(RestSearchProvider::new(base_url.clone(), timeout)?),
        None => {
            tracing::warn!("No search service configured, using seeded in-memory journeys");
            Arc::new(InMemorySearchProvider::seeded())
        }
    };

    let booking: Arc<dyn BookingProvider> = match &config.upstream.booking_base_url {
        Some(base_url) => Arc::new(RestBookingProvider::new(base_url.clone(), timeout)?),
        None => {
            tracing::warn!("No booking service configured, using the mock provider");
            Arc::new(MockBookingProvider)
        }
    };

    let engine = BookingEngine::new(
        search,
        booking,
        config.booking_rules.max_seats_per_booking,
    );

    let app_state = AppState {
        engine: Arc::new(engine),
        session_ctx: Arc::new(InMemorySessionContext::new()),
        booking_rules: config.booking_rules.clone(),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listener")?;
    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
