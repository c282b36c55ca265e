//! Roomledger server.
//!
//! Connects to `PostgreSQL`, applies migrations, and serves the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Start infrastructure
//! docker compose up -d
//!
//! # Run server
//! cargo run --bin server
//! ```

use roomledger_core::store::SystemClock;
use roomledger_postgres::{
    PgBookingLedger, PgBookingStore, PgCouponStore, PgInventoryStore, PgTokenVerifier, PgUserStore,
};
use roomledger_web::{AppState, Config, ConsoleDispatcher, build_router};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,roomledger=debug,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    tracing::info!(postgres = %config.postgres.url, "Configuration loaded");

    let pool = roomledger_postgres::connect(
        &config.postgres.url,
        config.postgres.max_connections,
        Duration::from_secs(config.postgres.connect_timeout),
    )
    .await?;
    roomledger_postgres::migrate(&pool).await?;
    tracing::info!("✓ Database connected and migrated");

    let clock = Arc::new(SystemClock);
    let state = AppState {
        inventory: Arc::new(PgInventoryStore::new(pool.clone())),
        coupons: Arc::new(PgCouponStore::new(pool.clone())),
        users: Arc::new(PgUserStore::new(pool.clone())),
        bookings: Arc::new(PgBookingStore::new(pool.clone())),
        ledger: Arc::new(PgBookingLedger::new(pool.clone(), clock.clone())),
        verifier: Arc::new(PgTokenVerifier::new(pool)),
        dispatcher: Arc::new(ConsoleDispatcher::new()),
        clock,
    };

    let router = build_router(state);
    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Roomledger server is running");

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down gracefully...");
        })
        .await?;

    Ok(())
}
