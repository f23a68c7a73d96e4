use anyhow::Result;
use std::time::Duration;
use tracing::info;

use marketplace_api::{app, config, jobs, middleware};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = config::Config::load()?;

    // Initialize logging
    middleware::logging::init_logging(&config.logging);

    info!("Starting Marketplace API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize Prometheus metrics
    middleware::init_metrics();

    // Create database pool
    let pool = persistence::db::create_pool(&config.database.pool_settings()).await?;

    // Run migrations
    info!("Running database migrations...");
    sqlx::migrate!("../persistence/src/migrations")
        .run(&pool)
        .await?;
    info!("Migrations completed");

    // Start background jobs
    let mut scheduler = jobs::JobScheduler::new();
    scheduler.register(jobs::BookingExpiryJob::new(pool.clone()));
    scheduler.register(jobs::CommissionOverdueJob::new(pool.clone(), &config));
    scheduler.register(jobs::ReconciliationJob::new(pool.clone()));
    scheduler.start();

    // Build application
    let app = app::create_app(config.clone(), pool)?;

    // Start server
    let addr = config.socket_addr();
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain background jobs before exit
    scheduler.shutdown();
    scheduler.wait_for_shutdown(Duration::from_secs(10)).await;

    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_err() {
        tracing::error!("Failed to listen for shutdown signal");
    }
}
