//! Curio Market checkout service entry point.
//!
//! Wires configuration, the Postgres pool, the Stripe gateway, and the
//! HTTP router together, then serves until shutdown.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use curio_market::adapters::email::{LogOnlyReceiptSender, ResendConfig, ResendReceiptSender};
use curio_market::adapters::http::{checkout_router, CheckoutAppState};
use curio_market::adapters::postgres::{PostgresOrderRepository, PostgresProductReader};
use curio_market::adapters::stripe::{StripeConfig, StripeGateway};
use curio_market::config::AppConfig;
use curio_market::ports::ReceiptSender;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    tracing::info!(
        environment = ?config.server.environment,
        stripe_test_mode = config.payment.is_test_mode(),
        "Starting curio-market"
    );

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .idle_timeout(config.database.idle_timeout())
        .max_lifetime(config.database.max_lifetime())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        tracing::info!("Running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let stripe_config = StripeConfig::new(
        config.payment.stripe_api_key.clone(),
        config.payment.stripe_webhook_secret.clone(),
    )
    .with_require_livemode(config.is_production());

    let receipt_sender: Arc<dyn ReceiptSender> = if config.email.enabled {
        Arc::new(ResendReceiptSender::new(ResendConfig::new(
            config.email.resend_api_key.clone(),
            config.email.from_header(),
        )))
    } else {
        Arc::new(LogOnlyReceiptSender)
    };

    let state = CheckoutAppState {
        order_repository: Arc::new(PostgresOrderRepository::new(pool.clone())),
        product_reader: Arc::new(PostgresProductReader::new(pool)),
        payment_gateway: Arc::new(StripeGateway::new(stripe_config)),
        receipt_sender,
        fee_price_id: config.payment.transaction_fee_price_id.clone(),
        public_url: config.payment.public_url.clone(),
    };

    let app = Router::new()
        .nest("/api", checkout_router())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(CorsLayer::permissive());

    let addr = config.server.socket_addr();
    tracing::info!(%addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
