//! Tendero API Server
//!
//! Main entry point for the Tendero inventory backend.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tendero_api::{AppState, create_router};
use tendero_db::connect;
use tendero_shared::{AppConfig, EmailService, NoopNotifier, Notifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tendero=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(
        &config.database.url,
        config.database.max_connections,
        config.database.min_connections,
    )
    .await?;
    info!("Connected to database");

    // Receipts go out by email only when SMTP is enabled
    let notifier: Arc<dyn Notifier> = if config.email.enabled {
        info!(
            smtp_host = %config.email.smtp_host,
            smtp_port = %config.email.smtp_port,
            "Email receipts enabled"
        );
        Arc::new(EmailService::new(config.email.clone()))
    } else {
        info!("Email receipts disabled");
        Arc::new(NoopNotifier)
    };

    info!(
        void_window_days = config.inventory.purchase_void_window_days,
        generic_consumer = %config.inventory.generic_consumer_document,
        "Inventory policy loaded"
    );

    let state = AppState::new(db, notifier, &config.inventory);
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
