use std::net::SocketAddr;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use phishscan_backend::{
    app::AppState,
    app_config::AppConfig,
    build_router,
    db::{mask_connection_string, run_migrations},
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "phishscan_backend=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {}", e);
            return Err(std::io::Error::other(format!(
                "Configuration error: {}",
                e
            )));
        },
    };

    let listen_addr = config.listen_addr();
    info!("Starting PhishScan backend on {}", listen_addr);
    info!(
        "Database: {}",
        mask_connection_string(&config.database_url)
    );

    if config.ml_service_url.is_none() {
        warn!("ML_SERVICE_URL not set, scans will fail until it is configured");
    }
    if config.safe_browsing_api_key.is_none() {
        warn!("SAFE_BROWSING_API_KEY not set, threat intel checks disabled");
    }

    // Run migrations before accepting traffic
    if !config.disable_embedded_migrations {
        match run_migrations(&config.database_url).await {
            Ok(applied) => info!("Migrations complete, {} applied", applied),
            Err(e) => {
                error!("Migration failed: {}", e);
                return Err(std::io::Error::other(format!("Migration failed: {}", e)));
            },
        }
    }

    let state = match AppState::initialize(config).await {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(std::io::Error::other(format!(
                "Initialization failed: {}",
                e
            )));
        },
    };

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&listen_addr).await?;
    info!("HTTP server listening on {}", listen_addr);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Shutdown signal received, draining connections");
}
