use contatos_regionais::monitoring::setup_metrics_recorder;
use contatos_regionais::{AppState, config::Config, create_router};
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = Config::from_env()?;
    config.log_info();

    info!("Connecting to the databases");
    let writer = connect(&config, &config.database_url).await?;
    let reader = if config.database_read_url == config.database_url {
        writer.clone()
    } else {
        connect(&config, &config.database_read_url).await?
    };

    info!("Running migrations");
    sqlx::migrate!().run(&writer).await?;

    let metrics_handle = setup_metrics_recorder()?;
    info!("Prometheus metrics recorder initialized");

    let state = AppState::new(reader, writer, config.jwt_secret.clone())
        .with_metrics(metrics_handle)
        .with_jwt_expiration_hours(config.jwt_expiration_hours)
        .with_cache_ttl(Duration::from_secs(config.cache_ttl_secs));
    let app = create_router(Arc::new(state));

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn connect(config: &Config, url: &str) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .max_lifetime(Duration::from_secs(config.connection_lifetime_secs))
        .connect(url)
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for the shutdown signal: {}", e);
        // without a signal handler the server just keeps running
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
