use anyhow::Result;
use replanta::{
    app_state::AppState,
    config::{self, Config},
    router::router,
};
use tokio::{net::TcpListener, signal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "info,replanta=debug,tower_http=debug";

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    // Refuse to start without the upstream credentials.
    let config = Config::from_env().inspect_err(|e| error!("Invalid configuration: {e}"))?;
    info!(?config, "Configuration loaded");

    let state = AppState::new(&config)?;
    let app = router(state);

    let listener = TcpListener::bind(config.bind_addr()).await?;
    info!("Listening on {}", config.bind_addr());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    let json = std::env::var(config::ENV_LOG_FORMAT).is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    info!("Received shutdown signal, draining connections...");
}
