use std::net::TcpListener;

use actix_web::web;
use once_cell::sync::Lazy;
use portfolio_api::{
    graceful_shutdown::shutdown_signal,
    handlers::system::STARTED_AT,
    settings::{AppConfig, LogFormat},
    shared_repos::SharedRepositories,
    startup::run,
    AppState,
};
use tracing_subscriber::EnvFilter;

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match format {
        LogFormat::Json => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init(),
        LogFormat::Pretty => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .init(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = match AppConfig::new() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    Lazy::force(&STARTED_AT);
    init_tracing(config.log_format);
    tracing::info!("Loaded configuration: {:?}", config);

    let repos = match SharedRepositories::connect(&config).await {
        Ok(repos) => repos,
        Err(e) => {
            tracing::error!("Failed to initialise the data store: {:#}", e);
            std::process::exit(1);
        }
    };

    let app_state = web::Data::new(AppState::new(&config, repos));
    app_state.contact_handler.limiter().spawn_eviction();

    let server_addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&server_addr)?;

    tracing::info!(
        "🚀 Starting Portfolio API v{} on {} ({} store)",
        env!("CARGO_PKG_VERSION"),
        server_addr,
        app_state.store_backend
    );

    let server = run(listener, app_state, &config)?;

    tokio::select! {
        res = server => res,
        _ = shutdown_signal() => Ok(()),
    }
}
