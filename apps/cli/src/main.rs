mod args;
mod config;
mod data_dir;

use std::io;

use app_api::AppContext;
use betslip_app::{AppPaths, AppState, ensure_app_data_dir};
use clap::Parser;
use http_api::HttpState;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "BETSLIP_LOG";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = args::CliArgs::parse();

    let config = config::load_or_create(args.config.as_deref()).map_err(io::Error::other)?;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&config.config.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if config.created {
        info!(path = %config.file.display(), "created default config");
    }

    let data_dir = data_dir::resolve_data_dir(
        args.data_dir.as_deref(),
        config.config.data_dir.as_deref(),
    )
    .map_err(io::Error::other)?;
    info!(path = %data_dir.display(), "using data dir");

    let paths = AppPaths::new(data_dir);
    ensure_app_data_dir(&paths).map_err(|err| io::Error::other(err.to_string()))?;

    let app_state = AppState::new(paths.db_path);
    if let Err(err) = app_state.initialize(config.config.bootstrap_super_admin.as_deref()) {
        error!(error = %err, "failed to initialize database");
        return Err(io::Error::other(format!("failed to initialize database: {}", err)).into());
    }

    let context = AppContext { app_state };
    let router = http_api::router(HttpState::new(context));

    let port = args.port.unwrap_or(config.config.port);
    let addr = format!("{}:{}", config.config.host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %listener.local_addr()?, "betslip analyzer listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                error!(error = %err, "failed to install terminate handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("shutting down");
}
