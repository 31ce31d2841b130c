#![forbid(unsafe_code)]

mod config;

use anyhow::Context;
use axum::Router;
use clap::Parser;
use config::{LogFormat, ServerConfig};
use grading_service::GradingServiceModule;
use sea_orm::{ConnectOptions, Database};
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "grading-server", version, about = "School grading HTTP service")]
struct Args {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    match format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let (mut sigterm, mut sigint) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(e), _) | (_, Err(e)) => {
                error!(error = %e, "failed to register signal handlers, falling back to ctrl-c");
                wait_for_ctrl_c().await;
                return;
            }
        };
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        wait_for_ctrl_c().await;
    }
}

async fn wait_for_ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for ctrl-c, shutting down");
    }
}

async fn run(cfg: ServerConfig) -> anyhow::Result<()> {
    let mut options = ConnectOptions::new(cfg.database_url.clone());
    options.sqlx_logging(false);
    let db = Database::connect(options)
        .await
        .context("failed to connect to database")?;

    GradingServiceModule::migrate(&db).await?;

    let module = GradingServiceModule::default();
    module.init(cfg.grading.clone(), db).await?;

    let router = module
        .register_rest(Router::new())?
        .layer(TimeoutLayer::new(cfg.request_timeout))
        .layer(TraceLayer::new_for_http());

    let listener = TcpListener::bind(cfg.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", cfg.bind_addr))?;
    info!(addr = %cfg.bind_addr, "grading server listening");

    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            wait_for_shutdown_signal().await;
            info!("shutdown signal received");
            cancel.cancel();
        }
    });

    axum::serve(listener, router)
        .with_graceful_shutdown(async move { cancel.cancelled().await })
        .await
        .context("server error")?;

    info!("grading server stopped");
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let cfg = config::load(args.config.as_deref())?;

    if args.print_config {
        print!("{}", serde_yaml::to_string(&cfg)?);
        return Ok(());
    }

    init_tracing(cfg.log_format);
    run(cfg).await
}
