//! Vigil Binary Entry Point
//!
//! Monitors the endpoints listed in a YAML file and prints cumulative
//! per-domain availability every cycle. Core functionality is provided by
//! the `vigil` library crate.

use std::process::ExitCode;

use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use vigil::cli::{Cli, CliExit, USAGE};
use vigil::{EndpointsConfig, HttpChecker, MonitorConfig, MonitorError, Scheduler};

#[tokio::main]
async fn main() -> ExitCode {
    // Diagnostics go to stderr; stdout carries only the reports.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = match Cli::parse_args(std::env::args_os()) {
        Ok(cli) => cli,
        Err(CliExit::Clap(e)) => e.exit(),
        Err(CliExit::Usage) => {
            eprintln!("{}", USAGE);
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Monitor failed");
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), MonitorError> {
    tracing::info!("Loading endpoints from: {}", cli.config.display());
    let endpoints = EndpointsConfig::load(&cli.config)?;
    tracing::info!("Loaded {} endpoints", endpoints.len());

    let config = MonitorConfig::default();
    config.validate()?;
    let checker = HttpChecker::new(&config)?;

    let token = CancellationToken::new();
    tokio::spawn(shutdown_signal(token.clone()));

    let mut scheduler = Scheduler::new(endpoints.into_endpoints(), checker, config);
    let cycles = scheduler.run(&token, &mut std::io::stdout()).await?;

    tracing::info!("Shutdown complete after {} cycles", cycles);
    Ok(())
}

/// Cancel `token` on Ctrl+C or SIGTERM.
async fn shutdown_signal(token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal");
        }
    }

    token.cancel();
}
