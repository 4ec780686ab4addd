use std::net::TcpListener;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use linelog::error::StartupError;
use linelog::{Server, ServerConfig, Shutdown, startup};
use tokio::signal::unix::{SignalKind, signal};
use tracing::info;

/// Line-oriented TCP logging service.
#[derive(Debug, Parser)]
#[command(name = "linelogd", version)]
struct Args {
    /// Detach and run in the background.
    #[arg(short = 'd')]
    daemon: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::try_parse().unwrap_or_else(|err| {
        // `--help` and `--version` print to stdout and exit zero; anything
        // else is a bad invocation: show the usage and fail.
        if err.use_stderr() {
            let _ = err.print();
            std::process::exit(1);
        }
        err.exit()
    });

    startup::configure_tracing();

    let config = ServerConfig::default();
    // Bind before daemonizing so startup failures reach the foreground.
    let listener = Server::bind_std(&config)?;

    if args.daemon {
        nix::unistd::daemon(false, false).context("failed to daemonize")?;
    }

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    runtime.block_on(run(listener, config))
}

async fn run(listener: TcpListener, config: ServerConfig) -> anyhow::Result<()> {
    let shutdown = Arc::new(Shutdown::new());
    spawn_signal_task(Arc::clone(&shutdown))?;

    let server = Server::from_std(listener, config, shutdown)?;
    server.serve().await;
    Ok(())
}

/// SIGINT and SIGTERM both request a graceful shutdown.
fn spawn_signal_task(shutdown: Arc<Shutdown>) -> Result<(), StartupError> {
    let mut interrupt = signal(SignalKind::interrupt()).map_err(StartupError::Signal)?;
    let mut terminate = signal(SignalKind::terminate()).map_err(StartupError::Signal)?;
    tokio::spawn(async move {
        tokio::select! {
            _ = interrupt.recv() => {}
            _ = terminate.recv() => {}
        }
        info!("termination signal received");
        shutdown.signal();
    });
    Ok(())
}
