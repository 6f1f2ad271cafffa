//! PhishScope - classify URLs as phishing or legitimate.
//!
//! - `phishscope check <URL>...` prints a label line per URL
//! - `phishscope inspect <URL>` prints parsed components and features
//! - `phishscope serve` runs the HTTP API

use std::io;
use std::path::PathBuf;

use clap::Parser;
use directories::ProjectDirs;
use phishscope_app::commands;
use phishscope_app::{Args, Command};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Get the logs directory path.
fn logs_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "phishscope", "PhishScope").map(|dirs| dirs.data_dir().join("logs"))
}

/// Initialize logging: stderr plus a daily rotating file when possible.
///
/// Stdout is reserved for command output.
fn init_logging(args: &Args) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("phishscope={},warn", args.log_level())));

    if let Some(log_dir) = logs_dir() {
        if std::fs::create_dir_all(&log_dir).is_ok() {
            let file_appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .max_log_files(5)
                .filename_prefix("phishscope")
                .filename_suffix("log")
                .build(&log_dir)
                .ok();

            if let Some(appender) = file_appender {
                let (non_blocking, guard) = tracing_appender::non_blocking(appender);
                tracing_subscriber::registry()
                    .with(env_filter)
                    .with(fmt::layer().with_writer(io::stderr))
                    .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                    .init();

                tracing::debug!("Logging to {:?}", log_dir);
                return Some(guard);
            }
        }
    }

    // Fallback: console logging only
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .init();

    tracing::warn!("File logging unavailable, using console only");
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let _guard = init_logging(&args);

    match &args.command {
        Command::Check { urls, json } => {
            let paths = args.artifact_paths()?;
            let stdout = io::stdout();
            commands::check(&paths, urls, *json, &mut stdout.lock())
        }
        Command::Inspect { url } => commands::inspect(url, &mut io::stdout().lock()),
        Command::Serve { host, port } => {
            let paths = args.artifact_paths()?;
            commands::serve(&paths, host.clone(), *port).await
        }
    }
}
