use clap::Parser;
use entrant_core::backend::Backend;
use entrant_core::config::{ConfigError, ConfigLoader, RunConfig};
use entrant_core::error::RunError;
use entrant_core::runner;
use entrant_h::backend::HeadlessBackend;
use entrant_h::cdp::LaunchOptions;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "entrant", version, about = "One-shot giveaway entry runner")]
struct Args {
    /// Config file (defaults to ./entrant.yaml, then ~/.entrant/config.yaml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Launch the browser in visible mode (not headless)
    #[arg(long)]
    visible: bool,

    /// Entry page URL override
    #[arg(long)]
    url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let config = match load_config(&args).await {
        Ok(config) => config,
        Err(e) => {
            error!("configuration error: {}", e);
            return ExitCode::from(2);
        }
    };

    let mut backend = HeadlessBackend::new(LaunchOptions {
        visible: args.visible,
        storage_dir: config.storage_dir.clone(),
    });
    if let Err(e) = backend.launch().await {
        error!("failed to launch browser: {}", e);
        return ExitCode::from(2);
    }

    // The browser must be released on every exit path, interrupt included.
    let result = tokio::select! {
        result = runner::run(&mut backend, &config) => result,
        _ = tokio::signal::ctrl_c() => Err(RunError::Interrupted),
    };

    if let Err(e) = backend.close().await {
        warn!("browser shutdown failed: {}", e);
    }

    match result {
        Ok(report) => {
            if let Some(paths) = &report.artifacts {
                info!(
                    screenshot = %paths.screenshot.display(),
                    dom = %paths.dom.display(),
                    "diagnostic artifacts written"
                );
            }
            ExitCode::from(report.outcome.exit_code())
        }
        Err(e) => {
            error!("run failed: {}", e);
            ExitCode::from(2)
        }
    }
}

async fn load_config(args: &Args) -> Result<RunConfig, ConfigError> {
    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from(path).await?,
        None => ConfigLoader::load_default().await?,
    };
    config.apply_env();
    if let Some(url) = &args.url {
        config.url = url.clone();
    }
    config.validate()?;
    Ok(config)
}
