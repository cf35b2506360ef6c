use anyhow::Result;
use clap::Parser;
use polyvox::app::run_pipeline;
use polyvox::cli::Cli;
use polyvox::config::Config;
use polyvox::context::Context;
use polyvox::diagnostics::check_dependencies;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    if cli.check {
        check_dependencies(&config);
        return Ok(());
    }

    if !cli.any_operation() {
        tracing::info!("no operations requested; nothing to do");
        return Ok(());
    }

    let ctx = Context::from_config(config)?;
    run_pipeline(&cli, &ctx).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .ok();
}

/// Load configuration from file or use defaults.
///
/// Priority order:
/// 1. Custom config path from CLI (--config)
/// 2. Default config path (~/.config/polyvox/config.toml)
/// 3. Built-in defaults
///
/// Environment variable overrides apply last in every case.
fn load_config(custom_path: Option<&std::path::Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        Config::load(path)?
    } else {
        Config::load_or_default(&Config::default_path())?
    };
    Ok(config.with_env_overrides())
}
