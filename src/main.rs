mod app;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use kraken_dca::ConfigLoader;

#[derive(Parser, Debug)]
#[command(version, about = "Dollar-cost averaging bot for Kraken")]
struct Args {
    /// Path to the configuration file with the DCA strategy
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Dry run the program: orders are only validated by Kraken
    #[arg(long)]
    staging: bool,

    /// Run the strategy once and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let config = ConfigLoader::load_config(&args.config).context("can't load the configuration")?;
    let app_cfg = app::AppCfg::from_config(config, args.staging, args.once)?;

    app::run(app_cfg).await
}
