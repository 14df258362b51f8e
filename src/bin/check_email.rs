//! Sends a test failure email with the configured SMTP settings

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use kraken_dca::domain::exchange::FailureNotifier;
use kraken_dca::shared::errors::{InvestError, ProviderError};
use kraken_dca::{ConfigLoader, EmailNotifier, Transaction};

#[derive(Parser, Debug)]
#[command(version, about = "Check the failure email delivery")]
struct Args {
    /// The configuration file path to test
    #[arg(long, default_value = "config.toml")]
    config: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    let args = Args::parse();

    let config = ConfigLoader::load_config(&args.config).context("failed to load configuration file")?;

    let mut transaction = Transaction::new("TESTPAIR");
    transaction.fail(InvestError::OrderPlacement {
        pair: "TESTPAIR".to_string(),
        source: ProviderError::Api("test email error".to_string()),
    });

    let notifier = EmailNotifier::new(&config)?;
    notifier
        .notify_failure(&transaction)
        .await
        .context("failed to notify test failure")?;

    info!("✅ The test email was sent successfully");
    Ok(())
}
