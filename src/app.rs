// src/app.rs
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use kraken_dca::domain::exchange::FailureNotifier;
use kraken_dca::infrastructure::kraken::HttpTransport;
use kraken_dca::shared::config::Config;
use kraken_dca::{EmailNotifier, InvestingService, KrakenClient, MarketOrderSubmitter, Scheduler};

#[derive(Debug, Clone)]
pub struct AppCfg {
    pub config: Config,
    pub dry_run: bool,
    pub frequency: Duration,
    pub once: bool,
}

impl AppCfg {
    /// `--staging` can only turn dry-run on, never off
    pub fn from_config(config: Config, override_dry_run: bool, once: bool) -> Result<Self> {
        let frequency = config
            .frequency_duration()
            .context("cannot parse the DCA frequency")?;

        Ok(Self {
            dry_run: override_dry_run || config.dry_run,
            frequency,
            once,
            config,
        })
    }
}

pub async fn run(app_cfg: AppCfg) -> Result<()> {
    let config = &app_cfg.config;
    info!(
        "Starting Kraken DCA bot: {} pair(s) in {}, every {:?}",
        config.pairs.len(),
        config.currency,
        app_cfg.frequency
    );
    if app_cfg.dry_run {
        warn!("Dry-run mode: orders are validated only, nothing is bought");
    }

    let transport = HttpTransport::new(config.kraken.key.clone(), config.kraken.secret.clone())
        .context("cannot create the Kraken HTTP client")?;
    let kraken = Arc::new(KrakenClient::new(Arc::new(transport)));
    let notifier: Arc<dyn FailureNotifier> =
        Arc::new(EmailNotifier::new(config).context("cannot create the email notifier")?);

    let submitter = MarketOrderSubmitter::new(kraken.clone(), kraken.clone(), app_cfg.dry_run);
    let investor = InvestingService::new(
        config.currency,
        config.pairs.clone(),
        kraken,
        Arc::new(submitter),
        notifier.clone(),
    );
    let scheduler = Scheduler::new(Arc::new(investor), notifier, app_cfg.frequency);

    if app_cfg.once {
        scheduler.tick().await;
        return Ok(());
    }

    scheduler
        .run(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                warn!("Cannot listen for Ctrl-C: {}", e);
                std::future::pending::<()>().await;
            }
        })
        .await;

    Ok(())
}
