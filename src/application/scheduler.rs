//! Periodic DCA runs

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::domain::exchange::FailureNotifier;
use crate::domain::investing::Investor;
use crate::domain::transaction::{Transaction, TransactionStatus};

/// Outcome counts of one run
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub completed: usize,
    pub failed: usize,
    pub notified: usize,
    pub notification_failures: usize,
}

pub struct Scheduler {
    investor: Arc<dyn Investor>,
    notifier: Arc<dyn FailureNotifier>,
    frequency: Duration,
}

impl Scheduler {
    pub fn new(investor: Arc<dyn Investor>, notifier: Arc<dyn FailureNotifier>, frequency: Duration) -> Self {
        Self {
            investor,
            notifier,
            frequency,
        }
    }

    /// Run the strategy once, then report the failures the investing engine
    /// did not notify itself (balance checks).
    pub async fn tick(&self) -> (Vec<Transaction>, RunSummary) {
        let transactions = self.investor.invest().await;
        let mut summary = RunSummary::default();

        for transaction in &transactions {
            match transaction.to_json() {
                Ok(json) => debug!("{}", json),
                Err(e) => warn!("Cannot serialize transaction: {}", e),
            }

            if transaction.status() == TransactionStatus::Completed {
                summary.completed += 1;
                continue;
            }

            let Some(failure) = transaction.failure() else {
                continue;
            };
            summary.failed += 1;
            if failure.notification_attempted() {
                continue;
            }

            match self.notifier.notify_failure(transaction).await {
                Ok(()) => summary.notified += 1,
                Err(e) => {
                    summary.notification_failures += 1;
                    error!("An error occurred during the failure notification: {}", e);
                }
            }
        }

        info!(
            "Run finished: {} completed, {} failed",
            summary.completed, summary.failed
        );
        (transactions, summary)
    }

    /// Tick now, then every `frequency` until `shutdown` resolves.
    /// A run in progress is finished before shutting down.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        let mut interval = tokio::time::interval(self.frequency);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested, stopping the scheduler");
                    return;
                }
                _ = interval.tick() => {
                    self.tick().await;
                }
            }
        }
    }
}
