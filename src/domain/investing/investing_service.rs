//! Runs the DCA strategy once over every configured pair

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

use crate::domain::exchange::{BalanceProvider, FailureNotifier};
use crate::domain::execution::OrderSubmitter;
use crate::domain::transaction::Transaction;
use crate::shared::errors::InvestError;
use crate::shared::types::{Currency, DcaPair};

#[async_trait]
pub trait Investor: Send + Sync {
    /// One transaction per configured pair, in configuration order
    async fn invest(&self) -> Vec<Transaction>;
}

pub struct InvestingService {
    currency: Currency,
    pairs: Vec<DcaPair>,
    balance_provider: Arc<dyn BalanceProvider>,
    order_submitter: Arc<dyn OrderSubmitter>,
    notifier: Arc<dyn FailureNotifier>,
}

impl InvestingService {
    pub fn new(
        currency: Currency,
        pairs: Vec<DcaPair>,
        balance_provider: Arc<dyn BalanceProvider>,
        order_submitter: Arc<dyn OrderSubmitter>,
        notifier: Arc<dyn FailureNotifier>,
    ) -> Self {
        Self {
            currency,
            pairs,
            balance_provider,
            order_submitter,
            notifier,
        }
    }

    async fn invest_in_pair(&self, pair: &DcaPair) -> Transaction {
        let mut transaction = Transaction::new(pair.pair.clone());

        // Each pair checks the account again; nothing is reserved for later pairs.
        let balance = match self.balance_provider.balance(self.currency).await {
            Ok(balance) => balance,
            Err(e) => {
                transaction.fail(InvestError::BalanceUnavailable(e));
                return transaction;
            }
        };
        info!("Account balance: {:.2}{}", balance, self.currency.symbol());

        if balance < pair.amount {
            warn!(
                "[{}] Balance {:.2} is below the DCA amount {:.2}, skipping",
                pair.pair, balance, pair.amount
            );
            transaction.fail(InvestError::InsufficientBalance {
                balance,
                amount: pair.amount,
            });
            return transaction;
        }

        match self.order_submitter.place_order(pair).await {
            Ok(order) => {
                transaction.complete(order);
                info!("{}", transaction);
            }
            Err(e) => {
                transaction.fail(InvestError::OrderPlacement {
                    pair: pair.pair.clone(),
                    source: e,
                });
                info!("{}", transaction);

                if let Err(notify_err) = self.notifier.notify_failure(&transaction).await {
                    warn!("[{}] Failure notification failed: {}", pair.pair, notify_err);
                    if let Some(failure) = transaction.take_failure() {
                        transaction.fail(failure.with_notification_failure(notify_err));
                    }
                }
            }
        }

        transaction
    }
}

#[async_trait]
impl Investor for InvestingService {
    async fn invest(&self) -> Vec<Transaction> {
        let start = Instant::now();
        let mut transactions = Vec::with_capacity(self.pairs.len());

        for pair in &self.pairs {
            info!("Trading {}...", pair.pair);
            transactions.push(self.invest_in_pair(pair).await);
        }

        info!("Execution time: {:?}", start.elapsed());
        transactions
    }
}
