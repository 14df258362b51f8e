//! Exchange capabilities consumed by the investing engine

use async_trait::async_trait;
use std::fmt;

use crate::domain::transaction::Transaction;
use crate::shared::errors::{NotifyError, ProviderError};
use crate::shared::types::Currency;

/// Reports the available balance of a settlement currency
#[async_trait]
pub trait BalanceProvider: Send + Sync {
    async fn balance(&self, currency: Currency) -> Result<f64, ProviderError>;
}

/// Per-pair market data: trading fee and current ask price
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fee percentage for the pair (`0.26` means 0.26%)
    async fn fee(&self, pair: &str) -> Result<f64, ProviderError>;

    async fn ask_price(&self, pair: &str) -> Result<f64, ProviderError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSide {
    Buy,
}

impl fmt::Display for OrderSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderSide::Buy => f.write_str("buy"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderType {
    Market,
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderType::Market => f.write_str("market"),
        }
    }
}

/// Order as sent on the wire
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRequest {
    pub pair: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    /// Volume in base asset, already formatted
    pub volume: String,
    pub expire_after_secs: u64,
    /// Validate only, the exchange does not execute the order
    pub validate: bool,
}

/// Submits raw orders and returns the exchange transaction ids
#[async_trait]
pub trait OrderGateway: Send + Sync {
    async fn add_order(&self, order: &OrderRequest) -> Result<Vec<String>, ProviderError>;
}

/// Delivers a human readable alert for a failed transaction
#[async_trait]
pub trait FailureNotifier: Send + Sync {
    async fn notify_failure(&self, transaction: &Transaction) -> Result<(), NotifyError>;
}
