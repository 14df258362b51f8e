//! Turns a spend amount into a market buy order

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use crate::domain::exchange::{MarketDataProvider, OrderGateway, OrderRequest, OrderSide, OrderType};
use crate::domain::transaction::OrderResult;
use crate::shared::errors::ProviderError;
use crate::shared::types::DcaPair;
use crate::shared::utils::format_volume;

use super::{ORDER_EXPIRY_SECS, STAGED_ORDER_ID};

#[async_trait]
pub trait OrderSubmitter: Send + Sync {
    /// Buy `pair.amount` worth of the pair at market, fees included
    async fn place_order(&self, pair: &DcaPair) -> Result<OrderResult, ProviderError>;
}

/// Net order volume for a gross spend: the fee is taken from the volume,
/// so `amount` always denotes what leaves the account.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSizing {
    pub gross_volume: f64,
    pub fee: f64,
    pub net_volume: f64,
}

impl OrderSizing {
    pub fn compute(amount: f64, ask_price: f64, fee_percentage: f64) -> Self {
        let gross_volume = amount / ask_price;
        let fee = gross_volume * fee_percentage / 100.0;
        Self {
            gross_volume,
            fee,
            net_volume: gross_volume - fee,
        }
    }
}

pub struct MarketOrderSubmitter {
    market_data: Arc<dyn MarketDataProvider>,
    gateway: Arc<dyn OrderGateway>,
    dry_run: bool,
}

impl MarketOrderSubmitter {
    pub fn new(
        market_data: Arc<dyn MarketDataProvider>,
        gateway: Arc<dyn OrderGateway>,
        dry_run: bool,
    ) -> Self {
        Self {
            market_data,
            gateway,
            dry_run,
        }
    }
}

#[async_trait]
impl OrderSubmitter for MarketOrderSubmitter {
    async fn place_order(&self, pair: &DcaPair) -> Result<OrderResult, ProviderError> {
        let fee_percentage = self.market_data.fee(&pair.pair).await?;
        info!("[{}] Fee: {:.3}%", pair.pair, fee_percentage);

        let ask_price = self.market_data.ask_price(&pair.pair).await?;
        info!("[{}] Ask price: {:.2}", pair.pair, ask_price);
        if ask_price <= 0.0 {
            return Err(ProviderError::InvalidPrice {
                pair: pair.pair.clone(),
                price: ask_price,
            });
        }

        let sizing = OrderSizing::compute(pair.amount, ask_price, fee_percentage);

        let request = OrderRequest {
            pair: pair.pair.clone(),
            side: OrderSide::Buy,
            order_type: OrderType::Market,
            volume: format_volume(sizing.net_volume),
            expire_after_secs: ORDER_EXPIRY_SECS,
            validate: self.dry_run,
        };
        let transaction_ids = self.gateway.add_order(&request).await?;

        let id = if self.dry_run {
            STAGED_ORDER_ID.to_string()
        } else {
            transaction_ids
                .into_iter()
                .next()
                .filter(|id| !id.is_empty())
                .ok_or(ProviderError::MissingOrderId)?
        };

        Ok(OrderResult {
            id,
            market_price: ask_price,
            volume: sizing.net_volume,
            fee: sizing.fee,
        })
    }
}
