//! Kraken REST payloads

use serde::Deserialize;
use std::collections::HashMap;

use crate::shared::errors::ProviderError;
use crate::shared::types::Currency;

/// Every Kraken answer: `{"error": [...], "result": {...}}`
#[derive(Debug, Deserialize)]
pub struct KrakenResponse<T> {
    #[serde(default)]
    pub error: Vec<String>,
    pub result: Option<T>,
}

impl<T> KrakenResponse<T> {
    pub fn into_result(self, endpoint: &str) -> Result<T, ProviderError> {
        if !self.error.is_empty() {
            return Err(ProviderError::Api(self.error.join(", ")));
        }
        self.result.ok_or_else(|| ProviderError::MissingField {
            endpoint: endpoint.to_string(),
            field: "result".to_string(),
        })
    }
}

/// `Balance` result. Kraken omits assets the account never held.
#[derive(Debug, Default, Deserialize)]
pub struct BalanceResponse {
    #[serde(rename = "ZEUR")]
    pub zeur: Option<String>,
    #[serde(rename = "ZUSD")]
    pub zusd: Option<String>,
    #[serde(rename = "ZGBP")]
    pub zgbp: Option<String>,
    #[serde(rename = "ZCAD")]
    pub zcad: Option<String>,
    #[serde(rename = "ZJPY")]
    pub zjpy: Option<String>,
    #[serde(rename = "ZCHF")]
    pub zchf: Option<String>,
    #[serde(rename = "ZAUD")]
    pub zaud: Option<String>,
}

impl BalanceResponse {
    pub fn amount(&self, currency: Currency) -> Option<&str> {
        let field = match currency {
            Currency::ZEUR => &self.zeur,
            Currency::ZUSD => &self.zusd,
            Currency::ZGBP => &self.zgbp,
            Currency::ZCAD => &self.zcad,
            Currency::ZJPY => &self.zjpy,
            Currency::ZCHF => &self.zchf,
            Currency::ZAUD => &self.zaud,
        };
        field.as_deref()
    }
}

/// `TradeVolume` result with `fee-info`
#[derive(Debug, Deserialize)]
pub struct TradeVolumeResponse {
    #[serde(default)]
    pub fees: HashMap<String, FeeInfo>,
}

#[derive(Debug, Deserialize)]
pub struct FeeInfo {
    pub fee: String,
}

/// `Ticker` result, keyed by pair name
pub type TickerResponse = HashMap<String, TickerInfo>;

#[derive(Debug, Deserialize)]
pub struct TickerInfo {
    /// Ask: `[price, whole lot volume, lot volume]`
    pub a: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct AddOrderResponse {
    pub descr: OrderDescription,
    /// Absent for validate-only orders
    #[serde(default)]
    pub txid: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrderDescription {
    pub order: String,
}

/// Look up a per-pair entry. Kraken may answer under its canonical pair name
/// (`XXBTZEUR` for `XBTEUR`); a single entry is taken as the requested pair.
pub fn pair_entry<'a, V>(entries: &'a HashMap<String, V>, pair: &str) -> Option<&'a V> {
    entries.get(pair).or_else(|| {
        if entries.len() == 1 {
            entries.values().next()
        } else {
            None
        }
    })
}

pub fn parse_number(field: &str, value: &str) -> Result<f64, ProviderError> {
    match value.trim().parse::<f64>() {
        Ok(number) if number.is_finite() => Ok(number),
        _ => Err(ProviderError::numeric_parse(field, value)),
    }
}
