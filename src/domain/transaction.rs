//! One attempt to invest into one pair, and its outcome

use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use std::fmt;

use crate::shared::errors::InvestError;

/// What the order submitter reports for a placed order
#[derive(Debug, Clone, PartialEq)]
pub struct OrderResult {
    pub id: String,
    pub market_price: f64,
    pub volume: f64,
    pub fee: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    id: String,
    timestamp: DateTime<Utc>,
    pair: String,
    market_price: f64,
    filled_amount: f64,
    fee: f64,
    #[serde(serialize_with = "serialize_failure")]
    failure: Option<InvestError>,
}

fn serialize_failure<S>(failure: &Option<InvestError>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match failure {
        Some(err) => serializer.serialize_some(&err.to_string()),
        None => serializer.serialize_none(),
    }
}

impl Transaction {
    pub fn new(pair: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            timestamp: Utc::now(),
            pair: pair.into(),
            market_price: 0.0,
            filled_amount: 0.0,
            fee: 0.0,
            failure: None,
        }
    }

    pub fn complete(&mut self, order: OrderResult) -> &mut Self {
        self.id = order.id;
        self.market_price = order.market_price;
        self.filled_amount = order.volume;
        self.fee = order.fee;
        self
    }

    /// Record the failure. Calling it again replaces the previous error,
    /// which is how a notification failure gets chained onto an order error.
    pub fn fail(&mut self, failure: InvestError) -> &mut Self {
        self.failure = Some(failure);
        self
    }

    pub fn status(&self) -> TransactionStatus {
        if self.failure.is_some() {
            TransactionStatus::Failed
        } else if !self.id.is_empty() {
            TransactionStatus::Completed
        } else {
            TransactionStatus::Pending
        }
    }

    pub fn is_failed(&self) -> bool {
        self.failure.is_some()
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }

    pub fn market_price(&self) -> f64 {
        self.market_price
    }

    pub fn filled_amount(&self) -> f64 {
        self.filled_amount
    }

    pub fn fee(&self) -> f64 {
        self.fee
    }

    pub fn failure(&self) -> Option<&InvestError> {
        self.failure.as_ref()
    }

    /// Take the failure out so it can be re-wrapped, leaving the slot empty
    pub(crate) fn take_failure(&mut self) -> Option<InvestError> {
        self.failure.take()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}][{}] {:.6} at {:.2} with {:.6} fee",
            self.id, self.pair, self.filled_amount, self.market_price, self.fee
        )?;
        if let Some(failure) = &self.failure {
            write!(f, " (failed: {})", failure)?;
        }
        Ok(())
    }
}
