//! Error handling for the application

use thiserror::Error;

/// Errors raised by the exchange capabilities (balance, fee, ticker, order)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// Error strings reported by the exchange in its response envelope
    #[error("{0}")]
    Api(String),

    #[error("request failed: {0}")]
    Transport(String),

    #[error("malformed {endpoint} response: {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("{field} is missing from the {endpoint} response")]
    MissingField { endpoint: String, field: String },

    #[error("cannot parse {field} value {value:?} as a number")]
    NumericParse { field: String, value: String },

    #[error("the order response carries no transaction id")]
    MissingOrderId,

    #[error("{pair} ask price {price} is not positive")]
    InvalidPrice { pair: String, price: f64 },
}

impl ProviderError {
    pub fn numeric_parse(field: &str, value: &str) -> Self {
        ProviderError::NumericParse {
            field: field.to_string(),
            value: value.to_string(),
        }
    }
}

/// Errors raised while delivering a failure notification
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NotifyError {
    #[error("invalid email address {address:?}: {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("failed to build the transaction failure email : {0}")]
    Build(String),

    #[error("failed to connect the SMTP client : {0}")]
    Connect(String),

    #[error("failed to send the transaction failure email : {0}")]
    Send(String),

    #[error("{0}")]
    Other(String),
}

/// Why a single pair investment did not complete
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InvestError {
    #[error("account balance cannot be collected : {0}")]
    BalanceUnavailable(#[source] ProviderError),

    #[error("account balance {balance:.2} is less than the pair DCA amount {amount:.2}")]
    InsufficientBalance { balance: f64, amount: f64 },

    #[error("could not place order on {pair} : {source}")]
    OrderPlacement {
        pair: String,
        #[source]
        source: ProviderError,
    },

    /// The order failed and the failure email could not be delivered either.
    /// The order error stays the source of the chain.
    #[error("could not place order on {pair} : {source} : failed to notify {pair} transaction failure : {notify}")]
    NotificationFailed {
        pair: String,
        #[source]
        source: ProviderError,
        notify: NotifyError,
    },
}

impl InvestError {
    /// Whether the investing engine already tried to notify the operator
    /// about this failure.
    pub fn notification_attempted(&self) -> bool {
        matches!(
            self,
            InvestError::OrderPlacement { .. } | InvestError::NotificationFailed { .. }
        )
    }

    /// Re-wrap an order placement failure after its notification failed too.
    pub fn with_notification_failure(self, notify: NotifyError) -> Self {
        match self {
            InvestError::OrderPlacement { pair, source } => {
                InvestError::NotificationFailed { pair, source, notify }
            }
            other => other,
        }
    }
}

/// General application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Invalid duration {0:?}")]
    InvalidDuration(String),
}
