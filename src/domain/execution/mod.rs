//! Execution domain - order sizing and submission

mod order_submitter;

pub use order_submitter::{MarketOrderSubmitter, OrderSizing, OrderSubmitter};

/// Orders not filled within this window are dropped by the exchange
pub const ORDER_EXPIRY_SECS: u64 = 300;

/// Order id reported for validate-only orders
pub const STAGED_ORDER_ID: &str = "STAGED";
