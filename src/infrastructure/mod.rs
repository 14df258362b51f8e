//! Infrastructure layer - exchange and notification adapters

pub mod kraken;
pub mod notify;
