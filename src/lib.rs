//! Kraken DCA Bot
//! Periodically buys a configured amount of each pair at market price

pub mod domain;
pub mod infrastructure;
pub mod application;
pub mod shared;

// Re-export main types for convenience
pub use application::Scheduler;
pub use domain::execution::MarketOrderSubmitter;
pub use domain::investing::{InvestingService, Investor};
pub use domain::transaction::Transaction;
pub use infrastructure::kraken::KrakenClient;
pub use infrastructure::notify::EmailNotifier;
pub use shared::config::{Config, ConfigLoader};
