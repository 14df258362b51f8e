//! Kraken exchange adapter

pub mod client;
pub mod transport;
pub mod types;

pub use client::KrakenClient;
pub use transport::{HttpTransport, KrakenTransport};
