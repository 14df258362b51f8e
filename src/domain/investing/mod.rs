//! Investing domain - the per-pair DCA procedure

mod investing_service;

pub use investing_service::{InvestingService, Investor};
