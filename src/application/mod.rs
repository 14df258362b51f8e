//! Application layer - use cases and services

pub mod scheduler;

pub use scheduler::{RunSummary, Scheduler};
