//! Failure notification channels

pub mod email;

pub use email::EmailNotifier;
