//! Domain layer - core business logic and entities

pub mod exchange;
pub mod execution;
pub mod investing;
pub mod transaction;
