//! HTTP route handlers.

pub mod health;
pub mod manual;
pub mod metrics;
pub mod orders;
