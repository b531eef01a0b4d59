//! HTTP API handlers for pacto-agent

pub mod contract;
pub mod health;

pub use contract::contract_routes;
pub use health::health_routes;
