pub mod aggregator;
pub mod amortization;
pub mod metrics;
mod settlement_engine;

pub use settlement_engine::SettlementEngine;
