pub mod chart;
pub mod config;
pub mod market_data;
pub mod rate;
pub mod signals;
pub mod stats;
