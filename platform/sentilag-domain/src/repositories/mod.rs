pub mod artifacts;
pub mod classifier;
pub mod market_data;
pub mod posts;
pub mod sentiment;
