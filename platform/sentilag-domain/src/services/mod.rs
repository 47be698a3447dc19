pub mod aggregation;
pub mod alignment;
pub mod cohorts;
pub mod correlation;
pub mod dataset;
pub mod dates;
pub mod lag_search;
pub mod posts;
pub mod price;
