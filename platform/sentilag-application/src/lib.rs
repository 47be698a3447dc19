pub mod analysis;
pub mod classification;
pub mod cohorts;
pub mod config;
pub mod meta;
mod shared;
pub mod validation;
