use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AlignedPoint {
    pub date: NaiveDate,
    pub sentiment: f64,
    pub price: f64,
}
