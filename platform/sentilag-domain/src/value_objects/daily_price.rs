use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailyPrice {
    pub date: NaiveDate,
    pub opening_price: f64,
}
