use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DailySentiment {
    pub date: NaiveDate,
    pub mean_label: f64,
}
