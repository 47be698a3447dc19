use crate::services::price::{PriceFormat, PriceReport};
use crate::value_objects::daily_price::DailyPrice;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PriceQuery {
    pub path: PathBuf,
    pub format: PriceFormat,
}

pub trait PriceRepository {
    fn load_prices(&self, query: &PriceQuery) -> Result<(Vec<DailyPrice>, PriceReport), String>;
}
