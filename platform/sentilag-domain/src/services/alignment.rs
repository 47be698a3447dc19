use crate::value_objects::aligned_point::AlignedPoint;
use crate::value_objects::daily_price::DailyPrice;
use crate::value_objects::daily_sentiment::DailySentiment;
use chrono::NaiveDate;
use std::collections::BTreeMap;

/// Inner join on date, ascending. Dates missing from either side are dropped.
pub fn inner_join(sentiment: &[DailySentiment], prices: &[DailyPrice]) -> Vec<AlignedPoint> {
    let price_by_date: BTreeMap<NaiveDate, f64> = prices
        .iter()
        .map(|p| (p.date, p.opening_price))
        .collect();
    let mut aligned: Vec<AlignedPoint> = sentiment
        .iter()
        .filter_map(|s| {
            price_by_date.get(&s.date).map(|price| AlignedPoint {
                date: s.date,
                sentiment: s.mean_label,
                price: *price,
            })
        })
        .collect();
    aligned.sort_by_key(|p| p.date);
    aligned
}

/// Aligned series with sentiment shifted forward by `lag` rows.
///
/// Row `i` pairs the price (and date) of aligned row `i` with the sentiment of row `i + lag`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LaggedSeries {
    pub lag: usize,
    pub dates: Vec<NaiveDate>,
    pub sentiment: Vec<f64>,
    pub price: Vec<f64>,
}

impl LaggedSeries {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn points(&self) -> Vec<AlignedPoint> {
        self.dates
            .iter()
            .zip(self.sentiment.iter())
            .zip(self.price.iter())
            .map(|((date, sentiment), price)| AlignedPoint {
                date: *date,
                sentiment: *sentiment,
                price: *price,
            })
            .collect()
    }
}

pub fn shift_by_lag(aligned: &[AlignedPoint], lag: usize) -> LaggedSeries {
    let kept = aligned.len().saturating_sub(lag);
    LaggedSeries {
        lag,
        dates: aligned[..kept].iter().map(|p| p.date).collect(),
        sentiment: aligned[aligned.len() - kept..]
            .iter()
            .map(|p| p.sentiment)
            .collect(),
        price: aligned[..kept].iter().map(|p| p.price).collect(),
    }
}
