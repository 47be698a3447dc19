use chrono::NaiveDate;
use proptest::prelude::*;
use sentilag_domain::services::aggregation::aggregate_daily;
use sentilag_domain::services::alignment::shift_by_lag;
use sentilag_domain::services::correlation::pearson;
use sentilag_domain::services::lag_search::{search_best_lag, PersistPolicy};
use sentilag_domain::value_objects::aligned_point::AlignedPoint;
use sentilag_domain::value_objects::sentiment_record::SentimentRecord;

fn day(offset: usize) -> NaiveDate {
    NaiveDate::from_ymd_opt(2021, 1, 1)
        .and_then(|d| d.checked_add_days(chrono::Days::new(offset as u64)))
        .expect("valid date")
}

fn aligned(values: &[(f64, f64)]) -> Vec<AlignedPoint> {
    values
        .iter()
        .enumerate()
        .map(|(idx, (sentiment, price))| AlignedPoint {
            date: day(idx),
            sentiment: *sentiment,
            price: *price,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 64,
        .. ProptestConfig::default()
    })]

    #[test]
    fn pearson_outputs_are_bounded(pairs in prop::collection::vec((0.0f64..1.0, 1.0f64..10_000.0), 3..120)) {
        let x: Vec<f64> = pairs.iter().map(|p| p.0).collect();
        let y: Vec<f64> = pairs.iter().map(|p| p.1).collect();
        if let Ok(result) = pearson(&x, &y) {
            prop_assert!((-1.0..=1.0).contains(&result.coefficient));
            prop_assert!((0.0..=1.0).contains(&result.p_value));
            prop_assert_eq!(result.samples, pairs.len());
        }
    }

    #[test]
    fn shifted_series_has_n_minus_lag_rows(len in 0usize..60, lag in 0usize..80) {
        let points = aligned(&vec![(0.5, 10.0); len]);
        let shifted = shift_by_lag(&points, lag);
        prop_assert_eq!(shifted.len(), len.saturating_sub(lag));
        prop_assert_eq!(shifted.sentiment.len(), shifted.price.len());
        if let Some(first) = shifted.dates.first() {
            prop_assert_eq!(*first, day(0));
        }
    }

    #[test]
    fn daily_means_stay_within_label_range(labels in prop::collection::vec((0i64..2, 0usize..5), 1..200)) {
        let records: Vec<SentimentRecord> = labels
            .iter()
            .enumerate()
            .map(|(idx, (label, offset))| SentimentRecord {
                id: idx as u64,
                user_id: "1234567890".to_string(),
                text: format!("post {idx}"),
                date: day(*offset).format("%Y-%m-%d").to_string(),
                predicted_label: *label,
            })
            .collect();
        let (daily, report) = aggregate_daily(&records, 10).expect("aggregate");
        prop_assert_eq!(report.discarded_over_length, 0);
        prop_assert!(daily.windows(2).all(|w| w[0].date < w[1].date));
        prop_assert!(daily.iter().all(|d| (0.0..=1.0).contains(&d.mean_label)));
    }

    #[test]
    fn best_lag_is_the_largest_magnitude(pairs in prop::collection::vec((0.0f64..1.0, 1.0f64..500.0), 40..80)) {
        let points = aligned(&pairs);
        if let Ok(outcome) = search_best_lag(&points, &[3, 5, 7, 9, 12], PersistPolicy::LastEvaluated) {
            let max_abs = outcome
                .evaluations
                .iter()
                .map(|e| e.coefficient.abs())
                .fold(0.0f64, f64::max);
            prop_assert!((outcome.best_coefficient().abs() - max_abs).abs() < 1e-12);
            prop_assert_eq!(outcome.persisted.lag, 12);
        }
    }
}
