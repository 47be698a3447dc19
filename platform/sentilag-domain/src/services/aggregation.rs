use crate::services::dates::parse_calendar_date;
use crate::value_objects::daily_sentiment::DailySentiment;
use crate::value_objects::sentiment_record::SentimentRecord;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_MAX_DATE_LEN: usize = 10;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct AggregationReport {
    pub input_records: usize,
    pub discarded_over_length: usize,
    pub discarded_empty: usize,
    pub distinct_dates: usize,
    pub first_discarded: Option<String>,
}

/// Averages predicted labels per calendar date.
///
/// Date strings longer than `max_date_len` characters are partial or relative timestamps that
/// slipped through scraping; they are counted in the report and skipped, as are blank dates. A
/// short date string that still fails to parse is an error.
pub fn aggregate_daily(
    records: &[SentimentRecord],
    max_date_len: usize,
) -> Result<(Vec<DailySentiment>, AggregationReport), String> {
    let mut report = AggregationReport {
        input_records: records.len(),
        ..AggregationReport::default()
    };
    let mut by_date: BTreeMap<NaiveDate, (f64, usize)> = BTreeMap::new();

    for record in records {
        if record.date.trim().is_empty() {
            report.discarded_empty += 1;
            continue;
        }
        if record.date.chars().count() > max_date_len {
            report.discarded_over_length += 1;
            if report.first_discarded.is_none() {
                report.first_discarded = Some(record.date.clone());
            }
            continue;
        }

        let date = parse_calendar_date(&record.date)
            .map_err(|err| format!("record id={}: {err}", record.id))?;
        let slot = by_date.entry(date).or_insert((0.0, 0));
        slot.0 += record.predicted_label as f64;
        slot.1 += 1;
    }

    report.distinct_dates = by_date.len();
    let daily = by_date
        .into_iter()
        .map(|(date, (sum, count))| DailySentiment {
            date,
            mean_label: sum / count as f64,
        })
        .collect();

    Ok((daily, report))
}
