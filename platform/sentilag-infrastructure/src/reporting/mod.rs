use crate::sentiment::{ClassificationRow, COLUMNS};
use sentilag_domain::services::alignment::LaggedSeries;
use sentilag_domain::value_objects::sentiment_record::SentimentRecord;
use std::fs;
use std::path::Path;

pub fn write_aligned_csv(path: &Path, series: &LaggedSeries) -> Result<(), String> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|err| format!("failed to create aligned csv {}: {}", path.display(), err))?;
    wtr.write_record(["date", "sentiment", "price"])
        .map_err(|err| format!("failed to write aligned csv header: {}", err))?;

    for point in series.points() {
        wtr.write_record([
            point.date.format("%Y-%m-%d").to_string(),
            point.sentiment.to_string(),
            point.price.to_string(),
        ])
        .map_err(|err| format!("failed to write aligned row: {}", err))?;
    }

    wtr.flush()
        .map_err(|err| format!("failed to flush aligned csv: {}", err))
}

pub fn write_records_csv(path: &Path, records: &[SentimentRecord]) -> Result<(), String> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|err| format!("failed to create result csv {}: {}", path.display(), err))?;
    wtr.write_record(COLUMNS)
        .map_err(|err| format!("failed to write result csv header: {}", err))?;
    for record in records {
        wtr.serialize(ClassificationRow::from(record))
            .map_err(|err| format!("failed to write result row id={}: {}", record.id, err))?;
    }
    wtr.flush()
        .map_err(|err| format!("failed to flush result csv: {}", err))
}

pub fn write_user_ids_csv(path: &Path, user_ids: &[String]) -> Result<(), String> {
    let mut wtr = csv::Writer::from_path(path)
        .map_err(|err| format!("failed to create user id csv {}: {}", path.display(), err))?;
    wtr.write_record(["user_id"])
        .map_err(|err| format!("failed to write user id csv header: {}", err))?;
    for id in user_ids {
        wtr.write_record([id.as_str()])
            .map_err(|err| format!("failed to write user id row: {}", err))?;
    }
    wtr.flush()
        .map_err(|err| format!("failed to flush user id csv: {}", err))
}

pub fn write_json_pretty(path: &Path, value: &serde_json::Value) -> Result<(), String> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|err| format!("failed to serialize summary json: {err}"))?;
    fs::write(path, json)
        .map_err(|err| format!("failed to write summary json {}: {}", path.display(), err))
}
