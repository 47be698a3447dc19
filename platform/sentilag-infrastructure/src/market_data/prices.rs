use crate::schema::{record_read_metrics, require_headers};
use sentilag_domain::repositories::market_data::{PriceQuery, PriceRepository};
use sentilag_domain::services::price::{
    build_price_series, parse_price_row, PriceFormat, PriceReport,
};
use sentilag_domain::value_objects::daily_price::DailyPrice;
use serde::Deserialize;
use std::fs::File;
use std::path::Path;
use std::time::Instant;

const REQUIRED_COLUMNS: [&str; 2] = ["Date", "Open"];

/// Only the columns the analysis reads; Close/High/Low/Amount/Rate are ignored.
#[derive(Debug, Deserialize)]
struct PriceRecord {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Open")]
    open: String,
}

pub fn load_csv(path: &Path, format: PriceFormat) -> Result<(Vec<DailyPrice>, PriceReport), String> {
    let file = File::open(path)
        .map_err(|err| format!("failed to open price CSV {}: {}", path.display(), err))?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader
        .headers()
        .map_err(|err| format!("failed to read price CSV header {}: {}", path.display(), err))?
        .clone();
    require_headers(&headers, &REQUIRED_COLUMNS, path)?;

    let mut rows = Vec::new();
    for (idx, result) in reader.deserialize::<PriceRecord>().enumerate() {
        let record = result.map_err(|err| format!("failed to parse CSV row: {}", err))?;
        let row = parse_price_row(&record.date, &record.open, format)
            .map_err(|err| format!("{} row {}: {err}", path.display(), idx + 2))?;
        rows.push(row);
    }

    Ok(build_price_series(rows))
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemPriceRepository;

impl PriceRepository for FilesystemPriceRepository {
    fn load_prices(&self, query: &PriceQuery) -> Result<(Vec<DailyPrice>, PriceReport), String> {
        let span = tracing::info_span!(
            "infra.prices.load",
            path = %query.path.display(),
            format = ?query.format
        );
        let _enter = span.enter();

        let start = Instant::now();
        let result = load_csv(&query.path, query.format);
        record_read_metrics("price_csv", start, &result);
        if let Ok((rows, report)) = &result {
            tracing::debug!(rows = rows.len(), duplicates = report.duplicates, "prices loaded");
        }
        result
    }
}
