use crate::reporting;
use sentilag_domain::repositories::artifacts::ArtifactWriter;
use sentilag_domain::services::alignment::LaggedSeries;
use sentilag_domain::value_objects::sentiment_record::SentimentRecord;
use std::fs;
use std::path::Path;
use std::time::Instant;

#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemArtifactWriter;

impl FilesystemArtifactWriter {
    pub fn new() -> Self {
        Self
    }
}

fn record_write_metrics(kind: &'static str, start: Instant, result: &Result<(), String>) {
    let result_label = if result.is_ok() { "ok" } else { "err" };
    metrics::counter!(
        "sentilag.infra.artifacts.write.calls_total",
        "kind" => kind,
        "result" => result_label
    )
    .increment(1);
    metrics::histogram!("sentilag.infra.artifacts.write_ms", "kind" => kind, "result" => result_label)
        .record(start.elapsed().as_millis() as f64);
}

impl ArtifactWriter for FilesystemArtifactWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String> {
        let start = Instant::now();
        let result = fs::create_dir_all(path)
            .map_err(|err| format!("failed to create dir {}: {}", path.display(), err));
        record_write_metrics("ensure_dir", start, &result);
        result
    }

    fn write_aligned_csv(&self, path: &Path, series: &LaggedSeries) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_aligned_csv(path, series);
        record_write_metrics("aligned_csv", start, &result);
        if result.is_ok() {
            tracing::debug!(path = %path.display(), rows = series.len(), lag = series.lag, "aligned series written");
        }
        result
    }

    fn write_records_csv(&self, path: &Path, records: &[SentimentRecord]) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_records_csv(path, records);
        record_write_metrics("records_csv", start, &result);
        result
    }

    fn write_user_ids_csv(&self, path: &Path, user_ids: &[String]) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_user_ids_csv(path, user_ids);
        record_write_metrics("user_ids_csv", start, &result);
        result
    }

    fn write_summary_json(&self, path: &Path, value: &serde_json::Value) -> Result<(), String> {
        let start = Instant::now();
        let result = reporting::write_json_pretty(path, value);
        record_write_metrics("summary_json", start, &result);
        result
    }
}
