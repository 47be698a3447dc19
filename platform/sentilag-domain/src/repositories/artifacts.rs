use crate::services::alignment::LaggedSeries;
use crate::value_objects::sentiment_record::SentimentRecord;
use std::path::Path;

pub trait ArtifactWriter {
    fn ensure_dir(&self, path: &Path) -> Result<(), String>;
    /// `date,sentiment,price` rows for a lag-shifted series.
    fn write_aligned_csv(&self, path: &Path, series: &LaggedSeries) -> Result<(), String>;
    /// `ID,user_id,Text,Date,Expected` rows.
    fn write_records_csv(&self, path: &Path, records: &[SentimentRecord]) -> Result<(), String>;
    fn write_user_ids_csv(&self, path: &Path, user_ids: &[String]) -> Result<(), String>;
    fn write_summary_json(&self, path: &Path, value: &serde_json::Value) -> Result<(), String>;
}
