use crate::schema::{record_read_metrics, require_headers};
use sentilag_domain::repositories::sentiment::SentimentRepository;
use sentilag_domain::value_objects::sentiment_record::SentimentRecord;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;
use std::time::Instant;

pub(crate) const COLUMNS: [&str; 5] = ["ID", "user_id", "Text", "Date", "Expected"];

/// Row layout of `ClassificationResult-*.csv`.
#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct ClassificationRow {
    #[serde(rename = "ID")]
    pub id: u64,
    pub user_id: String,
    #[serde(rename = "Text")]
    pub text: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Expected")]
    pub expected: i64,
}

impl From<ClassificationRow> for SentimentRecord {
    fn from(row: ClassificationRow) -> Self {
        SentimentRecord {
            id: row.id,
            user_id: row.user_id,
            text: row.text,
            date: row.date,
            predicted_label: row.expected,
        }
    }
}

impl From<&SentimentRecord> for ClassificationRow {
    fn from(record: &SentimentRecord) -> Self {
        ClassificationRow {
            id: record.id,
            user_id: record.user_id.clone(),
            text: record.text.clone(),
            date: record.date.clone(),
            expected: record.predicted_label,
        }
    }
}

pub fn load_csv(path: &Path) -> Result<Vec<SentimentRecord>, String> {
    let file = File::open(path)
        .map_err(|err| format!("failed to open sentiment CSV {}: {}", path.display(), err))?;
    let mut reader = csv::Reader::from_reader(file);
    let headers = reader
        .headers()
        .map_err(|err| format!("failed to read sentiment CSV header {}: {}", path.display(), err))?
        .clone();
    require_headers(&headers, &COLUMNS, path)?;

    let mut records = Vec::new();
    for result in reader.deserialize::<ClassificationRow>() {
        let row = result.map_err(|err| format!("failed to parse CSV row: {}", err))?;
        records.push(SentimentRecord::from(row));
    }
    Ok(records)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemSentimentRepository;

impl SentimentRepository for FilesystemSentimentRepository {
    fn load_records(&self, path: &Path) -> Result<Vec<SentimentRecord>, String> {
        let start = Instant::now();
        let result = load_csv(path);
        record_read_metrics("sentiment_csv", start, &result);
        result
    }

    fn exists(&self, path: &Path) -> bool {
        path.is_file()
    }
}
