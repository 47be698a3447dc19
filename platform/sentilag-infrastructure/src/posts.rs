use crate::schema::{record_read_metrics, require_headers};
use sentilag_domain::repositories::posts::PostRepository;
use sentilag_domain::services::dataset::symbol_from_posts_file;
use sentilag_domain::services::posts::parse_engagement;
use sentilag_domain::value_objects::raw_post::RawPost;
use serde::Deserialize;
use std::fs::{self, File};
use std::path::Path;
use std::time::Instant;

const REQUIRED_COLUMNS: [&str; 3] = ["text", "user_id", "time"];

#[derive(Debug, Deserialize)]
struct PostRecord {
    text: String,
    user_id: String,
    time: String,
    #[serde(rename = "点赞数", default)]
    likes: String,
    #[serde(rename = "评论数", default)]
    comments: String,
    #[serde(rename = "转发数", default)]
    reposts: String,
}

pub fn load_csv(path: &Path) -> Result<Vec<RawPost>, String> {
    let file = File::open(path)
        .map_err(|err| format!("failed to open posts CSV {}: {}", path.display(), err))?;
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let headers = reader
        .headers()
        .map_err(|err| format!("failed to read posts CSV header {}: {}", path.display(), err))?
        .clone();
    require_headers(&headers, &REQUIRED_COLUMNS, path)?;

    let mut posts = Vec::new();
    for result in reader.deserialize::<PostRecord>() {
        let record = result.map_err(|err| format!("failed to parse CSV row: {}", err))?;
        posts.push(RawPost {
            text: record.text,
            user_id: record.user_id,
            time: record.time,
            likes: parse_engagement(&record.likes),
            comments: parse_engagement(&record.comments),
            reposts: parse_engagement(&record.reposts),
        });
    }
    Ok(posts)
}

#[derive(Debug, Default, Clone, Copy)]
pub struct FilesystemPostRepository;

impl PostRepository for FilesystemPostRepository {
    fn load_posts(&self, path: &Path) -> Result<Vec<RawPost>, String> {
        let start = Instant::now();
        let result = load_csv(path);
        record_read_metrics("posts_csv", start, &result);
        if let Ok(posts) = &result {
            tracing::debug!(path = %path.display(), rows = posts.len(), "posts loaded");
        }
        result
    }

    fn discover_symbols(&self, dir: &Path) -> Result<Vec<String>, String> {
        let entries = fs::read_dir(dir)
            .map_err(|err| format!("failed to list dataset dir {}: {}", dir.display(), err))?;
        let mut symbols = Vec::new();
        for entry in entries {
            let entry =
                entry.map_err(|err| format!("failed to read entry in {}: {}", dir.display(), err))?;
            if !entry.path().is_file() {
                continue;
            }
            if let Some(symbol) = entry.file_name().to_str().and_then(symbol_from_posts_file) {
                symbols.push(symbol.to_string());
            }
        }
        symbols.sort();
        Ok(symbols)
    }
}
