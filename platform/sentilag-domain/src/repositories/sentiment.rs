use crate::value_objects::sentiment_record::SentimentRecord;
use std::path::Path;

pub trait SentimentRepository {
    fn load_records(&self, path: &Path) -> Result<Vec<SentimentRecord>, String>;

    fn exists(&self, path: &Path) -> bool;
}
