use serde::Serialize;

/// One scraped post as it appears in `<symbol>-weibo.csv`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RawPost {
    pub text: String,
    pub user_id: String,
    pub time: String,
    pub likes: u64,
    pub comments: u64,
    pub reposts: u64,
}

/// A post ready for the classifier: `model_text` is bounded to the model input length,
/// `text` keeps the full original for the result file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PreparedPost {
    pub id: u64,
    pub user_id: String,
    pub text: String,
    pub model_text: String,
    pub date: String,
}
