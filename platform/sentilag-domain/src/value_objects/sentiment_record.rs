use serde::{Deserialize, Serialize};

/// One classified post. `date` is kept verbatim; validation happens during aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentRecord {
    pub id: u64,
    pub user_id: String,
    pub text: String,
    pub date: String,
    pub predicted_label: i64,
}
