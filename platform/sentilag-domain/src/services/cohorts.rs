use crate::value_objects::raw_post::RawPost;
use crate::value_objects::sentiment_record::SentimentRecord;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

pub const DEFAULT_EXPERT_TOP_FRACTION: f64 = 0.2;
pub const DEFAULT_USER_ID_LEN: usize = 10;

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct CohortSplitReport {
    pub input_records: usize,
    pub dropped_bad_user_id: usize,
    pub dropped_duplicate_text: usize,
    pub dropped_not_expert: usize,
    pub kept: usize,
}

/// Authors of the most-engaged posts, ranked by (likes, comments, reposts) descending.
/// The top `fraction` of posts (floored) is taken; ids are returned once, in rank order.
pub fn top_users(posts: &[RawPost], fraction: f64) -> Vec<String> {
    let mut ranked: Vec<&RawPost> = posts.iter().collect();
    ranked.sort_by(|a, b| {
        (b.likes, b.comments, b.reposts).cmp(&(a.likes, a.comments, a.reposts))
    });
    let take = (posts.len() as f64 * fraction).floor() as usize;

    let mut seen = BTreeSet::new();
    let mut users = Vec::new();
    for post in ranked.into_iter().take(take) {
        let id = post.user_id.trim();
        if id.is_empty() {
            continue;
        }
        if seen.insert(id.to_string()) {
            users.push(id.to_string());
        }
    }
    users
}

/// Derives the expert cohort from the normal one: well-formed user ids only, one record per
/// distinct text (the last occurrence wins), restricted to `experts`.
pub fn split_expert(
    records: &[SentimentRecord],
    experts: &BTreeSet<String>,
    user_id_len: usize,
) -> (Vec<SentimentRecord>, CohortSplitReport) {
    let mut report = CohortSplitReport {
        input_records: records.len(),
        ..CohortSplitReport::default()
    };

    let well_formed: Vec<&SentimentRecord> = records
        .iter()
        .filter(|r| r.user_id.trim().chars().count() == user_id_len)
        .collect();
    report.dropped_bad_user_id = records.len() - well_formed.len();

    let mut last_by_text: HashMap<&str, usize> = HashMap::new();
    for (idx, record) in well_formed.iter().enumerate() {
        last_by_text.insert(record.text.as_str(), idx);
    }

    let mut kept = Vec::new();
    for (idx, record) in well_formed.iter().enumerate() {
        if last_by_text.get(record.text.as_str()) != Some(&idx) {
            report.dropped_duplicate_text += 1;
            continue;
        }
        if !experts.contains(record.user_id.trim()) {
            report.dropped_not_expert += 1;
            continue;
        }
        kept.push((*record).clone());
    }

    report.kept = kept.len();
    (kept, report)
}
