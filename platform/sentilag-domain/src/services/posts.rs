use crate::value_objects::classification::Classification;
use crate::value_objects::raw_post::{PreparedPost, RawPost};
use crate::value_objects::sentiment_record::SentimentRecord;
use serde::Serialize;

pub const DEFAULT_MAX_SEQ_LENGTH: usize = 128;
/// Input slots reserved ahead of the text (`[CLS]`).
pub const RESERVED_SLOTS: usize = 1;
pub const UNKNOWN_TOKEN: &str = "[UNK]";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct PreparationReport {
    pub input_rows: usize,
    pub skipped_incomplete: usize,
    pub truncated: usize,
    pub prepared: usize,
}

/// Publish date is everything before the first space of the scraped time.
pub fn publish_date(time: &str) -> &str {
    time.trim().split(' ').next().unwrap_or_default()
}

/// Bounds `text` to what fits the model input. Returns the bounded text and whether it was cut.
pub fn bound_text(text: &str, max_seq_length: usize) -> (String, bool) {
    let limit = max_seq_length.saturating_sub(RESERVED_SLOTS);
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return (UNKNOWN_TOKEN.to_string(), false);
    }
    if trimmed.chars().count() > limit {
        (trimmed.chars().take(limit).collect(), true)
    } else {
        (trimmed.to_string(), false)
    }
}

pub fn prepare_posts(posts: &[RawPost], max_seq_length: usize) -> (Vec<PreparedPost>, PreparationReport) {
    let mut report = PreparationReport {
        input_rows: posts.len(),
        ..PreparationReport::default()
    };
    let mut prepared = Vec::with_capacity(posts.len());

    for post in posts {
        if post.text.trim().is_empty() || post.user_id.trim().is_empty() || post.time.trim().is_empty()
        {
            report.skipped_incomplete += 1;
            continue;
        }
        let (model_text, truncated) = bound_text(&post.text, max_seq_length);
        if truncated {
            report.truncated += 1;
        }
        prepared.push(PreparedPost {
            id: prepared.len() as u64,
            user_id: post.user_id.trim().to_string(),
            text: post.text.clone(),
            model_text,
            date: publish_date(&post.time).to_string(),
        });
    }

    report.prepared = prepared.len();
    (prepared, report)
}

pub fn to_records(
    prepared: &[PreparedPost],
    classifications: &[Classification],
) -> Result<Vec<SentimentRecord>, String> {
    if prepared.len() != classifications.len() {
        return Err(format!(
            "classification count mismatch: {} posts, {} labels",
            prepared.len(),
            classifications.len()
        ));
    }
    Ok(prepared
        .iter()
        .zip(classifications.iter())
        .map(|(post, classification)| SentimentRecord {
            id: post.id,
            user_id: post.user_id.clone(),
            text: post.text.clone(),
            date: post.date.clone(),
            predicted_label: classification.label,
        })
        .collect())
}

/// Result files are consumed by naive comma splitters, so ASCII commas in text become `，`.
pub fn fullwidth_commas(text: &str) -> String {
    text.replace(',', "，")
}

/// Engagement counters as scraped: plain integers, floats, or `1.2万` (×10 000).
/// Anything unreadable counts as zero.
pub fn parse_engagement(raw: &str) -> u64 {
    let trimmed = raw.trim().trim_end_matches('+');
    if trimmed.is_empty() {
        return 0;
    }
    if let Ok(value) = trimmed.parse::<u64>() {
        return value;
    }
    let (number, scale) = match trimmed.strip_suffix('万') {
        Some(stripped) => (stripped, 10_000.0),
        None => (trimmed, 1.0),
    };
    match number.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => (value * scale).round() as u64,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(text: &str, user_id: &str, time: &str) -> RawPost {
        RawPost {
            text: text.to_string(),
            user_id: user_id.to_string(),
            time: time.to_string(),
            ..RawPost::default()
        }
    }

    #[test]
    fn publish_date_takes_first_token() {
        assert_eq!(publish_date("2021-01-04 09:30"), "2021-01-04");
        assert_eq!(publish_date("2021-01-04"), "2021-01-04");
        assert_eq!(publish_date(""), "");
    }

    #[test]
    fn bound_text_reserves_cls_slot() {
        let (text, cut) = bound_text("一二三四五", 4);
        assert_eq!(text, "一二三");
        assert!(cut);
        let (text, cut) = bound_text("一二三", 4);
        assert_eq!(text, "一二三");
        assert!(!cut);
        let (text, _) = bound_text("   ", 4);
        assert_eq!(text, UNKNOWN_TOKEN);
    }

    #[test]
    fn prepare_skips_incomplete_rows_and_numbers_sequentially() {
        let posts = vec![
            post("大盘要涨", "1234567890", "2021-01-04 09:30"),
            post("", "1234567890", "2021-01-04 09:31"),
            post("跌停了", "", "2021-01-04 09:32"),
            post("稳住", "2234567890", "2021-01-05 10:00"),
        ];
        let (prepared, report) = prepare_posts(&posts, DEFAULT_MAX_SEQ_LENGTH);
        assert_eq!(report.input_rows, 4);
        assert_eq!(report.skipped_incomplete, 2);
        assert_eq!(report.prepared, 2);
        assert_eq!(prepared[0].id, 0);
        assert_eq!(prepared[1].id, 1);
        assert_eq!(prepared[1].date, "2021-01-05");
    }

    #[test]
    fn to_records_requires_one_label_per_post() {
        let (prepared, _) = prepare_posts(
            &[post("a", "1", "2021-01-04 00:00"), post("b", "2", "2021-01-04 00:00")],
            DEFAULT_MAX_SEQ_LENGTH,
        );
        let labels = vec![Classification {
            label: 1,
            probabilities: vec![0.2, 0.8],
        }];
        assert!(to_records(&prepared, &labels).is_err());

        let labels = vec![
            Classification {
                label: 1,
                probabilities: vec![0.2, 0.8],
            },
            Classification {
                label: 0,
                probabilities: vec![0.9, 0.1],
            },
        ];
        let records = to_records(&prepared, &labels).expect("records");
        assert_eq!(records[1].predicted_label, 0);
        assert_eq!(records[1].text, "b");
    }

    #[test]
    fn engagement_parsing() {
        assert_eq!(parse_engagement("42"), 42);
        assert_eq!(parse_engagement("1.5万"), 15_000);
        assert_eq!(parse_engagement("100万+"), 1_000_000);
        assert_eq!(parse_engagement("赞"), 0);
        assert_eq!(parse_engagement(""), 0);
    }

    #[test]
    fn commas_become_fullwidth() {
        assert_eq!(fullwidth_commas("涨,涨,涨"), "涨，涨，涨");
    }
}
