pub mod aligned_point;
pub mod classification;
pub mod cohort;
pub mod daily_price;
pub mod daily_sentiment;
pub mod lag_evaluation;
pub mod raw_post;
pub mod sentiment_record;
