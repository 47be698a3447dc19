use crate::value_objects::cohort::Cohort;

pub const POSTS_SUFFIX: &str = "-weibo.csv";
pub const TOP_USERS_FILE: &str = "top-userid.csv";
pub const SUMMARY_FILE: &str = "lag-summary.json";

pub fn posts_file(symbol: &str) -> String {
    format!("{symbol}{POSTS_SUFFIX}")
}

pub fn price_file(symbol: &str) -> String {
    format!("{symbol}-price.csv")
}

pub fn classification_file(symbol: &str, cohort: Cohort) -> String {
    format!("ClassificationResult-{symbol}-{cohort}.csv")
}

/// Cohort is appended without a separator (`sentimentDaily-上证指数expert.csv`); downstream
/// plotting scripts expect this name.
pub fn daily_series_file(symbol: &str, cohort: Cohort) -> String {
    format!("sentimentDaily-{symbol}{cohort}.csv")
}

pub fn symbol_from_posts_file(file_name: &str) -> Option<&str> {
    file_name
        .strip_suffix(POSTS_SUFFIX)
        .filter(|symbol| !symbol.is_empty())
}
