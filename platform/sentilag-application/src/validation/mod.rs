use crate::config::Config;
use crate::shared::{dataset_dir, price_query, resolve_symbols};
use sentilag_domain::repositories::market_data::PriceRepository;
use sentilag_domain::repositories::posts::PostRepository;
use sentilag_domain::repositories::sentiment::SentimentRepository;
use sentilag_domain::services::aggregation::aggregate_daily;
use sentilag_domain::services::alignment::inner_join;
use sentilag_domain::services::dataset::{classification_file, posts_file};
use sentilag_domain::services::posts::prepare_posts;
use sentilag_domain::services::price::PriceReport;
use std::time::Instant;
use tracing::{info_span, warn};

/// Loads every input of every symbol and reports counts without running the lag search.
///
/// In strict mode any discarded row, missing cohort file, or join too short for the largest
/// candidate lag fails the run.
pub fn validate(
    config: &Config,
    strict: bool,
    posts: &dyn PostRepository,
    sentiment_repo: &dyn SentimentRepository,
    price_repo: &dyn PriceRepository,
) -> Result<serde_json::Value, String> {
    let _span = info_span!(
        "validate",
        strict = strict,
        dataset_dir = %config.paths.dataset_dir
    )
    .entered();

    let stage_start = Instant::now();
    let dataset = dataset_dir(config);
    let symbols = resolve_symbols(config, posts)?;
    let max_lag = config.analysis.lags.iter().copied().max().unwrap_or(0);
    let min_join = max_lag + 2;
    let max_seq_length = config
        .classifier
        .as_ref()
        .map(|c| c.max_seq_length)
        .unwrap_or(sentilag_domain::services::posts::DEFAULT_MAX_SEQ_LENGTH);

    let mut problems: Vec<String> = Vec::new();
    let mut symbol_reports = Vec::with_capacity(symbols.len());

    for symbol in &symbols {
        let posts_path = dataset.join(posts_file(symbol));
        let posts_json = match posts.load_posts(&posts_path) {
            Ok(raw) => {
                let (_prepared, report) = prepare_posts(&raw, max_seq_length);
                if report.skipped_incomplete > 0 {
                    problems.push(format!(
                        "{symbol}: {} incomplete posts",
                        report.skipped_incomplete
                    ));
                }
                serde_json::json!({
                    "present": true,
                    "rows": report.input_rows,
                    "skipped_incomplete": report.skipped_incomplete,
                    "truncated": report.truncated,
                })
            }
            Err(err) => {
                problems.push(format!("{symbol}: {err}"));
                serde_json::json!({ "present": false, "error": err })
            }
        };

        let (prices, price_report) = price_repo.load_prices(&price_query(config, symbol))?;
        if price_report.duplicates > 0 {
            problems.push(format!(
                "{symbol}: {} duplicate price dates",
                price_report.duplicates
            ));
        }

        let mut cohorts_json = serde_json::Map::new();
        for &cohort in &config.analysis.cohorts {
            let path = dataset.join(classification_file(symbol, cohort));
            if !sentiment_repo.exists(&path) {
                problems.push(format!("{symbol}{cohort}: missing {}", path.display()));
                cohorts_json.insert(
                    cohort.to_string(),
                    serde_json::json!({ "present": false }),
                );
                continue;
            }

            let records = sentiment_repo.load_records(&path)?;
            let (daily, report) = aggregate_daily(&records, config.analysis.max_date_len)
                .map_err(|err| format!("{symbol}{cohort}: {err}"))?;
            let joined = inner_join(&daily, &prices).len();
            if report.discarded_over_length > 0 {
                problems.push(format!(
                    "{symbol}{cohort}: {} records with over-length dates",
                    report.discarded_over_length
                ));
            }
            if report.discarded_empty > 0 {
                problems.push(format!(
                    "{symbol}{cohort}: {} records with blank dates",
                    report.discarded_empty
                ));
            }
            if joined < min_join {
                problems.push(format!(
                    "{symbol}{cohort}: {joined} aligned days, need at least {min_join}"
                ));
            }
            cohorts_json.insert(
                cohort.to_string(),
                serde_json::json!({
                    "present": true,
                    "records": report.input_records,
                    "discarded_over_length": report.discarded_over_length,
                    "discarded_empty": report.discarded_empty,
                    "first_discarded": report.first_discarded,
                    "distinct_dates": report.distinct_dates,
                    "aligned_days": joined,
                }),
            );
        }

        symbol_reports.push(serde_json::json!({
            "symbol": symbol,
            "posts": posts_json,
            "prices": price_json(&price_report),
            "cohorts": cohorts_json,
        }));
    }

    metrics::histogram!("sentilag.validate.load_ms")
        .record(stage_start.elapsed().as_millis() as f64);
    metrics::gauge!("sentilag.validate.problems").set(problems.len() as f64);

    for problem in &problems {
        warn!(problem = %problem, "validation finding");
    }
    if strict && !problems.is_empty() {
        return Err(format!(
            "strict validation failed: {} finding(s), first: {}",
            problems.len(),
            problems[0]
        ));
    }

    Ok(serde_json::json!({
        "symbols": symbol_reports,
        "min_aligned_days": min_join,
        "problems": problems,
        "strict": strict,
    }))
}

fn price_json(report: &PriceReport) -> serde_json::Value {
    serde_json::json!({
        "rows": report.rows,
        "duplicates": report.duplicates,
        "first_duplicate": report.first_duplicate,
        "first_date": report.first_date,
        "last_date": report.last_date,
    })
}
