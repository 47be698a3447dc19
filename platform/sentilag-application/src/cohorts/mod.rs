use crate::config::Config;
use crate::shared::{dataset_dir, resolve_symbols};
use sentilag_domain::repositories::artifacts::ArtifactWriter;
use sentilag_domain::repositories::posts::PostRepository;
use sentilag_domain::repositories::sentiment::SentimentRepository;
use sentilag_domain::services::cohorts::{split_expert, top_users, CohortSplitReport};
use sentilag_domain::services::dataset::{classification_file, posts_file, TOP_USERS_FILE};
use sentilag_domain::value_objects::cohort::Cohort;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{info, info_span};

#[derive(Debug, Clone, Serialize)]
pub struct SymbolSplit {
    pub symbol: String,
    pub report: CohortSplitReport,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Serialize)]
pub struct CohortSplitSummary {
    pub top_users: usize,
    pub top_users_path: PathBuf,
    pub symbols: Vec<SymbolSplit>,
}

/// Writes `top-userid.csv` and one `expert` result file per symbol.
///
/// Top users are pooled over every symbol before any split, so a heavily engaged author on one
/// board counts as an expert everywhere.
pub fn run_cohort_split(
    config: &Config,
    posts: &dyn PostRepository,
    sentiment_repo: &dyn SentimentRepository,
    artifacts: &dyn ArtifactWriter,
) -> Result<CohortSplitSummary, String> {
    let _span = info_span!(
        "run_cohort_split",
        top_fraction = config.cohorts.expert_top_fraction,
        user_id_len = config.cohorts.user_id_len
    )
    .entered();

    let dataset = dataset_dir(config);
    let symbols = resolve_symbols(config, posts)?;

    let mut experts = BTreeSet::new();
    for symbol in &symbols {
        let raw = posts.load_posts(&dataset.join(posts_file(symbol)))?;
        let users = top_users(&raw, config.cohorts.expert_top_fraction);
        info!(symbol = %symbol, posts = raw.len(), top_users = users.len(), "ranked authors");
        experts.extend(users);
    }

    let top_users_path = dataset.join(TOP_USERS_FILE);
    let ids: Vec<String> = experts.iter().cloned().collect();
    artifacts.write_user_ids_csv(&top_users_path, &ids)?;
    metrics::gauge!("sentilag.cohorts.top_users").set(ids.len() as f64);

    let mut splits = Vec::with_capacity(symbols.len());
    for symbol in &symbols {
        let records =
            sentiment_repo.load_records(&dataset.join(classification_file(symbol, Cohort::Normal)))?;
        let (kept, report) = split_expert(&records, &experts, config.cohorts.user_id_len);
        let output = dataset.join(classification_file(symbol, Cohort::Expert));
        artifacts.write_records_csv(&output, &kept)?;
        info!(
            symbol = %symbol,
            kept = report.kept,
            dropped_bad_user_id = report.dropped_bad_user_id,
            dropped_duplicate_text = report.dropped_duplicate_text,
            "expert cohort written"
        );
        splits.push(SymbolSplit {
            symbol: symbol.clone(),
            report,
            output,
        });
    }

    Ok(CohortSplitSummary {
        top_users: ids.len(),
        top_users_path,
        symbols: splits,
    })
}
