use crate::config::Config;
use crate::shared::{dataset_dir, resolve_symbols};
use sentilag_domain::repositories::artifacts::ArtifactWriter;
use sentilag_domain::repositories::classifier::SentimentClassifier;
use sentilag_domain::repositories::posts::PostRepository;
use sentilag_domain::services::dataset::{classification_file, posts_file};
use sentilag_domain::services::posts::{
    fullwidth_commas, prepare_posts, to_records, PreparationReport,
};
use sentilag_domain::value_objects::classification::Classification;
use sentilag_domain::value_objects::cohort::Cohort;
use sentilag_domain::value_objects::sentiment_record::SentimentRecord;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, info_span, warn};

#[derive(Debug, Clone, Serialize)]
pub struct ClassificationSummary {
    pub symbol: String,
    pub preparation: PreparationReport,
    pub batches: usize,
    pub records: usize,
    pub output: PathBuf,
}

/// Classifies every symbol's raw posts and writes the `normal` cohort result files.
pub fn run_classification(
    config: &Config,
    posts: &dyn PostRepository,
    classifier: &dyn SentimentClassifier,
    artifacts: &dyn ArtifactWriter,
) -> Result<Vec<ClassificationSummary>, String> {
    let classifier_config = config
        .classifier
        .as_ref()
        .ok_or_else(|| "missing [classifier] section in config".to_string())?;
    let _span = info_span!(
        "run_classification",
        url = %classifier_config.url,
        model_version = %classifier_config.model_version,
        batch_size = classifier_config.batch_size
    )
    .entered();

    let dataset = dataset_dir(config);
    artifacts.ensure_dir(&dataset)?;
    let symbols = resolve_symbols(config, posts)?;
    let mut summaries = Vec::with_capacity(symbols.len());

    for symbol in &symbols {
        let _symbol_span = info_span!("symbol", symbol = %symbol).entered();
        let raw = posts.load_posts(&dataset.join(posts_file(symbol)))?;
        let (prepared, report) = prepare_posts(&raw, classifier_config.max_seq_length);
        if report.skipped_incomplete > 0 {
            warn!(
                skipped = report.skipped_incomplete,
                "skipped posts with empty text, user_id or time"
            );
        }

        let mut classifications: Vec<Classification> = Vec::with_capacity(prepared.len());
        let mut batches = 0usize;
        for chunk in prepared.chunks(classifier_config.batch_size) {
            let texts: Vec<String> = chunk.iter().map(|p| p.model_text.clone()).collect();
            let started = Instant::now();
            let answer = classifier.classify_batch(&texts)?;
            metrics::histogram!("sentilag.classify.batch_ms")
                .record(started.elapsed().as_millis() as f64);
            if answer.len() != texts.len() {
                return Err(format!(
                    "{symbol}: classifier returned {} labels for a batch of {}",
                    answer.len(),
                    texts.len()
                ));
            }
            classifications.extend(answer);
            batches += 1;
        }
        metrics::counter!("sentilag.classify.posts").increment(prepared.len() as u64);

        let records: Vec<SentimentRecord> = to_records(&prepared, &classifications)?
            .into_iter()
            .map(|record| SentimentRecord {
                text: fullwidth_commas(&record.text),
                ..record
            })
            .collect();

        let output = dataset.join(classification_file(symbol, Cohort::Normal));
        artifacts.write_records_csv(&output, &records)?;
        info!(
            records = records.len(),
            batches,
            truncated = report.truncated,
            output = %output.display(),
            "classification written"
        );

        summaries.push(ClassificationSummary {
            symbol: symbol.clone(),
            preparation: report,
            batches,
            records: records.len(),
            output,
        });
    }

    Ok(summaries)
}
