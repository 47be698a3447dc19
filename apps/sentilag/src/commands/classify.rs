use std::path::PathBuf;

pub(super) fn run_classify(config_path: PathBuf) -> Result<(), String> {
    let config = sentilag_application::config::load_config(&config_path)?;
    super::common::print_config_summary("classify", &config);

    let crate::infra::ClassifyDeps {
        posts,
        classifier,
        artifacts,
    } = crate::infra::build_classify_deps(&config)?;

    let summaries = sentilag_application::classification::run_classification(
        &config,
        posts.as_ref(),
        classifier.as_ref(),
        artifacts.as_ref(),
    )?;

    for summary in &summaries {
        println!(
            "{}: {} posts classified in {} batches ({} skipped, {} truncated) -> {}",
            summary.symbol,
            summary.records,
            summary.batches,
            summary.preparation.skipped_incomplete,
            summary.preparation.truncated,
            summary.output.display()
        );
    }
    Ok(())
}
