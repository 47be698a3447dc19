use std::path::PathBuf;

pub(super) fn run_split_cohorts(config_path: PathBuf) -> Result<(), String> {
    let config = sentilag_application::config::load_config(&config_path)?;
    super::common::print_config_summary("split-cohorts", &config);

    let crate::infra::AnalysisDeps {
        posts,
        sentiment_repo,
        artifacts,
        ..
    } = crate::infra::build_analysis_deps();

    let summary = sentilag_application::cohorts::run_cohort_split(
        &config,
        posts.as_ref(),
        sentiment_repo.as_ref(),
        artifacts.as_ref(),
    )?;

    println!(
        "top users: {} -> {}",
        summary.top_users,
        summary.top_users_path.display()
    );
    for split in &summary.symbols {
        println!(
            "{}: kept {} of {} (bad user_id {}, duplicate text {}) -> {}",
            split.symbol,
            split.report.kept,
            split.report.input_records,
            split.report.dropped_bad_user_id,
            split.report.dropped_duplicate_text,
            split.output.display()
        );
    }
    Ok(())
}
