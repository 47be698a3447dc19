use std::path::PathBuf;

pub(super) fn run_validate(
    config_path: PathBuf,
    strict: bool,
    out: Option<PathBuf>,
) -> Result<(), String> {
    let config = sentilag_application::config::load_config(&config_path)?;
    super::common::print_config_summary("validate", &config);

    let crate::infra::AnalysisDeps {
        posts,
        sentiment_repo,
        prices,
        ..
    } = crate::infra::build_analysis_deps();

    let report = sentilag_application::validation::validate(
        &config,
        strict,
        posts.as_ref(),
        sentiment_repo.as_ref(),
        prices.as_ref(),
    )?;

    let rendered = serde_json::to_string_pretty(&report)
        .map_err(|err| format!("failed to serialize validation report: {err}"))?;
    match out {
        Some(out_path) => std::fs::write(&out_path, rendered)
            .map_err(|err| format!("failed to write report {}: {}", out_path.display(), err))?,
        None => println!("{rendered}"),
    }
    Ok(())
}
