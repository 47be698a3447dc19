use std::path::PathBuf;

pub(super) fn run_analyze(config_path: PathBuf) -> Result<(), String> {
    let config = sentilag_application::config::load_config(&config_path)?;
    super::common::print_config_summary("analyze", &config);

    let crate::infra::AnalysisDeps {
        posts,
        sentiment_repo,
        prices,
        artifacts,
    } = crate::infra::build_analysis_deps();

    let summary = sentilag_application::analysis::run_analysis(
        &config,
        posts.as_ref(),
        sentiment_repo.as_ref(),
        prices.as_ref(),
        artifacts.as_ref(),
    )?;

    for result in &summary.results {
        let magnitudes: Vec<f64> = result
            .evaluations
            .iter()
            .map(|e| e.coefficient.abs())
            .collect();
        println!("{magnitudes:?}");
        println!(
            "for type: {}, the result is: T = {}, pearson = {}",
            result.label(),
            result.best_lag(),
            result.best_coefficient()
        );
    }
    println!("series written to {}", summary.out_dir.display());
    if let Some(path) = &summary.summary_path {
        println!("summary: {}", path.display());
    }
    Ok(())
}
