use sentilag_application::config::Config;
use sentilag_application::meta::engine_name;

pub(super) fn print_config_summary(command: &str, config: &Config) {
    println!(
        "{} cli: {} (dataset_dir={}, out_dir={})",
        engine_name(),
        command,
        config.paths.dataset_dir,
        config
            .paths
            .out_dir
            .as_deref()
            .unwrap_or(&config.paths.dataset_dir)
    );
    let cohorts: Vec<String> = config
        .analysis
        .cohorts
        .iter()
        .map(|c| c.to_string())
        .collect();
    println!(
        "analysis: lags={:?}, cohorts=[{}], persist_series={:?}, max_date_len={}",
        config.analysis.lags,
        cohorts.join(", "),
        config.analysis.persist_series,
        config.analysis.max_date_len
    );
    if let Some(symbols) = &config.analysis.symbols {
        println!("symbols: {}", symbols.join(", "));
    }
}
