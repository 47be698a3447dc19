use crate::config::Config;
use sentilag_domain::repositories::market_data::PriceQuery;
use sentilag_domain::repositories::posts::PostRepository;
use sentilag_domain::services::dataset::price_file;
use sentilag_domain::services::price::PriceFormat;
use std::path::PathBuf;

pub fn dataset_dir(config: &Config) -> PathBuf {
    PathBuf::from(&config.paths.dataset_dir)
}

pub fn out_dir(config: &Config) -> PathBuf {
    match config.paths.out_dir.as_deref() {
        Some(dir) if !dir.trim().is_empty() => PathBuf::from(dir),
        _ => dataset_dir(config),
    }
}

pub fn resolve_symbols(config: &Config, posts: &dyn PostRepository) -> Result<Vec<String>, String> {
    if let Some(symbols) = config.analysis.symbols.as_ref().filter(|s| !s.is_empty()) {
        return Ok(symbols.iter().map(|s| s.trim().to_string()).collect());
    }
    let dir = dataset_dir(config);
    let symbols = posts.discover_symbols(&dir)?;
    if symbols.is_empty() {
        return Err(format!("no *-weibo.csv files found in {}", dir.display()));
    }
    Ok(symbols)
}

pub fn price_query(config: &Config, symbol: &str) -> PriceQuery {
    PriceQuery {
        path: dataset_dir(config).join(price_file(symbol)),
        format: PriceFormat::for_symbol(symbol, &config.analysis.thousands_separator_symbols),
    }
}

pub fn summary_enabled(config: &Config) -> bool {
    config
        .report
        .as_ref()
        .and_then(|r| r.summary_json)
        .unwrap_or(false)
}
