use crate::config::{to_toml_pretty, AnalysisConfig, Config};
use crate::shared::{out_dir, price_query, resolve_symbols, summary_enabled};
use sentilag_domain::repositories::artifacts::ArtifactWriter;
use sentilag_domain::repositories::market_data::PriceRepository;
use sentilag_domain::repositories::posts::PostRepository;
use sentilag_domain::repositories::sentiment::SentimentRepository;
use sentilag_domain::services::aggregation::{aggregate_daily, AggregationReport};
use sentilag_domain::services::alignment::inner_join;
use sentilag_domain::services::dataset::{classification_file, daily_series_file, SUMMARY_FILE};
use sentilag_domain::services::lag_search::{search_best_lag, LagSearchOutcome};
use sentilag_domain::services::price::PriceReport;
use sentilag_domain::value_objects::cohort::Cohort;
use sentilag_domain::value_objects::daily_price::DailyPrice;
use sentilag_domain::value_objects::lag_evaluation::LagEvaluation;
use sentilag_domain::value_objects::sentiment_record::SentimentRecord;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, info_span, warn};

/// Outcome of one (symbol, cohort) pass.
#[derive(Debug, Clone, Serialize)]
pub struct CohortResult {
    pub symbol: String,
    pub cohort: Cohort,
    pub aggregation: AggregationReport,
    pub aligned_points: usize,
    pub evaluations: Vec<LagEvaluation>,
    pub best: Option<LagEvaluation>,
    pub persisted_lag: usize,
    pub persisted_rows: usize,
    pub persisted_fallback: bool,
    pub output: PathBuf,
}

impl CohortResult {
    /// `X{cohort}` label used in reports, e.g. `格力电器expert`.
    pub fn label(&self) -> String {
        format!("{}{}", self.symbol, self.cohort)
    }

    pub fn best_lag(&self) -> usize {
        self.best.map(|b| b.lag).unwrap_or(0)
    }

    pub fn best_coefficient(&self) -> f64 {
        self.best.map(|b| b.coefficient).unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SymbolPrices {
    pub symbol: String,
    pub report: PriceReport,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub out_dir: PathBuf,
    pub prices: Vec<SymbolPrices>,
    pub results: Vec<CohortResult>,
    pub summary_path: Option<PathBuf>,
}

/// Aggregation, join and lag search for one cohort. No IO.
pub fn correlate_cohort(
    records: &[SentimentRecord],
    prices: &[DailyPrice],
    analysis: &AnalysisConfig,
) -> Result<(AggregationReport, usize, LagSearchOutcome), String> {
    let (daily, report) = aggregate_daily(records, analysis.max_date_len)?;
    let aligned = inner_join(&daily, prices);
    let outcome = search_best_lag(&aligned, &analysis.lags, analysis.persist_series)?;
    Ok((report, aligned.len(), outcome))
}

pub fn run_analysis(
    config: &Config,
    posts: &dyn PostRepository,
    sentiment_repo: &dyn SentimentRepository,
    price_repo: &dyn PriceRepository,
    artifacts: &dyn ArtifactWriter,
) -> Result<AnalysisSummary, String> {
    let _span = info_span!(
        "run_analysis",
        dataset_dir = %config.paths.dataset_dir,
        lags = ?config.analysis.lags,
        persist = ?config.analysis.persist_series
    )
    .entered();

    let symbols = resolve_symbols(config, posts)?;
    let out = out_dir(config);
    artifacts.ensure_dir(&out)?;
    let dataset = PathBuf::from(&config.paths.dataset_dir);

    let mut prices_seen = Vec::with_capacity(symbols.len());
    let mut results = Vec::with_capacity(symbols.len() * config.analysis.cohorts.len());

    for symbol in &symbols {
        let _symbol_span = info_span!("symbol", symbol = %symbol).entered();

        let stage_start = Instant::now();
        let query = price_query(config, symbol);
        let (prices, price_report) = price_repo.load_prices(&query)?;
        metrics::histogram!("sentilag.analysis.load_prices_ms")
            .record(stage_start.elapsed().as_millis() as f64);
        if price_report.duplicates > 0 {
            warn!(
                duplicates = price_report.duplicates,
                first_duplicate = ?price_report.first_duplicate,
                "duplicate price dates; later rows kept"
            );
        }
        prices_seen.push(SymbolPrices {
            symbol: symbol.clone(),
            report: price_report,
        });

        for &cohort in &config.analysis.cohorts {
            let stage_start = Instant::now();
            let records = sentiment_repo.load_records(&dataset.join(classification_file(symbol, cohort)))?;
            let (aggregation, aligned_points, outcome) =
                correlate_cohort(&records, &prices, &config.analysis)
                    .map_err(|err| format!("{symbol}{cohort}: {err}"))?;
            metrics::counter!("sentilag.analysis.lag_evaluations")
                .increment(outcome.evaluations.len() as u64);
            metrics::histogram!("sentilag.analysis.cohort_ms")
                .record(stage_start.elapsed().as_millis() as f64);

            if aggregation.discarded_over_length > 0 {
                warn!(
                    cohort = %cohort,
                    discarded = aggregation.discarded_over_length,
                    first = ?aggregation.first_discarded,
                    "discarded records with over-length dates"
                );
            }
            if aggregation.discarded_empty > 0 {
                warn!(
                    cohort = %cohort,
                    discarded = aggregation.discarded_empty,
                    "discarded records with blank dates"
                );
            }
            if outcome.persisted_fallback {
                warn!(
                    cohort = %cohort,
                    "no lag beat a zero coefficient; persisting the last evaluated series"
                );
            }

            let output = out.join(daily_series_file(symbol, cohort));
            artifacts.write_aligned_csv(&output, &outcome.persisted)?;

            let result = CohortResult {
                symbol: symbol.clone(),
                cohort,
                aggregation,
                aligned_points,
                evaluations: outcome.evaluations.clone(),
                best: outcome.best,
                persisted_lag: outcome.persisted.lag,
                persisted_rows: outcome.persisted.len(),
                persisted_fallback: outcome.persisted_fallback,
                output,
            };
            info!(
                coefficients = ?result.evaluations.iter().map(|e| e.coefficient.abs()).collect::<Vec<_>>(),
                "for type: {}, the result is: T = {}, pearson = {}",
                result.label(),
                result.best_lag(),
                result.best_coefficient()
            );
            results.push(result);
        }
    }

    let summary_path = if summary_enabled(config) {
        let path = out.join(SUMMARY_FILE);
        let json = summary_json(config, &results, &prices_seen)?;
        artifacts.write_summary_json(&path, &json)?;
        Some(path)
    } else {
        None
    };

    Ok(AnalysisSummary {
        out_dir: out,
        prices: prices_seen,
        results,
        summary_path,
    })
}

fn summary_json(
    config: &Config,
    results: &[CohortResult],
    prices: &[SymbolPrices],
) -> Result<serde_json::Value, String> {
    Ok(serde_json::json!({
        "engine": crate::meta::engine_name(),
        "version": crate::meta::engine_version(),
        "config_toml": to_toml_pretty(config)?,
        "prices": serde_json::to_value(prices)
            .map_err(|err| format!("failed to serialize price reports: {err}"))?,
        "results": serde_json::to_value(results)
            .map_err(|err| format!("failed to serialize lag results: {err}"))?,
    }))
}
