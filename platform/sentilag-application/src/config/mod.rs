use sentilag_domain::services::aggregation::DEFAULT_MAX_DATE_LEN;
use sentilag_domain::services::cohorts::{DEFAULT_EXPERT_TOP_FRACTION, DEFAULT_USER_ID_LEN};
use sentilag_domain::services::lag_search::{
    validate_candidates, PersistPolicy, DEFAULT_CANDIDATE_LAGS,
};
use sentilag_domain::services::posts::DEFAULT_MAX_SEQ_LENGTH;
use sentilag_domain::value_objects::cohort::Cohort;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    pub paths: PathsConfig,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    pub classifier: Option<ClassifierConfig>,
    #[serde(default)]
    pub cohorts: CohortsConfig,
    pub report: Option<ReportConfig>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct PathsConfig {
    pub dataset_dir: String,
    /// Defaults to `dataset_dir`.
    pub out_dir: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct AnalysisConfig {
    pub lags: Vec<usize>,
    pub cohorts: Vec<Cohort>,
    pub persist_series: PersistPolicy,
    pub max_date_len: usize,
    pub thousands_separator_symbols: Vec<String>,
    /// Explicit symbol list; when absent, symbols are discovered from `*-weibo.csv`.
    pub symbols: Option<Vec<String>>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            lags: DEFAULT_CANDIDATE_LAGS.to_vec(),
            cohorts: Cohort::ALL.to_vec(),
            persist_series: PersistPolicy::default(),
            max_date_len: DEFAULT_MAX_DATE_LEN,
            thousands_separator_symbols: vec!["恒生".to_string()],
            symbols: None,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ClassifierConfig {
    pub url: String,
    pub timeout_ms: u64,
    pub retries: u32,
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    #[serde(default = "default_max_seq_length")]
    pub max_seq_length: usize,
    pub model_version: String,
}

fn default_batch_size() -> usize {
    32
}

fn default_max_seq_length() -> usize {
    DEFAULT_MAX_SEQ_LENGTH
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields, default)]
pub struct CohortsConfig {
    pub expert_top_fraction: f64,
    pub user_id_len: usize,
}

impl Default for CohortsConfig {
    fn default() -> Self {
        Self {
            expert_top_fraction: DEFAULT_EXPERT_TOP_FRACTION,
            user_id_len: DEFAULT_USER_ID_LEN,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct ReportConfig {
    pub summary_json: Option<bool>,
}

pub fn load_config(path: &Path) -> Result<Config, String> {
    let (config, _source) = load_config_with_source(path)?;
    Ok(config)
}

pub fn load_config_with_source(path: &Path) -> Result<(Config, String), String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("failed to read config {}: {}", path.display(), err))?;
    let config: Config = toml::from_str(&contents)
        .map_err(|err| format!("failed to parse TOML {}: {}", path.display(), err))?;
    validate_config(&config).map_err(|err| format!("invalid config {}: {err}", path.display()))?;
    Ok((config, contents))
}

pub fn to_toml_pretty(config: &Config) -> Result<String, String> {
    toml::to_string_pretty(config)
        .map_err(|err| format!("failed to serialize config as TOML: {err}"))
}

pub fn validate_config(config: &Config) -> Result<(), String> {
    if config.paths.dataset_dir.trim().is_empty() {
        return Err("paths.dataset_dir must not be empty".to_string());
    }

    validate_candidates(&config.analysis.lags).map_err(|err| format!("analysis.lags: {err}"))?;
    if config.analysis.cohorts.is_empty() {
        return Err("analysis.cohorts must not be empty".to_string());
    }
    if config.analysis.max_date_len == 0 {
        return Err("analysis.max_date_len must be > 0".to_string());
    }

    if let Some(classifier) = &config.classifier {
        if classifier.batch_size == 0 {
            return Err("classifier.batch_size must be > 0".to_string());
        }
        if classifier.max_seq_length < 2 {
            return Err("classifier.max_seq_length must be >= 2".to_string());
        }
        if classifier.timeout_ms == 0 {
            return Err("classifier.timeout_ms must be > 0".to_string());
        }
    }

    let fraction = config.cohorts.expert_top_fraction;
    if !fraction.is_finite() || fraction <= 0.0 || fraction > 1.0 {
        return Err("cohorts.expert_top_fraction must be in (0, 1]".to_string());
    }
    if config.cohorts.user_id_len == 0 {
        return Err("cohorts.user_id_len must be > 0".to_string());
    }

    Ok(())
}
