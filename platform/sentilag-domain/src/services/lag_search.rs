use crate::services::alignment::{shift_by_lag, LaggedSeries};
use crate::services::correlation::pearson;
use crate::value_objects::aligned_point::AlignedPoint;
use crate::value_objects::lag_evaluation::LagEvaluation;
use serde::{Deserialize, Serialize};

pub const DEFAULT_CANDIDATE_LAGS: [usize; 9] = [3, 5, 7, 9, 12, 15, 20, 25, 30];

/// Which lag's trimmed series is handed back for persistence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PersistPolicy {
    /// Series of the last candidate in the list, whatever its score. Historical output.
    #[default]
    LastEvaluated,
    BestLag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LagSearchOutcome {
    pub evaluations: Vec<LagEvaluation>,
    pub best: Option<LagEvaluation>,
    pub persisted: LaggedSeries,
    /// Set when `BestLag` was requested but no candidate beat a zero coefficient.
    pub persisted_fallback: bool,
}

impl LagSearchOutcome {
    pub fn best_lag(&self) -> Option<usize> {
        self.best.map(|b| b.lag)
    }

    pub fn best_coefficient(&self) -> f64 {
        self.best.map(|b| b.coefficient).unwrap_or(0.0)
    }
}

pub fn validate_candidates(candidates: &[usize]) -> Result<(), String> {
    if candidates.is_empty() {
        return Err("lag candidates must not be empty".to_string());
    }
    if candidates.contains(&0) {
        return Err("lag 0 is not a valid candidate".to_string());
    }
    Ok(())
}

/// Evaluates every candidate lag in order and keeps the one with the largest |r|.
///
/// The best is only replaced on a strictly larger magnitude, so the first maximum wins.
/// Any candidate whose trimmed series cannot be correlated aborts the search.
pub fn search_best_lag(
    aligned: &[AlignedPoint],
    candidates: &[usize],
    policy: PersistPolicy,
) -> Result<LagSearchOutcome, String> {
    validate_candidates(candidates)?;

    let mut evaluations = Vec::with_capacity(candidates.len());
    let mut best: Option<LagEvaluation> = None;
    let mut best_abs = 0.0f64;
    let mut best_series: Option<LaggedSeries> = None;
    let mut last_series: Option<LaggedSeries> = None;

    for &lag in candidates {
        let series = shift_by_lag(aligned, lag);
        let stats = pearson(&series.sentiment, &series.price).map_err(|err| {
            format!(
                "lag {lag} over {} aligned points: {err}",
                aligned.len()
            )
        })?;
        let evaluation = LagEvaluation {
            lag,
            coefficient: stats.coefficient,
            p_value: stats.p_value,
            samples: stats.samples,
        };

        if evaluation.coefficient.abs() > best_abs {
            best_abs = evaluation.coefficient.abs();
            best = Some(evaluation);
            if policy == PersistPolicy::BestLag {
                best_series = Some(series.clone());
            }
        }
        evaluations.push(evaluation);
        last_series = Some(series);
    }

    let last_series = last_series.ok_or_else(|| "no lag candidate evaluated".to_string())?;
    let (persisted, persisted_fallback) = match policy {
        PersistPolicy::LastEvaluated => (last_series, false),
        PersistPolicy::BestLag => match best_series {
            Some(series) => (series, false),
            None => (last_series, true),
        },
    };

    Ok(LagSearchOutcome {
        evaluations,
        best,
        persisted,
        persisted_fallback,
    })
}

#[cfg(test)]
mod tests {
    use super::{search_best_lag, validate_candidates, PersistPolicy, DEFAULT_CANDIDATE_LAGS};
    use crate::value_objects::aligned_point::AlignedPoint;
    use chrono::{Duration, NaiveDate};

    fn day(offset: usize) -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 1).expect("date") + Duration::days(offset as i64)
    }

    // Deterministic noise in [0, 1).
    fn noise(len: usize, seed: u64) -> Vec<f64> {
        let mut state = seed;
        (0..len)
            .map(|_| {
                state = state
                    .wrapping_mul(6364136223846793005)
                    .wrapping_add(1442695040888963407);
                (state >> 11) as f64 / (1u64 << 53) as f64
            })
            .collect()
    }

    /// Price of day i is an exact linear function of the sentiment of day i + `lag`.
    fn series_with_lag(len: usize, lag: usize) -> Vec<AlignedPoint> {
        let sentiment = noise(len, 7);
        let filler = noise(len, 99);
        (0..len)
            .map(|i| AlignedPoint {
                date: day(i),
                sentiment: sentiment[i],
                price: if i + lag < len {
                    100.0 + 5.0 * sentiment[i + lag]
                } else {
                    100.0 + 5.0 * filler[i]
                },
            })
            .collect()
    }

    #[test]
    fn finds_the_planted_lag() {
        let aligned = series_with_lag(60, 5);
        let outcome = search_best_lag(&aligned, &DEFAULT_CANDIDATE_LAGS, PersistPolicy::BestLag)
            .expect("search");

        assert_eq!(outcome.best_lag(), Some(5));
        assert!((outcome.best_coefficient() - 1.0).abs() < 1e-9);
        assert_eq!(outcome.evaluations.len(), DEFAULT_CANDIDATE_LAGS.len());
        for evaluation in &outcome.evaluations {
            if evaluation.lag != 5 {
                assert!(evaluation.coefficient.abs() < 0.9);
            }
        }
    }

    #[test]
    fn trimmed_length_is_len_minus_lag() {
        let aligned = series_with_lag(60, 5);
        let outcome =
            search_best_lag(&aligned, &DEFAULT_CANDIDATE_LAGS, PersistPolicy::LastEvaluated)
                .expect("search");
        for evaluation in &outcome.evaluations {
            assert_eq!(evaluation.samples, 60 - evaluation.lag);
        }
    }

    #[test]
    fn last_evaluated_policy_persists_final_candidate() {
        let aligned = series_with_lag(60, 5);
        let outcome =
            search_best_lag(&aligned, &DEFAULT_CANDIDATE_LAGS, PersistPolicy::LastEvaluated)
                .expect("search");
        assert_eq!(outcome.persisted.lag, 30);
        assert_eq!(outcome.persisted.len(), 30);
        assert_eq!(outcome.persisted.dates[0], day(0));
        assert!(!outcome.persisted_fallback);
    }

    #[test]
    fn best_lag_policy_persists_winner() {
        let aligned = series_with_lag(60, 5);
        let outcome = search_best_lag(&aligned, &DEFAULT_CANDIDATE_LAGS, PersistPolicy::BestLag)
            .expect("search");
        assert_eq!(outcome.persisted.lag, 5);
        assert_eq!(outcome.persisted.len(), 55);
        assert_eq!(outcome.persisted.sentiment[0], aligned[5].sentiment);
        assert_eq!(outcome.persisted.price[0], aligned[0].price);
    }

    #[test]
    fn first_maximum_wins_on_ties() {
        // Alternating 0/1 sentiment against 10/12 prices: lags 4 and 16 both give exactly r = 1.
        let aligned: Vec<AlignedPoint> = (0..20)
            .map(|i| AlignedPoint {
                date: day(i),
                sentiment: (i % 2) as f64,
                price: 10.0 + 2.0 * (i % 2) as f64,
            })
            .collect();

        let forward = search_best_lag(&aligned, &[4, 16], PersistPolicy::BestLag).expect("search");
        assert_eq!(forward.evaluations[0].coefficient, forward.evaluations[1].coefficient);
        assert_eq!(forward.best_lag(), Some(4));

        let reversed = search_best_lag(&aligned, &[16, 4], PersistPolicy::BestLag).expect("search");
        assert_eq!(reversed.best_lag(), Some(16));
    }

    #[test]
    fn too_short_series_is_an_error() {
        let aligned = series_with_lag(20, 3);
        let err = search_best_lag(&aligned, &DEFAULT_CANDIDATE_LAGS, PersistPolicy::LastEvaluated)
            .expect_err("lag 20 leaves no points");
        assert!(err.contains("lag 20"));
        assert!(err.contains("at least 2"));
    }

    #[test]
    fn constant_fractional_sentiment_aborts_the_search() {
        let aligned: Vec<AlignedPoint> = series_with_lag(40, 5)
            .into_iter()
            .map(|p| AlignedPoint {
                sentiment: 2.0 / 3.0,
                ..p
            })
            .collect();
        let err = search_best_lag(&aligned, &[3, 5, 7], PersistPolicy::BestLag)
            .expect_err("constant sentiment has no correlation");
        assert!(err.contains("lag 3"));
        assert!(err.contains("constant"));
    }

    #[test]
    fn rejects_invalid_candidate_sets() {
        assert!(validate_candidates(&[]).is_err());
        assert!(validate_candidates(&[0, 3]).is_err());
        assert!(validate_candidates(&DEFAULT_CANDIDATE_LAGS).is_ok());
    }
}
