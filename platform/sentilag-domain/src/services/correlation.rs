use serde::Serialize;
use statrs::distribution::{ContinuousCDF, StudentsT};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PearsonResult {
    pub coefficient: f64,
    pub p_value: f64,
    pub samples: usize,
}

/// Pearson correlation with a two-sided p-value from Student's t with `n - 2` degrees of freedom.
///
/// Fails on mismatched lengths, fewer than two samples, non-finite input or a constant series.
pub fn pearson(x: &[f64], y: &[f64]) -> Result<PearsonResult, String> {
    if x.len() != y.len() {
        return Err(format!(
            "pearson: series length mismatch ({} vs {})",
            x.len(),
            y.len()
        ));
    }
    let n = x.len();
    if n < 2 {
        return Err(format!("pearson: at least 2 samples required, got {n}"));
    }
    if x.iter().chain(y.iter()).any(|v| !v.is_finite()) {
        return Err("pearson: series contains non-finite values".to_string());
    }
    // Checked on the input: a constant fractional series rarely has an exactly zero variance.
    if is_constant(x) || is_constant(y) {
        return Err("pearson: input series is constant".to_string());
    }

    let mean_x = x.iter().sum::<f64>() / n as f64;
    let mean_y = y.iter().sum::<f64>() / n as f64;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y.iter()) {
        let dx = xi - mean_x;
        let dy = yi - mean_y;
        cov += dx * dy;
        var_x += dx * dx;
        var_y += dy * dy;
    }

    let coefficient = (cov / (var_x.sqrt() * var_y.sqrt())).clamp(-1.0, 1.0);
    let p_value = two_sided_p_value(coefficient, n)?;
    Ok(PearsonResult {
        coefficient,
        p_value,
        samples: n,
    })
}

fn is_constant(values: &[f64]) -> bool {
    values.iter().all(|v| *v == values[0])
}

fn two_sided_p_value(coefficient: f64, samples: usize) -> Result<f64, String> {
    if samples == 2 {
        return Ok(1.0);
    }
    let denom = 1.0 - coefficient * coefficient;
    if denom <= 0.0 {
        return Ok(0.0);
    }

    let df = (samples - 2) as f64;
    let t = coefficient.abs() * (df / denom).sqrt();
    let dist = StudentsT::new(0.0, 1.0, df)
        .map_err(|err| format!("pearson: invalid t distribution (df={df}): {err}"))?;
    Ok((2.0 * dist.sf(t)).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::pearson;

    #[test]
    fn perfect_positive_and_negative_correlation() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let up = [2.0, 4.0, 6.0, 8.0, 10.0];
        let down = [10.0, 8.0, 6.0, 4.0, 2.0];

        let r = pearson(&x, &up).expect("pearson");
        assert!((r.coefficient - 1.0).abs() < 1e-12);
        assert!(r.p_value < 1e-9);
        assert_eq!(r.samples, 5);

        let r = pearson(&x, &down).expect("pearson");
        assert!((r.coefficient + 1.0).abs() < 1e-12);
    }

    #[test]
    fn matches_reference_values() {
        // scipy.stats.pearsonr([1, 2, 3, 4, 5], [2, 1, 4, 3, 5]) -> (0.8, 0.10408803866182788)
        let r = pearson(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 1.0, 4.0, 3.0, 5.0]).expect("pearson");
        assert!((r.coefficient - 0.8).abs() < 1e-12);
        assert!((r.p_value - 0.104_088_038_661_827_88).abs() < 1e-6);
    }

    #[test]
    fn two_samples_have_unit_p_value() {
        let r = pearson(&[1.0, 2.0], &[3.0, 5.0]).expect("pearson");
        assert!((r.coefficient - 1.0).abs() < 1e-12);
        assert_eq!(r.p_value, 1.0);
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(pearson(&[1.0], &[1.0]).unwrap_err().contains("at least 2"));
        assert!(pearson(&[1.0, 2.0], &[1.0]).unwrap_err().contains("mismatch"));
        assert!(pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0])
            .unwrap_err()
            .contains("constant"));
        assert!(pearson(&[1.0, f64::NAN], &[1.0, 2.0])
            .unwrap_err()
            .contains("non-finite"));
    }

    #[test]
    fn rejects_constant_fractional_daily_means() {
        let varying: Vec<f64> = (0..37).map(|i| (i % 5) as f64).collect();
        for value in [2.0 / 3.0, 1.0 / 3.0, 0.1, 0.7] {
            for n in [10, 17, 27, 37] {
                let err = pearson(&vec![value; n], &varying[..n])
                    .expect_err("constant sentiment must fail");
                assert!(err.contains("constant"), "{value} x {n}: {err}");
                let err = pearson(&varying[..n], &vec![value; n])
                    .expect_err("constant price must fail");
                assert!(err.contains("constant"));
            }
        }
    }
}
