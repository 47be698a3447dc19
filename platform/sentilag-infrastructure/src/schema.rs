use std::path::Path;

/// Fails when any of `required` is missing from the header row.
pub(crate) fn require_headers(
    headers: &csv::StringRecord,
    required: &[&str],
    path: &Path,
) -> Result<(), String> {
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|name| {
            !headers
                .iter()
                .any(|h| h.trim_start_matches('\u{feff}').trim() == *name)
        })
        .collect();
    if missing.is_empty() {
        Ok(())
    } else {
        Err(format!(
            "missing required column(s) {} in {}",
            missing.join(", "),
            path.display()
        ))
    }
}

pub(crate) fn record_read_metrics<T>(kind: &'static str, start: std::time::Instant, result: &Result<T, String>) {
    let result_label = if result.is_ok() { "ok" } else { "err" };
    metrics::counter!(
        "sentilag.infra.read.calls_total",
        "kind" => kind,
        "result" => result_label
    )
    .increment(1);
    metrics::histogram!("sentilag.infra.read_ms", "kind" => kind, "result" => result_label)
        .record(start.elapsed().as_millis() as f64);
}

#[cfg(test)]
mod tests {
    use super::require_headers;
    use std::path::Path;

    #[test]
    fn reports_every_missing_column() {
        let headers = csv::StringRecord::from(vec!["\u{feff}Date", "Close"]);
        assert!(require_headers(&headers, &["Date"], Path::new("x.csv")).is_ok());
        let err = require_headers(&headers, &["Date", "Open", "Volume"], Path::new("x.csv"))
            .expect_err("missing");
        assert!(err.contains("Open, Volume"));
        assert!(err.contains("x.csv"));
    }
}
