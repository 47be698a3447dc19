use reqwest::blocking::Client;
use reqwest::StatusCode;
use sentilag_domain::repositories::classifier::SentimentClassifier;
use sentilag_domain::value_objects::classification::Classification;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyRequest<'a> {
    pub model_version: &'a str,
    pub max_seq_length: usize,
    pub texts: &'a [String],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassifyResponse {
    pub labels: Vec<i64>,
    pub probabilities: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifierCallInfo {
    pub attempts: u32,
    pub duration_ms: u64,
    pub status: Option<u16>,
    pub error: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ClassifierCallResult {
    pub info: ClassifierCallInfo,
    pub classifications: Option<Vec<Classification>>,
}

/// Blocking client for the inference service's `/v1/classify` endpoint.
pub struct HttpClassifier {
    pub url: String,
    pub timeout_ms: u64,
    pub retries: u32,
    pub model_version: String,
    pub max_seq_length: usize,
    client: Client,
}

impl HttpClassifier {
    pub fn new(
        url: String,
        timeout_ms: u64,
        retries: u32,
        model_version: String,
        max_seq_length: usize,
    ) -> Result<Self, String> {
        let client = Client::builder()
            .timeout(Duration::from_millis(timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|err| format!("failed to build http client: {err}"))?;
        Ok(Self {
            url,
            timeout_ms,
            retries,
            model_version,
            max_seq_length,
            client,
        })
    }

    pub fn classify_detailed(&self, texts: &[String]) -> ClassifierCallResult {
        if texts.is_empty() {
            return ClassifierCallResult {
                info: ClassifierCallInfo {
                    attempts: 0,
                    duration_ms: 0,
                    status: None,
                    error: None,
                },
                classifications: Some(Vec::new()),
            };
        }

        let endpoint = format!("{}/v1/classify", self.url.trim_end_matches('/'));
        let span = tracing::info_span!(
            "infra.classifier.classify",
            endpoint = %endpoint,
            model_version = %self.model_version,
            timeout_ms = self.timeout_ms,
            retries = self.retries,
            batch_size = texts.len()
        );
        let _enter = span.enter();

        let request = ClassifyRequest {
            model_version: &self.model_version,
            max_seq_length: self.max_seq_length,
            texts,
        };

        let start = Instant::now();
        let mut attempts = 0u32;
        let mut last_status: Option<u16> = None;
        let mut last_error: Option<String> = None;
        let mut last_error_kind: Option<&'static str> = None;

        while attempts <= self.retries {
            attempts += 1;
            if attempts > 1 {
                metrics::counter!("sentilag.infra.classifier.retries_total").increment(1);
                tracing::debug!(attempt = attempts, "retrying classify request");
            }

            metrics::counter!("sentilag.infra.classifier.requests_total").increment(1);
            let attempt_start = Instant::now();
            match self.client.post(&endpoint).json(&request).send() {
                Ok(resp) => {
                    let status = resp.status();
                    last_status = Some(status.as_u16());
                    metrics::histogram!(
                        "sentilag.infra.classifier.attempt_ms",
                        "status" => status.as_u16().to_string()
                    )
                    .record(attempt_start.elapsed().as_millis() as f64);

                    if status == StatusCode::OK {
                        match resp.json::<ClassifyResponse>() {
                            Ok(parsed) => match validate_response(&parsed, texts.len()) {
                                Ok(classifications) => {
                                    let duration_ms = start.elapsed().as_millis() as u64;
                                    metrics::histogram!(
                                        "sentilag.infra.classifier.call_ms",
                                        "result" => "ok"
                                    )
                                    .record(duration_ms as f64);
                                    return ClassifierCallResult {
                                        info: ClassifierCallInfo {
                                            attempts,
                                            duration_ms,
                                            status: last_status,
                                            error: None,
                                        },
                                        classifications: Some(classifications),
                                    };
                                }
                                Err(err) => {
                                    last_error = Some(err);
                                    last_error_kind = Some("validate");
                                    break;
                                }
                            },
                            Err(err) => {
                                last_error =
                                    Some(format!("failed to parse classifier response: {err}"));
                                last_error_kind = Some("decode");
                                break;
                            }
                        }
                    }

                    if status.is_server_error() && attempts <= self.retries {
                        continue;
                    }
                    last_error = Some(format!(
                        "classifier http error: status {}",
                        status.as_u16()
                    ));
                    last_error_kind = Some("http_status");
                    break;
                }
                Err(err) => {
                    metrics::histogram!(
                        "sentilag.infra.classifier.attempt_ms",
                        "status" => "err"
                    )
                    .record(attempt_start.elapsed().as_millis() as f64);
                    last_error = Some(format!("classifier request failed: {err}"));
                    last_error_kind = Some("transport");
                    if attempts <= self.retries {
                        continue;
                    }
                    break;
                }
            }
        }

        let duration_ms = start.elapsed().as_millis() as u64;
        let kind = last_error_kind.unwrap_or("unknown");
        metrics::counter!("sentilag.infra.classifier.errors_total", "kind" => kind).increment(1);
        metrics::histogram!("sentilag.infra.classifier.call_ms", "result" => "err")
            .record(duration_ms as f64);
        tracing::warn!(
            attempts,
            status = ?last_status,
            error = last_error.as_deref().unwrap_or("unknown"),
            "classify request failed"
        );

        ClassifierCallResult {
            info: ClassifierCallInfo {
                attempts,
                duration_ms,
                status: last_status,
                error: last_error
                    .or_else(|| Some("classify request failed after retries".to_string())),
            },
            classifications: None,
        }
    }
}

fn validate_response(
    response: &ClassifyResponse,
    expected: usize,
) -> Result<Vec<Classification>, String> {
    if response.labels.len() != expected || response.probabilities.len() != expected {
        return Err(format!(
            "classifier batch size mismatch: sent {expected}, got {} labels and {} probability rows",
            response.labels.len(),
            response.probabilities.len()
        ));
    }
    for (idx, row) in response.probabilities.iter().enumerate() {
        if row.is_empty() || row.iter().any(|p| !p.is_finite() || !(0.0..=1.0).contains(p)) {
            return Err(format!("invalid probabilities at position {idx}: {row:?}"));
        }
    }
    Ok(response
        .labels
        .iter()
        .zip(response.probabilities.iter())
        .map(|(label, probabilities)| Classification {
            label: *label,
            probabilities: probabilities.clone(),
        })
        .collect())
}

impl SentimentClassifier for HttpClassifier {
    fn classify_batch(&self, texts: &[String]) -> Result<Vec<Classification>, String> {
        let result = self.classify_detailed(texts);
        match result.classifications {
            Some(classifications) => Ok(classifications),
            None => Err(result
                .info
                .error
                .unwrap_or_else(|| "classify request failed".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::HttpClassifier;
    use sentilag_domain::repositories::classifier::SentimentClassifier;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::sync::mpsc;
    use std::thread;

    fn http_response(status: u16, reason: &str, content_type: &str, body: &str) -> String {
        format!(
            "HTTP/1.1 {status} {reason}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
    }

    /// Serves `responses` in order; each received request is forwarded on the channel.
    fn try_spawn_server(responses: Vec<String>) -> Option<(String, mpsc::Receiver<String>)> {
        let listener = TcpListener::bind("127.0.0.1:0").ok()?;
        let addr = listener.local_addr().ok()?;
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for response in responses {
                let (mut stream, _) = listener.accept().expect("accept");
                let _ = tx.send(read_request(&mut stream));
                stream
                    .write_all(response.as_bytes())
                    .expect("write response");
            }
        });

        Some((format!("http://{}", addr), rx))
    }

    fn read_request(stream: &mut TcpStream) -> String {
        let mut buf = Vec::new();
        let mut tmp = [0u8; 1024];
        loop {
            let n = match stream.read(&mut tmp) {
                Ok(0) | Err(_) => break,
                Ok(n) => n,
            };
            buf.extend_from_slice(&tmp[..n]);
            let text = String::from_utf8_lossy(&buf).to_string();
            if let Some(header_end) = text.find("\r\n\r\n") {
                let content_length = text[..header_end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if buf.len() >= header_end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&buf).to_string()
    }

    fn texts() -> Vec<String> {
        vec!["大涨".to_string(), "跌停".to_string()]
    }

    fn client(base_url: String, retries: u32) -> HttpClassifier {
        HttpClassifier::new(base_url, 2000, retries, "v1".to_string(), 128).expect("client")
    }

    const OK_BODY: &str = r#"{"labels":[1,0],"probabilities":[[0.1,0.9],[0.7,0.3]]}"#;

    #[test]
    fn empty_batch_makes_no_request() {
        let classifier = client("http://127.0.0.1:9".to_string(), 0);
        let detailed = classifier.classify_detailed(&[]);
        assert_eq!(detailed.info.attempts, 0);
        assert_eq!(detailed.classifications.map(|c| c.len()), Some(0));
    }

    #[test]
    fn classify_retries_on_server_error_then_succeeds() {
        let Some((base_url, _requests)) = try_spawn_server(vec![
            http_response(503, "Service Unavailable", "text/plain", "warming up"),
            http_response(200, "OK", "application/json", OK_BODY),
        ]) else {
            eprintln!("skipping: cannot bind local test server");
            return;
        };

        let detailed = client(base_url, 3).classify_detailed(&texts());
        assert_eq!(detailed.info.attempts, 2);
        assert_eq!(detailed.info.status, Some(200));
        let labels: Vec<i64> = detailed
            .classifications
            .unwrap_or_default()
            .iter()
            .map(|c| c.label)
            .collect();
        assert_eq!(labels, vec![1, 0]);
    }

    #[test]
    fn classify_posts_model_version_and_texts() {
        let Some((base_url, requests)) =
            try_spawn_server(vec![http_response(200, "OK", "application/json", OK_BODY)])
        else {
            eprintln!("skipping: cannot bind local test server");
            return;
        };

        client(base_url, 0)
            .classify_batch(&texts())
            .expect("classify");
        let request = requests.recv().expect("request captured");
        assert!(request.starts_with("POST /v1/classify"));
        assert!(request.contains("\"model_version\":\"v1\""));
        assert!(request.contains("\"max_seq_length\":128"));
    }

    #[test]
    fn classify_does_not_retry_on_client_error() {
        let Some((base_url, _requests)) = try_spawn_server(vec![http_response(
            422,
            "Unprocessable Entity",
            "text/plain",
            "bad input",
        )]) else {
            eprintln!("skipping: cannot bind local test server");
            return;
        };

        let detailed = client(base_url, 3).classify_detailed(&texts());
        assert_eq!(detailed.info.attempts, 1);
        assert!(detailed.classifications.is_none());
        assert!(detailed
            .info
            .error
            .unwrap_or_default()
            .contains("status 422"));
    }

    #[test]
    fn classify_errors_on_size_mismatch() {
        let body = r#"{"labels":[1],"probabilities":[[0.1,0.9]]}"#;
        let Some((base_url, _requests)) =
            try_spawn_server(vec![http_response(200, "OK", "application/json", body)])
        else {
            eprintln!("skipping: cannot bind local test server");
            return;
        };

        let err = client(base_url, 3)
            .classify_batch(&texts())
            .expect_err("mismatch");
        assert!(err.contains("batch size mismatch"));
    }

    #[test]
    fn classify_rejects_out_of_range_probabilities() {
        let body = r#"{"labels":[1,0],"probabilities":[[0.1,1.9],[0.7,0.3]]}"#;
        let Some((base_url, _requests)) =
            try_spawn_server(vec![http_response(200, "OK", "application/json", body)])
        else {
            eprintln!("skipping: cannot bind local test server");
            return;
        };

        let err = client(base_url, 0)
            .classify_batch(&texts())
            .expect_err("invalid probabilities");
        assert!(err.contains("position 0"));
    }
}
