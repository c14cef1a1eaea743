//! HTTP client wrapper - executes requests, measures timing, normalizes responses
//!
//! Every entry point resolves to a result. Network and parse failures are
//! captured into the returned `ApiRequestResult` instead of being raised.

use std::future::Future;
use std::time::{Duration, Instant};

use chrono::Utc;
use futures_util::future::join_all;
use serde_json::Value;

use crate::builder::build_request_body;
use crate::constants::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_MS, NETWORK_ERROR_TEXT};
use crate::models::{
    ApiRequest, ApiRequestResult, ApiResponse, Headers, PerformanceMetrics, ResponseBody,
    ResponseError,
};

/// Retry settings for `execute_with_retry`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt; total attempts is `max_retries + 1`
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        RetryPolicy {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_millis(DEFAULT_RETRY_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, retry_delay: Duration) -> Self {
        RetryPolicy {
            max_retries,
            retry_delay,
        }
    }

    /// Linear backoff: the k-th retry waits `retry_delay * k`
    pub fn backoff(&self, retry: u32) -> Duration {
        self.retry_delay * retry
    }
}

/// Reachability report from `test_endpoint`
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProbeResult {
    pub reachable: bool,
    pub response_time_ms: u64,
}

/// Executes `ApiRequest`s over a shared `reqwest::Client`
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client with the given per-request timeout
    pub fn new(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        ApiClient { client }
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        ApiClient { client }
    }

    /// Execute a request and return the result with metrics
    pub async fn execute(&self, request: &ApiRequest) -> ApiRequestResult {
        let timestamp = Utc::now();
        let method = reqwest::Method::from_bytes(request.method.as_str().as_bytes())
            .unwrap_or(reqwest::Method::GET);

        let mut builder = self.client.request(method, &request.url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }

        if request.method.allows_body() {
            if let Some(body) = build_request_body(request.body.as_ref(), request.header("Content-Type")) {
                builder = builder.body(body);
            }
        }

        tracing::debug!(method = %request.method, url = %request.url, "Sending request");
        let start = Instant::now();
        let result = builder.send().await;
        let duration_ms = elapsed_ms(start);

        let response = match result {
            Ok(response) => response,
            Err(e) => {
                let message = describe_error(&e);
                tracing::warn!(url = %request.url, duration_ms, error = %message, "Request failed");
                return ApiRequestResult::failure(
                    request.clone(),
                    duration_ms,
                    NETWORK_ERROR_TEXT,
                    timestamp,
                    message,
                );
            }
        };

        let status = response.status();
        let status_text = status.canonical_reason().unwrap_or_default().to_string();
        let headers = extract_headers(response.headers());
        let content_type = headers.get("content-type").cloned().unwrap_or_default();
        let content_length = headers
            .get("content-length")
            .and_then(|v| v.trim().parse::<u64>().ok());
        let cached = headers
            .get("x-cache")
            .map(|v| v.eq_ignore_ascii_case("HIT"))
            .unwrap_or(false);

        let bytes = match response.bytes().await {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(url = %request.url, error = %e, "Error reading body");
                return ApiRequestResult::failure(
                    request.clone(),
                    duration_ms,
                    NETWORK_ERROR_TEXT,
                    timestamp,
                    format!("Error reading body: {}", e),
                );
            }
        };

        let body = parse_body(&content_type, &bytes);
        let size = content_length.unwrap_or(bytes.len() as u64);
        let success = status.is_success();
        let error = (!success).then(|| classify_error(status.as_u16(), &status_text, &body));

        tracing::info!(
            method = %request.method,
            url = %request.url,
            status = status.as_u16(),
            duration_ms,
            "Request completed"
        );

        ApiRequestResult {
            request: request.clone(),
            response: Some(ApiResponse {
                status: status.as_u16(),
                status_text: status_text.clone(),
                headers,
                body,
                error,
            }),
            metrics: PerformanceMetrics {
                duration_ms,
                status: status.as_u16(),
                status_text,
                size: Some(size),
                cached,
            },
            timestamp,
            success,
            error: None,
        }
    }

    /// Execute with linear backoff; 4xx responses are not retried
    pub async fn execute_with_retry(&self, request: &ApiRequest, policy: RetryPolicy) -> ApiRequestResult {
        retry_with(request, &policy, || self.execute(request)).await
    }

    /// Run all requests concurrently and collect every result
    pub async fn execute_batch(&self, requests: &[ApiRequest]) -> Vec<ApiRequestResult> {
        tracing::info!(count = requests.len(), "Executing batch");
        join_all(requests.iter().map(|request| self.execute(request))).await
    }

    /// HEAD the URL and report reachability and latency
    pub async fn test_endpoint(&self, url: &str) -> ProbeResult {
        let start = Instant::now();
        let reachable = self.client.head(url).send().await.is_ok();
        let response_time_ms = elapsed_ms(start);
        tracing::debug!(url, reachable, response_time_ms, "Probe finished");
        ProbeResult {
            reachable,
            response_time_ms,
        }
    }
}

/// Retry loop shared by the client and its tests.
///
/// Returns the first successful result, stops early on a 4xx response,
/// otherwise returns the last failure once attempts run out.
pub async fn retry_with<F, Fut>(request: &ApiRequest, policy: &RetryPolicy, mut attempt: F) -> ApiRequestResult
where
    F: FnMut() -> Fut,
    Fut: Future<Output = ApiRequestResult>,
{
    let mut last_failure: Option<ApiRequestResult> = None;

    for n in 0..=policy.max_retries {
        let result = attempt().await;
        if result.success {
            return result;
        }

        let client_error = result
            .response_status()
            .map(|s| (400..500).contains(&s))
            .unwrap_or(false);
        last_failure = Some(result);

        if client_error {
            tracing::debug!(url = %request.url, "Client error, not retrying");
            break;
        }

        if n < policy.max_retries {
            let delay = policy.backoff(n + 1);
            tracing::info!(url = %request.url, attempt = n + 1, delay_ms = delay.as_millis() as u64, "Retrying request");
            tokio::time::sleep(delay).await;
        }
    }

    last_failure.unwrap_or_else(|| {
        ApiRequestResult::failure(request.clone(), 0, "Failed", Utc::now(), "Max retries exceeded")
    })
}

fn elapsed_ms(start: Instant) -> u64 {
    rounded_ms(start.elapsed())
}

/// Nearest whole millisecond
fn rounded_ms(duration: Duration) -> u64 {
    (duration.as_secs_f64() * 1000.0).round() as u64
}

fn describe_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        String::from("Request timed out")
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        format!("Request failed: {}", e)
    }
}

fn extract_headers(headers: &reqwest::header::HeaderMap) -> Headers {
    let mut extracted = Headers::new();
    for (name, value) in headers {
        if let Ok(value) = value.to_str() {
            extracted.insert(name.as_str().to_string(), value.to_string());
        }
    }
    extracted
}

/// Choose JSON, text or binary from the content type; unparseable JSON
/// falls back to text.
pub(crate) fn parse_body(content_type: &str, bytes: &[u8]) -> ResponseBody {
    let content_type = content_type.to_ascii_lowercase();

    if content_type.contains("application/json") || content_type.contains("+json") {
        return match serde_json::from_slice::<Value>(bytes) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned()),
        };
    }

    if content_type.contains("text/") || bytes.is_empty() {
        return ResponseBody::Text(String::from_utf8_lossy(bytes).into_owned());
    }

    ResponseBody::Binary(bytes.to_vec())
}

fn field_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Error descriptor for a non-2xx response
pub(crate) fn classify_error(status: u16, status_text: &str, body: &ResponseBody) -> ResponseError {
    let json = body.as_json();
    let message = field_text(json.and_then(|b| b.get("message")))
        .or_else(|| field_text(json.and_then(|b| b.get("error"))))
        .unwrap_or_else(|| status_text.to_string());
    let code = field_text(json.and_then(|b| b.get("code"))).unwrap_or_else(|| status.to_string());
    let details = match body {
        ResponseBody::Json(v) => Some(v.clone()),
        ResponseBody::Text(s) if !s.is_empty() => Some(Value::String(s.clone())),
        _ => None,
    };

    ResponseError {
        message,
        code,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{HttpMethod, RequestAuth};
    use std::cell::{Cell, RefCell};

    #[test]
    fn test_durations_round_to_nearest_millisecond() {
        assert_eq!(rounded_ms(Duration::from_micros(1900)), 2);
        assert_eq!(rounded_ms(Duration::from_micros(1400)), 1);
        assert_eq!(rounded_ms(Duration::from_micros(400)), 0);

        let start = Instant::now() - Duration::from_micros(1900);
        assert!(elapsed_ms(start) >= 2);
    }

    fn request() -> ApiRequest {
        ApiRequest {
            endpoint_id: String::from("quote"),
            method: HttpMethod::GET,
            url: String::from("https://api.example.com/v1/stocks/AAPL/quote"),
            headers: Headers::new(),
            path_params: None,
            query_params: None,
            body: None,
            authentication: Some(RequestAuth::none()),
        }
    }

    fn with_status(status: u16) -> ApiRequestResult {
        ApiRequestResult {
            request: request(),
            response: Some(ApiResponse {
                status,
                status_text: String::new(),
                headers: Headers::new(),
                body: ResponseBody::default(),
                error: None,
            }),
            metrics: PerformanceMetrics {
                duration_ms: 5,
                status,
                status_text: String::new(),
                size: None,
                cached: false,
            },
            timestamp: Utc::now(),
            success: (200..300).contains(&status),
            error: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_client_error_is_not_retried() {
        for status in [404u16, 429] {
            let calls = Cell::new(0);
            let result = retry_with(&request(), &RetryPolicy::default(), || {
                calls.set(calls.get() + 1);
                async move { with_status(status) }
            })
            .await;

            assert_eq!(calls.get(), 1, "status {} must not be retried", status);
            assert_eq!(result.response_status(), Some(status));
            assert!(!result.success);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_server_error_uses_every_attempt() {
        let calls = Cell::new(0);
        let policy = RetryPolicy::new(3, Duration::from_millis(1000));
        let result = retry_with(&request(), &policy, || {
            calls.set(calls.get() + 1);
            async { with_status(500) }
        })
        .await;

        assert_eq!(calls.get(), 4);
        assert_eq!(result.response_status(), Some(500));
    }

    #[tokio::test(start_paused = true)]
    async fn test_network_failures_are_retried_until_success() {
        let calls = Cell::new(0);
        let result = retry_with(&request(), &RetryPolicy::default(), || {
            calls.set(calls.get() + 1);
            let n = calls.get();
            async move {
                if n < 3 {
                    ApiRequestResult::failure(request(), 1, NETWORK_ERROR_TEXT, Utc::now(), "down")
                } else {
                    with_status(200)
                }
            }
        })
        .await;

        assert_eq!(calls.get(), 3);
        assert!(result.success);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_is_linear() {
        let starts = RefCell::new(Vec::new());
        let policy = RetryPolicy::new(2, Duration::from_millis(1000));
        retry_with(&request(), &policy, || {
            starts.borrow_mut().push(tokio::time::Instant::now());
            async { with_status(503) }
        })
        .await;

        let starts = starts.into_inner();
        assert_eq!(starts.len(), 3);
        let first_gap = starts[1] - starts[0];
        let second_gap = starts[2] - starts[1];
        assert!(first_gap >= Duration::from_millis(1000) && first_gap < Duration::from_millis(1010));
        assert!(second_gap >= Duration::from_millis(2000) && second_gap < Duration::from_millis(2010));
    }

    #[test]
    fn test_backoff_values() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.backoff(1), Duration::from_millis(1000));
        assert_eq!(policy.backoff(2), Duration::from_millis(2000));
    }

    #[test]
    fn test_parse_body_falls_back_to_text() {
        assert_eq!(
            parse_body("application/json; charset=utf-8", br#"{"ok":true}"#),
            ResponseBody::Json(serde_json::json!({"ok": true}))
        );
        assert_eq!(
            parse_body("application/json", b"not json"),
            ResponseBody::Text(String::from("not json"))
        );
        assert_eq!(parse_body("text/plain", b"hi"), ResponseBody::Text(String::from("hi")));
        assert_eq!(
            parse_body("image/png", &[0x89, 0x50]),
            ResponseBody::Binary(vec![0x89, 0x50])
        );
    }

    #[test]
    fn test_classify_error_prefers_body_fields() {
        let body = ResponseBody::Json(serde_json::json!({
            "message": "Symbol not found",
            "code": "NOT_FOUND"
        }));
        let error = classify_error(404, "Not Found", &body);
        assert_eq!(error.message, "Symbol not found");
        assert_eq!(error.code, "NOT_FOUND");
        assert!(error.details.is_some());

        let body = ResponseBody::Json(serde_json::json!({ "error": "bad token" }));
        let error = classify_error(401, "Unauthorized", &body);
        assert_eq!(error.message, "bad token");
        assert_eq!(error.code, "401");

        let error = classify_error(502, "Bad Gateway", &ResponseBody::default());
        assert_eq!(error.message, "Bad Gateway");
        assert_eq!(error.code, "502");
        assert!(error.details.is_none());
    }
}
