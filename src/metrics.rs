//! Performance analysis over the session history
//!
//! Every function here is a pure computation over a slice of results.

use std::collections::BTreeMap;

use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use serde::Serialize;

use crate::constants::DEFAULT_METRICS_WINDOW_MS;
use crate::error::{ExplorerError, Result};
use crate::models::{ApiRequestResult, HttpMethod};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSummary {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub average_duration: u64,
    pub min_duration: u64,
    pub max_duration: u64,
    /// Median
    pub p50_duration: u64,
    pub p95_duration: u64,
    pub p99_duration: u64,
    /// Keyed by literal status, 0 for network failures
    pub status_codes: BTreeMap<u16, usize>,
    /// Percentage of failed requests, 0 to 100
    pub error_rate: f64,
}

/// One fixed-size wall-clock bucket
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeGroup {
    /// Window start, ISO 8601
    pub timestamp: String,
    pub count: usize,
    pub avg_duration: u64,
    pub success_rate: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusCategory {
    Success,
    Redirect,
    ClientError,
    ServerError,
    Unknown,
}

impl StatusCategory {
    pub fn label(&self) -> &'static str {
        match self {
            StatusCategory::Success => "Success",
            StatusCategory::Redirect => "Redirect",
            StatusCategory::ClientError => "Client Error",
            StatusCategory::ServerError => "Server Error",
            StatusCategory::Unknown => "Unknown",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            StatusCategory::Success => "Request succeeded",
            StatusCategory::Redirect => "Request redirected",
            StatusCategory::ClientError => "Client-side error",
            StatusCategory::ServerError => "Server-side error",
            StatusCategory::Unknown => "Unknown status",
        }
    }
}

pub fn status_category(status: u16) -> StatusCategory {
    match status {
        200..=299 => StatusCategory::Success,
        300..=399 => StatusCategory::Redirect,
        400..=499 => StatusCategory::ClientError,
        500..=u16::MAX => StatusCategory::ServerError,
        _ => StatusCategory::Unknown,
    }
}

/// Nearest-rank percentile: sort ascending and take index
/// `ceil(p/100 * n) - 1`, clamped at zero. Empty input yields 0.
pub fn calculate_percentile(values: &[u64], percentile: f64) -> u64 {
    if values.is_empty() {
        return 0;
    }

    let mut sorted = values.to_vec();
    sorted.sort_unstable();

    let rank = ((percentile / 100.0) * sorted.len() as f64).ceil() as i64 - 1;
    let index = rank.clamp(0, sorted.len() as i64 - 1) as usize;
    sorted[index]
}

pub fn analyze_metrics(results: &[ApiRequestResult]) -> MetricsSummary {
    if results.is_empty() {
        return MetricsSummary::default();
    }

    let durations: Vec<u64> = results.iter().map(|r| r.metrics.duration_ms).collect();
    let successful = results.iter().filter(|r| r.success).count();
    let failed = results.len() - successful;

    let mut status_codes = BTreeMap::new();
    for result in results {
        *status_codes.entry(result.metrics.status).or_insert(0) += 1;
    }

    let total: u64 = durations.iter().sum();

    MetricsSummary {
        total_requests: results.len(),
        successful_requests: successful,
        failed_requests: failed,
        average_duration: (total as f64 / durations.len() as f64).round() as u64,
        min_duration: durations.iter().copied().min().unwrap_or(0),
        max_duration: durations.iter().copied().max().unwrap_or(0),
        p50_duration: calculate_percentile(&durations, 50.0),
        p95_duration: calculate_percentile(&durations, 95.0),
        p99_duration: calculate_percentile(&durations, 99.0),
        status_codes,
        error_rate: failed as f64 / results.len() as f64 * 100.0,
    }
}

/// Requests per second between the earliest and latest timestamp
pub fn calculate_request_rate(results: &[ApiRequestResult]) -> f64 {
    if results.len() < 2 {
        return 0.0;
    }

    let timestamps = results.iter().map(|r| r.timestamp.timestamp_millis());
    let first = timestamps.clone().min().unwrap_or(0);
    let last = timestamps.max().unwrap_or(0);
    let span = last - first;

    if span == 0 {
        return 0.0;
    }
    results.len() as f64 / span as f64 * 1000.0
}

/// Bucket results by `floor(ts / window) * window`, sorted by window start
pub fn group_metrics_by_time(results: &[ApiRequestResult], window_ms: i64) -> Vec<TimeGroup> {
    let window_ms = if window_ms > 0 { window_ms } else { DEFAULT_METRICS_WINDOW_MS };

    let mut groups: BTreeMap<i64, Vec<&ApiRequestResult>> = BTreeMap::new();
    for result in results {
        let start = result.timestamp.timestamp_millis().div_euclid(window_ms) * window_ms;
        groups.entry(start).or_default().push(result);
    }

    groups
        .into_iter()
        .map(|(start, bucket)| {
            let count = bucket.len();
            let successful = bucket.iter().filter(|r| r.success).count();
            let total: u64 = bucket.iter().map(|r| r.metrics.duration_ms).sum();
            TimeGroup {
                timestamp: iso_millis(Utc.timestamp_millis_opt(start).single().unwrap_or_default()),
                count,
                avg_duration: (total as f64 / count as f64).round() as u64,
                success_rate: successful as f64 / count as f64 * 100.0,
            }
        })
        .collect()
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportDocument<'a> {
    summary: MetricsSummary,
    time_groups: Vec<TimeGroup>,
    results: Vec<ExportRow<'a>>,
}

#[derive(Serialize)]
struct ExportRow<'a> {
    timestamp: String,
    endpoint: &'a str,
    method: HttpMethod,
    status: u16,
    duration: u64,
    success: bool,
}

/// Summary, one-minute groups and per-request rows as pretty JSON
pub fn export_metrics(results: &[ApiRequestResult]) -> Result<String> {
    let document = ExportDocument {
        summary: analyze_metrics(results),
        time_groups: group_metrics_by_time(results, DEFAULT_METRICS_WINDOW_MS),
        results: results
            .iter()
            .map(|r| ExportRow {
                timestamp: iso_millis(r.timestamp),
                endpoint: &r.request.endpoint_id,
                method: r.request.method,
                status: r.metrics.status,
                duration: r.metrics.duration_ms,
                success: r.success,
            })
            .collect(),
    };

    serde_json::to_string_pretty(&document).map_err(|e| ExplorerError::Export(e.to_string()))
}

pub const CSV_HEADER: [&str; 8] = [
    "Timestamp",
    "Endpoint",
    "Method",
    "URL",
    "Status",
    "Duration (ms)",
    "Size (bytes)",
    "Success",
];

/// One header row plus one row per result, newline separated
pub fn export_metrics_csv(results: &[ApiRequestResult]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let export_err = |e: csv::Error| ExplorerError::Export(e.to_string());

    writer.write_record(CSV_HEADER).map_err(export_err)?;
    for r in results {
        writer
            .write_record([
                iso_millis(r.timestamp),
                r.request.endpoint_id.clone(),
                r.request.method.as_str().to_string(),
                r.request.url.clone(),
                r.metrics.status.to_string(),
                r.metrics.duration_ms.to_string(),
                r.metrics.size.unwrap_or(0).to_string(),
                String::from(if r.success { "Yes" } else { "No" }),
            ])
            .map_err(export_err)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ExplorerError::Export(e.to_string()))?;
    let text = String::from_utf8(bytes).map_err(|e| ExplorerError::Export(e.to_string()))?;
    Ok(text.trim_end_matches('\n').to_string())
}

/// "850ms" below one second, "1.50s" above
pub fn format_duration(ms: f64) -> String {
    if ms < 1000.0 {
        format!("{}ms", ms.round())
    } else {
        format!("{:.2}s", ms / 1000.0)
    }
}

pub fn format_size(bytes: u64) -> String {
    if bytes == 0 {
        return String::from("0 B");
    }

    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let exponent = ((bytes as f64).ln() / 1024f64.ln()).floor() as usize;
    let exponent = exponent.min(UNITS.len() - 1);
    let size = bytes as f64 / 1024f64.powi(exponent as i32);
    format!("{:.2} {}", size, UNITS[exponent])
}

fn iso_millis(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiRequest, Headers, PerformanceMetrics};

    fn result(endpoint: &str, status: u16, duration_ms: u64, at_ms: i64) -> ApiRequestResult {
        ApiRequestResult {
            request: ApiRequest {
                endpoint_id: endpoint.to_string(),
                method: HttpMethod::GET,
                url: format!("https://api.example.com/{}", endpoint),
                headers: Headers::new(),
                path_params: None,
                query_params: None,
                body: None,
                authentication: None,
            },
            response: None,
            metrics: PerformanceMetrics {
                duration_ms,
                status,
                status_text: String::new(),
                size: Some(128),
                cached: false,
            },
            timestamp: Utc.timestamp_millis_opt(at_ms).unwrap(),
            success: (200..300).contains(&status),
            error: None,
        }
    }

    #[test]
    fn test_percentile_nearest_rank() {
        let values = [50, 10, 40, 20, 30];
        assert_eq!(calculate_percentile(&values, 50.0), 30);
        assert_eq!(calculate_percentile(&values, 95.0), 50);
        assert_eq!(calculate_percentile(&values, 0.0), 10);
        assert_eq!(calculate_percentile(&[], 99.0), 0);
    }

    #[test]
    fn test_analyze_empty_history() {
        let summary = analyze_metrics(&[]);
        assert_eq!(summary.total_requests, 0);
        assert_eq!(summary.error_rate, 0.0);
        assert!(summary.status_codes.is_empty());
    }

    #[test]
    fn test_analyze_counts_statuses() {
        let history = vec![
            result("a", 200, 100, 0),
            result("a", 200, 200, 1_000),
            result("b", 404, 300, 2_000),
            result("c", 0, 401, 3_000),
        ];
        let summary = analyze_metrics(&history);

        assert_eq!(summary.total_requests, 4);
        assert_eq!(summary.successful_requests, 2);
        assert_eq!(summary.failed_requests, 2);
        assert_eq!(summary.average_duration, 250);
        assert_eq!(summary.min_duration, 100);
        assert_eq!(summary.max_duration, 401);
        assert_eq!(summary.p50_duration, 200);
        assert_eq!(summary.status_codes.get(&0), Some(&1));
        assert_eq!(summary.status_codes.get(&200), Some(&2));
        assert_eq!(summary.error_rate, 50.0);
    }

    #[test]
    fn test_group_by_window() {
        let history = vec![
            result("a", 200, 100, 125_000),
            result("a", 500, 300, 61_000),
            result("a", 200, 200, 60_000),
        ];
        let groups = group_metrics_by_time(&history, 60_000);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].timestamp, "1970-01-01T00:01:00.000Z");
        assert_eq!(groups[0].count, 2);
        assert_eq!(groups[0].avg_duration, 250);
        assert_eq!(groups[0].success_rate, 50.0);
        assert_eq!(groups[1].timestamp, "1970-01-01T00:02:00.000Z");
        assert_eq!(groups[1].count, 1);
    }

    #[test]
    fn test_request_rate() {
        assert_eq!(calculate_request_rate(&[result("a", 200, 1, 0)]), 0.0);
        let history = vec![result("a", 200, 1, 0), result("a", 200, 1, 2_000)];
        assert_eq!(calculate_request_rate(&history), 1.0);
    }

    #[test]
    fn test_export_json_shape() {
        let history = vec![result("quote", 200, 42, 0)];
        let json: serde_json::Value = serde_json::from_str(&export_metrics(&history).unwrap()).unwrap();

        assert_eq!(json["summary"]["totalRequests"], 1);
        assert_eq!(json["summary"]["statusCodes"]["200"], 1);
        assert_eq!(json["timeGroups"][0]["count"], 1);
        assert_eq!(json["results"][0]["endpoint"], "quote");
        assert_eq!(json["results"][0]["method"], "GET");
        assert_eq!(json["results"][0]["duration"], 42);
        assert_eq!(json["results"][0]["timestamp"], "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_export_csv_rows() {
        let history = vec![result("quote", 200, 42, 0), result("news", 0, 7, 1)];
        let csv = export_metrics_csv(&history).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "Timestamp,Endpoint,Method,URL,Status,Duration (ms),Size (bytes),Success");
        assert_eq!(
            lines[1],
            "1970-01-01T00:00:00.000Z,quote,GET,https://api.example.com/quote,200,42,128,Yes"
        );
        assert!(lines[2].ends_with(",0,7,128,No"));
        assert_eq!(lines.len(), 3);
        assert!(!csv.ends_with('\n'));
    }

    #[test]
    fn test_display_helpers() {
        assert_eq!(format_duration(850.4), "850ms");
        assert_eq!(format_duration(1500.0), "1.50s");
        assert_eq!(format_size(0), "0 B");
        assert_eq!(format_size(512), "512.00 B");
        assert_eq!(format_size(2048), "2.00 KB");
        assert_eq!(status_category(201), StatusCategory::Success);
        assert_eq!(status_category(429), StatusCategory::ClientError);
        assert_eq!(status_category(0), StatusCategory::Unknown);
        assert_eq!(status_category(503).label(), "Server Error");
    }
}
