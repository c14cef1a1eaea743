//! Render state - data structure sent from App layer to UI for rendering

use crate::app::state::{AuthInput, ParamField};
use crate::codegen::CodeLanguage;
use crate::messages::ui_events::{AuthField, HeaderField, InputMode, OutputTab, Panel};
use crate::metrics::{MetricsSummary, TimeGroup};
use crate::models::{ApiEndpoint, ApiRequestResult, FieldError, Header, HttpMethod};

/// Endpoint list entry
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointRow {
    pub method: HttpMethod,
    pub path: String,
    pub name: String,
    pub deprecated: bool,
}

impl From<&ApiEndpoint> for EndpointRow {
    fn from(endpoint: &ApiEndpoint) -> Self {
        EndpointRow {
            method: endpoint.method,
            path: endpoint.path.clone(),
            name: endpoint.name.clone(),
            deprecated: endpoint.deprecated,
        }
    }
}

/// History list entry
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRow {
    pub time: String,
    pub method: HttpMethod,
    pub endpoint_id: String,
    pub status: u16,
    pub duration_ms: u64,
    pub success: bool,
}

impl From<&ApiRequestResult> for HistoryRow {
    fn from(result: &ApiRequestResult) -> Self {
        HistoryRow {
            time: result.timestamp.format("%H:%M:%S").to_string(),
            method: result.request.method,
            endpoint_id: result.request.endpoint_id.clone(),
            status: result.metrics.status,
            duration_ms: result.metrics.duration_ms,
            success: result.success,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MetricsView {
    pub summary: MetricsSummary,
    pub request_rate: f64,
    pub time_groups: Vec<TimeGroup>,
}

/// Complete state needed by the UI to render
#[derive(Debug, Clone, Default)]
pub struct RenderState {
    // Registry
    pub api_names: Vec<String>,
    pub selected_api: usize,
    pub api_description: String,
    pub base_url: String,
    pub endpoints: Vec<EndpointRow>,
    pub selected_endpoint: usize,
    pub endpoint_description: String,

    // Request form
    pub method: Option<HttpMethod>,
    pub url_preview: String,
    pub params: Vec<ParamField>,
    pub selected_param: usize,
    pub body_text: String,
    pub body_allowed: bool,
    pub headers: Vec<Header>,
    pub selected_header: usize,
    pub header_field: HeaderField,
    pub auth: AuthInput,
    pub auth_field: AuthField,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub cursor_position: usize,
    pub output_tab: OutputTab,
    pub output_scroll: u16,

    // Output
    pub last_result: Option<ApiRequestResult>,
    pub validation_errors: Vec<FieldError>,
    pub generated_code: String,
    pub language: CodeLanguage,
    pub metrics: MetricsView,
    /// Newest first
    pub history: Vec<HistoryRow>,
    pub selected_history: usize,

    pub is_loading: bool,
    pub use_retry: bool,
    pub status_message: String,
    pub show_help: bool,
}
