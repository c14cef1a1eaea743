//! Command handlers - business logic for processing UI events

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::app::state::ParamField;
use crate::app::AppState;
use crate::builder::{self, RequestParams};
use crate::codegen;
use crate::error::{ExplorerError, Result};
use crate::messages::ui_events::{AuthField, HeaderField, InputMode, OutputTab, Panel};
use crate::messages::{NetworkCommand, NetworkResponse};
use crate::metrics;
use crate::models::{
    ApiRequest, AuthenticationType, Header, Headers, ParamLocation, ParameterDefinition,
    ValidationResult, ValueMap,
};
use crate::validation::{self, ParamInput};

/// File format written by the export keys
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Json => "json",
            ExportFormat::Csv => "csv",
        }
    }
}

impl AppState {
    // ========================
    // Navigation
    // ========================

    pub fn next_panel(&mut self) {
        self.active_panel = self.active_panel.next();
    }

    pub fn prev_panel(&mut self) {
        self.active_panel = self.active_panel.prev();
    }

    pub fn move_up(&mut self) {
        match self.active_panel {
            Panel::Apis => {
                if self.selected_api > 0 {
                    self.select_api(self.selected_api - 1);
                }
            }
            Panel::Endpoints => {
                if self.selected_endpoint > 0 {
                    self.load_endpoint(self.selected_endpoint - 1);
                }
            }
            Panel::Params => self.selected_param = self.selected_param.saturating_sub(1),
            Panel::Headers => self.selected_header = self.selected_header.saturating_sub(1),
            Panel::Output if self.output_tab == OutputTab::History => {
                self.selected_history = self.selected_history.saturating_sub(1);
            }
            _ => self.output_scroll = self.output_scroll.saturating_sub(1),
        }
    }

    pub fn move_down(&mut self) {
        match self.active_panel {
            Panel::Apis => {
                if self.selected_api + 1 < self.registry.len() {
                    self.select_api(self.selected_api + 1);
                }
            }
            Panel::Endpoints => {
                let count = self.current_api().map(|c| c.endpoints.len()).unwrap_or(0);
                if self.selected_endpoint + 1 < count {
                    self.load_endpoint(self.selected_endpoint + 1);
                }
            }
            Panel::Params => {
                if self.selected_param + 1 < self.params.len() {
                    self.selected_param += 1;
                }
            }
            Panel::Headers => {
                if self.selected_header + 1 < self.headers.len() {
                    self.selected_header += 1;
                }
            }
            Panel::Output if self.output_tab == OutputTab::History => {
                if self.selected_history + 1 < self.history.len() {
                    self.selected_history += 1;
                }
            }
            _ => self.output_scroll = self.output_scroll.saturating_add(1),
        }
    }

    /// Enter on a list panel
    pub fn select(&mut self) {
        match self.active_panel {
            Panel::Apis => self.active_panel = Panel::Endpoints,
            Panel::Endpoints => self.active_panel = Panel::Params,
            Panel::Output if self.output_tab == OutputTab::History => self.show_history_entry(),
            _ => {}
        }
    }

    pub fn next_output_tab(&mut self) {
        self.output_tab = self.output_tab.next();
        self.output_scroll = 0;
    }

    // ========================
    // Input editing
    // ========================

    pub fn start_editing(&mut self) {
        if self.active_panel == Panel::Body
            && !self.current_endpoint().is_some_and(|e| e.method.allows_body())
        {
            self.status_message = String::from("This method does not send a body");
            return;
        }
        if self.active_panel == Panel::Auth && self.auth.auth_type == AuthenticationType::None {
            self.status_message = String::from("Press 't' to choose an auth type first");
            return;
        }
        if self.current_input_mut().is_some() {
            self.input_mode = InputMode::Editing;
            self.cursor_position = self.current_input().len();
        }
    }

    pub fn stop_editing(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn move_cursor_left(&mut self) {
        let input = self.current_input();
        if self.cursor_position > 0 {
            let new_pos = input[..self.cursor_position]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            self.cursor_position = new_pos;
        }
    }

    pub fn move_cursor_right(&mut self) {
        let input = self.current_input();
        if self.cursor_position < input.len() {
            let new_pos = input[self.cursor_position..]
                .char_indices()
                .nth(1)
                .map(|(i, _)| self.cursor_position + i)
                .unwrap_or(input.len());
            self.cursor_position = new_pos;
        }
    }

    pub fn enter_char(&mut self, c: char) {
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            if cursor_pos <= input.len() {
                input.insert(cursor_pos, c);
                self.cursor_position = cursor_pos + c.len_utf8();
            }
        }
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position == 0 {
            return;
        }
        let cursor_pos = self.cursor_position;
        if let Some(input) = self.current_input_mut() {
            let prev_pos = input[..cursor_pos]
                .char_indices()
                .last()
                .map(|(i, _)| i)
                .unwrap_or(0);
            input.remove(prev_pos);
            self.cursor_position = prev_pos;
        }
    }

    /// Tab while editing: switch between the fields of a multi-field panel
    pub fn next_field(&mut self) {
        match self.active_panel {
            Panel::Auth if self.auth.auth_type == AuthenticationType::Basic => {
                self.auth_field = match self.auth_field {
                    AuthField::Username => AuthField::Password,
                    _ => AuthField::Username,
                };
            }
            Panel::Headers => {
                self.header_field = match self.header_field {
                    HeaderField::Key => HeaderField::Value,
                    HeaderField::Value => HeaderField::Key,
                };
            }
            _ => return,
        }
        self.cursor_position = self.current_input().len();
    }

    // ========================
    // Registry selection
    // ========================

    /// Switch API, populating its endpoint list and loading the first endpoint
    pub fn select_api(&mut self, index: usize) {
        let Some(api) = self.registry.all().get(index) else {
            self.status_message = String::from("No API configurations loaded");
            return;
        };
        debug!(api = %api.id, "Selected API");
        self.selected_api = index;
        self.selected_endpoint = 0;
        self.load_endpoint(0);
    }

    /// Prefill the request form from the endpoint's defaults and first example
    pub fn load_endpoint(&mut self, index: usize) {
        let Some(api) = self.current_api().cloned() else {
            return;
        };
        let Some(endpoint) = api.endpoints.get(index) else {
            self.params.clear();
            self.body_text.clear();
            return;
        };

        let defaults = builder::default_parameters(endpoint);
        let mut params = Vec::new();
        if let Some(declared) = &endpoint.parameters {
            let groups = [
                (ParamLocation::Path, &declared.path, &defaults.path),
                (ParamLocation::Query, &declared.query, &defaults.query),
                (ParamLocation::Header, &declared.headers, &ValueMap::new()),
            ];
            for (location, definitions, prefill) in groups {
                for (name, def) in definitions {
                    params.push(param_field(location, name, def, prefill.get(name)));
                }
            }
        }

        self.body_text = if endpoint.method.allows_body() {
            let value = if defaults.body.is_empty() {
                endpoint
                    .parameters
                    .as_ref()
                    .and_then(|p| p.body.as_ref())
                    .and_then(|b| b.example.clone())
            } else {
                Some(Value::Object(defaults.body.into_iter().collect()))
            };
            value
                .map(|v| serde_json::to_string_pretty(&v).unwrap_or_else(|_| v.to_string()))
                .unwrap_or_default()
        } else {
            String::new()
        };

        self.auth.auth_type = api
            .resolved_auth(endpoint)
            .map(|a| a.auth_type)
            .unwrap_or(AuthenticationType::None);
        self.auth_field = if self.auth.auth_type == AuthenticationType::Basic {
            AuthField::Username
        } else {
            AuthField::Token
        };

        self.selected_endpoint = index;
        self.params = params;
        self.selected_param = 0;
        self.validation_errors.clear();
        self.generated_code.clear();
        self.output_scroll = 0;
        self.status_message = format!("{} {}", endpoint.method.as_str(), endpoint.path);
    }

    /// Discard edits and reload the current endpoint's defaults
    pub fn reset_params(&mut self) {
        self.load_endpoint(self.selected_endpoint);
        self.status_message = String::from("Parameters reset to defaults");
    }

    // ========================
    // Request assembly
    // ========================

    fn collect_params(&self, location: ParamLocation) -> ValueMap {
        self.params
            .iter()
            .filter(|p| p.location == location)
            .filter_map(|p| {
                validation::sanitize_value(&p.value, p.param_type).map(|v| (p.name.clone(), v))
            })
            .collect()
    }

    /// Declared header parameters overlaid by enabled custom headers
    fn collect_headers(&self) -> Headers {
        let mut headers: Headers = self
            .params
            .iter()
            .filter(|p| p.location == ParamLocation::Header && !p.value.trim().is_empty())
            .map(|p| (p.name.clone(), p.value.trim().to_string()))
            .collect();
        for header in self.headers.iter().filter(|h| h.enabled && !h.key.trim().is_empty()) {
            headers.insert(header.key.trim().to_string(), header.value.clone());
        }
        headers
    }

    /// Body text as JSON, or as an opaque string when it is not JSON
    fn parse_body(&self) -> Option<Value> {
        if !self.current_endpoint().is_some_and(|e| e.method.allows_body()) {
            return None;
        }
        let text = self.body_text.trim();
        if text.is_empty() {
            return None;
        }
        Some(serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string())))
    }

    fn current_request_params(&self) -> RequestParams {
        let headers = self.collect_headers();
        RequestParams {
            path_params: Some(self.collect_params(ParamLocation::Path)),
            query_params: Some(self.collect_params(ParamLocation::Query)),
            headers: (!headers.is_empty()).then_some(headers),
            body: self.parse_body(),
            authentication: Some(self.auth.to_request_auth()),
        }
    }

    /// Resolve the form into a request without validating it
    pub fn build_current_request(&self) -> Result<ApiRequest> {
        let api = self.current_api().ok_or(ExplorerError::UnknownApi(String::new()))?;
        let endpoint = self.current_endpoint().ok_or_else(|| ExplorerError::UnknownEndpoint {
            api: api.id.clone(),
            endpoint: self.selected_endpoint.to_string(),
        })?;
        builder::build_request(api, endpoint, self.current_request_params())
    }

    pub fn validate_current(&self) -> ValidationResult {
        let Some(endpoint) = self.current_endpoint() else {
            return ValidationResult::ok();
        };
        let params = self.current_request_params();
        validation::validate_request_parameters(
            endpoint,
            &ParamInput {
                path_params: params.path_params.as_ref(),
                query_params: params.query_params.as_ref(),
                body: params.body.as_ref(),
            },
        )
    }

    // ========================
    // Request actions
    // ========================

    /// Validate, build and dispatch the current request.
    ///
    /// Returns `None` when validation fails or a request is already in flight.
    pub fn prepare_send(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            self.status_message = String::from("A request is already in flight");
            return None;
        }

        let validation = self.validate_current();
        self.validation_errors = validation.errors().to_vec();
        if !validation.valid {
            self.output_tab = OutputTab::Response;
            self.status_message = format!(
                "{} validation error(s), request not sent",
                self.validation_errors.len()
            );
            return None;
        }

        let request = match self.build_current_request() {
            Ok(request) => request,
            Err(err) => {
                warn!(error = %err, "Failed to build request");
                self.status_message = err.to_string();
                return None;
            }
        };

        let base_url = self.current_api().map(|c| c.base_url.clone()).unwrap_or_default();
        let id = self.next_id();
        info!(id, method = request.method.as_str(), url = %request.url, "Sending request");

        self.is_loading = true;
        self.pending_request_id = Some(id);
        self.output_tab = OutputTab::Response;
        self.output_scroll = 0;
        self.status_message = String::from("Sending...");

        Some(NetworkCommand::Execute {
            id,
            base_url,
            request,
            retry: self.use_retry.then_some(self.retry_policy),
        })
    }

    /// Every endpoint of the current API, built from its defaults and the
    /// current auth input, sent concurrently
    pub fn prepare_batch(&mut self) -> Option<NetworkCommand> {
        if self.is_loading {
            self.status_message = String::from("A request is already in flight");
            return None;
        }
        let api = self.current_api()?.clone();
        let auth = self.auth.to_request_auth();

        let requests: Vec<ApiRequest> = api
            .endpoints
            .iter()
            .filter_map(|endpoint| {
                let defaults = builder::default_parameters(endpoint);
                let body = (endpoint.method.allows_body() && !defaults.body.is_empty())
                    .then(|| Value::Object(defaults.body.into_iter().collect()));
                let params = RequestParams {
                    path_params: Some(defaults.path),
                    query_params: Some(defaults.query),
                    headers: None,
                    body,
                    authentication: Some(auth.clone()),
                };
                builder::build_request(&api, endpoint, params)
                    .inspect_err(|err| warn!(endpoint = %endpoint.id, error = %err, "Skipping endpoint in batch"))
                    .ok()
            })
            .collect();

        if requests.is_empty() {
            self.status_message = String::from("No endpoints to send");
            return None;
        }

        let id = self.next_id();
        info!(id, api = %api.id, count = requests.len(), "Sending batch");
        self.is_loading = true;
        self.pending_request_id = Some(id);
        self.status_message = format!("Sending {} requests...", requests.len());

        Some(NetworkCommand::Batch {
            id,
            base_url: api.base_url,
            requests,
        })
    }

    /// Reachability check of the current API's base URL
    pub fn prepare_probe(&mut self) -> Option<NetworkCommand> {
        let url = self.current_api()?.base_url.clone();
        let id = self.next_id();
        self.status_message = format!("Probing {}...", url);
        Some(NetworkCommand::Probe { id, url })
    }

    pub fn toggle_retry(&mut self) {
        self.use_retry = !self.use_retry;
        self.status_message = if self.use_retry {
            format!(
                "Retry on: up to {} retries, {}ms linear backoff",
                self.retry_policy.max_retries,
                self.retry_policy.retry_delay.as_millis()
            )
        } else {
            String::from("Retry off")
        };
    }

    // ========================
    // Headers
    // ========================

    pub fn toggle_header(&mut self) {
        if let Some(header) = self.headers.get_mut(self.selected_header) {
            header.enabled = !header.enabled;
        }
    }

    pub fn add_header(&mut self) {
        self.headers.push(Header::new("X-Custom", "value"));
        self.selected_header = self.headers.len() - 1;
    }

    pub fn delete_header(&mut self) {
        if !self.headers.is_empty() {
            self.headers.remove(self.selected_header);
            if self.selected_header > 0 {
                self.selected_header -= 1;
            }
        }
    }

    // ========================
    // Auth
    // ========================

    pub fn cycle_auth(&mut self) {
        self.auth.auth_type = self.auth.auth_type.next();
        self.auth_field = if self.auth.auth_type == AuthenticationType::Basic {
            AuthField::Username
        } else {
            AuthField::Token
        };
    }

    // ========================
    // Code generation
    // ========================

    pub fn generate_code(&mut self) {
        match self.build_current_request() {
            Ok(request) => {
                self.generated_code = codegen::generate_code(&request, self.language);
                self.output_tab = OutputTab::Code;
                self.output_scroll = 0;
                self.status_message = format!("Generated {} snippet", self.language);
            }
            Err(err) => self.status_message = err.to_string(),
        }
    }

    pub fn cycle_language(&mut self) {
        self.language = self.language.next();
        if self.generated_code.is_empty() {
            self.status_message = format!("Language: {}", self.language);
        } else {
            self.generate_code();
        }
    }

    // ========================
    // Metrics export
    // ========================

    pub fn export(&mut self, format: ExportFormat) {
        let dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        self.export_to(&dir, format);
    }

    pub fn export_to(&mut self, dir: &Path, format: ExportFormat) {
        if self.history.is_empty() {
            self.status_message = String::from("Nothing to export yet");
            return;
        }
        match write_export(dir, format, &self.history) {
            Ok(path) => {
                info!(path = %path.display(), "Exported metrics");
                self.status_message = format!("Exported to {}", path.display());
            }
            Err(err) => {
                warn!(error = %err, "Export failed");
                self.status_message = format!("Export failed: {}", err);
            }
        }
    }

    // ========================
    // History
    // ========================

    /// Show the selected history entry in the Response tab
    pub fn show_history_entry(&mut self) {
        let Some(index) = self.history.len().checked_sub(self.selected_history + 1) else {
            return;
        };
        if let Some(result) = self.history.get(index) {
            self.last_result = Some(result.clone());
            self.output_tab = OutputTab::Response;
            self.output_scroll = 0;
        }
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
        self.selected_history = 0;
        self.status_message = String::from("History cleared");
    }

    // ========================
    // Popups
    // ========================

    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }

    pub fn close_help(&mut self) {
        self.show_help = false;
    }

    // ========================
    // Network response handling
    // ========================

    pub fn handle_response(&mut self, response: NetworkResponse) {
        if let NetworkResponse::ProbeFinished { url, probe, .. } = &response {
            self.status_message = if probe.reachable {
                format!("{} reachable in {}ms", url, probe.response_time_ms)
            } else {
                format!("{} unreachable", url)
            };
            return;
        }

        if self.pending_request_id != Some(response.id()) {
            debug!(id = response.id(), "Ignoring stale response");
            return;
        }
        self.is_loading = false;
        self.pending_request_id = None;

        match response {
            NetworkResponse::Completed { result, .. } => {
                self.status_message = match &result.error {
                    Some(error) if result.response.is_none() => error.clone(),
                    _ => format!(
                        "{} {} in {}ms",
                        result.metrics.status, result.metrics.status_text, result.metrics.duration_ms
                    ),
                };
                self.history.push((*result).clone());
                self.last_result = Some(*result);
            }
            NetworkResponse::BatchCompleted { results, .. } => {
                let ok = results.iter().filter(|r| r.success).count();
                self.status_message = format!("Batch finished: {}/{} succeeded", ok, results.len());
                self.last_result = results.last().cloned();
                self.history.extend(results);
                self.output_tab = OutputTab::Metrics;
            }
            NetworkResponse::ProbeFinished { .. } => {}
        }
        self.selected_history = 0;
    }
}

fn param_field(
    location: ParamLocation,
    name: &str,
    def: &ParameterDefinition,
    prefill: Option<&Value>,
) -> ParamField {
    let value = prefill
        .or(def.default.as_ref())
        .map(builder::stringify_value)
        .unwrap_or_default();
    ParamField {
        location,
        name: name.to_string(),
        param_type: def.param_type,
        required: def.is_required(),
        description: def.description.clone(),
        value,
    }
}

/// Write the history as `apex-metrics-<timestamp>.<ext>` inside `dir`
pub fn write_export(
    dir: &Path,
    format: ExportFormat,
    history: &[crate::models::ApiRequestResult],
) -> anyhow::Result<PathBuf> {
    let content = match format {
        ExportFormat::Json => metrics::export_metrics(history)?,
        ExportFormat::Csv => metrics::export_metrics_csv(history)?,
    };
    let name = format!(
        "apex-metrics-{}.{}",
        chrono::Utc::now().format("%Y%m%d-%H%M%S%3f"),
        format.extension()
    );
    let path = dir.join(name);
    fs::write(&path, content).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::Utc;

    use crate::models::{ApiRequestResult, HttpMethod, PerformanceMetrics};
    use crate::registry::Registry;
    use crate::settings::Settings;

    fn state() -> AppState {
        AppState::new(Arc::new(Registry::builtin().unwrap()), &Settings::default())
    }

    fn state_at(api_id: &str, endpoint_id: &str) -> AppState {
        let mut state = state();
        let api_index = state.registry.all().iter().position(|c| c.id == api_id).unwrap();
        state.select_api(api_index);
        let endpoint_index = state
            .current_api()
            .unwrap()
            .endpoints
            .iter()
            .position(|e| e.id == endpoint_id)
            .unwrap();
        state.load_endpoint(endpoint_index);
        state
    }

    fn param<'a>(state: &'a mut AppState, name: &str) -> &'a mut ParamField {
        state.params.iter_mut().find(|p| p.name == name).unwrap()
    }

    fn result_for(request: ApiRequest, status: u16) -> ApiRequestResult {
        ApiRequestResult {
            request,
            response: None,
            metrics: PerformanceMetrics {
                duration_ms: 42,
                status,
                status_text: String::from("OK"),
                size: Some(10),
                cached: false,
            },
            timestamp: Utc::now(),
            success: (200..300).contains(&status),
            error: None,
        }
    }

    #[test]
    fn test_select_api_loads_first_endpoint() {
        let state = state_at("ecommerce-api", "auth-login");
        assert_eq!(state.selected_endpoint, 0);
        let body: Value = serde_json::from_str(&state.body_text).unwrap();
        assert_eq!(body["email"], "demo@example.com");
        assert_eq!(state.auth.auth_type, AuthenticationType::None);
    }

    #[test]
    fn test_endpoint_prefill_from_example_and_auth() {
        let state = state_at("finance-mcp", "get-stock-quote");
        let symbol = state.params.iter().find(|p| p.name == "symbol").unwrap();
        assert_eq!(symbol.location, ParamLocation::Path);
        assert_eq!(symbol.value, "AAPL");
        assert!(symbol.required);
        assert_eq!(state.auth.auth_type, AuthenticationType::ApiKey);
        assert!(state.body_text.is_empty());
    }

    #[test]
    fn test_query_defaults_prefill() {
        let state = state_at("ecommerce-api", "get-products");
        let page = state.params.iter().find(|p| p.name == "page").unwrap();
        assert_eq!(page.value, "1");
        let sort = state.params.iter().find(|p| p.name == "sortBy").unwrap();
        assert_eq!(sort.value, "createdAt");
        let search = state.params.iter().find(|p| p.name == "search").unwrap();
        assert!(search.value.is_empty());
    }

    #[test]
    fn test_send_builds_execute_command() {
        let mut state = state_at("finance-mcp", "get-stock-quote");
        state.auth.token = String::from("secret");

        let cmd = state.prepare_send().unwrap();
        match cmd {
            NetworkCommand::Execute { request, retry, base_url, .. } => {
                assert_eq!(request.url, "https://api.finance-mcp.example.com/v1/stocks/AAPL/quote");
                assert_eq!(request.header("X-API-Key"), Some("secret"));
                assert_eq!(base_url, "https://api.finance-mcp.example.com/v1");
                assert!(retry.is_some());
            }
            other => panic!("unexpected command {:?}", other),
        }
        assert!(state.is_loading);
        assert!(state.prepare_send().is_none());
    }

    #[test]
    fn test_invalid_params_block_send() {
        let mut state = state_at("finance-mcp", "get-stock-quote");
        param(&mut state, "symbol").value.clear();

        assert!(state.prepare_send().is_none());
        assert!(!state.is_loading);
        assert_eq!(state.validation_errors.len(), 1);
        assert_eq!(state.validation_errors[0].field, "path.symbol");
    }

    #[test]
    fn test_body_validation_blocks_send() {
        let mut state = state_at("ecommerce-api", "auth-login");
        state.body_text = String::from(r#"{"email": "demo@example.com", "password": "short"}"#);

        assert!(state.prepare_send().is_none());
        assert!(state
            .validation_errors
            .iter()
            .any(|e| e.field == "body.password"));
    }

    #[test]
    fn test_retry_toggle_drops_policy() {
        let mut state = state_at("finance-mcp", "get-market-status");
        state.toggle_retry();
        match state.prepare_send() {
            Some(NetworkCommand::Execute { retry, .. }) => assert!(retry.is_none()),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_custom_headers_are_sent_when_enabled() {
        let mut state = state_at("finance-mcp", "get-market-status");
        state.add_header();
        state.headers[0].value = String::from("trace-1");
        let request = state.build_current_request().unwrap();
        assert_eq!(request.header("X-Custom"), Some("trace-1"));

        state.toggle_header();
        let request = state.build_current_request().unwrap();
        assert_eq!(request.header("X-Custom"), None);
    }

    #[test]
    fn test_generate_code_uses_selected_language() {
        let mut state = state_at("finance-mcp", "get-stock-quote");
        state.generate_code();
        assert!(state.generated_code.starts_with("curl"));
        assert_eq!(state.output_tab, OutputTab::Code);

        state.cycle_language();
        assert!(state.generated_code.contains("fetch("));
    }

    #[test]
    fn test_response_appends_history() {
        let mut state = state_at("finance-mcp", "get-stock-quote");
        let Some(NetworkCommand::Execute { id, request, .. }) = state.prepare_send() else {
            panic!("expected execute");
        };

        state.handle_response(NetworkResponse::Completed {
            id,
            result: Box::new(result_for(request, 200)),
        });

        assert!(!state.is_loading);
        assert_eq!(state.history.len(), 1);
        assert_eq!(state.last_result.as_ref().map(|r| r.metrics.status), Some(200));
    }

    #[test]
    fn test_stale_response_is_ignored() {
        let mut state = state_at("finance-mcp", "get-stock-quote");
        let request = state.build_current_request().unwrap();
        state.handle_response(NetworkResponse::Completed {
            id: 99,
            result: Box::new(result_for(request, 200)),
        });
        assert!(state.history.is_empty());
    }

    #[test]
    fn test_batch_covers_every_endpoint() {
        let mut state = state_at("finance-mcp", "get-market-status");
        let count = state.current_api().unwrap().endpoints.len();
        match state.prepare_batch() {
            Some(NetworkCommand::Batch { requests, .. }) => {
                assert_eq!(requests.len(), count);
                assert!(requests.iter().all(|r| r.method == HttpMethod::GET));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_history_entry_is_shown() {
        let mut state = state_at("finance-mcp", "get-stock-quote");
        let request = state.build_current_request().unwrap();
        state.history.push(result_for(request.clone(), 200));
        state.history.push(result_for(request, 503));

        state.output_tab = OutputTab::History;
        state.active_panel = Panel::Output;
        state.move_down();
        state.select();

        assert_eq!(state.output_tab, OutputTab::Response);
        assert_eq!(state.last_result.as_ref().map(|r| r.metrics.status), Some(200));
    }

    #[test]
    fn test_export_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = state_at("finance-mcp", "get-stock-quote");
        let request = state.build_current_request().unwrap();
        state.history.push(result_for(request, 200));

        let csv_path = write_export(dir.path(), ExportFormat::Csv, &state.history).unwrap();
        let csv = fs::read_to_string(csv_path).unwrap();
        assert!(csv.starts_with("Timestamp,Endpoint,Method,URL"));
        assert_eq!(csv.lines().count(), 2);

        state.export_to(dir.path(), ExportFormat::Json);
        assert!(state.status_message.starts_with("Exported to"));
        let json_files = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|x| x == "json"))
            .count();
        assert_eq!(json_files, 1);
    }

    #[test]
    fn test_editing_writes_into_selected_param() {
        let mut state = state_at("finance-mcp", "get-stock-quote");
        state.active_panel = Panel::Params;
        state.start_editing();
        state.delete_char();
        state.delete_char();
        state.enter_char('P');
        state.enter_char('L');
        state.stop_editing();
        assert_eq!(param(&mut state, "symbol").value, "AAPL");

        state.start_editing();
        for _ in 0..4 {
            state.delete_char();
        }
        for c in "MSFT".chars() {
            state.enter_char(c);
        }
        let request = state.build_current_request().unwrap();
        assert!(request.url.ends_with("/stocks/MSFT/quote"));
    }
}
