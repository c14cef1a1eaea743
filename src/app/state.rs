//! App state - pure data structure with no I/O logic

use std::sync::Arc;

use crate::codegen::CodeLanguage;
use crate::messages::render::{EndpointRow, HistoryRow, MetricsView};
use crate::messages::ui_events::{AuthField, HeaderField, InputMode, OutputTab, Panel};
use crate::messages::RenderState;
use crate::metrics;
use crate::models::{
    ApiConfiguration, ApiEndpoint, ApiRequestResult, AuthenticationType, FieldError, Header,
    ParamLocation, ParameterType, RequestAuth,
};
use crate::network::RetryPolicy;
use crate::registry::Registry;
use crate::settings::Settings;

/// One editable parameter row, prefilled from the endpoint definition
#[derive(Clone, Debug, PartialEq)]
pub struct ParamField {
    pub location: ParamLocation,
    pub name: String,
    pub param_type: ParameterType,
    pub required: bool,
    pub description: String,
    /// Raw text as typed; typed via `sanitize_value` on send
    pub value: String,
}

/// Authentication material as typed in the Auth panel
#[derive(Clone, Debug, PartialEq)]
pub struct AuthInput {
    pub auth_type: AuthenticationType,
    pub token: String,
    pub username: String,
    pub password: String,
}

impl Default for AuthInput {
    fn default() -> Self {
        AuthInput {
            auth_type: AuthenticationType::None,
            token: String::new(),
            username: String::new(),
            password: String::new(),
        }
    }
}

impl AuthInput {
    /// Blank fields are treated as absent so no half-filled header is sent
    pub fn to_request_auth(&self) -> RequestAuth {
        match self.auth_type {
            AuthenticationType::None => RequestAuth::none(),
            AuthenticationType::Basic => {
                if self.username.is_empty() || self.password.is_empty() {
                    RequestAuth {
                        auth_type: AuthenticationType::Basic,
                        token: None,
                        credentials: None,
                    }
                } else {
                    RequestAuth::basic(self.username.clone(), self.password.clone())
                }
            }
            auth_type => {
                if self.token.is_empty() {
                    RequestAuth {
                        auth_type,
                        token: None,
                        credentials: None,
                    }
                } else {
                    RequestAuth::with_token(auth_type, self.token.clone())
                }
            }
        }
    }
}

/// Main application state - pure data, no I/O
pub struct AppState {
    pub registry: Arc<Registry>,

    // Selection
    pub selected_api: usize,
    pub selected_endpoint: usize,

    // Request form
    pub params: Vec<ParamField>,
    pub selected_param: usize,
    pub body_text: String,
    pub headers: Vec<Header>,
    pub selected_header: usize,
    pub header_field: HeaderField,
    pub auth: AuthInput,
    pub auth_field: AuthField,
    pub cursor_position: usize,

    // UI state
    pub active_panel: Panel,
    pub input_mode: InputMode,
    pub output_tab: OutputTab,
    pub output_scroll: u16,

    // Execution
    pub retry_policy: RetryPolicy,
    pub use_retry: bool,
    pub is_loading: bool,
    pub next_request_id: u64,
    pub pending_request_id: Option<u64>,

    // Results
    pub last_result: Option<ApiRequestResult>,
    pub validation_errors: Vec<FieldError>,
    pub history: Vec<ApiRequestResult>,
    pub selected_history: usize,

    // Code generation
    pub language: CodeLanguage,
    pub generated_code: String,

    pub status_message: String,
    pub show_help: bool,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, settings: &Settings) -> Self {
        let mut state = AppState {
            registry,
            selected_api: 0,
            selected_endpoint: 0,
            params: Vec::new(),
            selected_param: 0,
            body_text: String::new(),
            headers: Vec::new(),
            selected_header: 0,
            header_field: HeaderField::Value,
            auth: AuthInput::default(),
            auth_field: AuthField::Token,
            cursor_position: 0,
            active_panel: Panel::Endpoints,
            input_mode: InputMode::Normal,
            output_tab: OutputTab::Response,
            output_scroll: 0,
            retry_policy: settings.retry_policy(),
            use_retry: settings.use_retry,
            is_loading: false,
            next_request_id: 1,
            pending_request_id: None,
            last_result: None,
            validation_errors: Vec::new(),
            history: Vec::new(),
            selected_history: 0,
            language: settings.default_language,
            generated_code: String::new(),
            status_message: String::from("Select an endpoint and press 's' to send"),
            show_help: false,
        };
        state.select_api(0);
        state
    }

    /// Generate a unique request ID
    pub fn next_id(&mut self) -> u64 {
        let id = self.next_request_id;
        self.next_request_id += 1;
        id
    }

    pub fn current_api(&self) -> Option<&ApiConfiguration> {
        self.registry.all().get(self.selected_api)
    }

    pub fn current_endpoint(&self) -> Option<&ApiEndpoint> {
        self.current_api()
            .and_then(|api| api.endpoints.get(self.selected_endpoint))
    }

    /// Get the current input field content
    pub fn current_input(&self) -> &str {
        match self.active_panel {
            Panel::Params => self
                .params
                .get(self.selected_param)
                .map(|p| p.value.as_str())
                .unwrap_or(""),
            Panel::Body => &self.body_text,
            Panel::Headers => match self.headers.get(self.selected_header) {
                Some(header) => match self.header_field {
                    HeaderField::Key => &header.key,
                    HeaderField::Value => &header.value,
                },
                None => "",
            },
            Panel::Auth => match self.auth_field {
                AuthField::Token => &self.auth.token,
                AuthField::Username => &self.auth.username,
                AuthField::Password => &self.auth.password,
            },
            _ => "",
        }
    }

    /// Get mutable reference to current input field.
    ///
    /// `None` when the active panel has nothing to type into.
    pub fn current_input_mut(&mut self) -> Option<&mut String> {
        match self.active_panel {
            Panel::Params => self.params.get_mut(self.selected_param).map(|p| &mut p.value),
            Panel::Body => Some(&mut self.body_text),
            Panel::Headers => {
                let field = self.header_field;
                self.headers
                    .get_mut(self.selected_header)
                    .map(|header| match field {
                        HeaderField::Key => &mut header.key,
                        HeaderField::Value => &mut header.value,
                    })
            }
            Panel::Auth => Some(match self.auth_field {
                AuthField::Token => &mut self.auth.token,
                AuthField::Username => &mut self.auth.username,
                AuthField::Password => &mut self.auth.password,
            }),
            _ => None,
        }
    }

    /// Convert state to RenderState for UI
    pub fn to_render_state(&self) -> RenderState {
        let api = self.current_api();
        let endpoint = self.current_endpoint();
        let preview = self.build_current_request();

        let summary = metrics::analyze_metrics(&self.history);
        let metrics_view = MetricsView {
            request_rate: metrics::calculate_request_rate(&self.history),
            time_groups: metrics::group_metrics_by_time(
                &self.history,
                crate::constants::DEFAULT_METRICS_WINDOW_MS,
            ),
            summary,
        };

        RenderState {
            api_names: self.registry.all().iter().map(|c| c.name.clone()).collect(),
            selected_api: self.selected_api,
            api_description: api.map(|c| c.description.clone()).unwrap_or_default(),
            base_url: api.map(|c| c.base_url.clone()).unwrap_or_default(),
            endpoints: api
                .map(|c| c.endpoints.iter().map(EndpointRow::from).collect())
                .unwrap_or_default(),
            selected_endpoint: self.selected_endpoint,
            endpoint_description: endpoint.map(|e| e.description.clone()).unwrap_or_default(),
            method: endpoint.map(|e| e.method),
            url_preview: match &preview {
                Ok(request) => request.url.clone(),
                Err(err) => err.to_string(),
            },
            params: self.params.clone(),
            selected_param: self.selected_param,
            body_text: self.body_text.clone(),
            body_allowed: endpoint.map(|e| e.method.allows_body()).unwrap_or(false),
            headers: self.headers.clone(),
            selected_header: self.selected_header,
            header_field: self.header_field,
            auth: self.auth.clone(),
            auth_field: self.auth_field,
            active_panel: self.active_panel,
            input_mode: self.input_mode,
            cursor_position: self.cursor_position,
            output_tab: self.output_tab,
            output_scroll: self.output_scroll,
            last_result: self.last_result.clone(),
            validation_errors: self.validation_errors.clone(),
            generated_code: self.generated_code.clone(),
            language: self.language,
            metrics: metrics_view,
            history: self.history.iter().rev().map(HistoryRow::from).collect(),
            selected_history: self.selected_history,
            is_loading: self.is_loading,
            use_retry: self.use_retry,
            status_message: self.status_message.clone(),
            show_help: self.show_help,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_auth_input_sends_no_material() {
        let mut auth = AuthInput {
            auth_type: AuthenticationType::Bearer,
            ..AuthInput::default()
        };
        assert_eq!(auth.to_request_auth().token, None);

        auth.token = String::from("abc");
        assert_eq!(auth.to_request_auth().token.as_deref(), Some("abc"));

        auth.auth_type = AuthenticationType::Basic;
        auth.username = String::from("user");
        assert!(auth.to_request_auth().credentials.is_none());
        auth.password = String::from("pass");
        assert!(auth.to_request_auth().credentials.is_some());
    }
}
