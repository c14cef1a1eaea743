//! Data model shared by the registry, builder, client, generators and metrics.
//!
//! Configuration types deserialize from the same camelCase shape the demo
//! configurations are written in. Parameter and body values stay as
//! `serde_json::Value` and are checked at the boundary by the validator.

use std::fmt;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Insertion-ordered parameter values (path, query, body fields)
pub type ValueMap = IndexMap<String, Value>;

/// Insertion-ordered header map; later inserts overwrite in place
pub type Headers = IndexMap<String, String>;

/// HTTP Method enum
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    GET,
    POST,
    PUT,
    DELETE,
    PATCH,
    HEAD,
    OPTIONS,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::GET => "GET",
            HttpMethod::POST => "POST",
            HttpMethod::PUT => "PUT",
            HttpMethod::DELETE => "DELETE",
            HttpMethod::PATCH => "PATCH",
            HttpMethod::HEAD => "HEAD",
            HttpMethod::OPTIONS => "OPTIONS",
        }
    }

    /// Whether a request body is sent for this method
    pub fn allows_body(&self) -> bool {
        !matches!(self, HttpMethod::GET | HttpMethod::HEAD)
    }

    pub fn parse(s: &str) -> Option<HttpMethod> {
        match s.to_uppercase().as_str() {
            "GET" => Some(HttpMethod::GET),
            "POST" => Some(HttpMethod::POST),
            "PUT" => Some(HttpMethod::PUT),
            "DELETE" => Some(HttpMethod::DELETE),
            "PATCH" => Some(HttpMethod::PATCH),
            "HEAD" => Some(HttpMethod::HEAD),
            "OPTIONS" => Some(HttpMethod::OPTIONS),
            _ => None,
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authentication scheme
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthenticationType {
    #[serde(rename = "bearer")]
    Bearer,
    #[serde(rename = "apiKey")]
    ApiKey,
    #[serde(rename = "basic")]
    Basic,
    #[serde(rename = "oauth2")]
    OAuth2,
    #[serde(rename = "none")]
    None,
}

impl AuthenticationType {
    /// Wire spelling used in configuration files
    pub fn id(&self) -> &'static str {
        match self {
            AuthenticationType::Bearer => "bearer",
            AuthenticationType::ApiKey => "apiKey",
            AuthenticationType::Basic => "basic",
            AuthenticationType::OAuth2 => "oauth2",
            AuthenticationType::None => "none",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AuthenticationType::Bearer => "Bearer",
            AuthenticationType::ApiKey => "API Key",
            AuthenticationType::Basic => "Basic",
            AuthenticationType::OAuth2 => "OAuth2",
            AuthenticationType::None => "None",
        }
    }

    pub fn next(&self) -> AuthenticationType {
        match self {
            AuthenticationType::None => AuthenticationType::Bearer,
            AuthenticationType::Bearer => AuthenticationType::ApiKey,
            AuthenticationType::ApiKey => AuthenticationType::Basic,
            AuthenticationType::Basic => AuthenticationType::OAuth2,
            AuthenticationType::OAuth2 => AuthenticationType::None,
        }
    }

    /// Schemes that carry a single token rather than a credential pair
    pub fn uses_token(&self) -> bool {
        matches!(
            self,
            AuthenticationType::Bearer | AuthenticationType::ApiKey | AuthenticationType::OAuth2
        )
    }
}

/// Where an API key is placed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyLocation {
    Header,
    Query,
}

/// Declared authentication for a configuration or endpoint
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationConfig {
    #[serde(rename = "type")]
    pub auth_type: AuthenticationType,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_endpoint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<KeyLocation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameter_name: Option<String>,
}

impl AuthenticationConfig {
    pub fn new(auth_type: AuthenticationType) -> Self {
        AuthenticationConfig {
            auth_type,
            required: false,
            token_endpoint: None,
            description: None,
            placeholder: None,
            location: None,
            parameter_name: None,
        }
    }
}

/// Declared parameter type
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterType {
    String,
    Number,
    Boolean,
    Array,
    Object,
    Integer,
    Float,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "string",
            ParameterType::Number => "number",
            ParameterType::Boolean => "boolean",
            ParameterType::Array => "array",
            ParameterType::Object => "object",
            ParameterType::Integer => "integer",
            ParameterType::Float => "float",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            ParameterType::Number | ParameterType::Integer | ParameterType::Float
        )
    }
}

/// Schema for one path/query/header/body parameter
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ParameterDefinition {
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub allowed: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
}

impl ParameterDefinition {
    pub fn new(param_type: ParameterType) -> Self {
        ParameterDefinition {
            param_type,
            description: String::new(),
            required: None,
            default: None,
            allowed: None,
            pattern: None,
            min: None,
            max: None,
            example: None,
        }
    }

    /// True only for an explicit `required: true`
    pub fn is_required(&self) -> bool {
        self.required == Some(true)
    }
}

/// Declared kind of request body
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BodyType {
    Json,
    FormData,
    Xml,
    Text,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BodyDefinition {
    #[serde(rename = "type")]
    pub body_type: BodyType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<IndexMap<String, ParameterDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct EndpointParameters {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub path: IndexMap<String, ParameterDefinition>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub query: IndexMap<String, ParameterDefinition>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: IndexMap<String, ParameterDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<BodyDefinition>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ExampleRequest {
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub path: ValueMap,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub query: ValueMap,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: ValueMap,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ExampleResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub headers: Headers,
    #[serde(default)]
    pub body: Value,
}

/// Request/response pair shipped with an endpoint
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiExample {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<ExampleRequest>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<ExampleResponse>,
}

/// One operation (method + path) of a configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ApiEndpoint {
    pub id: String,
    pub name: String,
    pub method: HttpMethod,
    /// Path template, e.g. "/stocks/{symbol}/quote"
    pub path: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Overrides the configuration's default authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AuthenticationConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<EndpointParameters>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub examples: Vec<ApiExample>,
    #[serde(default)]
    pub deprecated: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl ApiEndpoint {
    pub fn new(id: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        let id = id.into();
        ApiEndpoint {
            name: id.clone(),
            id,
            method,
            path: path.into(),
            description: String::new(),
            category: None,
            authentication: None,
            parameters: None,
            examples: Vec::new(),
            deprecated: false,
            version: None,
        }
    }

    /// Request half of the first example, if any
    pub fn first_example_request(&self) -> Option<&ExampleRequest> {
        self.examples.first().and_then(|e| e.request.as_ref())
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RateLimit {
    pub requests: u32,
    pub period: String,
}

/// A named target API surface
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiConfiguration {
    pub id: String,
    pub name: String,
    pub base_url: String,
    pub version: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AuthenticationConfig>,
    /// Applied to every request before endpoint and custom headers
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub global_headers: Headers,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<RateLimit>,
    #[serde(default)]
    pub endpoints: Vec<ApiEndpoint>,
}

impl ApiConfiguration {
    pub fn endpoint(&self, id: &str) -> Option<&ApiEndpoint> {
        self.endpoints.iter().find(|e| e.id == id)
    }

    /// Endpoint override first, then the configuration default
    pub fn resolved_auth<'a>(&'a self, endpoint: &'a ApiEndpoint) -> Option<&'a AuthenticationConfig> {
        endpoint
            .authentication
            .as_ref()
            .or(self.authentication.as_ref())
    }
}

/// User-supplied credential pair
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Credentials {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Authentication material chosen for one request
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RequestAuth {
    #[serde(rename = "type")]
    pub auth_type: AuthenticationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<Credentials>,
}

impl RequestAuth {
    pub fn none() -> Self {
        RequestAuth {
            auth_type: AuthenticationType::None,
            token: None,
            credentials: None,
        }
    }

    pub fn with_token(auth_type: AuthenticationType, token: impl Into<String>) -> Self {
        RequestAuth {
            auth_type,
            token: Some(token.into()),
            credentials: None,
        }
    }

    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        RequestAuth {
            auth_type: AuthenticationType::Basic,
            token: None,
            credentials: Some(Credentials {
                username: Some(username.into()),
                password: Some(password.into()),
                api_key: None,
            }),
        }
    }
}

/// A fully resolved request, built fresh per send
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRequest {
    pub endpoint_id: String,
    pub method: HttpMethod,
    pub url: String,
    pub headers: Headers,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_params: Option<ValueMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_params: Option<ValueMap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authentication: Option<RequestAuth>,
}

impl ApiRequest {
    /// Case-insensitive header lookup
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Whether a body will be rendered or sent
    pub fn has_body(&self) -> bool {
        !matches!(self.body, None | Some(Value::Null))
    }
}

/// Parsed response payload
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseBody {
    Json(Value),
    Text(String),
    Binary(Vec<u8>),
}

impl Default for ResponseBody {
    fn default() -> Self {
        ResponseBody::Text(String::new())
    }
}

impl ResponseBody {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(v) => Some(v),
            _ => None,
        }
    }

    pub fn byte_len(&self) -> usize {
        match self {
            ResponseBody::Json(v) => v.to_string().len(),
            ResponseBody::Text(s) => s.len(),
            ResponseBody::Binary(b) => b.len(),
        }
    }

    /// Pretty JSON, raw text, or a binary placeholder
    pub fn to_display_string(&self) -> String {
        match self {
            ResponseBody::Json(v) => {
                serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
            }
            ResponseBody::Text(s) => s.clone(),
            ResponseBody::Binary(b) => format!("<binary payload, {} bytes>", b.len()),
        }
    }
}

/// Error descriptor attached to a non-2xx response
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResponseError {
    pub message: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Headers,
    pub body: ResponseBody,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ResponseError>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Wall-clock milliseconds until response headers arrived
    #[serde(rename = "duration")]
    pub duration_ms: u64,
    /// 0 when the request never produced a response
    pub status: u16,
    pub status_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    pub cached: bool,
}

/// Outcome of one execution, appended to the session history
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApiRequestResult {
    pub request: ApiRequest,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<ApiResponse>,
    pub metrics: PerformanceMetrics,
    pub timestamp: DateTime<Utc>,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ApiRequestResult {
    /// Result for a request that never got an HTTP response
    pub fn failure(
        request: ApiRequest,
        duration_ms: u64,
        status_text: impl Into<String>,
        timestamp: DateTime<Utc>,
        error: impl Into<String>,
    ) -> Self {
        ApiRequestResult {
            request,
            response: None,
            metrics: PerformanceMetrics {
                duration_ms,
                status: 0,
                status_text: status_text.into(),
                size: None,
                cached: false,
            },
            timestamp,
            success: false,
            error: Some(error.into()),
        }
    }

    /// HTTP status of the response, if one arrived
    pub fn response_status(&self) -> Option<u16> {
        self.response.as_ref().map(|r| r.status)
    }
}

/// Location a validated parameter came from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParamLocation {
    Path,
    Query,
    Header,
    Body,
}

impl ParamLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParamLocation::Path => "path",
            ParamLocation::Query => "query",
            ParamLocation::Header => "header",
            ParamLocation::Body => "body",
        }
    }
}

/// One field-scoped validation failure
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FieldError {
    /// "{location}.{name}", e.g. "path.symbol"
    pub field: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ValidationResult {
    pub valid: bool,
    /// `None` rather than an empty list when valid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        ValidationResult {
            valid: true,
            errors: None,
        }
    }

    pub fn from_errors(errors: Vec<FieldError>) -> Self {
        if errors.is_empty() {
            Self::ok()
        } else {
            ValidationResult {
                valid: false,
                errors: Some(errors),
            }
        }
    }

    pub fn errors(&self) -> &[FieldError] {
        self.errors.as_deref().unwrap_or(&[])
    }
}

/// Custom header row edited in the UI
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Header {
    pub key: String,
    pub value: String,
    pub enabled: bool,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Header {
            key: key.into(),
            value: value.into(),
            enabled: true,
        }
    }
}
