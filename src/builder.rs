//! Request builder - turns configuration + endpoint + user input into an `ApiRequest`

use base64::Engine;
use serde_json::Value;
use url::Url;

use crate::constants::{CONTENT_TYPE_FORM, CONTENT_TYPE_JSON, DEFAULT_API_KEY_HEADER};
use crate::error::{ExplorerError, Result};
use crate::models::{
    ApiConfiguration, ApiEndpoint, ApiRequest, AuthenticationConfig, AuthenticationType,
    Headers, KeyLocation, RequestAuth, ValueMap,
};

/// User-supplied values for one request
#[derive(Clone, Debug, Default)]
pub struct RequestParams {
    pub path_params: Option<ValueMap>,
    pub query_params: Option<ValueMap>,
    pub headers: Option<Headers>,
    pub body: Option<Value>,
    pub authentication: Option<RequestAuth>,
}

/// Build a complete request from endpoint configuration and parameters
pub fn build_request(
    config: &ApiConfiguration,
    endpoint: &ApiEndpoint,
    params: RequestParams,
) -> Result<ApiRequest> {
    let url = build_url(
        &config.base_url,
        &endpoint.path,
        params.path_params.as_ref(),
        params.query_params.as_ref(),
    )?;

    let headers = build_headers(
        config,
        endpoint,
        params.headers.as_ref(),
        params.authentication.as_ref(),
    );

    Ok(ApiRequest {
        endpoint_id: endpoint.id.clone(),
        method: endpoint.method,
        url,
        headers,
        path_params: params.path_params,
        query_params: params.query_params,
        body: params.body,
        authentication: params.authentication,
    })
}

/// Substitute path parameters, join onto the base URL, append the query.
///
/// Each key replaces only the first `{key}` occurrence. A template that
/// repeats a placeholder keeps the later occurrences unresolved.
pub fn build_url(
    base_url: &str,
    path: &str,
    path_params: Option<&ValueMap>,
    query_params: Option<&ValueMap>,
) -> Result<String> {
    let mut final_path = path.to_string();
    if let Some(params) = path_params {
        for (key, value) in params {
            let placeholder = format!("{{{}}}", key);
            let encoded = urlencoding::encode(&stringify_value(value)).into_owned();
            final_path = final_path.replacen(&placeholder, &encoded, 1);
        }
    }

    let joined = join_url(base_url, &final_path);
    let mut url = Url::parse(&joined).map_err(|e| ExplorerError::MalformedUrl {
        url: joined.clone(),
        reason: e.to_string(),
    })?;

    if let Some(params) = query_params {
        let present: Vec<(&String, String)> = params
            .iter()
            .filter(|(_, v)| !is_empty_value(v))
            .map(|(k, v)| (k, stringify_value(v)))
            .collect();

        if !present.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in present {
                pairs.append_pair(key, &value);
            }
        }
    }

    Ok(url.to_string())
}

/// Paths are appended to the base URL rather than resolved against it,
/// so a base like "https://host/v1" keeps its "/v1" prefix.
fn join_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }
    if path.is_empty() {
        return base_url.to_string();
    }
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Text form of a parameter value as it appears in a URL
pub fn stringify_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
            _ => n.to_string(),
        },
        Value::Bool(b) => b.to_string(),
        Value::Null => String::from("null"),
        Value::Array(items) => items
            .iter()
            .map(stringify_value)
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => value.to_string(),
    }
}

/// Global headers, then custom headers, then authentication headers.
/// Later sources win on key collision.
pub fn build_headers(
    config: &ApiConfiguration,
    endpoint: &ApiEndpoint,
    custom_headers: Option<&Headers>,
    authentication: Option<&RequestAuth>,
) -> Headers {
    let mut headers = config.global_headers.clone();

    if let Some(custom) = custom_headers {
        for (key, value) in custom {
            headers.insert(key.clone(), value.clone());
        }
    }

    if let Some(auth) = authentication {
        let auth_headers = build_auth_headers(auth, config.resolved_auth(endpoint));
        for (key, value) in auth_headers {
            headers.insert(key, value);
        }
    }

    headers
}

/// Headers derived from the chosen authentication.
///
/// Missing tokens or credentials add nothing. A query-placed API key is
/// not turned into a header; callers add it to the query parameters.
pub fn build_auth_headers(auth: &RequestAuth, config: Option<&AuthenticationConfig>) -> Headers {
    let mut headers = Headers::new();
    let token = auth.token.as_deref().filter(|t| !t.is_empty());

    match auth.auth_type {
        AuthenticationType::Bearer | AuthenticationType::OAuth2 => {
            if let Some(token) = token {
                headers.insert(String::from("Authorization"), format!("Bearer {}", token));
            }
        }
        AuthenticationType::ApiKey => {
            let in_header = config.and_then(|c| c.location) == Some(KeyLocation::Header);
            if let (Some(token), true) = (token, in_header) {
                let name = config
                    .and_then(|c| c.parameter_name.clone())
                    .unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string());
                headers.insert(name, token.to_string());
            }
        }
        AuthenticationType::Basic => {
            let credentials = auth.credentials.as_ref();
            let username = credentials.and_then(|c| c.username.as_deref()).filter(|s| !s.is_empty());
            let password = credentials.and_then(|c| c.password.as_deref()).filter(|s| !s.is_empty());
            if let (Some(username), Some(password)) = (username, password) {
                let encoded = base64::engine::general_purpose::STANDARD
                    .encode(format!("{}:{}", username, password));
                headers.insert(String::from("Authorization"), format!("Basic {}", encoded));
            }
        }
        AuthenticationType::None => {}
    }

    headers
}

/// Media type without parameters, lower-cased
fn essence(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase()
}

/// Serialize a body for the wire according to its content type
pub fn build_request_body(body: Option<&Value>, content_type: Option<&str>) -> Option<String> {
    let body = body.filter(|b| !b.is_null())?;
    let content_type = essence(content_type.unwrap_or(CONTENT_TYPE_JSON));

    if content_type == CONTENT_TYPE_JSON {
        return Some(body.to_string());
    }

    if content_type == CONTENT_TYPE_FORM {
        if let Value::Object(map) = body {
            let mut form = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in map {
                form.append_pair(key, &stringify_value(value));
            }
            return Some(form.finish());
        }
    }

    Some(match body {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Names of the parameters a caller must supply
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RequiredParameters {
    pub path: Vec<String>,
    pub query: Vec<String>,
    pub body: Vec<String>,
}

/// Path parameters are required unless marked `required: false`;
/// query and body fields only when marked `required: true`.
pub fn required_parameters(endpoint: &ApiEndpoint) -> RequiredParameters {
    let mut required = RequiredParameters::default();
    let Some(params) = &endpoint.parameters else {
        return required;
    };

    required.path = params
        .path
        .iter()
        .filter(|(_, def)| def.required != Some(false))
        .map(|(k, _)| k.clone())
        .collect();
    required.query = params
        .query
        .iter()
        .filter(|(_, def)| def.is_required())
        .map(|(k, _)| k.clone())
        .collect();
    if let Some(schema) = params.body.as_ref().and_then(|b| b.schema.as_ref()) {
        required.body = schema
            .iter()
            .filter(|(_, def)| def.is_required())
            .map(|(k, _)| k.clone())
            .collect();
    }

    required
}

/// Default values used to prefill a request form
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DefaultParameters {
    pub path: ValueMap,
    pub query: ValueMap,
    pub body: ValueMap,
}

/// Declared defaults, overlaid by the first example's request values
pub fn default_parameters(endpoint: &ApiEndpoint) -> DefaultParameters {
    let mut defaults = DefaultParameters::default();

    if let Some(params) = &endpoint.parameters {
        for (key, def) in &params.query {
            if let Some(default) = &def.default {
                defaults.query.insert(key.clone(), default.clone());
            }
        }
        if let Some(schema) = params.body.as_ref().and_then(|b| b.schema.as_ref()) {
            for (key, def) in schema {
                if let Some(default) = &def.default {
                    defaults.body.insert(key.clone(), default.clone());
                }
            }
        }
    }

    if let Some(example) = endpoint.first_example_request() {
        for (key, value) in &example.path {
            defaults.path.insert(key.clone(), value.clone());
        }
        for (key, value) in &example.query {
            defaults.query.insert(key.clone(), value.clone());
        }
        if let Some(Value::Object(body)) = &example.body {
            for (key, value) in body {
                defaults.body.insert(key.clone(), value.clone());
            }
        }
    }

    defaults
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ApiExample, ExampleRequest, HttpMethod};
    use serde_json::json;

    fn config() -> ApiConfiguration {
        serde_json::from_value(json!({
            "id": "finance",
            "name": "Finance",
            "baseUrl": "https://api.example.com/v1",
            "version": "1.0.0",
            "authentication": {
                "type": "apiKey",
                "required": true,
                "location": "header",
                "parameterName": "X-Finance-Key"
            },
            "globalHeaders": {
                "Content-Type": "application/json",
                "Accept": "application/json"
            },
            "endpoints": [
                { "id": "quote", "name": "Quote", "method": "GET", "path": "/stocks/{symbol}/quote" }
            ]
        }))
        .unwrap()
    }

    fn map(value: Value) -> ValueMap {
        match value {
            Value::Object(m) => m.into_iter().collect(),
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_path_params_keep_base_prefix() {
        let url = build_url(
            "https://api.example.com/v1",
            "/stocks/{symbol}/quote",
            Some(&map(json!({ "symbol": "AAPL" }))),
            None,
        )
        .unwrap();
        assert_eq!(url, "https://api.example.com/v1/stocks/AAPL/quote");
    }

    #[test]
    fn test_path_values_are_encoded() {
        let url = build_url(
            "https://api.example.com",
            "/search/{term}",
            Some(&map(json!({ "term": "a b/c" }))),
            None,
        )
        .unwrap();
        assert_eq!(url, "https://api.example.com/search/a%20b%2Fc");
    }

    #[test]
    fn test_repeated_placeholder_replaces_first_only() {
        let url = build_url(
            "https://api.example.com",
            "/{id}/children/{id}",
            Some(&map(json!({ "id": 7 }))),
            None,
        )
        .unwrap();
        assert!(url.starts_with("https://api.example.com/7/children/"));
        assert!(!url.ends_with("/7"));
    }

    #[test]
    fn test_empty_query_values_are_omitted() {
        let url = build_url(
            "https://api.example.com",
            "/products",
            None,
            Some(&map(json!({ "page": 1, "search": "", "category": null, "sort": "price" }))),
        )
        .unwrap();
        assert!(url.contains("page=1"));
        assert!(url.contains("sort=price"));
        assert!(!url.contains("search="));
        assert!(!url.contains("category="));
    }

    #[test]
    fn test_no_trailing_question_mark_without_query() {
        let url = build_url(
            "https://api.example.com",
            "/products",
            None,
            Some(&map(json!({ "search": "" }))),
        )
        .unwrap();
        assert_eq!(url, "https://api.example.com/products");
    }

    #[test]
    fn test_malformed_base_url() {
        let err = build_url("not a url", "/x", None, None).unwrap_err();
        assert!(matches!(err, ExplorerError::MalformedUrl { .. }));
    }

    #[test]
    fn test_custom_header_overrides_global() {
        let config = config();
        let endpoint = config.endpoints[0].clone();
        let mut custom = Headers::new();
        custom.insert("Content-Type".into(), "text/plain".into());

        let headers = build_headers(&config, &endpoint, Some(&custom), None);
        assert_eq!(headers.get("Content-Type").map(String::as_str), Some("text/plain"));
        assert_eq!(headers.get("Accept").map(String::as_str), Some("application/json"));
    }

    #[test]
    fn test_api_key_header_uses_configured_name() {
        let config = config();
        let endpoint = config.endpoints[0].clone();
        let auth = RequestAuth::with_token(AuthenticationType::ApiKey, "secret");

        let headers = build_headers(&config, &endpoint, None, Some(&auth));
        assert_eq!(headers.get("X-Finance-Key").map(String::as_str), Some("secret"));
    }

    #[test]
    fn test_api_key_query_placement_adds_no_header() {
        let mut auth_config = AuthenticationConfig::new(AuthenticationType::ApiKey);
        auth_config.location = Some(KeyLocation::Query);
        let auth = RequestAuth::with_token(AuthenticationType::ApiKey, "secret");
        assert!(build_auth_headers(&auth, Some(&auth_config)).is_empty());

        auth_config.location = None;
        assert!(build_auth_headers(&auth, Some(&auth_config)).is_empty());
    }

    #[test]
    fn test_bearer_and_basic_headers() {
        let bearer = RequestAuth::with_token(AuthenticationType::Bearer, "abc");
        assert_eq!(
            build_auth_headers(&bearer, None).get("Authorization").map(String::as_str),
            Some("Bearer abc")
        );

        let empty = RequestAuth {
            auth_type: AuthenticationType::OAuth2,
            token: None,
            credentials: None,
        };
        assert!(build_auth_headers(&empty, None).is_empty());

        let basic = RequestAuth::basic("user", "pass");
        assert_eq!(
            build_auth_headers(&basic, None).get("Authorization").map(String::as_str),
            Some("Basic dXNlcjpwYXNz")
        );

        let half = RequestAuth::basic("user", "");
        assert!(build_auth_headers(&half, None).is_empty());
    }

    #[test]
    fn test_build_request_snapshot_fields() {
        let config = config();
        let endpoint = config.endpoints[0].clone();
        let request = build_request(
            &config,
            &endpoint,
            RequestParams {
                path_params: Some(map(json!({ "symbol": "MSFT" }))),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(request.endpoint_id, "quote");
        assert_eq!(request.method, HttpMethod::GET);
        assert_eq!(request.url, "https://api.example.com/v1/stocks/MSFT/quote");
        assert_eq!(request.path_params.unwrap()["symbol"], json!("MSFT"));
    }

    #[test]
    fn test_request_body_serialization() {
        let body = json!({ "name": "Widget", "qty": 2 });
        assert_eq!(
            build_request_body(Some(&body), Some("application/json")).unwrap(),
            r#"{"name":"Widget","qty":2}"#
        );
        assert_eq!(
            build_request_body(Some(&body), Some("application/x-www-form-urlencoded")).unwrap(),
            "name=Widget&qty=2"
        );
        assert_eq!(
            build_request_body(Some(&json!("<xml/>")), Some("application/xml")).unwrap(),
            "<xml/>"
        );
        assert_eq!(build_request_body(None, None), None);
    }

    #[test]
    fn test_required_and_default_parameters() {
        let mut endpoint: ApiEndpoint = serde_json::from_value(json!({
            "id": "products",
            "name": "Products",
            "method": "GET",
            "path": "/products/{category}",
            "parameters": {
                "path": { "category": { "type": "string" } },
                "query": {
                    "page": { "type": "integer", "default": 1 },
                    "limit": { "type": "integer", "default": 10, "required": true }
                }
            }
        }))
        .unwrap();

        let required = required_parameters(&endpoint);
        assert_eq!(required.path, vec!["category".to_string()]);
        assert_eq!(required.query, vec!["limit".to_string()]);

        endpoint.examples.push(ApiExample {
            request: Some(ExampleRequest {
                path: map(json!({ "category": "electronics" })),
                query: map(json!({ "limit": 5 })),
                ..Default::default()
            }),
            response: None,
        });
        let defaults = default_parameters(&endpoint);
        assert_eq!(defaults.path["category"], json!("electronics"));
        assert_eq!(defaults.query["page"], json!(1));
        assert_eq!(defaults.query["limit"], json!(5));
    }
}
