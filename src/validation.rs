//! Parameter validation against an endpoint's declared schema.
//!
//! Every declared parameter is checked, not only the supplied ones. Failures
//! come back as field-scoped data; nothing here returns `Err` or does I/O.

use regex::Regex;
use serde_json::Value;

use crate::models::{
    ApiEndpoint, FieldError, ParamLocation, ParameterDefinition, ParameterType, ValidationResult,
    ValueMap,
};

/// Values supplied for one request
#[derive(Clone, Debug, Default)]
pub struct ParamInput<'a> {
    pub path_params: Option<&'a ValueMap>,
    pub query_params: Option<&'a ValueMap>,
    pub body: Option<&'a Value>,
}

/// Validate all request parameters
pub fn validate_request_parameters(endpoint: &ApiEndpoint, params: &ParamInput<'_>) -> ValidationResult {
    let mut errors = Vec::new();

    if let Some(declared) = &endpoint.parameters {
        for (key, definition) in &declared.path {
            let value = params.path_params.and_then(|p| p.get(key));
            errors.extend(validate_parameter(key, value, definition, ParamLocation::Path));
        }

        for (key, definition) in &declared.query {
            let value = params.query_params.and_then(|p| p.get(key));
            errors.extend(validate_parameter(key, value, definition, ParamLocation::Query));
        }

        if let Some(schema) = declared.body.as_ref().and_then(|b| b.schema.as_ref()) {
            for (key, definition) in schema {
                let value = params.body.and_then(|b| b.get(key));
                errors.extend(validate_parameter(key, value, definition, ParamLocation::Body));
            }
        }
    }

    ValidationResult::from_errors(errors)
}

/// Absent means missing, null, or the empty string
fn is_absent(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Validate a single parameter value
pub fn validate_parameter(
    name: &str,
    value: Option<&Value>,
    definition: &ParameterDefinition,
    location: ParamLocation,
) -> Vec<FieldError> {
    let field = format!("{}.{}", location.as_str(), name);
    let mut errors = Vec::new();

    let Some(value) = value.filter(|_| !is_absent(value)) else {
        if definition.is_required() {
            errors.push(FieldError {
                field,
                message: format!("{} is required", name),
                value: value.cloned(),
            });
        }
        return errors;
    };

    let mut push = |message: String| {
        errors.push(FieldError {
            field: field.clone(),
            message,
            value: Some(value.clone()),
        });
    };

    if let Some(message) = check_type(name, value, definition.param_type) {
        push(message);
    }

    if let (Some(pattern), Value::String(s)) = (&definition.pattern, value) {
        match Regex::new(pattern) {
            Ok(re) if re.is_match(s) => {}
            Ok(_) => push(format!("{} does not match required pattern", name)),
            Err(_) => push(format!("{} has an invalid validation pattern", name)),
        }
    }

    if let Some(allowed) = &definition.allowed {
        if !allowed.iter().any(|candidate| literal_eq(candidate, value)) {
            let listed: Vec<String> = allowed.iter().map(display_literal).collect();
            push(format!("{} must be one of: {}", name, listed.join(", ")));
        }
    }

    match bound_subject(value, definition.param_type) {
        Some(Bound::Magnitude(n)) => {
            if let Some(min) = definition.min.filter(|min| n < *min) {
                push(format!("{} must be at least {}", name, display_number(min)));
            }
            if let Some(max) = definition.max.filter(|max| n > *max) {
                push(format!("{} must be at most {}", name, display_number(max)));
            }
        }
        Some(Bound::Length(len)) => {
            let len = len as f64;
            if let Some(min) = definition.min.filter(|min| len < *min) {
                push(format!("{} must be at least {} characters", name, display_number(min)));
            }
            if let Some(max) = definition.max.filter(|max| len > *max) {
                push(format!("{} must be at most {} characters", name, display_number(max)));
            }
        }
        None => {}
    }

    errors
}

/// What `min`/`max` are compared against
enum Bound {
    Magnitude(f64),
    Length(usize),
}

/// Numeric declared types bound the magnitude, string bounds the length;
/// other declared types fall back to the runtime shape of the value.
fn bound_subject(value: &Value, declared: ParameterType) -> Option<Bound> {
    if declared.is_numeric() {
        return coerce_number(value).map(Bound::Magnitude);
    }
    match (declared, value) {
        (ParameterType::String, Value::String(s)) => Some(Bound::Length(s.chars().count())),
        (ParameterType::String, _) => None,
        (_, Value::Number(n)) => n.as_f64().map(Bound::Magnitude),
        (_, Value::String(s)) => Some(Bound::Length(s.chars().count())),
        _ => None,
    }
}

fn check_type(name: &str, value: &Value, expected: ParameterType) -> Option<String> {
    match expected {
        ParameterType::Number | ParameterType::Integer | ParameterType::Float => {
            let Some(n) = coerce_number(value) else {
                return Some(format!("{} must be a number", name));
            };
            if expected == ParameterType::Integer && !(n.is_finite() && n.fract() == 0.0) {
                return Some(format!("{} must be an integer", name));
            }
            None
        }
        ParameterType::Boolean => match value {
            Value::Bool(_) => None,
            Value::String(s) if s == "true" || s == "false" => None,
            Value::Number(n) if n.as_f64() == Some(0.0) || n.as_f64() == Some(1.0) => None,
            _ => Some(format!("{} must be a boolean", name)),
        },
        ParameterType::Array => (!value.is_array()).then(|| format!("{} must be an array", name)),
        ParameterType::Object => {
            (!value.is_object()).then(|| format!("{} must be an object", name))
        }
        ParameterType::String => {
            (!value.is_string()).then(|| format!("{} must be a string", name))
        }
    }
}

/// Numeric reading of a value; numeric strings, booleans and
/// single-element arrays coerce, anything else is not a number.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return Some(0.0);
            }
            trimmed.parse::<f64>().ok().filter(|n| !n.is_nan())
        }
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Null => Some(0.0),
        Value::Array(items) => match items.as_slice() {
            [] => Some(0.0),
            [single] if !single.is_array() && !single.is_object() => coerce_number(single),
            _ => None,
        },
        Value::Object(_) => None,
    }
}

/// Enum membership is literal: "1" and 1 differ, 1 and 1.0 do not
fn literal_eq(candidate: &Value, value: &Value) -> bool {
    match (candidate, value) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        _ => candidate == value,
    }
}

fn display_literal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn display_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

/// Validate a JSON document
pub fn validate_json(text: &str) -> ValidationResult {
    match serde_json::from_str::<Value>(text) {
        Ok(_) => ValidationResult::ok(),
        Err(_) => ValidationResult::from_errors(vec![FieldError {
            field: String::from("json"),
            message: String::from("Invalid JSON format"),
            value: None,
        }]),
    }
}

/// Validate an absolute URL
pub fn validate_url(text: &str) -> ValidationResult {
    match url::Url::parse(text) {
        Ok(_) => ValidationResult::ok(),
        Err(_) => ValidationResult::from_errors(vec![FieldError {
            field: String::from("url"),
            message: String::from("Invalid URL format"),
            value: None,
        }]),
    }
}

pub fn validate_email(email: &str) -> bool {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .map(|re| re.is_match(email))
        .unwrap_or(false)
}

/// Convert raw UI text into a typed value; empty input is absent
pub fn sanitize_value(raw: &str, param_type: ParameterType) -> Option<Value> {
    if raw.is_empty() {
        return None;
    }

    let value = match param_type {
        ParameterType::Number | ParameterType::Float => match raw.trim().parse::<f64>() {
            Ok(n) => serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or_else(|| Value::String(raw.to_string())),
            // Left as text so the validator reports it
            Err(_) => Value::String(raw.to_string()),
        },
        ParameterType::Integer => match raw.trim().parse::<i64>() {
            Ok(n) => Value::from(n),
            Err(_) => Value::String(raw.to_string()),
        },
        ParameterType::Boolean => match raw.trim() {
            "true" | "1" => Value::Bool(true),
            "false" | "0" => Value::Bool(false),
            _ => Value::String(raw.to_string()),
        },
        ParameterType::Array => match serde_json::from_str::<Value>(raw) {
            Ok(v @ Value::Array(_)) => v,
            Ok(other) => Value::Array(vec![other]),
            Err(_) => Value::Array(
                raw.split(',')
                    .map(|s| Value::String(s.trim().to_string()))
                    .collect(),
            ),
        },
        ParameterType::Object => match serde_json::from_str::<Value>(raw) {
            Ok(v @ Value::Object(_)) => v,
            _ => Value::String(raw.to_string()),
        },
        ParameterType::String => Value::String(raw.to_string()),
    };

    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{BodyDefinition, BodyType, EndpointParameters, HttpMethod};
    use indexmap::IndexMap;
    use serde_json::json;

    fn def(param_type: ParameterType) -> ParameterDefinition {
        ParameterDefinition::new(param_type)
    }

    fn endpoint_with(parameters: EndpointParameters) -> ApiEndpoint {
        let mut endpoint = ApiEndpoint::new("test", HttpMethod::GET, "/stocks/{symbol}");
        endpoint.parameters = Some(parameters);
        endpoint
    }

    #[test]
    fn test_required_path_param_missing() {
        let mut symbol = def(ParameterType::String);
        symbol.required = Some(true);
        let mut params = EndpointParameters::default();
        params.path.insert("symbol".into(), symbol);
        let endpoint = endpoint_with(params);

        let empty = ValueMap::new();
        let result = validate_request_parameters(
            &endpoint,
            &ParamInput {
                path_params: Some(&empty),
                ..Default::default()
            },
        );

        assert!(!result.valid);
        let errors = result.errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "path.symbol");
    }

    #[test]
    fn test_required_short_circuits_other_checks() {
        let mut email = def(ParameterType::String);
        email.required = Some(true);
        email.pattern = Some("^.+@.+$".into());
        email.min = Some(5.0);

        let errors = validate_parameter("email", Some(&json!("")), &email, ParamLocation::Body);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "email is required");
    }

    #[test]
    fn test_optional_absent_is_skipped() {
        let mut search = def(ParameterType::Integer);
        search.min = Some(10.0);
        assert!(validate_parameter("search", None, &search, ParamLocation::Query).is_empty());
        assert!(validate_parameter("search", Some(&Value::Null), &search, ParamLocation::Query).is_empty());
    }

    #[test]
    fn test_numeric_string_coerces_but_integer_must_be_whole() {
        let number = def(ParameterType::Number);
        assert!(validate_parameter("price", Some(&json!("12.5")), &number, ParamLocation::Query).is_empty());
        assert_eq!(
            validate_parameter("price", Some(&json!("abc")), &number, ParamLocation::Query)[0].message,
            "price must be a number"
        );

        let integer = def(ParameterType::Integer);
        assert!(validate_parameter("page", Some(&json!("3")), &integer, ParamLocation::Query).is_empty());
        assert_eq!(
            validate_parameter("page", Some(&json!(2.5)), &integer, ParamLocation::Query)[0].message,
            "page must be an integer"
        );
    }

    #[test]
    fn test_pattern_and_type_errors_both_fire() {
        let mut code = def(ParameterType::Integer);
        code.pattern = Some("^[0-9]+$".into());
        let errors = validate_parameter("code", Some(&json!("ab")), &code, ParamLocation::Query);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].message.contains("must be a number"));
        assert!(errors[1].message.contains("pattern"));
    }

    #[test]
    fn test_enum_is_literal() {
        let mut order = def(ParameterType::String);
        order.allowed = Some(vec![json!("asc"), json!("desc")]);
        assert!(validate_parameter("order", Some(&json!("asc")), &order, ParamLocation::Query).is_empty());
        let errors = validate_parameter("order", Some(&json!("up")), &order, ParamLocation::Query);
        assert_eq!(errors[0].message, "order must be one of: asc, desc");

        let mut level = def(ParameterType::Integer);
        level.allowed = Some(vec![json!(1), json!(2)]);
        assert!(validate_parameter("level", Some(&json!(2.0)), &level, ParamLocation::Query).is_empty());
        assert_eq!(
            validate_parameter("level", Some(&json!("1")), &level, ParamLocation::Query).len(),
            1
        );
    }

    #[test]
    fn test_bounds_follow_declared_type() {
        let mut limit = def(ParameterType::Integer);
        limit.min = Some(1.0);
        limit.max = Some(100.0);
        assert_eq!(
            validate_parameter("limit", Some(&json!(500)), &limit, ParamLocation::Query)[0].message,
            "limit must be at most 100"
        );
        assert_eq!(
            validate_parameter("limit", Some(&json!("0")), &limit, ParamLocation::Query)[0].message,
            "limit must be at least 1"
        );

        let mut password = def(ParameterType::String);
        password.min = Some(8.0);
        assert_eq!(
            validate_parameter("password", Some(&json!("short")), &password, ParamLocation::Body)[0].message,
            "password must be at least 8 characters"
        );
    }

    #[test]
    fn test_body_schema_is_validated() {
        let mut schema = IndexMap::new();
        let mut email = def(ParameterType::String);
        email.required = Some(true);
        email.pattern = Some(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$".into());
        schema.insert("email".to_string(), email);

        let endpoint = endpoint_with(EndpointParameters {
            body: Some(BodyDefinition {
                body_type: BodyType::Json,
                schema: Some(schema),
                example: None,
                description: None,
            }),
            ..Default::default()
        });

        let body = json!({ "email": "not-an-email" });
        let result = validate_request_parameters(
            &endpoint,
            &ParamInput {
                body: Some(&body),
                ..Default::default()
            },
        );
        assert!(!result.valid);
        assert_eq!(result.errors()[0].field, "body.email");

        let body = json!({ "email": "demo@example.com" });
        let result = validate_request_parameters(
            &endpoint,
            &ParamInput {
                body: Some(&body),
                ..Default::default()
            },
        );
        assert!(result.valid);
        assert!(result.errors.is_none());
    }

    #[test]
    fn test_boolean_accepts_text_forms() {
        let flag = def(ParameterType::Boolean);
        assert!(validate_parameter("active", Some(&json!("true")), &flag, ParamLocation::Query).is_empty());
        assert!(validate_parameter("active", Some(&json!(0)), &flag, ParamLocation::Query).is_empty());
        assert_eq!(
            validate_parameter("active", Some(&json!("yes")), &flag, ParamLocation::Query).len(),
            1
        );
    }

    #[test]
    fn test_helpers() {
        assert!(validate_json(r#"{"a":1}"#).valid);
        assert!(!validate_json("{a:1").valid);
        assert!(validate_url("https://api.example.com/v1").valid);
        assert!(!validate_url("not a url").valid);
        assert!(validate_email("user@example.com"));
        assert!(!validate_email("user@"));
    }

    #[test]
    fn test_sanitize_value() {
        assert_eq!(sanitize_value("", ParameterType::String), None);
        assert_eq!(sanitize_value("42", ParameterType::Integer), Some(json!(42)));
        assert_eq!(sanitize_value("4.5", ParameterType::Number), Some(json!(4.5)));
        assert_eq!(sanitize_value("x", ParameterType::Integer), Some(json!("x")));
        assert_eq!(sanitize_value("true", ParameterType::Boolean), Some(json!(true)));
        assert_eq!(sanitize_value("a, b", ParameterType::Array), Some(json!(["a", "b"])));
        assert_eq!(sanitize_value(r#"{"k":1}"#, ParameterType::Object), Some(json!({"k": 1})));
    }
}
