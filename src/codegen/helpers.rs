//! Shared pieces for the snippet generators: quoting, body literals,
//! imports and execution tails.

use serde_json::Value;

use crate::models::ApiRequest;

/// Body text as sent on the wire: strings verbatim, everything else as
/// compact JSON. `None` when there is nothing to send.
pub fn body_text(request: &ApiRequest) -> Option<String> {
    match request.body.as_ref()? {
        Value::Null => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Structured body (anything but a plain string) to render as a literal
pub fn body_value(request: &ApiRequest) -> Option<&Value> {
    match request.body.as_ref()? {
        Value::Null | Value::String(_) => None,
        other => Some(other),
    }
}

/// Double-quoted string literal with C-style escapes. `extra` lists
/// characters that also need a backslash (`$` for PHP, `#` for Ruby).
pub fn quoted(s: &str, extra: &[char]) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if extra.contains(&c) => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// Double-quoted shell word; `$` and backticks stay literal
pub fn shell_double_quoted(s: &str) -> String {
    quoted(s, &['$', '`'])
}

/// Single-quoted shell word, closing and reopening around embedded quotes
pub fn shell_single_quoted(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// JavaScript single-quoted string literal
pub fn js_single_quoted(s: &str) -> String {
    format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
}

/// Token set for rendering a JSON value as a native literal
pub struct LiteralSyntax {
    pub null: &'static str,
    pub true_token: &'static str,
    pub false_token: &'static str,
    pub object_open: &'static str,
    pub object_close: &'static str,
    pub array_open: &'static str,
    pub array_close: &'static str,
    pub key_separator: &'static str,
    pub escape_extra: &'static [char],
    pub indent: &'static str,
}

pub const PYTHON: LiteralSyntax = LiteralSyntax {
    null: "None",
    true_token: "True",
    false_token: "False",
    object_open: "{",
    object_close: "}",
    array_open: "[",
    array_close: "]",
    key_separator: ": ",
    escape_extra: &[],
    indent: "    ",
};

pub const RUBY: LiteralSyntax = LiteralSyntax {
    null: "nil",
    true_token: "true",
    false_token: "false",
    object_open: "{",
    object_close: "}",
    array_open: "[",
    array_close: "]",
    key_separator: " => ",
    escape_extra: &['#'],
    indent: "  ",
};

pub const PHP: LiteralSyntax = LiteralSyntax {
    null: "null",
    true_token: "true",
    false_token: "false",
    object_open: "[",
    object_close: "]",
    array_open: "[",
    array_close: "]",
    key_separator: " => ",
    escape_extra: &['$'],
    indent: "    ",
};

pub const GO: LiteralSyntax = LiteralSyntax {
    null: "nil",
    true_token: "true",
    false_token: "false",
    object_open: "map[string]interface{}{",
    object_close: "}",
    array_open: "[]interface{}{",
    array_close: "}",
    key_separator: ": ",
    escape_extra: &[],
    indent: "    ",
};

/// Render `value` as a multi-line native literal.
///
/// The first line carries no indentation; nested lines are indented from
/// `depth`, and every element ends with a trailing comma.
pub fn literal(value: &Value, syntax: &LiteralSyntax, depth: usize) -> String {
    let pad = syntax.indent.repeat(depth);
    let inner = syntax.indent.repeat(depth + 1);

    match value {
        Value::Null => syntax.null.to_string(),
        Value::Bool(true) => syntax.true_token.to_string(),
        Value::Bool(false) => syntax.false_token.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => quoted(s, syntax.escape_extra),
        Value::Array(items) if items.is_empty() => {
            format!("{}{}", syntax.array_open, syntax.array_close)
        }
        Value::Array(items) => {
            let mut out = format!("{}\n", syntax.array_open);
            for item in items {
                out.push_str(&format!("{}{},\n", inner, literal(item, syntax, depth + 1)));
            }
            out.push_str(&pad);
            out.push_str(syntax.array_close);
            out
        }
        Value::Object(map) if map.is_empty() => {
            format!("{}{}", syntax.object_open, syntax.object_close)
        }
        Value::Object(map) => {
            let mut out = format!("{}\n", syntax.object_open);
            for (key, item) in map {
                out.push_str(&format!(
                    "{}{}{}{},\n",
                    inner,
                    quoted(key, syntax.escape_extra),
                    syntax.key_separator,
                    literal(item, syntax, depth + 1)
                ));
            }
            out.push_str(&pad);
            out.push_str(syntax.object_close);
            out
        }
    }
}

pub const GO_RUN: &[&str] = &[
    "",
    "    client := &http.Client{}",
    "    resp, err := client.Do(req)",
    "    if err != nil {",
    "        panic(err)",
    "    }",
    "    defer resp.Body.Close()",
    "",
    "    body, _ := io.ReadAll(resp.Body)",
    "    fmt.Println(string(body))",
    "}",
];

pub const PHP_RUN: &[&str] = &["", "$response = curl_exec($ch);", "curl_close($ch);", "", "echo $response;", "?>"];

pub const JAVA_RUN: &[&str] = &[
    "",
    "        HttpResponse<String> response = client.send(request,",
    "            HttpResponse.BodyHandlers.ofString());",
    "",
    "        System.out.println(response.body());",
    "    }",
    "}",
];

pub const RUBY_RUN: &[&str] = &["", "response = http.request(request)", "puts response.body"];

/// Go import block; `bytes` and `encoding/json` only when used
pub fn go_imports(has_body: bool, has_json: bool) -> Vec<String> {
    let mut packages = Vec::new();
    if has_body {
        packages.push("bytes");
    }
    if has_json {
        packages.push("encoding/json");
    }
    packages.extend(["fmt", "io", "net/http"]);

    let mut lines = vec![String::from("package main"), String::new(), String::from("import (")];
    lines.extend(packages.iter().map(|p| format!("    \"{}\"", p)));
    lines.push(String::from(")"));
    lines
}

/// Ruby Net::HTTP request class for a method, e.g. `Post`
pub fn ruby_request_class(method: &str) -> String {
    let mut chars = method.chars();
    match chars.next() {
        Some(first) => format!("{}{}", first.to_ascii_uppercase(), chars.as_str().to_ascii_lowercase()),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_quoting() {
        assert_eq!(quoted(r#"say "hi""#, &[]), r#""say \"hi\"""#);
        assert_eq!(quoted("$x", &['$']), r#""\$x""#);
        assert_eq!(shell_single_quoted("it's"), r#"'it'\''s'"#);
        assert_eq!(js_single_quoted("it's"), r#"'it\'s'"#);
    }

    #[test]
    fn test_python_literal() {
        let value = json!({"active": true, "tags": ["a"], "note": null, "empty": {}});
        let expected = "{\n    \"active\": True,\n    \"tags\": [\n        \"a\",\n    ],\n    \"note\": None,\n    \"empty\": {},\n}";
        assert_eq!(literal(&value, &PYTHON, 0), expected);
    }

    #[test]
    fn test_go_literal_nests_maps() {
        let value = json!({"items": [{"id": 1}]});
        let rendered = literal(&value, &GO, 1);
        assert!(rendered.starts_with("map[string]interface{}{\n        \"items\": []interface{}{"));
        assert!(rendered.ends_with("\n    }"));
    }

    #[test]
    fn test_ruby_request_class() {
        assert_eq!(ruby_request_class("DELETE"), "Delete");
        assert_eq!(ruby_request_class("GET"), "Get");
    }
}
