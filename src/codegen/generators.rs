//! One generator per target language. Each is a pure function of the
//! resolved request.

use serde_json::{json, Value};

use super::helpers::{self, GO, PHP, PYTHON, RUBY};
use crate::models::{ApiRequest, HttpMethod};

/// curl command, one option per continuation line
pub fn curl(request: &ApiRequest) -> String {
    let mut parts = vec![String::from("curl")];

    if request.method != HttpMethod::GET {
        parts.push(format!("-X {}", request.method.as_str()));
    }

    for (key, value) in &request.headers {
        parts.push(format!("-H {}", helpers::shell_double_quoted(&format!("{}: {}", key, value))));
    }

    if let Some(body) = helpers::body_text(request) {
        parts.push(format!("-d {}", helpers::shell_single_quoted(&body)));
    }

    parts.push(helpers::shell_double_quoted(&request.url));
    parts.join(" \\\n  ")
}

/// Browser/Node `fetch` call
pub fn javascript(request: &ApiRequest) -> String {
    let mut options = json!({
        "method": request.method.as_str(),
        "headers": request.headers,
    });
    if let Some(body) = helpers::body_text(request) {
        options["body"] = Value::String(body);
    }
    let options = serde_json::to_string_pretty(&options).unwrap_or_else(|_| options.to_string());

    format!(
        "fetch({}, {})\n  .then(response => response.json())\n  .then(data => console.log(data))\n  .catch(error => console.error('Error:', error));",
        helpers::js_single_quoted(&request.url),
        options
    )
}

/// Python `requests` script
pub fn python(request: &ApiRequest) -> String {
    let mut lines = vec![
        String::from("import requests"),
        String::new(),
        format!("url = {}", helpers::quoted(&request.url, &[])),
    ];

    let mut args = vec![String::from("url")];

    if !request.headers.is_empty() {
        lines.push(String::from("headers = {"));
        for (key, value) in &request.headers {
            lines.push(format!("    {}: {},", helpers::quoted(key, &[]), helpers::quoted(value, &[])));
        }
        lines.push(String::from("}"));
        args.push(String::from("headers=headers"));
    }

    if let Some(value) = helpers::body_value(request) {
        lines.push(format!("data = {}", helpers::literal(value, &PYTHON, 0)));
        args.push(String::from("json=data"));
    } else if let Some(text) = helpers::body_text(request) {
        lines.push(format!("data = {}", helpers::quoted(&text, &[])));
        args.push(String::from("data=data"));
    }

    lines.push(String::new());
    lines.push(format!(
        "response = requests.{}({})",
        request.method.as_str().to_lowercase(),
        args.join(", ")
    ));
    lines.push(String::from("print(response.json())"));
    lines.join("\n")
}

/// Go `net/http` program
pub fn go(request: &ApiRequest) -> String {
    let body_value = helpers::body_value(request);
    let body_text = helpers::body_text(request);

    let mut lines = helpers::go_imports(body_text.is_some(), body_value.is_some());
    lines.push(String::new());
    lines.push(String::from("func main() {"));
    lines.push(format!("    url := {}", helpers::quoted(&request.url, &[])));

    if let Some(value) = body_value {
        lines.push(String::new());
        lines.push(format!("    data := {}", helpers::literal(value, &GO, 1)));
        lines.push(String::new());
        lines.push(String::from("    jsonData, _ := json.Marshal(data)"));
        lines.push(String::from("    payload := bytes.NewBuffer(jsonData)"));
    } else if let Some(text) = &body_text {
        lines.push(String::new());
        lines.push(format!("    payload := bytes.NewBufferString({})", helpers::quoted(text, &[])));
    }

    let body_arg = if body_text.is_some() { "payload" } else { "nil" };
    lines.push(String::new());
    lines.push(format!(
        "    req, _ := http.NewRequest({}, url, {})",
        helpers::quoted(request.method.as_str(), &[]),
        body_arg
    ));

    if !request.headers.is_empty() {
        lines.push(String::new());
        for (key, value) in &request.headers {
            lines.push(format!(
                "    req.Header.Add({}, {})",
                helpers::quoted(key, &[]),
                helpers::quoted(value, &[])
            ));
        }
    }

    lines.extend(helpers::GO_RUN.iter().map(|l| l.to_string()));
    lines.join("\n")
}

/// PHP script using the curl extension
pub fn php(request: &ApiRequest) -> String {
    let quote = |s: &str| helpers::quoted(s, &['$']);

    let mut lines = vec![
        String::from("<?php"),
        String::new(),
        format!("$url = {};", quote(&request.url)),
        String::new(),
        String::from("$ch = curl_init($url);"),
        String::from("curl_setopt($ch, CURLOPT_RETURNTRANSFER, true);"),
        format!("curl_setopt($ch, CURLOPT_CUSTOMREQUEST, {});", quote(request.method.as_str())),
    ];

    if !request.headers.is_empty() {
        lines.push(String::new());
        lines.push(String::from("$headers = ["));
        for (key, value) in &request.headers {
            lines.push(format!("    {},", quote(&format!("{}: {}", key, value))));
        }
        lines.push(String::from("];"));
        lines.push(String::from("curl_setopt($ch, CURLOPT_HTTPHEADER, $headers);"));
    }

    if let Some(value) = helpers::body_value(request) {
        lines.push(String::new());
        lines.push(format!("$data = {};", helpers::literal(value, &PHP, 0)));
        lines.push(String::from("curl_setopt($ch, CURLOPT_POSTFIELDS, json_encode($data));"));
    } else if let Some(text) = helpers::body_text(request) {
        lines.push(String::new());
        lines.push(format!("curl_setopt($ch, CURLOPT_POSTFIELDS, {});", quote(&text)));
    }

    lines.extend(helpers::PHP_RUN.iter().map(|l| l.to_string()));
    lines.join("\n")
}

/// Java 11+ `HttpClient` program
pub fn java(request: &ApiRequest) -> String {
    let mut lines = vec![
        String::from("import java.net.http.*;"),
        String::from("import java.net.URI;"),
        String::new(),
        String::from("public class ApiClient {"),
        String::from("    public static void main(String[] args) throws Exception {"),
        String::from("        HttpClient client = HttpClient.newHttpClient();"),
        String::new(),
        format!("        String url = {};", helpers::quoted(&request.url, &[])),
    ];

    let publisher = match helpers::body_text(request) {
        Some(text) => {
            lines.push(format!("        String json = {};", helpers::quoted(&text, &[])));
            "HttpRequest.BodyPublishers.ofString(json)"
        }
        None => "HttpRequest.BodyPublishers.noBody()",
    };

    lines.push(String::new());
    lines.push(String::from("        HttpRequest request = HttpRequest.newBuilder()"));
    lines.push(String::from("            .uri(URI.create(url))"));
    lines.push(format!(
        "            .method({}, {})",
        helpers::quoted(request.method.as_str(), &[]),
        publisher
    ));
    for (key, value) in &request.headers {
        lines.push(format!(
            "            .header({}, {})",
            helpers::quoted(key, &[]),
            helpers::quoted(value, &[])
        ));
    }
    lines.push(String::from("            .build();"));

    lines.extend(helpers::JAVA_RUN.iter().map(|l| l.to_string()));
    lines.join("\n")
}

/// Ruby `Net::HTTP` script
pub fn ruby(request: &ApiRequest) -> String {
    let quote = |s: &str| helpers::quoted(s, &['#']);

    let mut lines = vec![
        String::from("require \"net/http\""),
        String::from("require \"json\""),
        String::new(),
        format!("url = URI({})", quote(&request.url)),
        String::new(),
        String::from("http = Net::HTTP.new(url.host, url.port)"),
    ];
    if request.url.starts_with("https") {
        lines.push(String::from("http.use_ssl = true"));
    }

    lines.push(String::new());
    lines.push(format!(
        "request = Net::HTTP::{}.new(url)",
        helpers::ruby_request_class(request.method.as_str())
    ));
    for (key, value) in &request.headers {
        lines.push(format!("request[{}] = {}", quote(key), quote(value)));
    }

    if let Some(value) = helpers::body_value(request) {
        lines.push(String::new());
        lines.push(format!("request.body = {}.to_json", helpers::literal(value, &RUBY, 0)));
    } else if let Some(text) = helpers::body_text(request) {
        lines.push(String::new());
        lines.push(format!("request.body = {}", quote(&text)));
    }

    lines.extend(helpers::RUBY_RUN.iter().map(|l| l.to_string()));
    lines.join("\n")
}
