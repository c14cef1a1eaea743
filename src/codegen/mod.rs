//! Code snippet generation for resolved requests
//!
//! Generation cannot fail: every language has a generator and unknown
//! language names fall back to curl.

pub mod generators;
pub mod helpers;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::ApiRequest;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CodeLanguage {
    #[default]
    Curl,
    Javascript,
    Python,
    Go,
    Php,
    Java,
    Ruby,
}

impl CodeLanguage {
    pub const ALL: [CodeLanguage; 7] = [
        CodeLanguage::Curl,
        CodeLanguage::Javascript,
        CodeLanguage::Python,
        CodeLanguage::Go,
        CodeLanguage::Php,
        CodeLanguage::Java,
        CodeLanguage::Ruby,
    ];

    /// Parse a language id; anything unrecognized means curl
    pub fn parse(name: &str) -> CodeLanguage {
        match name.trim().to_ascii_lowercase().as_str() {
            "javascript" | "js" => CodeLanguage::Javascript,
            "python" | "py" => CodeLanguage::Python,
            "go" | "golang" => CodeLanguage::Go,
            "php" => CodeLanguage::Php,
            "java" => CodeLanguage::Java,
            "ruby" | "rb" => CodeLanguage::Ruby,
            _ => CodeLanguage::Curl,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CodeLanguage::Curl => "curl",
            CodeLanguage::Javascript => "javascript",
            CodeLanguage::Python => "python",
            CodeLanguage::Go => "go",
            CodeLanguage::Php => "php",
            CodeLanguage::Java => "java",
            CodeLanguage::Ruby => "ruby",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CodeLanguage::Curl => "cURL",
            CodeLanguage::Javascript => "JavaScript (Fetch)",
            CodeLanguage::Python => "Python (Requests)",
            CodeLanguage::Go => "Go",
            CodeLanguage::Php => "PHP",
            CodeLanguage::Java => "Java",
            CodeLanguage::Ruby => "Ruby",
        }
    }

    /// Cycle to the next language
    pub fn next(&self) -> CodeLanguage {
        let index = Self::ALL.iter().position(|l| l == self).unwrap_or(0);
        Self::ALL[(index + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for CodeLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Render `request` as a snippet in `language`
pub fn generate_code(request: &ApiRequest, language: CodeLanguage) -> String {
    match language {
        CodeLanguage::Curl => generators::curl(request),
        CodeLanguage::Javascript => generators::javascript(request),
        CodeLanguage::Python => generators::python(request),
        CodeLanguage::Go => generators::go(request),
        CodeLanguage::Php => generators::php(request),
        CodeLanguage::Java => generators::java(request),
        CodeLanguage::Ruby => generators::ruby(request),
    }
}
