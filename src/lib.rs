//! # Apex TUI
//!
//! A terminal API Explorer over a registry of mock API configurations.
//!
//! ## Features
//! - Built-in e-commerce, FastAPI and finance configurations, plus extra
//!   YAML/JSON configurations from `~/.apex/apis`
//! - Parameter validation against declared schemas
//! - Request building with path/query substitution and auth headers
//! - Execution with linear-backoff retry, concurrent batches and probes
//! - Client snippets for curl, JavaScript, Python, Go, PHP, Java and Ruby
//! - Session metrics with JSON and CSV export
//!
//! ## Architecture
//! Actor-based with channels:
//! - UI Layer (Ratatui) - synchronous
//! - App Layer (State machine)
//! - Network Layer (Tokio runtime)

pub mod app;
pub mod builder;
pub mod codegen;
pub mod constants;
pub mod error;
pub mod messages;
pub mod metrics;
pub mod models;
pub mod network;
pub mod registry;
pub mod settings;
pub mod ui;
pub mod validation;

// Re-export commonly used types
pub use app::{AppActor, AppState};
pub use builder::{build_request, RequestParams};
pub use codegen::{generate_code, CodeLanguage};
pub use error::{ExplorerError, Result};
pub use messages::{NetworkCommand, NetworkResponse, RenderState, UiEvent};
pub use metrics::{analyze_metrics, MetricsSummary};
pub use models::{ApiConfiguration, ApiEndpoint, ApiRequest, ApiRequestResult, HttpMethod};
pub use network::{ApiClient, ConnectionPool, NetworkActor, RetryPolicy};
pub use registry::Registry;
pub use settings::Settings;
pub use validation::validate_request_parameters;
