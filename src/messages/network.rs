//! Network messages - communication between App and Network layers

use crate::models::{ApiRequest, ApiRequestResult};
use crate::network::client::{ProbeResult, RetryPolicy};

/// Commands sent from App layer to Network layer
#[derive(Debug, Clone)]
pub enum NetworkCommand {
    /// Execute a single request, optionally with retry
    Execute {
        id: u64,
        base_url: String,
        request: ApiRequest,
        retry: Option<RetryPolicy>,
    },
    /// Execute several requests concurrently
    Batch {
        id: u64,
        base_url: String,
        requests: Vec<ApiRequest>,
    },
    /// HEAD the base URL to check reachability
    Probe { id: u64, url: String },
    /// Drop pooled clients and stop the actor
    Shutdown,
}

/// Responses sent from Network layer to App layer
#[derive(Debug, Clone)]
pub enum NetworkResponse {
    Completed {
        id: u64,
        result: Box<ApiRequestResult>,
    },
    BatchCompleted {
        id: u64,
        results: Vec<ApiRequestResult>,
    },
    ProbeFinished {
        id: u64,
        url: String,
        probe: ProbeResult,
    },
}

impl NetworkResponse {
    /// Get the request ID from the response
    pub fn id(&self) -> u64 {
        match self {
            NetworkResponse::Completed { id, .. } => *id,
            NetworkResponse::BatchCompleted { id, .. } => *id,
            NetworkResponse::ProbeFinished { id, .. } => *id,
        }
    }
}
