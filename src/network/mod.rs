//! Network layer - HTTP request execution and client pooling
//!
//! The Network actor receives commands and sends back results.

pub mod actor;
pub mod client;
pub mod pool;

pub use actor::NetworkActor;
pub use client::{retry_with, ApiClient, ProbeResult, RetryPolicy};
pub use pool::ConnectionPool;
