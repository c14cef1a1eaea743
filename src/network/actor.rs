//! Network actor - runs HTTP requests in the Tokio async runtime

use std::convert::Infallible;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinSet;

use crate::messages::{NetworkCommand, NetworkResponse};
use crate::network::client::ApiClient;
use crate::network::pool::ConnectionPool;

/// Network actor that owns the client pool and runs each command as a task
pub struct NetworkActor {
    pool: ConnectionPool<ApiClient>,
    timeout: Duration,
    response_tx: mpsc::UnboundedSender<NetworkResponse>,
    active_requests: JoinSet<()>,
}

impl NetworkActor {
    pub fn new(
        response_tx: mpsc::UnboundedSender<NetworkResponse>,
        pool: ConnectionPool<ApiClient>,
        timeout: Duration,
    ) -> Self {
        NetworkActor {
            pool,
            timeout,
            response_tx,
            active_requests: JoinSet::new(),
        }
    }

    async fn client_for(&mut self, base_url: &str) -> ApiClient {
        let timeout = self.timeout;
        match self
            .pool
            .get_or_connect(base_url, || async move { Ok::<_, Infallible>(ApiClient::new(timeout)) })
            .await
        {
            Ok(client) => client,
            Err(never) => match never {},
        }
    }

    /// Client for a probe target. Reuses a pooled client but never adds one,
    /// so probing arbitrary URLs cannot evict a base URL's client.
    async fn probe_client(&mut self, url: &str) -> ApiClient {
        if self.pool.contains(url) {
            self.client_for(url).await
        } else {
            ApiClient::new(self.timeout)
        }
    }

    /// Run the network actor message loop
    pub async fn run(mut self, mut cmd_rx: mpsc::UnboundedReceiver<NetworkCommand>) {
        loop {
            tokio::select! {
                biased;

                cmd = cmd_rx.recv() => {
                    match cmd {
                        Some(NetworkCommand::Execute { id, base_url, request, retry }) => {
                            let client = self.client_for(&base_url).await;
                            let response_tx = self.response_tx.clone();

                            self.active_requests.spawn(async move {
                                tracing::info!(id, url = %request.url, method = %request.method, "Executing request");
                                let result = match retry {
                                    Some(policy) => client.execute_with_retry(&request, policy).await,
                                    None => client.execute(&request).await,
                                };
                                tracing::info!(id, success = result.success, "Request finished");
                                let _ = response_tx.send(NetworkResponse::Completed {
                                    id,
                                    result: Box::new(result),
                                });
                            });
                        }

                        Some(NetworkCommand::Batch { id, base_url, requests }) => {
                            let client = self.client_for(&base_url).await;
                            let response_tx = self.response_tx.clone();

                            self.active_requests.spawn(async move {
                                let results = client.execute_batch(&requests).await;
                                let _ = response_tx.send(NetworkResponse::BatchCompleted { id, results });
                            });
                        }

                        Some(NetworkCommand::Probe { id, url }) => {
                            let client = self.probe_client(&url).await;
                            let response_tx = self.response_tx.clone();

                            self.active_requests.spawn(async move {
                                let probe = client.test_endpoint(&url).await;
                                let _ = response_tx.send(NetworkResponse::ProbeFinished { id, url, probe });
                            });
                        }

                        Some(NetworkCommand::Shutdown) => {
                            self.active_requests.abort_all();
                            self.pool.dispose();
                            break;
                        }

                        None => break,
                    }
                }

                // Clean up completed tasks
                Some(_result) = self.active_requests.join_next() => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn actor(capacity: usize) -> NetworkActor {
        let (response_tx, _response_rx) = mpsc::unbounded_channel();
        NetworkActor::new(
            response_tx,
            ConnectionPool::new(capacity, Duration::from_secs(300)),
            Duration::from_secs(5),
        )
    }

    #[tokio::test]
    async fn test_probe_target_does_not_take_a_pool_slot() {
        let mut actor = actor(1);
        actor.client_for("https://api.example.com/v1").await;

        actor.probe_client("https://other.example.com").await;

        assert_eq!(actor.pool.len(), 1);
        assert!(actor.pool.contains("https://api.example.com/v1"));
        assert!(!actor.pool.contains("https://other.example.com"));
    }

    #[tokio::test]
    async fn test_probe_reuses_pooled_client() {
        let mut actor = actor(4);
        actor.client_for("https://api.example.com/v1").await;

        actor.probe_client("https://api.example.com/v1").await;

        assert_eq!(actor.pool.len(), 1);
    }
}
