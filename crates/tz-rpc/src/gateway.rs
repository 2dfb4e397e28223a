//! Node request gateway with round-robin failover.
//!
//! Attempt `c` goes to `endpoints[c mod N]`. Transport-class failures are
//! retried after a fixed delay until `max(min_attempts, N)` attempts have
//! been made; the error of the first attempt is the one surfaced. Any other
//! failure propagates at once.

use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::RpcError;
use crate::types::RpcConfig;

/// Statuses that mark a node as unavailable rather than the request as bad.
const GATEWAY_STATUSES: [StatusCode; 3] = [
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

/// HTTP gateway to an ordered list of nodes.
#[derive(Debug, Clone)]
pub struct RpcGateway {
    /// Gateway configuration.
    config: RpcConfig,
    /// Underlying HTTP client.
    client: reqwest::Client,
}

impl RpcGateway {
    /// Create a gateway with the given configuration.
    pub fn new(config: RpcConfig) -> Self {
        let client = reqwest::Client::new();
        Self { config, client }
    }

    /// The gateway configuration.
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    /// `GET path` and decode the JSON answer.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, RpcError> {
        self.request(Method::GET, path, None).await
    }

    /// `POST path` with a JSON body and decode the JSON answer.
    pub async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, RpcError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let body = serde_json::to_value(body)?;
        self.request(Method::POST, path, Some(&body)).await
    }

    /// Bounded iterative retry over the endpoint ring.
    async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, RpcError> {
        let endpoints = &self.config.endpoints;
        if endpoints.is_empty() {
            return Err(RpcError::NoEndpoints);
        }
        let attempts = self.config.min_attempts.max(endpoints.len());
        let mut first_error: Option<RpcError> = None;

        for attempt in 0..attempts {
            let endpoint = &endpoints[attempt % endpoints.len()];
            match self.send_once(endpoint, method.clone(), path, body).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transport() => {
                    warn!(
                        endpoint = %endpoint,
                        path,
                        attempt = attempt + 1,
                        attempts,
                        error = %err,
                        "node request failed"
                    );
                    first_error.get_or_insert(err);
                    if attempt + 1 < attempts {
                        tokio::time::sleep(self.config.retry_delay).await;
                    }
                }
                Err(err) => return Err(err),
            }
        }
        Err(first_error.unwrap_or(RpcError::NoEndpoints))
    }

    /// One attempt against one endpoint.
    async fn send_once<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, RpcError> {
        let url = format!("{}/{}", endpoint.trim_end_matches('/'), path);
        let transport = |message: String, status: Option<u16>| RpcError::Transport {
            endpoint: endpoint.to_string(),
            message,
            status,
        };

        let mut req = self.client.request(method, &url);
        if let Some(body) = body {
            req = req.json(body);
        }
        let resp = req.send().await.map_err(|e| transport(e.to_string(), None))?;
        let status = resp.status();
        // Rejections may be plain text, so the body is read as text and parsed here.
        let text = resp.text().await.map_err(|e| transport(e.to_string(), Some(status.as_u16())))?;

        if GATEWAY_STATUSES.contains(&status) {
            return Err(transport(format!("node unavailable: {text}"), Some(status.as_u16())));
        }
        if !status.is_success() {
            let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
            return Err(RpcError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        debug!(url = %url, status = status.as_u16(), "node request succeeded");
        Ok(serde_json::from_str(&text)?)
    }
}
