//! Executes core-built requests over the network.

use std::future::Future;
use std::time::Duration;

use portal_core::{HttpMethod, HttpRequest, HttpResponse, TransportError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransportSetupError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// Performs the round-trip for an `HttpRequest`. Non-2xx statuses are data,
/// not errors; only failures to get a response are `TransportError`.
pub trait Transport: Clone + Send + Sync + 'static {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self, TransportSetupError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn execute(&self, request: HttpRequest) -> impl Future<Output = Result<HttpResponse, TransportError>> + Send {
        let client = self.client.clone();
        async move {
            let method = match request.method {
                HttpMethod::Get => reqwest::Method::GET,
                HttpMethod::Post => reqwest::Method::POST,
                HttpMethod::Patch => reqwest::Method::PATCH,
            };
            tracing::debug!(method = %method, path = %request.path, "sending request");

            let mut builder = client.request(method, &request.path);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(|e| TransportError(e.to_string()))?;
            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .filter_map(|(name, value)| Some((name.as_str().to_string(), value.to_str().ok()?.to_string())))
                .collect();
            let body = response.text().await.map_err(|e| TransportError(e.to_string()))?;
            tracing::debug!(status, "response received");

            Ok(HttpResponse { status, headers, body })
        }
    }
}
