//! Executes the HTTP round-trip between `build_*` and `parse_*`.
//!
//! # Design
//! Error statuses come back as `Ok(HttpResponse)`; only failures where no
//! response was received are `Err`. Status interpretation stays in the
//! client parsers.

use async_trait::async_trait;
use reqwest::{Client, Method};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ClientConfig;
use crate::error::TransportError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// The API client seam. Implementations must be shareable across tasks.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

/// Reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    auth_token: Option<String>,
}

impl ReqwestTransport {
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(config: &ClientConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            auth_token: config.auth_token.clone(),
        })
    }
}

fn to_method(method: HttpMethod) -> Method {
    match method {
        HttpMethod::Get => Method::GET,
        HttpMethod::Post => Method::POST,
        HttpMethod::Put => Method::PUT,
        HttpMethod::Patch => Method::PATCH,
        HttpMethod::Delete => Method::DELETE,
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let request_id = Uuid::new_v4().to_string();
        debug!(request_id = %request_id, method = %request.method, path = %request.path, "sending request");

        let mut builder = self
            .client
            .request(to_method(request.method), &request.path)
            .header(reqwest::header::ACCEPT, "application/json")
            .header("x-request-id", request_id.as_str());
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(token) = &self.auth_token {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(|e| {
            warn!(request_id = %request_id, error = %e, "request failed without response");
            TransportError::no_response(e.to_string())
        })?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| v.to_str().ok().map(|v| (k.as_str().to_string(), v.to_string())))
            .collect();
        let body = response
            .text()
            .await
            .map_err(|e| TransportError::no_response(e.to_string()))?;

        debug!(request_id = %request_id, status, "received response");
        Ok(HttpResponse { status, headers, body })
    }
}
