use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;

use crate::error::GatewayError;

/// Thin client for the hospital REST backend.
///
/// Every request carries the fixed JSON headers and is bounded by the
/// configured timeout, so a hung backend surfaces as [`GatewayError::Timeout`]
/// instead of stalling the caller.
#[derive(Debug, Clone)]
pub struct BackendClient {
    client: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(config: &AppConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .default_headers(Self::default_headers())
            .timeout(config.backend_timeout())
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.backend_url.trim_end_matches('/').to_string(),
        })
    }

    fn default_headers() -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }

    /// Issues a request and returns the body as loose JSON.
    ///
    /// An empty or non-JSON success body comes back as `Value::Null`; callers
    /// normalise that into empty view-models.
    pub async fn request_value(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<Value, GatewayError> {
        let url = self.url_for(path);
        debug!("Making {} request to {}", method, url);

        let mut req = self.client.request(method, &url);
        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await.map_err(GatewayError::from)?;

        let status = response.status();
        let text = response.text().await.map_err(GatewayError::from)?;

        if !status.is_success() {
            error!("Backend error ({}): {}", status, text);
            return Err(GatewayError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }

        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!("Backend returned a non-JSON body from {}: {}", url, e);
                Ok(Value::Null)
            }
        }
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
    ) -> Result<T, GatewayError>
    where
        T: DeserializeOwned,
    {
        let value = self.request_value(method, path, body).await?;
        serde_json::from_value(value).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}
