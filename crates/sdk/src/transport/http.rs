//! HTTP transport layer for the Locintel SDK.

use crate::config::ClientConfig;
use crate::error::{LocintelError, LocintelResult};
use reqwest::{header, Client, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use uuid::Uuid;

const USER_AGENT: &str = concat!("locintel-sdk/", env!("CARGO_PKG_VERSION"));
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP transport for making API requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    config: Arc<ClientConfig>,
}

impl HttpTransport {
    /// Create a new HTTP transport with the given configuration.
    pub fn new(config: Arc<ClientConfig>) -> LocintelResult<Self> {
        let mut headers = header::HeaderMap::new();

        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/json"),
        );

        if let Some(ref credentials) = config.credentials {
            let mut value = header::HeaderValue::from_str(&credentials.authorization_header())
                .map_err(|_| LocintelError::Config("Invalid credential format".to_string()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()?;

        Ok(Self { client, config })
    }

    /// Build a URL for the given path.
    fn build_url(&self, path: &str) -> LocintelResult<url::Url> {
        self.config
            .base_url
            .join(path)
            .map_err(LocintelError::InvalidUrl)
    }

    /// Execute a request with retries. Every attempt carries the same request id.
    async fn execute_with_retry(&self, request_builder: RequestBuilder) -> LocintelResult<Response> {
        let retry_config = &self.config.retry_config;
        let request_id = Uuid::new_v4().to_string();
        let mut attempts = 0;

        loop {
            let request = request_builder
                .try_clone()
                .ok_or_else(|| LocintelError::Config("Request cannot be cloned".to_string()))?
                .header(REQUEST_ID_HEADER, request_id.as_str());

            match request.send().await {
                Ok(response) => {
                    let status = response.status().as_u16();

                    if response.status().is_success() {
                        return Ok(response);
                    }

                    if attempts < retry_config.max_retries
                        && retry_config.should_retry_status(status)
                    {
                        let backoff = retry_config.delay_for(attempts, retry_after(&response));
                        warn!(
                            status = status,
                            request_id = %request_id,
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis(),
                            "Request failed, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    debug!(status = status, request_id = %request_id, body = %body, "Error response");
                    return Err(LocintelError::from_response(status, &body));
                }
                Err(e) => {
                    let transient = e.is_timeout() || e.is_connect();
                    if attempts < retry_config.max_retries && transient {
                        let backoff = retry_config.backoff_for_attempt(attempts);
                        warn!(
                            request_id = %request_id,
                            attempt = attempts + 1,
                            backoff_ms = backoff.as_millis(),
                            error = %e,
                            "Request did not complete, retrying"
                        );
                        tokio::time::sleep(backoff).await;
                        attempts += 1;
                        continue;
                    }
                    if e.is_timeout() {
                        return Err(LocintelError::Timeout);
                    }
                    return Err(e.into());
                }
            }
        }
    }

    /// Execute a POST request with a JSON body.
    pub async fn post_json<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> LocintelResult<T> {
        let url = self.build_url(path)?;
        debug!(
            url = %url,
            payload = %serde_json::to_string(body)?,
            "POST request"
        );

        let response = self
            .execute_with_retry(self.client.post(url).json(body))
            .await?;
        decode(response).await
    }

    /// Execute a GET request with query parameters.
    pub async fn get_query<T: DeserializeOwned, Q: Serialize + ?Sized>(
        &self,
        path: &str,
        query: &Q,
    ) -> LocintelResult<T> {
        let url = self.build_url(path)?;
        debug!(url = %url, "GET request with query");

        let response = self
            .execute_with_retry(self.client.get(url).query(query))
            .await?;
        decode(response).await
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> LocintelResult<T> {
    let text = response.text().await?;
    debug!(body = %text, "Raw response");
    // Some endpoints answer 204 or an empty 200
    if text.trim().is_empty() {
        return Ok(serde_json::from_value(serde_json::Value::Null)?);
    }
    Ok(serde_json::from_str(&text)?)
}

fn retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get(header::RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
