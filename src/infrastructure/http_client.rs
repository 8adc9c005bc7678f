use async_trait::async_trait;
use reqwest::StatusCode;

use crate::domain::DomainError;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, DomainError>;

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError>;

    /// POST a newline-delimited JSON body, as the Elasticsearch bulk API expects
    async fn post_ndjson(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: String,
    ) -> Result<serde_json::Value, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }

    pub fn with_timeout(timeout: std::time::Duration) -> Result<Self, DomainError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DomainError::configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn send(
        &self,
        mut request: reqwest::RequestBuilder,
        headers: Vec<(&str, &str)>,
    ) -> Result<serde_json::Value, DomainError> {
        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.send().await.map_err(map_send_error)?;
        let status = response.status();
        let url = response.url().clone();

        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            let host = url.host_str().unwrap_or("http");
            return Err(map_status_error(status, host, url.as_str(), error_body));
        }

        response
            .json()
            .await
            .map_err(|e| DomainError::provider("http", format!("Failed to parse response: {}", e)))
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

fn map_send_error(e: reqwest::Error) -> DomainError {
    if e.is_connect() || e.is_timeout() {
        DomainError::connection(format!("Request failed: {}", e))
    } else {
        DomainError::provider("http", format!("Request failed: {}", e))
    }
}

fn map_status_error(status: StatusCode, host: &str, url: &str, body: String) -> DomainError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => DomainError::rate_limited(host),
        StatusCode::NOT_FOUND => DomainError::not_found(format!("{}: {}", url, body)),
        _ => DomainError::provider("http", format!("HTTP {}: {}", status, body)),
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn get_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, DomainError> {
        self.send(self.client.get(url).query(query), headers).await
    }

    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, DomainError> {
        self.send(self.client.post(url).json(body), headers).await
    }

    async fn post_ndjson(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: String,
    ) -> Result<serde_json::Value, DomainError> {
        let request = self
            .client
            .post(url)
            .header("Content-Type", "application/x-ndjson")
            .body(body);

        self.send(request, headers).await
    }
}
