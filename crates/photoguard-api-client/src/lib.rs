//! HTTP client for the Appwrite REST API.
//!
//! Provides a minimal client with project/key authentication and the handful of
//! request shapes the artifact store and status ledger need (download bytes,
//! multipart upload, JSON patch, delete). Domain meaning lives in the adapter
//! crates; this crate only knows about HTTP.

use photoguard_core::Config;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::time::Duration;
use thiserror::Error;

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const KEY_HEADER: &str = "X-Appwrite-Key";

/// API client errors
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),

    #[error("API request failed with status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    Decode(String),

    #[error("Client configuration error: {0}")]
    Config(String),
}

impl ApiError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Error body returned by Appwrite on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Percent-encode a single path segment.
pub fn segment(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// HTTP client for one Appwrite project.
#[derive(Clone)]
pub struct AppwriteClient {
    client: Client,
    endpoint: String,
    project_id: String,
    api_key: String,
}

impl Debug for AppwriteClient {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AppwriteClient")
            .field("endpoint", &self.endpoint)
            .field("project_id", &self.project_id)
            .finish()
    }
}

impl AppwriteClient {
    pub fn new(
        endpoint: impl Into<String>,
        project_id: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> ApiResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            project_id: project_id.into(),
            api_key: api_key.into(),
        })
    }

    /// Create a client from the Appwrite section of the configuration.
    pub fn from_config(config: &Config) -> ApiResult<Self> {
        let project_id = config
            .project_id
            .clone()
            .ok_or_else(|| ApiError::Config("APPWRITE_PROJECT_ID not configured".to_string()))?;
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| ApiError::Config("APPWRITE_API_KEY not configured".to_string()))?;

        Self::new(
            config.endpoint.clone(),
            project_id,
            api_key,
            Duration::from_secs(config.http_timeout_secs),
        )
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.endpoint, path)
    }

    fn apply_auth(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header(PROJECT_HEADER, self.project_id.as_str())
            .header(KEY_HEADER, self.api_key.as_str())
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<Response> {
        let response = self
            .apply_auth(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::status_error(status, response).await);
        }

        Ok(response)
    }

    async fn status_error(status: StatusCode, response: Response) -> ApiError {
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|body| body.message)
            .unwrap_or(text);

        ApiError::Status {
            status: status.as_u16(),
            message,
        }
    }

    async fn json<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
        response
            .json()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// GET request returning the raw response body.
    pub async fn get_bytes(&self, path: &str) -> ApiResult<Vec<u8>> {
        let request = self.client.get(self.build_url(path));
        let response = self.send(request).await?;

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(bytes.to_vec())
    }

    /// POST multipart form and deserialize response.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: reqwest::multipart::Form,
    ) -> ApiResult<T> {
        let request = self.client.post(self.build_url(path)).multipart(form);
        let response = self.send(request).await?;
        Self::json(response).await
    }

    /// PATCH JSON body and deserialize response.
    pub async fn patch_json<T: DeserializeOwned, B: serde::Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let request = self.client.patch(self.build_url(path)).json(body);
        let response = self.send(request).await?;
        Self::json(response).await
    }

    /// DELETE request. Returns Ok(()) on success.
    pub async fn delete(&self, path: &str) -> ApiResult<()> {
        let request = self.client.delete(self.build_url(path));
        self.send(request).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn client(url: &str) -> AppwriteClient {
        AppwriteClient::new(url, "proj", "key", Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_segment_encodes_reserved_characters() {
        assert_eq!(segment("abc"), "abc");
        assert_eq!(segment("a/b c"), "a%2Fb%20c");
    }

    #[test]
    fn test_from_config_requires_credentials() {
        let config = Config::default();
        let err = AppwriteClient::from_config(&config).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
    }

    #[tokio::test]
    async fn test_get_bytes_sends_auth_headers() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/files/abc")
            .match_header("x-appwrite-project", "proj")
            .match_header("x-appwrite-key", "key")
            .with_status(200)
            .with_body(vec![1u8, 2, 3])
            .create_async()
            .await;

        let bytes = client(&server.url()).get_bytes("/files/abc").await.unwrap();

        assert_eq!(bytes, vec![1, 2, 3]);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_body_message_is_extracted() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("DELETE", "/files/missing")
            .with_status(404)
            .with_body(r#"{"message":"File not found","code":404,"type":"storage_file_not_found"}"#)
            .create_async()
            .await;

        let err = client(&server.url()).delete("/files/missing").await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "API request failed with status 404: File not found"
        );
    }

    #[tokio::test]
    async fn test_patch_json_round_trip() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("PATCH", "/documents/rec1")
            .match_body(Matcher::Json(serde_json::json!({"data": {"a": 1}})))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"$id":"rec1"}"#)
            .create_async()
            .await;

        let body: serde_json::Value = client(&server.url())
            .patch_json("/documents/rec1", &serde_json::json!({"data": {"a": 1}}))
            .await
            .unwrap();

        assert_eq!(body["$id"], "rec1");
    }
}
