use log::{debug, info, warn};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Serialize, de::DeserializeOwned};
use std::time::Duration;

use crate::domains::auth::token::{BearerToken, TokenHolder};
use crate::errors::{ClientResult, ProtocolError, RemoteError};

/// HTTP client for the directory server
///
/// Authenticated calls pick up the bearer token from the shared
/// [`TokenHolder`] at send time, so attaching or detaching a token takes
/// effect for every later request.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    tokens: TokenHolder,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.base_url)
            .field("has_token", &self.tokens.is_attached())
            .finish()
    }
}

/// Add `http://` when the scheme is missing and drop a trailing slash.
fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    let with_scheme =
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            trimmed.to_string()
        } else {
            format!("http://{}", trimmed)
        };
    if with_scheme != raw {
        warn!(
            "[ApiClient] Normalized base URL from '{}' to '{}'",
            raw, with_scheme
        );
    }
    with_scheme
}

/// Pull a string `detail` out of an error body. Anything else is ignored.
pub(crate) fn extract_detail(body: &[u8]) -> Option<String> {
    let value: serde_json::Value = serde_json::from_slice(body).ok()?;
    value
        .get("detail")
        .and_then(|detail| detail.as_str())
        .map(str::to_string)
}

impl ApiClient {
    pub fn new(
        base_url: &str,
        timeout: Duration,
        tokens: TokenHolder,
    ) -> Result<Self, reqwest::Error> {
        let base_url = normalize_base_url(base_url);
        let client = Client::builder().timeout(timeout).build()?;

        info!(
            "[ApiClient] Creating new API client with base URL: {}",
            base_url
        );

        Ok(Self {
            client,
            base_url,
            tokens,
        })
    }

    pub fn build_url(&self, path: impl AsRef<str>) -> String {
        let p = path.as_ref();
        if p.starts_with("http://") || p.starts_with("https://") {
            return p.to_string();
        }
        format!("{}/{}", self.base_url, p.trim_start_matches('/'))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn tokens(&self) -> &TokenHolder {
        &self.tokens
    }

    /// Attach the current bearer token, if any
    fn build_request(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.tokens.authorization_header() {
            Some(header) => builder.header("Authorization", header),
            None => builder,
        }
    }

    async fn send(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = request.send().await.map_err(|e| {
            warn!("[ApiClient] Request failed before a response: {}", e);
            RemoteError::transport(&e)
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteError::transport(&e))?;
        let detail = extract_detail(&body);
        debug!(
            "[ApiClient] Request failed with status {}: {:?}",
            status, detail
        );
        Err(RemoteError::new(status.as_u16(), detail).into())
    }

    async fn execute<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<T> {
        let response = self.send(request).await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| RemoteError::transport(&e))?;
        serde_json::from_slice(&body)
            .map_err(|e| ProtocolError::InvalidBody(e.to_string()).into())
    }

    /// Execute a request whose success body is irrelevant
    async fn execute_discarding_body(
        &self,
        request: RequestBuilder,
    ) -> ClientResult<()> {
        self.send(request).await.map(|_| ())
    }

    /// POST without attaching the session token
    pub async fn post_public<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> ClientResult<R> {
        let url = self.build_url(path);
        self.execute(self.client.post(&url).json(body)).await
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let url = self.build_url(path);
        let request = self.build_request(self.client.get(&url));
        self.execute(request).await
    }

    pub async fn post<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> ClientResult<R> {
        let url = self.build_url(path);
        let request = self.build_request(self.client.post(&url).json(body));
        self.execute(request).await
    }

    /// POST with an explicitly supplied token instead of the attached one
    pub async fn post_with_token<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
        token: &BearerToken,
    ) -> ClientResult<R> {
        let url = self.build_url(path);
        let request = self
            .client
            .post(&url)
            .json(body)
            .header("Authorization", token.header_value());
        self.execute(request).await
    }

    pub async fn put<T: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &T,
    ) -> ClientResult<R> {
        let url = self.build_url(path);
        let request = self.build_request(self.client.put(&url).json(body));
        self.execute(request).await
    }

    /// DELETE; any 2xx counts as success
    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let url = self.build_url(path);
        let request = self.build_request(self.client.delete(&url));
        self.execute_discarding_body(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::auth::storage::MemoryStore;
    use std::sync::Arc;

    fn client(base: &str) -> ApiClient {
        let tokens = TokenHolder::new(Arc::new(MemoryStore::new()));
        ApiClient::new(base, Duration::from_secs(5), tokens).unwrap()
    }

    #[test]
    fn base_url_gains_scheme_and_loses_trailing_slash() {
        assert_eq!(client("localhost:8000/").base_url(), "http://localhost:8000");
        assert_eq!(
            client("https://roster.example.com").base_url(),
            "https://roster.example.com"
        );
    }

    #[test]
    fn build_url_joins_without_double_slashes() {
        let api = client("http://127.0.0.1:8000/");
        assert_eq!(api.build_url("/users/"), "http://127.0.0.1:8000/users/");
        assert_eq!(api.build_url("users/7"), "http://127.0.0.1:8000/users/7");
        assert_eq!(
            api.build_url("https://elsewhere/x"),
            "https://elsewhere/x"
        );
    }

    #[test]
    fn detail_is_only_taken_when_it_is_a_string() {
        assert_eq!(
            extract_detail(br#"{"detail":"email exists"}"#).as_deref(),
            Some("email exists")
        );
        assert_eq!(
            extract_detail(br#"{"detail":[{"loc":["body"],"msg":"x"}]}"#),
            None
        );
        assert_eq!(extract_detail(b"<html>oops</html>"), None);
        assert_eq!(extract_detail(b""), None);
    }
}
