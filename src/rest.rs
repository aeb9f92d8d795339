use crate::client::{base_url, create_rest_client, Config};
use crate::error::{GhostError, Result};
use crate::resource::Resources;
use crate::response::{Collection, ErrorResponse};
use crate::token;
use crate::types::{Author, Newsletter, Page, Post, Setting, Site, SiteResponse, Tag, Webhook};
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Instant;
use url::Url;

/// Body argument for requests that carry none
pub(crate) const NO_BODY: Option<&()> = None;

/// Client for the Ghost Admin API.
///
/// Holds the base URL, the raw Admin API key and the HTTP client. None of
/// these change after construction; every call mints its own token and owns
/// its own buffers, so a client can be shared freely across threads.
#[derive(Clone)]
pub struct AdminClient {
    /// HTTP client
    client: Client,
    /// `{site}/ghost/api/admin`
    base_url: String,
    /// Admin API key in `id:secret` form
    api_key: String,
}

impl AdminClient {
    /// Create a client with default HTTP settings
    pub fn new(site_url: &str, api_key: impl Into<String>) -> Result<Self> {
        Self::from_config(Config::new(site_url, api_key))
    }

    /// Create a client from a full configuration
    pub fn from_config(config: Config) -> Result<Self> {
        let client = create_rest_client(&config)?;
        Ok(Self::with_http_client(&config.site_url, config.api_key, client))
    }

    /// Create a client that issues requests through `client`.
    ///
    /// Timeouts, proxies and TLS settings are whatever `client` was built with.
    pub fn with_http_client(site_url: &str, api_key: impl Into<String>, client: Client) -> Self {
        AdminClient {
            client,
            base_url: base_url(site_url),
            api_key: api_key.into(),
        }
    }

    /// Base URL for Admin API requests
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn posts(&self) -> Resources<'_, Post> {
        Resources::new(self)
    }

    pub fn pages(&self) -> Resources<'_, Page> {
        Resources::new(self)
    }

    pub fn tags(&self) -> Resources<'_, Tag> {
        Resources::new(self)
    }

    pub fn users(&self) -> Resources<'_, Author> {
        Resources::new(self)
    }

    pub fn newsletters(&self) -> Resources<'_, Newsletter> {
        Resources::new(self)
    }

    pub fn webhooks(&self) -> Resources<'_, Webhook> {
        Resources::new(self)
    }

    /// Get title, description and version of the site
    pub fn site(&self) -> Result<Site> {
        let resp: SiteResponse = self.execute(Method::GET, "/site/", NO_BODY)?;
        Ok(resp.site)
    }

    /// Get the site settings as key/value pairs
    pub fn settings(&self) -> Result<Collection<Setting>> {
        self.execute(Method::GET, "/settings/", NO_BODY)
    }

    /// Build an authenticated request for `path` (relative to the base URL,
    /// query string included).
    ///
    /// A fresh token is minted first; a malformed API key fails here, before
    /// any network activity.
    pub(crate) fn authorized(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let token = token::generate(&self.api_key).map_err(GhostError::Token)?;
        let url = Url::parse(&format!("{}{}", self.base_url, path))?;

        Ok(self
            .client
            .request(method, url)
            .header(AUTHORIZATION, format!("Ghost {}", token)))
    }

    /// Issue one request and return the raw HTTP response.
    ///
    /// `body`, when present, is sent as JSON.
    pub fn send<B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<reqwest::blocking::Response>
    where
        B: Serialize + ?Sized,
    {
        let mut request = self.authorized(method, path)?;

        if let Some(body) = body {
            let bytes = serde_json::to_vec(body).map_err(GhostError::Encode)?;
            request = request
                .header(CONTENT_TYPE, "application/json")
                .body(bytes);
        }

        Ok(request.send()?)
    }

    /// Issue one request and return the response body, or the classified
    /// error when the status is 400 or above.
    pub fn execute_raw<B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<Vec<u8>>
    where
        B: Serialize + ?Sized,
    {
        let start = Instant::now();
        let response = self
            .send(method.clone(), path, body)
            .inspect_err(|e| tracing::warn!(%method, path, error = %e, "admin request failed"))?;
        let status = response.status();
        let bytes = read_body(response)?;

        tracing::debug!(
            %method,
            path,
            status = status.as_u16(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "admin request"
        );

        check_status(status, bytes)
    }

    /// Issue one request and decode the success body into `T`
    pub fn execute<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let bytes = self.execute_raw(method, path, body)?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

// Implement Debug manually to avoid exposing the API key
impl std::fmt::Debug for AdminClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

/// Buffer the full response body
pub(crate) fn read_body(response: reqwest::blocking::Response) -> Result<Vec<u8>> {
    Ok(response.bytes()?.to_vec())
}

/// Pass the body through below 400, otherwise turn it into an API error
pub(crate) fn check_status(status: StatusCode, body: Vec<u8>) -> Result<Vec<u8>> {
    if status.as_u16() >= 400 {
        return Err(GhostError::api(
            status.as_u16(),
            ErrorResponse::message_from_body(&body),
        ));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_client_base_url() {
        let client = AdminClient::new("https://example.com/", "id:abcd").unwrap();
        assert_eq!(client.base_url(), "https://example.com/ghost/api/admin");
    }

    #[test]
    fn test_admin_client_debug_redacts_key() {
        let client = AdminClient::new("https://example.com", "id:deadbeef").unwrap();
        let debug = format!("{:?}", client);
        assert!(!debug.contains("deadbeef"));
    }

    #[test]
    fn test_authorized_rejects_bad_key_before_io() {
        let client = AdminClient::new("http://127.0.0.1:9", "not-a-key").unwrap();
        let result = client.authorized(Method::GET, "/posts/");
        assert!(matches!(result, Err(GhostError::Token(_))));
    }

    #[test]
    fn test_check_status() {
        let ok = check_status(StatusCode::CREATED, b"{}".to_vec()).unwrap();
        assert_eq!(ok, b"{}");

        let err = check_status(
            StatusCode::UNPROCESSABLE_ENTITY,
            br#"{"errors":[{"message":"Validation failed","context":"Title is required"}]}"#
                .to_vec(),
        )
        .unwrap_err();
        assert!(err
            .to_string()
            .contains("Validation failed: Title is required"));

        let err = check_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            b"Internal Server Error".to_vec(),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "API error (500): Internal Server Error");
    }
}
