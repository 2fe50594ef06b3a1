//! Authenticated HTTP transport.
//!
//! Attaches the bearer token to every outgoing request and implements the
//! refresh-and-retry protocol: a 401 response triggers at most one
//! (coalesced) refresh followed by at most one retry of the original
//! request. A 401 after the retry is final.

use crate::config::ClientConfig;
use crate::session::SessionManager;
use gridbase_core::{GridbaseError, Result};
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;

/// Query parameter list for a request.
pub type Query = Vec<(&'static str, String)>;

/// The server's standard error body.
#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Builds the shared HTTP client from a validated configuration.
pub fn build_http_client(config: &ClientConfig) -> Result<Client> {
    config.validate()?;
    Ok(Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?)
}

/// HTTP transport bound to one API base URL and one session.
pub struct Transport {
    http: Client,
    config: ClientConfig,
    session: Arc<SessionManager>,
}

impl Transport {
    /// Creates a transport over the given configuration and session.
    pub fn new(config: ClientConfig, session: Arc<SessionManager>) -> Result<Self> {
        let http = build_http_client(&config)?;
        Ok(Self::with_http(http, config, session))
    }

    /// Creates a transport reusing an existing HTTP client (shared with
    /// the token refresher).
    pub fn with_http(http: Client, config: ClientConfig, session: Arc<SessionManager>) -> Self {
        Self {
            http,
            config,
            session,
        }
    }

    /// The session this transport authenticates with.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// The underlying HTTP client (shared with the token refresher).
    pub fn http(&self) -> &Client {
        &self.http
    }

    /// The configured API base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    fn builder(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<&Value>,
    ) -> RequestBuilder {
        let mut builder = self.http.request(method, self.config.url(path));
        if !query.is_empty() {
            builder = builder.query(query);
        }
        if let Some(body) = body {
            builder = builder.json(body);
        }
        builder
    }

    /// Sends one authenticated request, running the refresh-and-retry
    /// protocol on an authorization failure.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        query: &Query,
        body: Option<&Value>,
    ) -> Result<Response> {
        let mut builder = self.builder(method.clone(), path, query, body);
        let access = self.session.access_token().await;
        if let Some(token) = &access {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Self::check_status(response).await;
        }

        // Authorization failure. Without a session to refresh, the 401 is
        // surfaced directly.
        let Some(stale_access) = access else {
            return Err(GridbaseError::auth(Self::read_detail(response).await));
        };
        let original_failure = Self::read_detail(response).await;

        let fresh_access = match self.session.refresh_after_auth_failure(&stale_access).await {
            Ok(access) => access,
            // Refresh failed: session is cleared, the caller observes the
            // original failure rather than a refresh-specific one.
            Err(GridbaseError::SessionExpired) => {
                return Err(GridbaseError::auth(original_failure));
            }
            Err(err) => return Err(err),
        };

        tracing::debug!(path, "retrying request with refreshed token");
        let retry = self
            .builder(method, path, query, body)
            .bearer_auth(&fresh_access)
            .send()
            .await?;
        if retry.status() == StatusCode::UNAUTHORIZED {
            // A second 401 after a successful refresh is final; never loop.
            return Err(GridbaseError::auth(Self::read_detail(retry).await));
        }
        Self::check_status(retry).await
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = Self::read_detail(response).await;
        if status == StatusCode::NOT_FOUND {
            return Err(GridbaseError::not_found("resource", message));
        }
        Err(GridbaseError::transport(status.as_u16(), message))
    }

    /// Extracts the server's `detail` message, falling back to the raw body.
    async fn read_detail(response: Response) -> String {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        serde_json::from_str::<ErrorBody>(&body)
            .map(|parsed| parsed.detail)
            .unwrap_or_else(|_| {
                if body.is_empty() {
                    format!("HTTP {status}")
                } else {
                    body
                }
            })
    }

    // ============================================================================
    // JSON convenience wrappers
    // ============================================================================

    /// `GET` returning deserialized JSON.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &Query) -> Result<T> {
        let response = self.send(Method::GET, path, query, None).await?;
        Ok(response.json().await?)
    }

    /// `POST` with a JSON body, returning deserialized JSON.
    pub async fn post_json<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        let response = self
            .send(Method::POST, path, &Query::new(), Some(body))
            .await?;
        Ok(response.json().await?)
    }

    /// `PATCH` with a JSON body, returning deserialized JSON.
    pub async fn patch_json<T: DeserializeOwned>(&self, path: &str, body: &Value) -> Result<T> {
        let response = self
            .send(Method::PATCH, path, &Query::new(), Some(body))
            .await?;
        Ok(response.json().await?)
    }

    /// `DELETE`, discarding any response body.
    pub async fn delete(&self, path: &str, query: &Query) -> Result<()> {
        self.send(Method::DELETE, path, query, None).await?;
        Ok(())
    }
}
