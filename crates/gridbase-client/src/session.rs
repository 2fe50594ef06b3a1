//! Session manager: owns the token pair and the refresh protocol.
//!
//! The token pair is the one piece of shared mutable state in the
//! client. All mutation funnels through this manager, and concurrent
//! refresh attempts are coalesced so at most one refresh call is in
//! flight against the server at a time.

use crate::storage::{TokenPair, TokenStore};
use async_trait::async_trait;
use gridbase_core::{GridbaseError, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{Mutex, RwLock};

/// Lifecycle state of the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// No tokens held.
    LoggedOut,
    /// Token pair held; requests carry the access token.
    Authenticated,
    /// A refresh call is in flight.
    Refreshing,
}

/// Exchanges a refresh token for a new access token.
///
/// Abstracted so the coalescing logic can be exercised without a server.
#[async_trait]
pub trait TokenRefresher: Send + Sync {
    /// Performs one refresh call, returning the new access token.
    async fn refresh(&self, refresh_token: &str) -> Result<String>;
}

#[derive(Serialize)]
struct RefreshRequest<'a> {
    refresh: &'a str,
}

#[derive(Deserialize)]
struct RefreshResponse {
    access: String,
}

/// [`TokenRefresher`] backed by `POST /auth/jwt/refresh`.
pub struct HttpTokenRefresher {
    http: reqwest::Client,
    refresh_url: String,
}

impl HttpTokenRefresher {
    /// Creates a refresher against the given API base URL.
    pub fn new(http: reqwest::Client, base_url: &str) -> Self {
        Self {
            http,
            refresh_url: format!("{}/auth/jwt/refresh", base_url.trim_end_matches('/')),
        }
    }
}

#[async_trait]
impl TokenRefresher for HttpTokenRefresher {
    async fn refresh(&self, refresh_token: &str) -> Result<String> {
        let response = self
            .http
            .post(&self.refresh_url)
            .json(&RefreshRequest {
                refresh: refresh_token,
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            return Err(GridbaseError::auth(format!(
                "refresh rejected with status {status}"
            )));
        }

        let parsed: RefreshResponse = response.json().await?;
        Ok(parsed.access)
    }
}

/// Owner of the session token pair.
///
/// Exactly one instance exists per running client; every component that
/// needs authenticated transport holds it behind an `Arc` instead of
/// reaching for ambient global state.
pub struct SessionManager {
    store: Arc<dyn TokenStore>,
    refresher: Arc<dyn TokenRefresher>,
    tokens: RwLock<Option<TokenPair>>,
    /// Serializes refreshes; waiters re-check the token under the lock
    /// so a refresh completed by another caller is reused, not repeated.
    refresh_lock: Mutex<()>,
    refreshing: AtomicBool,
}

impl SessionManager {
    /// Creates a manager, restoring any persisted token pair.
    pub fn new(store: Arc<dyn TokenStore>, refresher: Arc<dyn TokenRefresher>) -> Result<Self> {
        let tokens = store.load()?;
        if tokens.is_some() {
            tracing::debug!("restored persisted session tokens");
        }
        Ok(Self {
            store,
            refresher,
            tokens: RwLock::new(tokens),
            refresh_lock: Mutex::new(()),
            refreshing: AtomicBool::new(false),
        })
    }

    /// Installs a freshly issued token pair (login).
    pub async fn install(&self, pair: TokenPair) -> Result<()> {
        self.store.save(&pair)?;
        *self.tokens.write().await = Some(pair);
        tracing::info!("session authenticated");
        Ok(())
    }

    /// Clears both tokens (logout). Always succeeds locally; no server
    /// round-trip is involved.
    pub async fn clear(&self) -> Result<()> {
        *self.tokens.write().await = None;
        self.store.clear()?;
        tracing::info!("session cleared");
        Ok(())
    }

    /// The current access token, if authenticated.
    pub async fn access_token(&self) -> Option<String> {
        self.tokens.read().await.as_ref().map(|p| p.access.clone())
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> SessionState {
        if self.refreshing.load(Ordering::SeqCst) {
            return SessionState::Refreshing;
        }
        if self.tokens.read().await.is_some() {
            SessionState::Authenticated
        } else {
            SessionState::LoggedOut
        }
    }

    /// Recovers from an authorization failure observed with `stale_access`.
    ///
    /// Coalesced: callers queue on an internal lock, and whichever caller
    /// enters first performs the single refresh. Later callers find the
    /// access token already replaced and return it without another server
    /// call.
    ///
    /// On refresh failure both tokens are cleared (forced logout) and
    /// `SessionExpired` is returned; the transport layer surfaces the
    /// original 401 to the request's caller.
    pub async fn refresh_after_auth_failure(&self, stale_access: &str) -> Result<String> {
        let _guard = self.refresh_lock.lock().await;

        let refresh_token = {
            let tokens = self.tokens.read().await;
            match tokens.as_ref() {
                Some(pair) if pair.access != stale_access => {
                    tracing::debug!("reusing access token refreshed by a concurrent request");
                    return Ok(pair.access.clone());
                }
                Some(pair) => pair.refresh.clone(),
                // A concurrent refresh already failed and cleared the session.
                None => return Err(GridbaseError::SessionExpired),
            }
        };

        tracing::debug!("access token rejected, refreshing");
        self.refreshing.store(true, Ordering::SeqCst);
        let refreshed = self.refresher.refresh(&refresh_token).await;
        self.refreshing.store(false, Ordering::SeqCst);

        match refreshed {
            Ok(access) => {
                let pair = TokenPair::new(access.clone(), refresh_token);
                self.store.save(&pair)?;
                *self.tokens.write().await = Some(pair);
                tracing::info!("access token refreshed");
                Ok(access)
            }
            Err(err) => {
                tracing::warn!(error = %err, "token refresh failed, clearing session");
                *self.tokens.write().await = None;
                self.store.clear()?;
                Err(GridbaseError::SessionExpired)
            }
        }
    }
}
