//! Authentication operations and role map maintenance.

use crate::storage::TokenPair;
use crate::transport::{Query, Transport};
use gridbase_core::{Page, Result, RoleAssignment, RoleGate, User};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Deserialize)]
struct LoginResponse {
    access: String,
    refresh: String,
}

/// Client for the auth endpoints.
///
/// Besides the token lifecycle, this owns rebuilding the shared
/// [`RoleGate`]: the role map is replaced as a unit on login and on an
/// explicit assignment refresh, and cleared on logout.
pub struct AuthClient {
    transport: Arc<Transport>,
    gate: Arc<RwLock<RoleGate>>,
}

impl AuthClient {
    pub(crate) fn new(transport: Arc<Transport>, gate: Arc<RwLock<RoleGate>>) -> Self {
        Self { transport, gate }
    }

    /// Logs in, installs the token pair, and rebuilds the role map.
    ///
    /// Returns the authenticated user.
    pub async fn login(&self, username: &str, password: &str) -> Result<User> {
        let tokens: LoginResponse = self
            .transport
            .post_json(
                "/auth/jwt/create",
                &json!({ "username": username, "password": password }),
            )
            .await?;
        self.transport
            .session()
            .install(TokenPair::new(tokens.access, tokens.refresh))
            .await?;

        let user = self.me().await?;
        self.refresh_assignments().await?;
        tracing::info!(username, "logged in");
        Ok(user)
    }

    /// Logs out: clears both tokens and the role map. No server
    /// round-trip is required to succeed.
    pub async fn logout(&self) -> Result<()> {
        self.transport.session().clear().await?;
        self.gate.write().await.clear();
        Ok(())
    }

    /// Fetches the authenticated user.
    pub async fn me(&self) -> Result<User> {
        self.transport.get_json("/auth/me", &Query::new()).await
    }

    /// Re-fetches role assignments and rebuilds the role map as a unit.
    pub async fn refresh_assignments(&self) -> Result<Vec<RoleAssignment>> {
        let page: Page<RoleAssignment> = self
            .transport
            .get_json("/role-assignments", &Query::new())
            .await?;
        let assignments = page.into_results();
        self.gate.write().await.rebuild(&assignments);
        Ok(assignments)
    }
}
