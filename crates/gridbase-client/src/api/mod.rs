//! API clients over the authenticated transport.

pub mod auth;
pub mod catalog;
pub mod records;
pub mod views;

pub use auth::AuthClient;
pub use catalog::{DatabaseClient, FieldClient, TableClient, WorkspaceClient};
pub use records::{RecordClient, RecordQuery};
pub use views::ViewClient;

use crate::cache::ListCache;
use crate::config::ClientConfig;
use crate::session::{HttpTokenRefresher, SessionManager};
use crate::storage::{FileTokenStore, TokenStore};
use crate::transport::{Transport, build_http_client};
use gridbase_core::{Field, Result, RoleGate, SchemaValidator, SelectPolicy, Table};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Entry point owning the session, transport, role gate, and list cache.
///
/// The session is threaded through construction rather than living in a
/// global: every sub-client shares this instance's transport by `Arc`.
pub struct GridbaseClient {
    transport: Arc<Transport>,
    gate: Arc<RwLock<RoleGate>>,
    cache: ListCache,
    select_policy: SelectPolicy,
}

impl GridbaseClient {
    /// Creates a client with tokens persisted under the gridbase config
    /// directory.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let store = Arc::new(FileTokenStore::new().map_err(gridbase_core::GridbaseError::from)?);
        Self::with_store(config, store)
    }

    /// Creates a client with custom token storage (in-memory sessions,
    /// tests).
    pub fn with_store(config: ClientConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let http = build_http_client(&config)?;
        let refresher = Arc::new(HttpTokenRefresher::new(http.clone(), &config.base_url));
        let session = Arc::new(SessionManager::new(store, refresher)?);
        let transport = Arc::new(Transport::with_http(http, config, session));
        Ok(Self {
            transport,
            gate: Arc::new(RwLock::new(RoleGate::new())),
            cache: ListCache::new(),
            select_policy: SelectPolicy::default(),
        })
    }

    /// Overrides how select values are checked against field choices.
    pub fn with_select_policy(mut self, policy: SelectPolicy) -> Self {
        self.select_policy = policy;
        self
    }

    /// The session manager (read access for state inspection).
    pub fn session(&self) -> &Arc<SessionManager> {
        self.transport.session()
    }

    /// The shared role gate.
    pub fn role_gate(&self) -> &Arc<RwLock<RoleGate>> {
        &self.gate
    }

    /// Auth operations (login, logout, me, assignment refresh).
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(self.transport.clone(), self.gate.clone())
    }

    /// Workspace CRUD.
    pub fn workspaces(&self) -> WorkspaceClient {
        WorkspaceClient::new(self.transport.clone())
    }

    /// Database CRUD.
    pub fn databases(&self) -> DatabaseClient {
        DatabaseClient::new(self.transport.clone())
    }

    /// Table CRUD.
    pub fn tables(&self) -> TableClient {
        TableClient::new(self.transport.clone())
    }

    /// Field CRUD.
    pub fn fields(&self) -> FieldClient {
        FieldClient::new(self.transport.clone())
    }

    /// View CRUD.
    pub fn views(&self) -> ViewClient {
        ViewClient::new(self.transport.clone())
    }

    /// Builds a record client for a table from its current field list.
    ///
    /// The caller fetches the fields (usually via
    /// [`fields`](Self::fields)) so that one schema snapshot is used for
    /// the client's whole lifetime.
    pub fn records(&self, table: &Table, fields: Vec<Field>) -> RecordClient {
        let validator = SchemaValidator::new(fields).with_select_policy(self.select_policy);
        RecordClient::new(
            self.transport.clone(),
            self.gate.clone(),
            self.cache.clone(),
            table,
            validator,
        )
    }
}
