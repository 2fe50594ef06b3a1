//! Authenticated client for a Gridbase server.
//!
//! Owns the session token pair, the refresh-and-retry protocol, the
//! per-workspace role gate, and record CRUD with schema coercion applied
//! before transmission. Domain types and the pure validation/codec logic
//! live in `gridbase-core`.

pub mod api;
pub mod cache;
pub mod config;
pub mod paths;
pub mod session;
pub mod storage;
pub mod transport;

pub use api::{
    AuthClient, DatabaseClient, FieldClient, GridbaseClient, RecordClient, RecordQuery,
    TableClient, ViewClient, WorkspaceClient,
};
pub use config::ClientConfig;
pub use session::{SessionManager, SessionState, TokenRefresher};
pub use storage::{FileTokenStore, MemoryTokenStore, TokenPair, TokenStore};
pub use transport::Transport;

// Re-export the core crate for downstream convenience
pub use gridbase_core as core;
