//! Core domain for the Gridbase client runtime.
//!
//! Workspaces contain databases, databases contain tables, tables carry a
//! dynamically defined set of typed fields, and records are opaque
//! key/value payloads validated against that field set. This crate holds
//! the pieces with real invariants and no I/O: the field type registry,
//! the schema coercion engine, the view codec, the role gate, and the
//! shared error type. Authenticated transport lives in `gridbase-client`.

pub mod catalog;
pub mod error;
pub mod field;
pub mod page;
pub mod record;
pub mod role;
pub mod schema;
pub mod view;

// Re-export the common error type and result alias
pub use error::{GridbaseError, Result};

pub use catalog::{Database, Table, User, Workspace};
pub use field::{Field, FieldOptions, FieldType, SelectPolicy};
pub use page::Page;
pub use record::Record;
pub use role::{Role, RoleAssignment, RoleGate};
pub use schema::{FieldError, SchemaValidator};
pub use view::{View, ViewConfig};
