//! Catalog domain models: workspaces, databases, tables, users.

use crate::role::RoleAssignment;
use serde::{Deserialize, Serialize};

/// An authenticated user as returned by `/auth/me`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier for the user
    pub id: i64,
    /// Login name
    pub username: String,
    /// Contact email
    #[serde(default)]
    pub email: String,
}

/// Top-level tenant boundary containing databases.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    /// Unique identifier for the workspace
    pub id: i64,
    /// Display name
    pub name: String,
    /// Owning user
    pub owner: User,
    /// Role assignments for all members
    #[serde(default)]
    pub members: Vec<RoleAssignment>,
}

/// A database groups tables inside a workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Database {
    /// Unique identifier for the database
    pub id: i64,
    /// Owning workspace
    pub workspace: i64,
    /// Display name
    pub name: String,
}

/// A table holds a dynamically defined field set and its records.
///
/// Deletion is soft by default: `deleted_at` is set instead of removing
/// the row, and a hard delete must be requested explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Unique identifier for the table
    pub id: i64,
    /// Owning database
    pub database: i64,
    /// Display name
    pub name: String,
    /// Soft-deletion timestamp, if any
    #[serde(default)]
    pub deleted_at: Option<String>,
    /// Owning workspace, denormalized by the server so capability checks
    /// do not need a database lookup
    #[serde(default)]
    pub workspace_id: i64,
}

impl Table {
    /// True while the table has not been soft-deleted.
    pub fn is_active(&self) -> bool {
        self.deleted_at.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_table_from_server_payload() {
        let table: Table = serde_json::from_value(json!({
            "id": 7,
            "database": 3,
            "name": "Contacts",
            "deleted_at": null,
            "workspace_id": 1
        }))
        .unwrap();
        assert!(table.is_active());
        assert_eq!(table.workspace_id, 1);
    }

    #[test]
    fn test_soft_deleted_table() {
        let table: Table = serde_json::from_value(json!({
            "id": 7,
            "database": 3,
            "name": "Old",
            "deleted_at": "2024-05-01T12:00:00Z"
        }))
        .unwrap();
        assert!(!table.is_active());
    }
}
