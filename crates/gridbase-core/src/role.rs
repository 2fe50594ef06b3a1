//! Workspace roles and the role gate.
//!
//! The gate answers capability queries from a per-workspace role map
//! that is rebuilt as a unit whenever the session changes. Reads between
//! rebuilds may be stale; that staleness is tolerated until the next
//! login or explicit refresh of assignments.

use crate::catalog::User;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Workspace-scoped role governing mutation capability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
    Viewer,
}

impl Role {
    /// True when this role may invoke mutating operations.
    pub fn can_mutate(&self) -> bool {
        matches!(self, Self::Admin | Self::Member)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Member => "member",
            Self::Viewer => "viewer",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user's role within one workspace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleAssignment {
    /// Unique identifier for the assignment
    pub id: i64,
    /// Workspace the role applies to
    pub workspace: i64,
    /// Assigned role
    pub role: Role,
    /// Assigned user
    pub user: User,
}

/// Effective role map, derived from the current session's assignments.
///
/// Never patched incrementally: [`rebuild`](Self::rebuild) replaces the
/// whole map, [`clear`](Self::clear) empties it on logout.
#[derive(Debug, Clone, Default)]
pub struct RoleGate {
    by_workspace: HashMap<i64, Role>,
}

impl RoleGate {
    /// An empty gate; every capability query denies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the role map from a fresh assignment list.
    pub fn rebuild(&mut self, assignments: &[RoleAssignment]) {
        self.by_workspace = assignments
            .iter()
            .map(|a| (a.workspace, a.role))
            .collect();
        tracing::debug!(
            workspaces = self.by_workspace.len(),
            "role gate rebuilt"
        );
    }

    /// Clears all assignments (logout).
    pub fn clear(&mut self) {
        self.by_workspace.clear();
    }

    /// The effective role for a workspace, if any is assigned.
    pub fn role_for(&self, workspace_id: i64) -> Option<Role> {
        self.by_workspace.get(&workspace_id).copied()
    }

    /// Whether mutating operations are allowed in a workspace.
    ///
    /// Unassigned workspaces deny.
    pub fn can_mutate(&self, workspace_id: i64) -> bool {
        self.role_for(workspace_id)
            .map(|role| role.can_mutate())
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(workspace: i64, role: Role) -> RoleAssignment {
        RoleAssignment {
            id: workspace * 10,
            workspace,
            role,
            user: User {
                id: 1,
                username: "ada".into(),
                email: "ada@example.com".into(),
            },
        }
    }

    #[test]
    fn test_can_mutate_truth_table() {
        assert!(Role::Admin.can_mutate());
        assert!(Role::Member.can_mutate());
        assert!(!Role::Viewer.can_mutate());
    }

    #[test]
    fn test_gate_per_workspace() {
        let mut gate = RoleGate::new();
        gate.rebuild(&[
            assignment(1, Role::Admin),
            assignment(2, Role::Viewer),
            assignment(3, Role::Member),
        ]);
        assert!(gate.can_mutate(1));
        assert!(!gate.can_mutate(2));
        assert!(gate.can_mutate(3));
        assert_eq!(gate.role_for(2), Some(Role::Viewer));
    }

    #[test]
    fn test_unassigned_workspace_denies() {
        let gate = RoleGate::new();
        assert_eq!(gate.role_for(99), None);
        assert!(!gate.can_mutate(99));
    }

    #[test]
    fn test_rebuild_replaces_whole_map() {
        let mut gate = RoleGate::new();
        gate.rebuild(&[assignment(1, Role::Admin)]);
        gate.rebuild(&[assignment(2, Role::Member)]);
        assert_eq!(gate.role_for(1), None);
        assert!(gate.can_mutate(2));
    }

    #[test]
    fn test_clear_on_logout() {
        let mut gate = RoleGate::new();
        gate.rebuild(&[assignment(1, Role::Admin)]);
        gate.clear();
        assert!(!gate.can_mutate(1));
    }

    #[test]
    fn test_role_wire_form() {
        let role: Role = serde_json::from_str("\"viewer\"").unwrap();
        assert_eq!(role, Role::Viewer);
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
