//! CRUD clients for the catalog resources: workspaces, databases,
//! tables, and fields.
//!
//! These are thin wrappers; all invariants live server-side. List
//! endpoints tolerate both the raw-array and paginated response shapes.

use crate::transport::{Query, Transport};
use gridbase_core::{Database, Field, Page, Result, Table, Workspace};
use serde_json::json;
use std::sync::Arc;

/// Client for `/workspaces/`.
pub struct WorkspaceClient {
    transport: Arc<Transport>,
}

impl WorkspaceClient {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    pub async fn list(&self) -> Result<Vec<Workspace>> {
        let page: Page<Workspace> = self
            .transport
            .get_json("/workspaces/", &Query::new())
            .await?;
        Ok(page.into_results())
    }

    pub async fn create(&self, name: &str) -> Result<Workspace> {
        self.transport
            .post_json("/workspaces/", &json!({ "name": name }))
            .await
    }

    pub async fn retrieve(&self, id: i64) -> Result<Workspace> {
        self.transport
            .get_json(&format!("/workspaces/{id}/"), &Query::new())
            .await
    }

    pub async fn rename(&self, id: i64, name: &str) -> Result<Workspace> {
        self.transport
            .patch_json(&format!("/workspaces/{id}/"), &json!({ "name": name }))
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.transport
            .delete(&format!("/workspaces/{id}/"), &Query::new())
            .await
    }
}

/// Client for `/databases/`.
pub struct DatabaseClient {
    transport: Arc<Transport>,
}

impl DatabaseClient {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Lists databases, optionally scoped to one workspace.
    pub async fn list(&self, workspace: Option<i64>) -> Result<Vec<Database>> {
        let mut query = Query::new();
        if let Some(workspace) = workspace {
            query.push(("workspace", workspace.to_string()));
        }
        let page: Page<Database> = self.transport.get_json("/databases/", &query).await?;
        Ok(page.into_results())
    }

    pub async fn create(&self, workspace: i64, name: &str) -> Result<Database> {
        self.transport
            .post_json(
                "/databases/",
                &json!({ "workspace": workspace, "name": name }),
            )
            .await
    }

    pub async fn retrieve(&self, id: i64) -> Result<Database> {
        self.transport
            .get_json(&format!("/databases/{id}/"), &Query::new())
            .await
    }

    pub async fn rename(&self, id: i64, name: &str) -> Result<Database> {
        self.transport
            .patch_json(&format!("/databases/{id}/"), &json!({ "name": name }))
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.transport
            .delete(&format!("/databases/{id}/"), &Query::new())
            .await
    }
}

/// Client for `/tables/`.
pub struct TableClient {
    transport: Arc<Transport>,
}

impl TableClient {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Lists tables, optionally scoped to one database.
    pub async fn list(&self, database: Option<i64>) -> Result<Vec<Table>> {
        let mut query = Query::new();
        if let Some(database) = database {
            query.push(("database", database.to_string()));
        }
        let page: Page<Table> = self.transport.get_json("/tables/", &query).await?;
        Ok(page.into_results())
    }

    pub async fn create(&self, database: i64, name: &str) -> Result<Table> {
        self.transport
            .post_json("/tables/", &json!({ "database": database, "name": name }))
            .await
    }

    pub async fn retrieve(&self, id: i64) -> Result<Table> {
        self.transport
            .get_json(&format!("/tables/{id}/"), &Query::new())
            .await
    }

    pub async fn rename(&self, id: i64, name: &str) -> Result<Table> {
        self.transport
            .patch_json(&format!("/tables/{id}/"), &json!({ "name": name }))
            .await
    }

    /// Soft-deletes a table (sets `deleted_at` server-side).
    pub async fn delete(&self, id: i64) -> Result<()> {
        self.transport
            .delete(&format!("/tables/{id}/"), &Query::new())
            .await
    }

    /// Irrevocably deletes a table and its records.
    pub async fn delete_hard(&self, id: i64) -> Result<()> {
        let query = vec![("hard", "1".to_string())];
        self.transport
            .delete(&format!("/tables/{id}/"), &query)
            .await
    }
}

/// Client for `/fields/`.
pub struct FieldClient {
    transport: Arc<Transport>,
}

impl FieldClient {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Lists a table's fields in schema order.
    pub async fn list(&self, table: i64) -> Result<Vec<Field>> {
        let query = vec![("table", table.to_string())];
        let page: Page<Field> = self.transport.get_json("/fields/", &query).await?;
        let mut fields = page.into_results();
        fields.sort_by(|a, b| a.order.cmp(&b.order).then(a.id.cmp(&b.id)));
        Ok(fields)
    }

    /// Creates a field; the server assigns `id` and `order`.
    pub async fn create(&self, field: &Field) -> Result<Field> {
        self.transport
            .post_json(
                "/fields/",
                &json!({
                    "table": field.table,
                    "name": field.name,
                    "type": field.field_type,
                    "required": field.required,
                    "unique": field.unique,
                    "options": field.options,
                }),
            )
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.transport
            .delete(&format!("/fields/{id}/"), &Query::new())
            .await
    }
}
