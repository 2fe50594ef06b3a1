//! CRUD client for persisted views.

use crate::transport::{Query, Transport};
use gridbase_core::{Page, Result, View, ViewConfig};
use serde_json::json;
use std::sync::Arc;

/// Client for `/views/`.
pub struct ViewClient {
    transport: Arc<Transport>,
}

impl ViewClient {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Lists the views saved for a table.
    pub async fn list(&self, table: i64) -> Result<Vec<View>> {
        let query = vec![("table", table.to_string())];
        let page: Page<View> = self.transport.get_json("/views/", &query).await?;
        Ok(page.into_results())
    }

    /// Saves a named view with the given configuration.
    pub async fn create(&self, table: i64, name: &str, config: &ViewConfig) -> Result<View> {
        self.transport
            .post_json(
                "/views/",
                &json!({ "table": table, "name": name, "config": config }),
            )
            .await
    }

    /// Replaces a view's configuration.
    pub async fn update_config(&self, id: i64, config: &ViewConfig) -> Result<View> {
        self.transport
            .patch_json(&format!("/views/{id}/"), &json!({ "config": config }))
            .await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.transport
            .delete(&format!("/views/{id}/"), &Query::new())
            .await
    }
}
