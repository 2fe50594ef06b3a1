//! Record CRUD orchestration for one table.
//!
//! Writes run through the schema coercion engine and the role gate
//! before any request is built; reads translate the active view through
//! the codec and go through the list cache.

use crate::cache::{ListCache, ListKey};
use crate::transport::{Query, Transport};
use gridbase_core::view::query_params;
use gridbase_core::{
    GridbaseError, Record, Result, RoleGate, SchemaValidator, Table, ViewConfig,
};
use serde_json::{Map, Value, json};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Parameters for a record list operation.
///
/// `search` is free text, passed through verbatim; `view` contributes
/// the `sort`/`filter` parameters via the view codec. An empty query
/// sends no parameters, leaving server defaults in effect.
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    pub search: Option<String>,
    pub view: Option<ViewConfig>,
}

impl RecordQuery {
    /// Query with a free-text search term.
    pub fn search(term: impl Into<String>) -> Self {
        Self {
            search: Some(term.into()),
            view: None,
        }
    }

    /// Applies a view's sort/filter configuration.
    pub fn with_view(mut self, config: ViewConfig) -> Self {
        self.view = Some(config);
        self
    }

    fn to_params(&self) -> Query {
        let mut params = Query::new();
        if let Some(search) = &self.search {
            if !search.is_empty() {
                params.push(("search", search.clone()));
            }
        }
        if let Some(view) = &self.view {
            params.extend(query_params(view));
        }
        params
    }
}

/// Record client bound to one table and its schema snapshot.
pub struct RecordClient {
    transport: Arc<Transport>,
    gate: Arc<RwLock<RoleGate>>,
    cache: ListCache,
    table_id: i64,
    workspace_id: i64,
    validator: SchemaValidator,
}

impl RecordClient {
    pub(crate) fn new(
        transport: Arc<Transport>,
        gate: Arc<RwLock<RoleGate>>,
        cache: ListCache,
        table: &Table,
        validator: SchemaValidator,
    ) -> Self {
        Self {
            transport,
            gate,
            cache,
            table_id: table.id,
            workspace_id: table.workspace_id,
            validator,
        }
    }

    /// The validator built from the table's field list.
    pub fn validator(&self) -> &SchemaValidator {
        &self.validator
    }

    fn list_path(&self) -> String {
        format!("/tables/{}/records", self.table_id)
    }

    fn detail_path(&self, record_id: i64) -> String {
        format!("/tables/{}/records/{}", self.table_id, record_id)
    }

    /// Lists records, serving repeated queries from the cache until the
    /// next mutation on this table.
    pub async fn list(&self, query: &RecordQuery) -> Result<Vec<Record>> {
        let params = query.to_params();
        let key = ListKey::new(self.table_id, encode_key(&params));
        if let Some(cached) = self.cache.get(&key).await {
            tracing::debug!(table = self.table_id, "record list served from cache");
            return Ok(cached.as_ref().clone());
        }

        let page: gridbase_core::Page<Record> =
            self.transport.get_json(&self.list_path(), &params).await?;
        let records = page.into_results();
        self.cache.insert(key, records.clone()).await;
        Ok(records)
    }

    /// Fetches one record.
    pub async fn retrieve(&self, record_id: i64) -> Result<Record> {
        self.transport
            .get_json(&self.detail_path(record_id), &Query::new())
            .await
    }

    /// Creates a record from a raw payload.
    ///
    /// The payload is coerced and validated locally first; on any field
    /// error, or when the role gate denies mutation, no request is sent.
    pub async fn create(&self, data: &Map<String, Value>) -> Result<Record> {
        self.ensure_can_mutate().await?;
        let coerced = self.validator.validate(data)?;

        let record: Record = self
            .transport
            .post_json(&self.list_path(), &json!({ "data": coerced }))
            .await?;
        self.cache.invalidate_table(self.table_id).await;
        Ok(record)
    }

    /// Updates a record's payload, with the same local preconditions as
    /// [`create`](Self::create).
    pub async fn update(&self, record_id: i64, data: &Map<String, Value>) -> Result<Record> {
        self.ensure_can_mutate().await?;
        let coerced = self.validator.validate(data)?;

        let record: Record = self
            .transport
            .patch_json(&self.detail_path(record_id), &json!({ "data": coerced }))
            .await?;
        self.cache.invalidate_table(self.table_id).await;
        Ok(record)
    }

    /// Deletes a record.
    pub async fn delete(&self, record_id: i64) -> Result<()> {
        self.ensure_can_mutate().await?;
        self.transport
            .delete(&self.detail_path(record_id), &Query::new())
            .await?;
        self.cache.invalidate_table(self.table_id).await;
        Ok(())
    }

    /// Local capability precondition; never a server round-trip.
    async fn ensure_can_mutate(&self) -> Result<()> {
        let gate = self.gate.read().await;
        if gate.can_mutate(self.workspace_id) {
            Ok(())
        } else {
            Err(GridbaseError::CapabilityDenied {
                workspace: self.workspace_id,
            })
        }
    }
}

fn encode_key(params: &Query) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&")
}
