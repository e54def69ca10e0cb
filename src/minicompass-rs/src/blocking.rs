//! Blocking wrapper around the async [`crate::ApiClient`].
//!
//! Each call drives the request to completion on a private current-thread
//! runtime. Do not call these methods from inside an async context; offload
//! them to a worker thread instead.

use serde_json::{Map, Value};
use tokio::runtime::{Builder, Runtime};

use crate::{ColumnTemplate, Config, DocumentSet, Result};

pub struct ApiClient {
    inner: crate::ApiClient,
    runtime: Runtime,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::from_async(crate::ApiClient::new(base_url))
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::from_async(crate::ApiClient::from_config(config)?)
    }

    /// Wrap an existing async client, keeping its transport and selector
    pub fn from_async(inner: crate::ApiClient) -> Result<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;
        Ok(Self { inner, runtime })
    }

    pub fn with_column_template(mut self, template: ColumnTemplate) -> Self {
        self.inner = self.inner.with_column_template(template);
        self
    }

    pub fn set_database(&mut self, name: Option<&str>) {
        self.inner.set_database(name);
    }

    pub fn database(&self) -> Option<&str> {
        self.inner.database()
    }

    pub fn list_collections(&self) -> Result<Vec<String>> {
        self.runtime.block_on(self.inner.list_collections())
    }

    pub fn list_documents(&self, collection: &str, limit: usize) -> Result<DocumentSet> {
        self.runtime
            .block_on(self.inner.list_documents(collection, limit))
    }

    pub fn list_documents_page(
        &self,
        collection: &str,
        limit: usize,
        skip: usize,
    ) -> Result<DocumentSet> {
        self.runtime
            .block_on(self.inner.list_documents_page(collection, limit, skip))
    }

    pub fn list_documents_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        limit: usize,
    ) -> Result<DocumentSet> {
        self.runtime.block_on(
            self.inner
                .list_documents_by_field(collection, field, value, limit),
        )
    }

    pub fn insert_document(
        &self,
        collection: &str,
        document: &Map<String, Value>,
    ) -> Result<Option<String>> {
        self.runtime
            .block_on(self.inner.insert_document(collection, document))
    }

    pub fn replace_document(
        &self,
        collection: &str,
        id: &str,
        document: &Map<String, Value>,
    ) -> Result<bool> {
        self.runtime
            .block_on(self.inner.replace_document(collection, id, document))
    }

    pub fn update_document(
        &self,
        collection: &str,
        id: &str,
        partial: &Map<String, Value>,
    ) -> Result<bool> {
        self.runtime
            .block_on(self.inner.update_document(collection, id, partial))
    }

    pub fn delete_document(&self, collection: &str, id: &str) -> Result<bool> {
        self.runtime
            .block_on(self.inner.delete_document(collection, id))
    }

    pub fn document_exists(&self, collection: &str, field: &str, value: &str) -> Result<bool> {
        self.runtime
            .block_on(self.inner.document_exists(collection, field, value))
    }

    pub fn has_duplicate(&self, collection: &str, field: &str, value: &str) -> Result<bool> {
        self.runtime
            .block_on(self.inner.has_duplicate(collection, field, value))
    }

    pub fn find_document(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Map<String, Value>>> {
        self.runtime
            .block_on(self.inner.find_document(collection, field, value))
    }
}
