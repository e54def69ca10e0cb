use crate::transport::{ReqwestTransport, Transport, TransportRequest};
use crate::{ClientError, Result};
use minicompass_core::path;
use minicompass_core::{ColumnTemplate, Config, DocumentSet};
use reqwest::Method;
use serde_json::{Map, Value};
use std::sync::Arc;
use std::time::Duration;

/// Mini Compass REST API client
///
/// Each operation is a single round trip. The database selector set through
/// [`ApiClient::set_database`] is sent as the leading `db` query parameter of
/// every request until it is changed again.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Arc<dyn Transport>,
    database: Option<String>,
    column_template: ColumnTemplate,
}

impl ApiClient {
    /// Create a new client connected to the given base URL
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_transport(base_url, Arc::new(ReqwestTransport::new()))
    }

    /// Create a client that sends its requests through `transport`
    pub fn with_transport(base_url: impl Into<String>, transport: Arc<dyn Transport>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            transport,
            database: None,
            column_template: ColumnTemplate::default(),
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = ReqwestTransport::with_options(
            config.insecure_skip_verify,
            config.timeout_secs.map(Duration::from_secs),
        )?;

        let mut client = Self::with_transport(config.normalized_base_url(), Arc::new(transport))
            .with_column_template(config.column_template);
        client.set_database(config.database());
        Ok(client)
    }

    pub fn with_column_template(mut self, template: ColumnTemplate) -> Self {
        self.column_template = template;
        self
    }

    /// Select the database for following calls. Blank names select the server default.
    pub fn set_database(&mut self, name: Option<&str>) {
        self.database = name
            .map(str::trim)
            .filter(|db| !db.is_empty())
            .map(str::to_string);
    }

    pub fn database(&self) -> Option<&str> {
        self.database.as_deref()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// GET /collections
    #[tracing::instrument(skip(self), fields(db = ?self.database))]
    pub async fn list_collections(&self) -> Result<Vec<String>> {
        let path = path::with_database(&path::collections_path(), self.database());
        let root = self.round_trip(Method::GET, path, None).await?;

        let collections = match root.get("collections") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|item| match item {
                    Value::String(name) => name.clone(),
                    Value::Null => String::new(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(collections)
    }

    /// GET /collections/{collection}/documents?limit=..&skip=0
    pub async fn list_documents(&self, collection: &str, limit: usize) -> Result<DocumentSet> {
        self.list_documents_page(collection, limit, 0).await
    }

    /// GET /collections/{collection}/documents?limit=..&skip=..
    #[tracing::instrument(skip(self), fields(db = ?self.database))]
    pub async fn list_documents_page(
        &self,
        collection: &str,
        limit: usize,
        skip: usize,
    ) -> Result<DocumentSet> {
        let path = path::documents_path(collection)?
            + &path::pagination_query(limit, skip, self.database());
        let root = self.round_trip(Method::GET, path, None).await?;
        self.document_set(&root)
    }

    /// GET /collections/{collection}/documents?limit=..&field=..&value=..
    #[tracing::instrument(skip(self), fields(db = ?self.database))]
    pub async fn list_documents_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        limit: usize,
    ) -> Result<DocumentSet> {
        let path = path::documents_path(collection)?
            + &path::search_query(limit, field, value, self.database());
        let root = self.round_trip(Method::GET, path, None).await?;
        self.document_set(&root)
    }

    /// POST /collections/{collection}/documents
    ///
    /// Returns the inserted id, or `None` when the server reported an error
    /// or did not return an id.
    #[tracing::instrument(skip(self, document), fields(db = ?self.database))]
    pub async fn insert_document(
        &self,
        collection: &str,
        document: &Map<String, Value>,
    ) -> Result<Option<String>> {
        let path = path::with_database(&path::documents_path(collection)?, self.database());
        let body = serde_json::to_string(document)?;
        let root = self.round_trip(Method::POST, path, Some(body)).await?;

        if !succeeded("insert_document", &root) {
            return Ok(None);
        }
        let id = match root.get("insertedId") {
            None | Some(Value::Null) => None,
            Some(Value::String(id)) => Some(id.clone()),
            Some(other) => Some(other.to_string()),
        };
        Ok(id)
    }

    /// PUT /collections/{collection}/documents/{id}
    #[tracing::instrument(skip(self, document), fields(db = ?self.database))]
    pub async fn replace_document(
        &self,
        collection: &str,
        id: &str,
        document: &Map<String, Value>,
    ) -> Result<bool> {
        let path = path::with_database(
            &path::single_document_path(collection, id)?,
            self.database(),
        );
        let body = serde_json::to_string(document)?;
        let root = self.round_trip(Method::PUT, path, Some(body)).await?;
        Ok(succeeded("replace_document", &root))
    }

    /// PATCH /collections/{collection}/documents/{id}
    #[tracing::instrument(skip(self, partial), fields(db = ?self.database))]
    pub async fn update_document(
        &self,
        collection: &str,
        id: &str,
        partial: &Map<String, Value>,
    ) -> Result<bool> {
        let path = path::with_database(
            &path::single_document_path(collection, id)?,
            self.database(),
        );
        let body = serde_json::to_string(partial)?;
        let root = self.round_trip(Method::PATCH, path, Some(body)).await?;
        Ok(succeeded("update_document", &root))
    }

    /// DELETE /collections/{collection}/documents/{id}
    #[tracing::instrument(skip(self), fields(db = ?self.database))]
    pub async fn delete_document(&self, collection: &str, id: &str) -> Result<bool> {
        let path = path::with_database(
            &path::single_document_path(collection, id)?,
            self.database(),
        );
        let root = self.round_trip(Method::DELETE, path, None).await?;
        Ok(succeeded("delete_document", &root))
    }

    /// GET /collections/{collection}/documents/exists?field=..&value=..
    #[tracing::instrument(skip(self), fields(db = ?self.database))]
    pub async fn document_exists(&self, collection: &str, field: &str, value: &str) -> Result<bool> {
        let path = path::exists_path(collection)?
            + &path::field_query(field, value, self.database());
        let root = self.round_trip(Method::GET, path, None).await?;
        Ok(flag(&root, "exists"))
    }

    /// GET /collections/{collection}/documents/has-duplicate?field=..&value=..
    #[tracing::instrument(skip(self), fields(db = ?self.database))]
    pub async fn has_duplicate(&self, collection: &str, field: &str, value: &str) -> Result<bool> {
        let path = path::duplicate_path(collection)?
            + &path::field_query(field, value, self.database());
        let root = self.round_trip(Method::GET, path, None).await?;
        Ok(flag(&root, "duplicate"))
    }

    /// GET /collections/{collection}/documents/find?field=..&value=..
    ///
    /// Returns the first matching document, if any.
    #[tracing::instrument(skip(self), fields(db = ?self.database))]
    pub async fn find_document(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Option<Map<String, Value>>> {
        let path = path::find_path(collection)?
            + &path::field_query(field, value, self.database());
        let mut root = self.round_trip(Method::GET, path, None).await?;

        if !succeeded("find_document", &root) {
            return Ok(None);
        }
        match root.remove("document") {
            Some(Value::Object(document)) => Ok(Some(document)),
            _ => Ok(None),
        }
    }

    /// Send one request and parse its body as a JSON object, whatever the status
    async fn round_trip(
        &self,
        method: Method,
        path: String,
        body: Option<String>,
    ) -> Result<Map<String, Value>> {
        let request = TransportRequest {
            method,
            url: format!("{}{}", self.base_url, path),
            body,
        };
        tracing::debug!(method = %request.method, url = %request.url, "Sending request");

        let response = self.transport.send(request).await?;
        if !(200..300).contains(&response.status) {
            tracing::debug!(status = response.status, "Non-success status, parsing body anyway");
        }

        let value: Value = serde_json::from_str(&response.body).map_err(|e| {
            ClientError::MalformedResponse(format!("body is not valid JSON: {}", e))
        })?;
        match value {
            Value::Object(root) => Ok(root),
            other => Err(ClientError::MalformedResponse(format!(
                "expected a JSON object, got {}",
                json_kind(&other)
            ))),
        }
    }

    fn document_set(&self, root: &Map<String, Value>) -> Result<DocumentSet> {
        match root.get("documents") {
            None | Some(Value::Null) => Ok(DocumentSet::empty()),
            Some(Value::Array(documents)) => {
                DocumentSet::from_documents(documents, self.column_template)
                    .map_err(|e| ClientError::MalformedResponse(e.to_string()))
            }
            Some(other) => Err(ClientError::MalformedResponse(format!(
                "`documents` must be an array, got {}",
                json_kind(other)
            ))),
        }
    }
}

/// A body without an `error` key is a success
fn succeeded(operation: &str, root: &Map<String, Value>) -> bool {
    match root.get("error") {
        Some(error) => {
            tracing::warn!(operation, %error, "Server reported an error");
            false
        }
        None => true,
    }
}

fn flag(root: &Map<String, Value>, key: &str) -> bool {
    root.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
