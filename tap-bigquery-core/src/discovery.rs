//! Schema and table discovery.
//!
//! Discovery is expressed as a small object-safe trait with one concrete
//! BigQuery implementation, and a generic catalog walker that drives any
//! implementation. Each call is independent and idempotent; nothing is
//! cached between calls.

use crate::Result;
use crate::config::TapConfig;
use crate::models::{Catalog, CatalogEntry, TableDescriptor};
use async_trait::async_trait;
use gcp_bigquery_client::Client;
use gcp_bigquery_client::model::query_request::QueryRequest;
use gcp_bigquery_client::model::query_response::ResultSet;

/// Catalog discovery operations against a live warehouse connection.
///
/// # Object Safety
/// The trait is object-safe so the walker can take
/// `&dyn CatalogDiscovery`, keeping it testable with a stub
/// implementation.
#[async_trait]
pub trait CatalogDiscovery: Send + Sync {
    /// Lists the schemas in discovery scope.
    ///
    /// When the config carries a non-empty `filter_schemas`, that list is
    /// returned verbatim, order preserved, without validating existence:
    /// a schema that does not exist simply yields no objects downstream.
    /// Otherwise the warehouse is introspected.
    ///
    /// # Errors
    /// Returns error if introspection fails
    async fn list_schemas(&self) -> Result<Vec<String>>;

    /// Lists the tables and views in a schema.
    ///
    /// Object names are unqualified: any `dataset.table` prefix the
    /// driver reports is stripped down to the final segment. Driver
    /// order is preserved, and the view flag is passed through
    /// unmodified. An unknown schema yields an empty list, not an error.
    ///
    /// # Errors
    /// Returns error if introspection fails
    async fn list_objects(&self, schema: &str) -> Result<Vec<TableDescriptor>>;

    /// Probes the connection without collecting anything.
    ///
    /// # Errors
    /// Returns error if the warehouse is unreachable or the credentials
    /// are rejected
    async fn test_connection(&self) -> Result<()>;
}

/// Strips a dataset or project qualification prefix from an object name.
///
/// BigQuery introspection can report names as `dataset.table`, which
/// would qualify the name a second time downstream. Only the segment
/// after the last `.` is kept; names without a dot pass through
/// unchanged.
pub fn strip_qualifier(name: &str) -> &str {
    name.rsplit('.').next().unwrap_or(name)
}

/// Resolves the user-supplied schema scope.
///
/// Returns the allow-list verbatim when it is present and non-empty,
/// `None` when the warehouse should be introspected instead. An empty
/// list means "no filter", matching the config's documented semantics.
pub fn schema_scope(filter_schemas: Option<&[String]>) -> Option<Vec<String>> {
    filter_schemas
        .filter(|f| !f.is_empty())
        .map(<[String]>::to_vec)
}

/// Walks every schema in scope and assembles the discovery catalog.
///
/// # Errors
/// Returns error if any discovery call fails
pub async fn discover_catalog(discovery: &dyn CatalogDiscovery) -> Result<Catalog> {
    let schemas = discovery.list_schemas().await?;
    tracing::info!("Discovering {} schemas", schemas.len());

    let mut streams = Vec::new();
    for schema in &schemas {
        let objects = discovery.list_objects(schema).await?;
        tracing::debug!(schema = %schema, objects = objects.len(), "Discovered schema");
        streams.extend(objects.iter().map(|t| CatalogEntry::new(schema, t)));
    }

    tracing::info!("Discovered {} streams", streams.len());
    Ok(Catalog { streams })
}

/// BigQuery discovery over `INFORMATION_SCHEMA`.
///
/// Requires `bigquery.datasets.get` and `bigquery.tables.list` (or the
/// `BigQuery Metadata Viewer` role) on the target project.
pub struct BigQueryDiscovery {
    client: Client,
    project_id: String,
    filter_schemas: Option<Vec<String>>,
}

impl std::fmt::Debug for BigQueryDiscovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BigQueryDiscovery")
            .field("project_id", &self.project_id)
            .field("filter_schemas", &self.filter_schemas)
            .finish_non_exhaustive()
    }
}

impl BigQueryDiscovery {
    /// Creates a discovery instance over an authenticated client.
    pub fn new(client: Client, config: &TapConfig) -> Self {
        Self {
            client,
            project_id: config.project_id.clone(),
            filter_schemas: config.filter_schemas.clone(),
        }
    }

    /// Runs a query and returns its result set.
    async fn query(&self, sql: String) -> Result<ResultSet> {
        let request = QueryRequest::new(sql);
        let response = self
            .client
            .job()
            .query(&self.project_id, request)
            .await
            .map_err(|e| {
                crate::error::TapError::discovery_failed("INFORMATION_SCHEMA query", e)
            })?;

        Ok(ResultSet::new_from_query_response(response))
    }
}

/// Rejects identifiers that cannot be safely spliced into a quoted
/// BigQuery identifier.
fn validate_identifier(name: &str, what: &str) -> Result<()> {
    if name.is_empty() || name.contains('`') {
        return Err(crate::error::TapError::configuration(format!(
            "{} is not a valid BigQuery identifier: {:?}",
            what, name
        )));
    }
    Ok(())
}

#[async_trait]
impl CatalogDiscovery for BigQueryDiscovery {
    async fn list_schemas(&self) -> Result<Vec<String>> {
        if let Some(filter) = schema_scope(self.filter_schemas.as_deref()) {
            tracing::debug!("Using {} schemas from filter_schemas", filter.len());
            return Ok(filter);
        }

        validate_identifier(&self.project_id, "project_id")?;
        let mut rs = self
            .query(format!(
                "SELECT schema_name FROM `{}`.INFORMATION_SCHEMA.SCHEMATA",
                self.project_id
            ))
            .await?;

        let mut schemas = Vec::new();
        while rs.next_row() {
            let name = rs
                .get_string_by_name("schema_name")
                .map_err(|e| {
                    crate::error::TapError::discovery_failed("reading schema_name column", e)
                })?
                .unwrap_or_default();
            schemas.push(name);
        }

        Ok(schemas)
    }

    async fn list_objects(&self, schema: &str) -> Result<Vec<TableDescriptor>> {
        validate_identifier(&self.project_id, "project_id")?;
        validate_identifier(schema, "schema name")?;

        let mut rs = self
            .query(format!(
                "SELECT table_name, table_type \
                 FROM `{}.{}`.INFORMATION_SCHEMA.TABLES",
                self.project_id, schema
            ))
            .await?;

        let mut objects = Vec::new();
        while rs.next_row() {
            let name = rs
                .get_string_by_name("table_name")
                .map_err(|e| {
                    crate::error::TapError::discovery_failed("reading table_name column", e)
                })?
                .unwrap_or_default();
            let table_type = rs
                .get_string_by_name("table_type")
                .map_err(|e| {
                    crate::error::TapError::discovery_failed("reading table_type column", e)
                })?
                .unwrap_or_default();

            objects.push(TableDescriptor::new(
                strip_qualifier(&name),
                table_type.contains("VIEW"),
            ));
        }

        Ok(objects)
    }

    async fn test_connection(&self) -> Result<()> {
        let mut rs = self.query("SELECT 1 AS probe".to_string()).await?;

        if !rs.next_row() {
            return Err(crate::error::TapError::configuration(
                "Connection probe returned no rows",
            ));
        }

        Ok(())
    }
}
