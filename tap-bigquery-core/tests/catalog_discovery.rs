//! Catalog walker tests over a stub discovery implementation.
//!
//! These tests exercise the generic discovery path without a live
//! BigQuery connection.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use tap_bigquery_core::{CatalogDiscovery, Result, TableDescriptor, discover_catalog};

/// In-memory discovery source with a fixed schema/object layout.
struct StubDiscovery {
    schemas: Vec<String>,
    objects: HashMap<String, Vec<TableDescriptor>>,
    list_calls: AtomicUsize,
}

impl StubDiscovery {
    fn new(schemas: &[&str], objects: &[(&str, &str, bool)]) -> Self {
        let mut by_schema: HashMap<String, Vec<TableDescriptor>> = HashMap::new();
        for (schema, table, is_view) in objects {
            by_schema
                .entry((*schema).to_string())
                .or_default()
                .push(TableDescriptor::new(*table, *is_view));
        }
        Self {
            schemas: schemas.iter().map(|s| (*s).to_string()).collect(),
            objects: by_schema,
            list_calls: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl CatalogDiscovery for StubDiscovery {
    async fn list_schemas(&self) -> Result<Vec<String>> {
        Ok(self.schemas.clone())
    }

    async fn list_objects(&self, schema: &str) -> Result<Vec<TableDescriptor>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        // Unknown schemas yield an empty result, never an error.
        Ok(self.objects.get(schema).cloned().unwrap_or_default())
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn walker_preserves_schema_and_object_order() {
    let stub = StubDiscovery::new(
        &["b", "a"],
        &[
            ("b", "events", false),
            ("b", "daily_rollup", true),
            ("a", "users", false),
        ],
    );

    let catalog = discover_catalog(&stub).await.unwrap();

    let ids: Vec<&str> = catalog
        .streams
        .iter()
        .map(|s| s.tap_stream_id.as_str())
        .collect();
    assert_eq!(ids, ["b-events", "b-daily_rollup", "a-users"]);
    assert!(catalog.streams[1].is_view);
    assert!(!catalog.streams[0].is_view);
}

#[tokio::test]
async fn walker_tolerates_schemas_without_objects() {
    // A requested schema that does not exist downstream is not an error,
    // it just contributes nothing to the catalog.
    let stub = StubDiscovery::new(&["missing", "a"], &[("a", "users", false)]);

    let catalog = discover_catalog(&stub).await.unwrap();

    assert_eq!(catalog.len(), 1);
    assert_eq!(catalog.streams[0].schema_name, "a");
}

#[tokio::test]
async fn walker_is_idempotent() {
    let stub = StubDiscovery::new(
        &["a"],
        &[("a", "users", false), ("a", "user_summary", true)],
    );

    let first = discover_catalog(&stub).await.unwrap();
    let second = discover_catalog(&stub).await.unwrap();

    assert_eq!(first, second);
    assert_eq!(stub.list_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn walker_yields_empty_catalog_for_empty_scope() {
    let stub = StubDiscovery::new(&[], &[]);

    let catalog = discover_catalog(&stub).await.unwrap();

    assert!(catalog.is_empty());
    assert_eq!(stub.list_calls.load(Ordering::SeqCst), 0);
}
