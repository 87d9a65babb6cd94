//! Catalog data structures produced by discovery.

use serde::{Deserialize, Serialize};

/// A discoverable table or view within a schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDescriptor {
    /// Unqualified table name
    pub name: String,
    /// Whether the object is a view rather than a base table
    pub is_view: bool,
}

impl TableDescriptor {
    /// Creates a new descriptor.
    pub fn new(name: impl Into<String>, is_view: bool) -> Self {
        Self {
            name: name.into(),
            is_view,
        }
    }
}

/// One discovered stream, addressable by `tap_stream_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Unique stream identifier, `<schema>-<table>`
    pub tap_stream_id: String,
    /// Schema (dataset) the object lives in
    pub schema_name: String,
    /// Unqualified object name
    pub table_name: String,
    /// Whether the object is a view
    pub is_view: bool,
}

impl CatalogEntry {
    /// Creates an entry for an object discovered in a schema.
    pub fn new(schema_name: impl Into<String>, table: &TableDescriptor) -> Self {
        let schema_name = schema_name.into();
        Self {
            tap_stream_id: format!("{}-{}", schema_name, table.name),
            table_name: table.name.clone(),
            is_view: table.is_view,
            schema_name,
        }
    }
}

/// The complete discovery output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    /// Discovered streams, in schema order then driver order
    pub streams: Vec<CatalogEntry>,
}

impl Catalog {
    /// Number of discovered streams.
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Whether discovery found no streams.
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_entry_stream_id() {
        let table = TableDescriptor::new("events", false);
        let entry = CatalogEntry::new("analytics", &table);
        assert_eq!(entry.tap_stream_id, "analytics-events");
        assert_eq!(entry.schema_name, "analytics");
        assert_eq!(entry.table_name, "events");
        assert!(!entry.is_view);
    }

    #[test]
    fn test_catalog_serialization() {
        let catalog = Catalog {
            streams: vec![CatalogEntry::new(
                "analytics",
                &TableDescriptor::new("daily_rollup", true),
            )],
        };

        let json = serde_json::to_string(&catalog).unwrap();
        assert!(json.contains("\"tap_stream_id\":\"analytics-daily_rollup\""));
        assert!(json.contains("\"is_view\":true"));

        let parsed: Catalog = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, catalog);
    }
}
