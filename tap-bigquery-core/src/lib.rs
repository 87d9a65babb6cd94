//! Connection and catalog-discovery primitives for the BigQuery tap.
//!
//! This crate owns the tap's own logic: selecting a credential strategy
//! and building an authenticated BigQuery client, and enumerating
//! datasets and tables into a discovery catalog. Record extraction,
//! incremental state, and protocol framing belong to the surrounding
//! extraction framework and are not implemented here.
//!
//! # Architecture
//! - `config`: the accepted configuration shape and credential defaults
//! - `connector`: credential-driven client construction
//! - `discovery`: the `CatalogDiscovery` trait, its BigQuery
//!   implementation, and the generic catalog walker
//! - `models`: catalog output types

pub mod config;
pub mod connector;
pub mod discovery;
pub mod error;
pub mod logging;
pub mod models;

// Re-export commonly used types
pub use config::{ClientSecrets, TapConfig};
pub use connector::{BigQueryConnector, CredentialSource};
pub use discovery::{
    BigQueryDiscovery, CatalogDiscovery, discover_catalog, schema_scope, strip_qualifier,
};
pub use error::{Result, TapError};
pub use logging::init_logging;
pub use models::{Catalog, CatalogEntry, TableDescriptor};
