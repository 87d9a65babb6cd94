//! BigQuery client construction.
//!
//! Credential selection follows a strict priority order: inline
//! `client_secrets` win over a `credentials_path` key file, and when
//! neither is configured the tap falls back to Application Default
//! Credentials (GOOGLE_APPLICATION_CREDENTIALS, gcloud login, or
//! GCE/GKE metadata).
//!
//! The connector performs no caching, pooling, retry, or timeout
//! handling of its own; client lifecycle belongs to the caller and
//! transport behavior to the driver.

use crate::Result;
use crate::config::TapConfig;
use gcp_bigquery_client::Client;
use gcp_bigquery_client::yup_oauth2::ServiceAccountKey;
use serde_json::Value;
use std::path::PathBuf;

/// The credential strategy selected from a config.
///
/// Selection is a pure function of the config so it can be inspected
/// and tested without touching the network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Inline service-account key material from `client_secrets`,
    /// already expanded with endpoint defaults
    Inline(Value),
    /// Service-account key file at `credentials_path`; the driver reads
    /// and parses the file itself
    KeyFile(PathBuf),
    /// Ambient credential resolution
    ApplicationDefault,
}

impl CredentialSource {
    /// Selects the credential strategy for a config, first match wins.
    pub fn from_config(config: &TapConfig) -> Self {
        if let Some(secrets) = &config.client_secrets {
            Self::Inline(secrets.credentials_info(&config.project_id))
        } else if let Some(path) = &config.credentials_path {
            Self::KeyFile(path.clone())
        } else {
            Self::ApplicationDefault
        }
    }

    /// Human-readable strategy name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Inline(_) => "inline client_secrets",
            Self::KeyFile(_) => "service-account key file",
            Self::ApplicationDefault => "application default credentials",
        }
    }
}

/// Builds authenticated BigQuery clients from a tap config.
#[derive(Debug, Clone)]
pub struct BigQueryConnector {
    config: TapConfig,
}

impl BigQueryConnector {
    /// Creates a connector for the given config.
    pub fn new(config: TapConfig) -> Self {
        Self { config }
    }

    /// The config this connector was built from.
    pub fn config(&self) -> &TapConfig {
        &self.config
    }

    /// Connects to BigQuery using the configured credential strategy.
    ///
    /// Driver and authentication errors are wrapped with context and
    /// propagated; nothing is retried here.
    ///
    /// # Errors
    /// Returns error if the key material is malformed or the driver
    /// rejects the credentials.
    pub async fn connect(&self) -> Result<Client> {
        let source = CredentialSource::from_config(&self.config);
        tracing::debug!(
            url = %self.config.connection_url(),
            strategy = source.name(),
            "Connecting to BigQuery"
        );

        let client = match source {
            CredentialSource::Inline(info) => {
                let key: ServiceAccountKey = serde_json::from_value(info).map_err(|e| {
                    crate::error::TapError::serialization(
                        "client_secrets is not a valid service-account key",
                        e,
                    )
                })?;
                Client::from_service_account_key(key, true)
                    .await
                    .map_err(|e| {
                        crate::error::TapError::connection_failed(
                            "service-account authentication from inline client_secrets",
                            e,
                        )
                    })?
            }
            CredentialSource::KeyFile(path) => {
                Client::from_service_account_key_file(&path.to_string_lossy())
                    .await
                    .map_err(|e| {
                        crate::error::TapError::connection_failed(
                            format!("service-account key file {}", path.display()),
                            e,
                        )
                    })?
            }
            CredentialSource::ApplicationDefault => Client::from_application_default_credentials()
                .await
                .map_err(|e| {
                    crate::error::TapError::connection_failed(
                        "application default credentials (set GOOGLE_APPLICATION_CREDENTIALS \
                         or run 'gcloud auth application-default login')",
                        e,
                    )
                })?,
        };

        tracing::info!(url = %self.config.connection_url(), "Connected to BigQuery");
        Ok(client)
    }
}
