//! Error types for connection and discovery failures.
//!
//! Credential material (private keys, service-account JSON, key file
//! contents) is never embedded in error messages. Errors are propagated
//! as-is to the caller; no retry or recovery happens at this layer.

use thiserror::Error;

/// Main error type for tap operations.
#[derive(Debug, Error)]
pub enum TapError {
    /// BigQuery client construction or authentication failed
    #[error("BigQuery connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Schema or table discovery failed
    #[error("Catalog discovery failed: {context}")]
    Discovery {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Configuration or validation error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Convenience type alias for Results with TapError
pub type Result<T> = std::result::Result<T, TapError>;

impl TapError {
    /// Creates a connection error with context
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Connection {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a discovery error with context
    pub fn discovery_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Discovery {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Creates a serialization error with context
    pub fn serialization(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Serialization {
            context: context.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let error = TapError::configuration("project_id cannot be empty");
        assert!(error.to_string().contains("project_id cannot be empty"));

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let error = TapError::io("reading config file", io);
        assert!(error.to_string().contains("reading config file"));
    }

    #[test]
    fn test_connection_error_omits_source_in_display() {
        let inner = std::io::Error::other("private_key=SECRET");
        let error = TapError::connection_failed("service account authentication", inner);

        // Display shows only the context; the source stays behind the
        // Error::source() chain.
        assert_eq!(
            error.to_string(),
            "BigQuery connection failed: service account authentication"
        );
    }
}
