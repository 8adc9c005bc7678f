use thiserror::Error;

/// A single document the store refused during a bulk write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedWrite {
    pub id: String,
    pub reason: String,
}

impl FailedWrite {
    pub fn new(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            reason: reason.into(),
        }
    }
}

/// Core domain errors
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Invalid source: {message}")]
    InvalidSource { message: String },

    #[error("Malformed archive {path}: {message}")]
    MalformedArchive { path: String, message: String },

    #[error("Identity mismatch: incoming status belongs to '{found}', expected '{expected}'")]
    IdentityMismatch { expected: String, found: String },

    #[error("Missing identity: {message}")]
    MissingIdentity { message: String },

    #[error("Unparseable created_at {value:?} on status {id}")]
    TimestampParse { id: String, value: String },

    #[error("Rate limited by {provider}")]
    RateLimited { provider: String },

    #[error("Index not found: {index}")]
    IndexNotFound { index: String },

    #[error("Store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Bulk write failed for {}", describe_bulk_failure(.written, .failures))]
    BulkWrite {
        /// Statuses written during the whole run, including earlier chunks
        written: usize,
        failures: Vec<FailedWrite>,
    },

    #[error("Connection error: {message}")]
    Connection { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    #[error("Provider error: {provider} - {message}")]
    Provider { provider: String, message: String },

    #[error("Credential error: {message}")]
    Credential { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("I/O error on {path}: {message}")]
    Io { path: String, message: String },
}

fn describe_bulk_failure(written: &usize, failures: &[FailedWrite]) -> String {
    let first = failures
        .first()
        .map(|f| format!(" (first: status {}: {})", f.id, f.reason))
        .unwrap_or_default();

    let noun = if failures.len() == 1 { "status" } else { "statuses" };
    format!(
        "{} {}, {} written so far{}",
        failures.len(),
        noun,
        written,
        first
    )
}

impl DomainError {
    pub fn invalid_source(message: impl Into<String>) -> Self {
        Self::InvalidSource {
            message: message.into(),
        }
    }

    pub fn malformed_archive(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedArchive {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn identity_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::IdentityMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    pub fn missing_identity(message: impl Into<String>) -> Self {
        Self::MissingIdentity {
            message: message.into(),
        }
    }

    pub fn timestamp_parse(id: impl Into<String>, value: impl Into<String>) -> Self {
        Self::TimestampParse {
            id: id.into(),
            value: value.into(),
        }
    }

    pub fn rate_limited(provider: impl Into<String>) -> Self {
        Self::RateLimited {
            provider: provider.into(),
        }
    }

    pub fn index_not_found(index: impl Into<String>) -> Self {
        Self::IndexNotFound {
            index: index.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn provider(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Provider {
            provider: provider.into(),
            message: message.into(),
        }
    }

    pub fn credential(message: impl Into<String>) -> Self {
        Self::Credential {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn io(path: impl std::fmt::Display, error: std::io::Error) -> Self {
        Self::Io {
            path: path.to_string(),
            message: error.to_string(),
        }
    }

    /// Whether the provider asked us to slow down
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
