//! Author identity reconciliation
//!
//! One run only ever writes statuses of a single author into an index.
//! The reconciler checks every produced status against the author already
//! established for the run and fills in the author on archive shapes that
//! do not embed one.

use tracing::debug;

use super::status::StatusRecord;
use super::DomainError;

/// How strictly a source's statuses must match the run's author
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdentityMode {
    /// Statuses naming another author are rejected
    #[default]
    Strict,
    /// Statuses may belong to anyone (favorites, likes); only a missing
    /// author is still an error
    Relaxed,
}

/// Per-run identity state
#[derive(Debug, Clone, Default)]
pub struct IdentityReconciler {
    established: Option<String>,
    fallback: Option<String>,
}

impl IdentityReconciler {
    /// Build the run identity from the index's last author and an optional
    /// caller-supplied override.
    ///
    /// The override doubles as the fallback author for statuses without one.
    /// When both are known they must agree.
    pub fn new(
        index_author: Option<String>,
        override_author: Option<String>,
    ) -> Result<Self, DomainError> {
        if let (Some(indexed), Some(declared)) = (&index_author, &override_author) {
            if indexed != declared {
                return Err(DomainError::identity_mismatch(indexed, declared));
            }
        }

        Ok(Self {
            established: index_author.or_else(|| override_author.clone()),
            fallback: override_author,
        })
    }

    /// Author every status of this run must belong to, if known
    pub fn established(&self) -> Option<&str> {
        self.established.as_deref()
    }

    pub fn fallback(&self) -> Option<&str> {
        self.fallback.as_deref()
    }

    /// Fail early when a remote handle cannot belong to this run
    pub fn check_handle(&self, handle: &str) -> Result<(), DomainError> {
        match self.established() {
            Some(expected) if expected != handle => {
                Err(DomainError::identity_mismatch(expected, handle))
            }
            _ => Ok(()),
        }
    }

    /// Validate or synthesize the author of one status
    pub fn reconcile(
        &self,
        record: StatusRecord,
        mode: IdentityMode,
    ) -> Result<StatusRecord, DomainError> {
        if let Some(author) = record.author() {
            if mode == IdentityMode::Strict {
                if let Some(expected) = self.established() {
                    if expected != author {
                        return Err(DomainError::identity_mismatch(expected, author));
                    }
                }
            }

            return Ok(record);
        }

        match self.fallback() {
            Some(fallback) => {
                debug!(author = fallback, "Injecting author into status");
                Ok(record.with_author(fallback))
            }
            None => Err(DomainError::missing_identity(format!(
                "status {} has no {}.{} and no screen name was provided",
                record
                    .document_id()
                    .unwrap_or_else(|_| "<unknown>".to_string()),
                record.platform().author_container(),
                record.platform().author_key()
            ))),
        }
    }
}
