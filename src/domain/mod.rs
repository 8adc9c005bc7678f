//! Domain layer - Statuses, sources, identity and the traits the
//! infrastructure implements

pub mod credentials;
pub mod error;
pub mod identity;
pub mod remote;
pub mod retry;
pub mod source;
pub mod status;
pub mod store;
pub mod watermark;

pub use credentials::{Credential, CredentialProvider, CredentialType};
pub use error::{DomainError, FailedWrite};
pub use identity::{IdentityMode, IdentityReconciler};
pub use remote::{MastodonApi, TimelineKind, TimelineQuery, TwitterApi};
pub use retry::{retry_on_rate_limit, RetryPolicy, Sleeper, TokioSleeper};
pub use source::SourceDescriptor;
pub use status::{parse_created_at, Platform, StatusId, StatusRecord};
pub use store::{BulkAction, BulkWriteResult, StatusStore};
pub use watermark::Watermark;
