//! Normalized status records
//!
//! Every loader strategy turns its native record shape into a
//! [`StatusRecord`]; the ingester only ever sees this type.

mod record;
mod timestamp;

pub use record::{Platform, StatusId, StatusRecord};
pub use timestamp::{ISO_LAYOUT, TWITTER_LAYOUT, parse_created_at};
