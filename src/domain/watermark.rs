//! Resume point of an incremental run

use serde_json::Value;

use super::status::{StatusId, StatusRecord};
use super::DomainError;

/// Highest ingested status id plus the author it belonged to
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Watermark {
    since_id: Option<StatusId>,
    author: Option<String>,
    created_at: Option<String>,
}

impl Watermark {
    /// No resume point: every status is new
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(since_id: StatusId, author: Option<String>) -> Self {
        Self {
            since_id: Some(since_id),
            author,
            created_at: None,
        }
    }

    /// Derive the watermark from the most recent stored status
    pub fn from_last_status(status: &StatusRecord) -> Result<Self, DomainError> {
        Ok(Self {
            since_id: Some(status.id()?),
            author: status.author().map(str::to_string),
            created_at: status.created_at().map(|v| match v {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            }),
        })
    }

    pub fn since_id(&self) -> Option<StatusId> {
        self.since_id
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    pub fn created_at(&self) -> Option<&str> {
        self.created_at.as_deref()
    }

    pub fn is_none(&self) -> bool {
        self.since_id.is_none()
    }

    /// Whether a status with this id is newer than the watermark
    pub fn admits(&self, id: StatusId) -> bool {
        self.since_id.is_none_or(|since| id > since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status::Platform;
    use serde_json::json;

    #[test]
    fn test_none_admits_everything() {
        let watermark = Watermark::none();
        assert!(watermark.is_none());
        assert!(watermark.admits(StatusId::new(0)));
        assert!(watermark.admits(StatusId::new(u64::MAX)));
    }

    #[test]
    fn test_admits_only_strictly_newer() {
        let watermark = Watermark::new(StatusId::new(100), None);
        assert!(!watermark.admits(StatusId::new(99)));
        assert!(!watermark.admits(StatusId::new(100)));
        assert!(watermark.admits(StatusId::new(101)));
    }

    #[test]
    fn test_from_last_tweet() {
        let status = StatusRecord::new(
            Platform::Twitter,
            json!({
                "id": "1001",
                "created_at": "Wed Oct 10 20:19:24 +0000 2018",
                "user": {"screen_name": "alice"}
            }),
        )
        .unwrap();

        let watermark = Watermark::from_last_status(&status).unwrap();
        assert_eq!(watermark.since_id(), Some(StatusId::new(1001)));
        assert_eq!(watermark.author(), Some("alice"));
        assert_eq!(
            watermark.created_at(),
            Some("Wed Oct 10 20:19:24 +0000 2018")
        );
    }

    #[test]
    fn test_from_last_toot() {
        let status = StatusRecord::detect(json!({
            "id": "109",
            "created_at": "2022-11-05T10:00:00.000Z",
            "account": {"fqn": "alice@example.social"}
        }))
        .unwrap();

        let watermark = Watermark::from_last_status(&status).unwrap();
        assert_eq!(watermark.since_id(), Some(StatusId::new(109)));
        assert_eq!(watermark.author(), Some("alice@example.social"));
    }

    #[test]
    fn test_from_last_status_without_author() {
        let status = StatusRecord::detect(json!({"id": 5})).unwrap();
        let watermark = Watermark::from_last_status(&status).unwrap();
        assert_eq!(watermark.author(), None);
    }
}
