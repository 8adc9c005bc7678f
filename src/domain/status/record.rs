use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::DomainError;

/// Origin platform of a status, which decides where the author lives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    /// Tweets: author under `user.screen_name`
    Twitter,
    /// Toots: author under `account.fqn`
    Mastodon,
}

impl Platform {
    /// Object holding the author descriptor
    pub fn author_container(&self) -> &'static str {
        match self {
            Self::Twitter => "user",
            Self::Mastodon => "account",
        }
    }

    /// Key of the author handle inside [`Self::author_container`]
    pub fn author_key(&self) -> &'static str {
        match self {
            Self::Twitter => "screen_name",
            Self::Mastodon => "fqn",
        }
    }

    /// Guess the platform of a stored document
    pub fn detect(fields: &Map<String, Value>) -> Self {
        if fields.get("account").is_some_and(Value::is_object) {
            Self::Mastodon
        } else {
            Self::Twitter
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Twitter => write!(f, "twitter"),
            Self::Mastodon => write!(f, "mastodon"),
        }
    }
}

/// Platform-assigned, monotonically increasing status identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatusId(u64);

impl StatusId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }

    /// Read an id encoded either as a JSON number or a numeric string
    pub fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_u64().map(Self),
            Value::String(s) => s.trim().parse().ok().map(Self),
            _ => None,
        }
    }
}

impl fmt::Display for StatusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for StatusId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse()
            .map(Self)
            .map_err(|_| DomainError::validation(format!("Invalid status id: '{}'", s)))
    }
}

impl From<u64> for StatusId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Platform-agnostic status: opaque payload fields plus typed accessors
/// for the handful of fields the pipeline reasons about.
#[derive(Debug, Clone, PartialEq)]
pub struct StatusRecord {
    platform: Platform,
    fields: Map<String, Value>,
}

impl StatusRecord {
    /// Wrap a JSON object coming from a known platform
    pub fn new(platform: Platform, value: Value) -> Result<Self, DomainError> {
        match value {
            Value::Object(fields) => Ok(Self { platform, fields }),
            other => Err(DomainError::validation(format!(
                "Expected a status object, got {}",
                json_kind(&other)
            ))),
        }
    }

    /// Wrap a JSON object whose platform is inferred from its shape
    pub fn detect(value: Value) -> Result<Self, DomainError> {
        match value {
            Value::Object(fields) => Ok(Self {
                platform: Platform::detect(&fields),
                fields,
            }),
            other => Err(DomainError::validation(format!(
                "Expected a status object, got {}",
                json_kind(&other)
            ))),
        }
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Numeric id used for watermark comparisons
    pub fn id(&self) -> Result<StatusId, DomainError> {
        self.fields
            .get("id")
            .and_then(StatusId::from_json)
            .or_else(|| self.fields.get("id_str").and_then(StatusId::from_json))
            .ok_or_else(|| {
                DomainError::validation(format!(
                    "Status has no usable id: {}",
                    self.fields.get("id").cloned().unwrap_or(Value::Null)
                ))
            })
    }

    /// Document key in the destination index, taken verbatim from the payload
    pub fn document_id(&self) -> Result<String, DomainError> {
        match self.fields.get("id") {
            Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => self.id().map(|id| id.to_string()),
        }
    }

    pub fn created_at(&self) -> Option<&Value> {
        self.fields.get("created_at")
    }

    /// Author handle, if the payload names a non-empty one
    pub fn author(&self) -> Option<&str> {
        self.fields
            .get(self.platform.author_container())
            .and_then(|container| container.get(self.platform.author_key()))
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }

    /// Set the author handle, keeping any other fields of the author object
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        let container = self.platform.author_container();
        let key = self.platform.author_key();
        let author = Value::String(author.into());

        match self.fields.get_mut(container) {
            Some(Value::Object(obj)) => {
                obj.insert(key.to_string(), author);
            }
            _ => {
                let mut obj = Map::new();
                obj.insert(key.to_string(), author);
                self.fields.insert(container.to_string(), Value::Object(obj));
            }
        }

        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.fields.insert(key.into(), value);
    }

    /// Consume into the JSON body written to the store
    pub fn into_document(self) -> Value {
        Value::Object(self.fields)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
