//! Source descriptor grammar
//!
//! A single string picks the loading strategy. Rules are ordered and the
//! first match wins:
//!
//! 1. `api:<handle>` - Twitter user timeline
//! 2. `api-fav:<handle>` - Twitter favorites
//! 3. `masto-api:<user@instance>` - Mastodon account statuses
//! 4. `tweet.js`, `tweets.js`, `tweets-part*` - single-file archive
//! 5. `*.jl`, `*.jsonl` - one JSON status per line
//! 6. a directory - monthly archive files
//! 7. `like.js` - liked status ids, looked up remotely

use std::fmt;
use std::path::{Path, PathBuf};

use super::identity::IdentityMode;
use super::status::Platform;
use super::DomainError;

const SINGLE_ARCHIVE_PREFIXES: &[&str] = &["tweet.js", "tweets.js", "tweets-part"];
const LINE_DELIMITED_EXTENSIONS: &[&str] = &["jl", "jsonl"];
const LIKES_ARCHIVE_NAME: &str = "like.js";

/// Classified source, one variant per loading strategy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceDescriptor {
    Timeline { handle: String },
    Favorites { handle: String },
    MastodonStatuses { account: String },
    SingleFileArchive(PathBuf),
    LineDelimited(PathBuf),
    MonthlyArchiveDir(PathBuf),
    LikesArchive(PathBuf),
}

impl SourceDescriptor {
    /// Classify a descriptor, probing the filesystem for directories
    pub fn classify(descriptor: &str) -> Result<Self, DomainError> {
        Self::classify_with(descriptor, |path| path.is_dir())
    }

    /// Classify with an injected directory probe
    pub fn classify_with(
        descriptor: &str,
        is_dir: impl Fn(&Path) -> bool,
    ) -> Result<Self, DomainError> {
        if let Some(handle) = descriptor.strip_prefix("api:") {
            return Ok(Self::Timeline {
                handle: required_handle(descriptor, handle)?,
            });
        }

        if let Some(handle) = descriptor.strip_prefix("api-fav:") {
            return Ok(Self::Favorites {
                handle: required_handle(descriptor, handle)?,
            });
        }

        if let Some(account) = descriptor.strip_prefix("masto-api:") {
            return Ok(Self::MastodonStatuses {
                account: required_handle(descriptor, account)?,
            });
        }

        let path = Path::new(descriptor);
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        if SINGLE_ARCHIVE_PREFIXES
            .iter()
            .any(|prefix| file_name.starts_with(prefix))
        {
            return Ok(Self::SingleFileArchive(path.to_path_buf()));
        }

        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default();

        if LINE_DELIMITED_EXTENSIONS.contains(&extension) {
            return Ok(Self::LineDelimited(path.to_path_buf()));
        }

        if is_dir(path) {
            return Ok(Self::MonthlyArchiveDir(path.to_path_buf()));
        }

        if file_name == LIKES_ARCHIVE_NAME {
            return Ok(Self::LikesArchive(path.to_path_buf()));
        }

        Err(DomainError::invalid_source(format!(
            "'{}' is not a supported source; expected an archive file (tweet.js, tweets.js, \
             tweets-part*.js, like.js), a .jl/.jsonl file, an archive directory, \
             api:<handle>, api-fav:<handle> or masto-api:<user@instance>",
            descriptor
        )))
    }

    /// Platform whose payload shape this source yields
    pub fn platform(&self) -> Platform {
        match self {
            Self::MastodonStatuses { .. } => Platform::Mastodon,
            _ => Platform::Twitter,
        }
    }

    /// Favorites and likes carry other people's statuses
    pub fn identity_mode(&self) -> IdentityMode {
        match self {
            Self::Favorites { .. } | Self::LikesArchive(_) => IdentityMode::Relaxed,
            _ => IdentityMode::Strict,
        }
    }

    /// Handle named by a remote descriptor
    pub fn remote_handle(&self) -> Option<&str> {
        match self {
            Self::Timeline { handle } | Self::Favorites { handle } => Some(handle),
            Self::MastodonStatuses { account } => Some(account),
            _ => None,
        }
    }

    /// Short strategy name for logs
    pub fn strategy_name(&self) -> &'static str {
        match self {
            Self::Timeline { .. } => "timeline",
            Self::Favorites { .. } => "favorites",
            Self::MastodonStatuses { .. } => "mastodon",
            Self::SingleFileArchive(_) => "archive",
            Self::LineDelimited(_) => "jsonl",
            Self::MonthlyArchiveDir(_) => "monthly-archive",
            Self::LikesArchive(_) => "likes",
        }
    }
}

impl fmt::Display for SourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeline { handle } => write!(f, "api:{}", handle),
            Self::Favorites { handle } => write!(f, "api-fav:{}", handle),
            Self::MastodonStatuses { account } => write!(f, "masto-api:{}", account),
            Self::SingleFileArchive(path)
            | Self::LineDelimited(path)
            | Self::MonthlyArchiveDir(path)
            | Self::LikesArchive(path) => write!(f, "{}", path.display()),
        }
    }
}

fn required_handle(descriptor: &str, handle: &str) -> Result<String, DomainError> {
    let handle = handle.trim();

    if handle.is_empty() {
        return Err(DomainError::invalid_source(format!(
            "'{}' is missing a handle",
            descriptor
        )));
    }

    Ok(handle.to_string())
}
