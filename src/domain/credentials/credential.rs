use std::fmt;

/// Which remote platform a credential authenticates against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CredentialType {
    Twitter,
    Mastodon,
}

impl fmt::Display for CredentialType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CredentialType::Twitter => write!(f, "twitter"),
            CredentialType::Mastodon => write!(f, "mastodon"),
        }
    }
}

/// Access token of one platform
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    /// App bearer token; the API defaults to api.twitter.com
    Twitter {
        bearer_token: String,
        api_base_url: Option<String>,
    },
    /// User access token, only valid against the instance that issued it
    Mastodon {
        access_token: String,
        api_base_url: String,
    },
}

impl Credential {
    pub fn twitter(bearer_token: impl Into<String>) -> Self {
        Self::Twitter {
            bearer_token: bearer_token.into(),
            api_base_url: None,
        }
    }

    pub fn mastodon(api_base_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self::Mastodon {
            access_token: access_token.into(),
            api_base_url: api_base_url.into(),
        }
    }

    /// Point a Twitter credential at another API host; Mastodon credentials
    /// keep their instance
    pub fn with_api_base_url(self, url: impl Into<String>) -> Self {
        match self {
            Self::Twitter { bearer_token, .. } => Self::Twitter {
                bearer_token,
                api_base_url: Some(url.into()),
            },
            mastodon @ Self::Mastodon { .. } => mastodon,
        }
    }

    pub fn credential_type(&self) -> CredentialType {
        match self {
            Self::Twitter { .. } => CredentialType::Twitter,
            Self::Mastodon { .. } => CredentialType::Mastodon,
        }
    }

    pub fn token(&self) -> &str {
        match self {
            Self::Twitter { bearer_token, .. } => bearer_token,
            Self::Mastodon { access_token, .. } => access_token,
        }
    }

    pub fn api_base_url(&self) -> Option<&str> {
        match self {
            Self::Twitter { api_base_url, .. } => api_base_url.as_deref(),
            Self::Mastodon { api_base_url, .. } => Some(api_base_url),
        }
    }
}

// Tokens stay out of logs
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("type", &self.credential_type())
            .field("api_base_url", &self.api_base_url())
            .field("token", &"<redacted>")
            .finish()
    }
}
