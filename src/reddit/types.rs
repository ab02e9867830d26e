use serde::Deserialize;

use crate::facts::RawPost;

/// Connection settings for the Reddit API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedditConfig {
    pub client_id: String,
    pub client_secret: String,
    pub user_agent: String,
    /// Host that issues OAuth tokens, e.g. `https://www.reddit.com`.
    pub auth_url: String,
    /// Host serving authenticated API calls, e.g. `https://oauth.reddit.com`.
    pub api_url: String,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: Option<String>,
    pub expires_in: Option<u64>,
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Listing {
    pub data: ListingData,
}

#[derive(Debug, Deserialize)]
pub struct ListingData {
    #[serde(default)]
    pub children: Vec<Thing>,
    pub after: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct Thing {
    pub kind: String,
    pub data: serde_json::Value,
}

/// The subset of a `t3` (link) object we care about.
#[derive(Debug, Deserialize)]
pub struct LinkData {
    pub title: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub over_18: bool,
}

impl From<LinkData> for RawPost {
    fn from(link: LinkData) -> Self {
        Self {
            title: link.title,
            url: link.url,
            score: link.score,
            is_explicit: link.over_18,
        }
    }
}
