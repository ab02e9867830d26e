use crate::facts::RawPost;
use crate::reddit::{
    errors::RedditError,
    source::PostSource,
    types::{LinkData, Listing, RedditConfig, TokenResponse},
};
use async_trait::async_trait;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};
use url::Url;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const DEFAULT_TOKEN_LIFETIME_SECS: u64 = 3600;
// Refresh a little before Reddit says the token expires
const TOKEN_EXPIRY_MARGIN_SECS: u64 = 60;
const MAX_LIMIT: u32 = 100;

struct CachedToken {
    value: String,
    expires_at: Instant,
}

/// Read-only Reddit client using application-only OAuth.
pub struct RedditClient {
    http: Client,
    config: RedditConfig,
    token: Mutex<Option<CachedToken>>,
}

impl RedditClient {
    pub fn new(config: RedditConfig) -> Result<Self, RedditError> {
        let http = ClientBuilder::new()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| RedditError::Unknown(e.to_string()))?;

        Ok(Self {
            http,
            config,
            token: Mutex::new(None),
        })
    }

    /// Authenticate and make one cheap API call, so bad credentials surface
    /// at start-up instead of on the first poll.
    #[instrument(skip_all)]
    pub async fn verify(&self) -> Result<(), RedditError> {
        let url = endpoint(&self.config.api_url, "subreddits/popular")?;
        let token = self.access_token().await?;

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(&[("limit", "1")])
            .send()
            .await
            .map_err(RedditError::from_reqwest_error)?;

        self.check_status(response.status()).await?;
        info!("Connected to Reddit API as {}", self.config.user_agent);
        Ok(())
    }

    #[instrument(skip_all, fields(subreddit = %subreddit, limit = limit))]
    async fn fetch_new(&self, subreddit: &str, limit: u32) -> Result<Vec<RawPost>, RedditError> {
        validate_subreddit(subreddit)?;

        let url = endpoint(&self.config.api_url, &format!("r/{}/new", subreddit))?;
        let token = self.access_token().await?;
        let limit = limit.min(MAX_LIMIT).to_string();

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .query(&[("limit", limit.as_str()), ("raw_json", "1")])
            .send()
            .await
            .map_err(RedditError::from_reqwest_error)?;

        self.check_status(response.status()).await?;

        let listing: Listing = response
            .json()
            .await
            .map_err(|e| RedditError::Decode(e.to_string()))?;

        let mut posts = Vec::with_capacity(listing.data.children.len());
        for thing in listing.data.children {
            if thing.kind != "t3" {
                debug!("Skipping listing child of kind {}", thing.kind);
                continue;
            }

            match serde_json::from_value::<LinkData>(thing.data) {
                Ok(link) => posts.push(RawPost::from(link)),
                Err(e) => warn!("Skipping malformed post in r/{}: {}", subreddit, e),
            }
        }

        debug!("Fetched {} posts from r/{}", posts.len(), subreddit);
        Ok(posts)
    }

    async fn check_status(&self, status: StatusCode) -> Result<(), RedditError> {
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            // Token may have been revoked; fetch a new one next time
            self.token.lock().await.take();
            return Err(RedditError::AuthRejected(format!("api returned {}", status)));
        }

        if !status.is_success() {
            return Err(RedditError::Http { status });
        }

        Ok(())
    }

    async fn access_token(&self) -> Result<String, RedditError> {
        let mut cached = self.token.lock().await;

        if let Some(token) = cached.as_ref()
            && token.expires_at > Instant::now()
        {
            return Ok(token.value.clone());
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *cached = Some(token);
        Ok(value)
    }

    async fn request_token(&self) -> Result<CachedToken, RedditError> {
        if self.config.client_id.is_empty() {
            return Err(RedditError::MissingCredentials("REDDIT_CLIENT_ID"));
        }
        if self.config.client_secret.is_empty() {
            return Err(RedditError::MissingCredentials("REDDIT_CLIENT_SECRET"));
        }

        let url = endpoint(&self.config.auth_url, "api/v1/access_token")?;

        let response = self
            .http
            .post(url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(RedditError::from_reqwest_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(RedditError::AuthRejected(format!(
                "token endpoint returned {}",
                status
            )));
        }
        if !status.is_success() {
            return Err(RedditError::Http { status });
        }

        let body: TokenResponse = response
            .json()
            .await
            .map_err(|e| RedditError::Decode(e.to_string()))?;

        // Reddit answers bad grants with 200 and an `error` field
        let value = match (body.access_token, body.error) {
            (Some(token), _) => token,
            (None, Some(error)) => return Err(RedditError::AuthRejected(error)),
            (None, None) => {
                return Err(RedditError::Decode(
                    "token response without access_token".to_string(),
                ));
            }
        };

        let lifetime = body
            .expires_in
            .unwrap_or(DEFAULT_TOKEN_LIFETIME_SECS)
            .saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
        debug!("Obtained access token valid for {}s", lifetime);

        Ok(CachedToken {
            value,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }
}

#[async_trait]
impl PostSource for RedditClient {
    async fn fetch_posts(&self, subreddit: &str, limit: u32) -> Result<Vec<RawPost>, RedditError> {
        self.fetch_new(subreddit, limit).await
    }
}

fn endpoint(base: &str, path: &str) -> Result<Url, RedditError> {
    Ok(Url::parse(&format!("{}/{}", base.trim_end_matches('/'), path))?)
}

fn validate_subreddit(name: &str) -> Result<(), RedditError> {
    let valid = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if valid {
        Ok(())
    } else {
        Err(RedditError::InvalidSubreddit(name.to_string()))
    }
}
