//! Configuration handling for the application.
//!
//! Everything comes from environment variables (the binary loads a `.env`
//! first if one exists) with development defaults. Credentials are never
//! baked in: a missing Reddit client id only fails once the client tries to
//! authenticate, and email stays disabled until both Postmark settings exist.

use std::env;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::facts::RetainedFields;
use crate::output::EmailConfig;
use crate::reddit::RedditConfig;

/// Environment variable names.
pub const ENV_REDDIT_CLIENT_ID: &str = "REDDIT_CLIENT_ID";
pub const ENV_REDDIT_CLIENT_SECRET: &str = "REDDIT_CLIENT_SECRET";
pub const ENV_REDDIT_USER_AGENT: &str = "REDDIT_USER_AGENT";
pub const ENV_REDDIT_AUTH_URL: &str = "REDDIT_AUTH_URL";
pub const ENV_REDDIT_API_URL: &str = "REDDIT_API_URL";
pub const ENV_SUBREDDIT: &str = "TIL_SUBREDDIT";
pub const ENV_FETCH_LIMIT: &str = "TIL_FETCH_LIMIT";
pub const ENV_POLL_INTERVAL_SECS: &str = "TIL_POLL_INTERVAL_SECS";
pub const ENV_OUTPUT_PATH: &str = "TIL_OUTPUT_PATH";
pub const ENV_RETAINED_FIELDS: &str = "TIL_RETAINED_FIELDS";
pub const ENV_POSTMARK_SERVER_TOKEN: &str = "POSTMARK_SERVER_TOKEN";
pub const ENV_POSTMARK_API_URL: &str = "POSTMARK_API_URL";
pub const ENV_EMAIL_SENDER: &str = "EMAIL_SENDER";

const DEFAULT_USER_AGENT: &str = concat!("tilfetch/", env!("CARGO_PKG_VERSION"));
const DEFAULT_AUTH_URL: &str = "https://www.reddit.com";
const DEFAULT_API_URL: &str = "https://oauth.reddit.com";
const DEFAULT_SUBREDDIT: &str = "todayilearned";
const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;
const DEFAULT_OUTPUT_PATH: &str = "til_facts.txt";
const DEFAULT_POSTMARK_API_URL: &str = "https://api.postmarkapp.com";

/// Application runtime configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    reddit: RedditConfig,
    subreddit: String,
    fetch_limit: Option<u32>,
    poll_interval: Duration,
    output_path: PathBuf,
    retained_fields: RetainedFields,
    email: Option<EmailConfig>,
}

impl Default for Config {
    /// Development defaults, i.e. `from_env` with nothing set.
    fn default() -> Self {
        Self {
            reddit: RedditConfig {
                client_id: String::new(),
                client_secret: String::new(),
                user_agent: DEFAULT_USER_AGENT.to_string(),
                auth_url: DEFAULT_AUTH_URL.to_string(),
                api_url: DEFAULT_API_URL.to_string(),
            },
            subreddit: DEFAULT_SUBREDDIT.to_string(),
            fetch_limit: None,
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            retained_fields: RetainedFields::default(),
            email: None,
        }
    }
}

impl Config {
    /// Load from environment variables, falling back to development defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let reddit = RedditConfig {
            client_id: env_or(ENV_REDDIT_CLIENT_ID, ""),
            client_secret: env_or(ENV_REDDIT_CLIENT_SECRET, ""),
            user_agent: env_or(ENV_REDDIT_USER_AGENT, DEFAULT_USER_AGENT),
            auth_url: env_or(ENV_REDDIT_AUTH_URL, DEFAULT_AUTH_URL),
            api_url: env_or(ENV_REDDIT_API_URL, DEFAULT_API_URL),
        };

        let fetch_limit: Option<u32> = parse_env(ENV_FETCH_LIMIT, "fetch_limit")?;
        if fetch_limit == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "fetch_limit",
                reason: "must be at least 1".to_string(),
            });
        }

        let poll_interval_secs = parse_env(ENV_POLL_INTERVAL_SECS, "poll_interval_secs")?
            .unwrap_or(DEFAULT_POLL_INTERVAL_SECS);

        let retained_fields = match env::var(ENV_RETAINED_FIELDS) {
            Ok(raw) => raw.parse().map_err(|e| ConfigError::InvalidValue {
                field: "retained_fields",
                reason: format!("{}", e),
            })?,
            Err(_) => RetainedFields::default(),
        };

        let email = match (
            env::var(ENV_POSTMARK_SERVER_TOKEN).ok().filter(|v| !v.is_empty()),
            env::var(ENV_EMAIL_SENDER).ok().filter(|v| !v.is_empty()),
        ) {
            (Some(server_token), Some(sender)) => Some(EmailConfig {
                server_token,
                sender,
                api_url: env_or(ENV_POSTMARK_API_URL, DEFAULT_POSTMARK_API_URL),
            }),
            _ => None,
        };

        Ok(Self {
            reddit,
            subreddit: env_or(ENV_SUBREDDIT, DEFAULT_SUBREDDIT),
            fetch_limit,
            poll_interval: Duration::from_secs(poll_interval_secs),
            output_path: PathBuf::from(env_or(ENV_OUTPUT_PATH, DEFAULT_OUTPUT_PATH)),
            retained_fields,
            email,
        })
    }

    /// Reddit API connection settings.
    pub fn reddit(&self) -> &RedditConfig {
        &self.reddit
    }
    /// Community polled each cycle.
    pub fn subreddit(&self) -> &str {
        &self.subreddit
    }
    /// Maximum number of posts requested per cycle, `None` to use the
    /// command's own default.
    pub fn fetch_limit(&self) -> Option<u32> {
        self.fetch_limit
    }
    /// Pause between two fetch cycles.
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }
    /// Fact file the `watch` and `review` commands append to.
    pub fn output_path(&self) -> &Path {
        &self.output_path
    }
    pub fn retained_fields(&self) -> RetainedFields {
        self.retained_fields
    }
    /// Postmark settings, `None` when email is not configured.
    pub fn email(&self) -> Option<&EmailConfig> {
        self.email.as_ref()
    }

    pub fn with_subreddit(mut self, subreddit: impl Into<String>) -> Self {
        self.subreddit = subreddit.into();
        self
    }

    pub fn with_fetch_limit(mut self, limit: u32) -> Self {
        self.fetch_limit = Some(limit.max(1));
        self
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    pub fn with_retained_fields(mut self, fields: RetainedFields) -> Self {
        self.retained_fields = fields;
        self
    }
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse an optional variable; unset yields `None`, garbage an error.
fn parse_env<T>(key: &str, field: &'static str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                field,
                reason: format!("{:?}: {}", raw, e),
            }),
        Err(_) => Ok(None),
    }
}

/// Errors that can occur while building a configuration.
#[derive(Debug)]
pub enum ConfigError {
    InvalidValue { field: &'static str, reason: String },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue { field, reason } => {
                write!(f, "invalid value for '{}': {}", field, reason)
            }
        }
    }
}

impl Error for ConfigError {}
