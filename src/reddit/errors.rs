use thiserror::Error;

#[derive(Error, Debug)]
pub enum RedditError {
    #[error("invalid url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid subreddit name: {0:?}")]
    InvalidSubreddit(String),

    #[error("missing credentials: {0}")]
    MissingCredentials(&'static str),

    #[error("authentication rejected: {0}")]
    AuthRejected(String),

    #[error("connection failure: {0}")]
    Connect(String),

    #[error("connect timeout")]
    ConnectTimeout,

    #[error("request timeout")]
    RequestTimeout,

    #[error("http error {status}")]
    Http { status: reqwest::StatusCode },

    #[error("unexpected response body: {0}")]
    Decode(String),

    #[error("unknown: {0}")]
    Unknown(String),
}

impl RedditError {
    /// Errors that will not go away by polling again with the same config.
    pub fn is_fatal(&self) -> bool {
        match self {
            Self::InvalidUrl(_) => true,
            Self::InvalidSubreddit(_) => true,
            Self::MissingCredentials(_) => true,
            Self::AuthRejected(_) => true,
            Self::Http { status } => status.is_client_error(),

            Self::Connect(_) => false,
            Self::ConnectTimeout => false,
            Self::RequestTimeout => false,
            Self::Decode(_) => false,
            Self::Unknown(_) => false,
        }
    }

    pub fn from_reqwest_error(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            if err.is_connect() {
                Self::ConnectTimeout
            } else {
                Self::RequestTimeout
            }
        } else if let Some(status) = err.status() {
            Self::Http { status }
        } else if err.is_decode() {
            Self::Decode(err.to_string())
        } else if err.is_connect() || err.is_request() {
            Self::Connect(err.to_string())
        } else {
            Self::Unknown(err.to_string())
        }
    }
}
