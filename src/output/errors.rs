use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("io error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("email is not configured (set POSTMARK_SERVER_TOKEN and EMAIL_SENDER)")]
    EmailNotConfigured,

    #[error("invalid recipient address: {0:?}")]
    InvalidRecipient(String),

    #[error("email request failed: {0}")]
    Request(String),

    #[error("email rejected ({status}): {message}")]
    EmailRejected {
        status: reqwest::StatusCode,
        message: String,
    },
}

impl OutputError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
