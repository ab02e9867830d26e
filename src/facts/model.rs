use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A post as delivered by the post source. Read-only to the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawPost {
    pub title: String,
    pub url: String,
    pub score: i64,
    pub is_explicit: bool,
}

impl RawPost {
    pub fn new(title: impl Into<String>, url: impl Into<String>, score: i64, is_explicit: bool) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            score,
            is_explicit,
        }
    }
}

/// A normalized fact ready for the output sinks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactRecord {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<i64>,
}

impl FactRecord {
    /// Build a record from an accepted post and its normalized title.
    ///
    /// Returns `None` when `text` is empty, which is how the normalizer marks
    /// a title as unusable.
    pub fn assemble(post: &RawPost, text: String, fields: RetainedFields) -> Option<Self> {
        if text.is_empty() {
            return None;
        }

        Some(Self {
            text,
            source_url: fields.url.then(|| post.url.clone()),
            score: fields.score.then_some(post.score),
        })
    }
}

/// Which pass-through post fields end up on a [`FactRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetainedFields {
    pub url: bool,
    pub score: bool,
}

impl RetainedFields {
    pub const ALL: Self = Self {
        url: true,
        score: true,
    };

    pub const NONE: Self = Self {
        url: false,
        score: false,
    };
}

impl Default for RetainedFields {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown field '{0}' (expected url, score or none)")]
pub struct UnknownField(pub String);

impl FromStr for RetainedFields {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut fields = Self::NONE;

        for part in s.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            match part.to_ascii_lowercase().as_str() {
                "url" => fields.url = true,
                "score" => fields.score = true,
                "none" => {}
                _ => return Err(UnknownField(part.to_string())),
            }
        }

        Ok(fields)
    }
}

impl Display for RetainedFields {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.url, self.score) {
            (true, true) => write!(f, "url,score"),
            (true, false) => write!(f, "url"),
            (false, true) => write!(f, "score"),
            (false, false) => write!(f, "none"),
        }
    }
}
