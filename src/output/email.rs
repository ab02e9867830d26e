use base64::{Engine, engine::general_purpose::STANDARD};
use reqwest::{Client, ClientBuilder};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{info, instrument, warn};

use crate::facts::FactRecord;
use crate::output::errors::OutputError;

pub const SUBJECT: &str = "Today's Interesting Facts";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Postmark account settings used to deliver fact emails.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailConfig {
    pub server_token: String,
    pub sender: String,
    pub api_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkMessage<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<PostmarkAttachment>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkAttachment {
    name: String,
    content: String,
    content_type: &'static str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct PostmarkResponse {
    #[serde(default)]
    error_code: i64,
    #[serde(default)]
    message: String,
}

/// Plain-text body listing every fact with its source.
pub fn compose_digest(facts: &[FactRecord]) -> String {
    let mut body = format!("{}:\n\n", SUBJECT);
    for (i, fact) in facts.iter().enumerate() {
        body.push_str(&format!("{}. {}\n", i + 1, fact.text));
        if let Some(url) = &fact.source_url {
            body.push_str(&format!("   Source: {}\n", url));
        }
        body.push('\n');
    }
    body
}

pub struct EmailSender {
    http: Client,
    config: EmailConfig,
}

impl EmailSender {
    pub fn new(config: EmailConfig) -> Result<Self, OutputError> {
        let http = ClientBuilder::new()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| OutputError::Request(e.to_string()))?;

        Ok(Self { http, config })
    }

    /// Mail the facts inline as a numbered digest.
    #[instrument(skip(self, facts), fields(count = facts.len()))]
    pub async fn send_digest(&self, recipient: &str, facts: &[FactRecord]) -> Result<(), OutputError> {
        let recipient = validate_recipient(recipient)?;

        self.deliver(PostmarkMessage {
            from: &self.config.sender,
            to: recipient,
            subject: SUBJECT,
            text_body: compose_digest(facts),
            attachments: Vec::new(),
        })
        .await
    }

    /// Mail a saved fact file as an attachment.
    #[instrument(skip(self, path), fields(path = %path.display()))]
    pub async fn send_file(&self, recipient: &str, path: &Path) -> Result<(), OutputError> {
        let recipient = validate_recipient(recipient)?;

        let contents = tokio::fs::read(path)
            .await
            .map_err(|e| OutputError::io(path, e))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "til_facts.txt".to_string());

        self.deliver(PostmarkMessage {
            from: &self.config.sender,
            to: recipient,
            subject: SUBJECT,
            text_body: format!("{} are attached.\n", SUBJECT),
            attachments: vec![PostmarkAttachment {
                name,
                content: STANDARD.encode(contents),
                content_type: "text/plain",
            }],
        })
        .await
    }

    async fn deliver(&self, message: PostmarkMessage<'_>) -> Result<(), OutputError> {
        let url = format!("{}/email", self.config.api_url.trim_end_matches('/'));

        let response = self
            .http
            .post(url)
            .header("X-Postmark-Server-Token", &self.config.server_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&message)
            .send()
            .await
            .map_err(|e| OutputError::Request(e.to_string()))?;

        let status = response.status();
        let body: PostmarkResponse = response.json().await.unwrap_or_default();

        if !status.is_success() || body.error_code != 0 {
            warn!(
                "Postmark rejected email to {} (status {}, code {}): {}",
                message.to, status, body.error_code, body.message
            );
            return Err(OutputError::EmailRejected {
                status,
                message: body.message,
            });
        }

        info!("Email sent to {}", message.to);
        Ok(())
    }
}

fn validate_recipient(recipient: &str) -> Result<&str, OutputError> {
    let trimmed = recipient.trim();
    let valid = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !trimmed.contains(char::is_whitespace)
        }
        None => false,
    };

    if valid {
        Ok(trimmed)
    } else {
        Err(OutputError::InvalidRecipient(recipient.to_string()))
    }
}
