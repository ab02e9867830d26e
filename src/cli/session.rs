//! Interactive handling of one fetched batch.

use anyhow::Result;
use std::io::{self, Write};
use std::path::Path;
use tracing::{error, warn};

use crate::cli::prompt::{BatchAction, FactAction, Prompter};
use crate::facts::FactRecord;
use crate::output::{EmailSender, FactFile, OutputError, unique_path};

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ReviewOutcome {
    /// Facts the user chose to keep, in review order.
    pub saved: Vec<FactRecord>,
    pub exited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    Saved(std::path::PathBuf),
    Emailed(std::path::PathBuf),
    Quit,
}

/// Walk through the facts one by one. Emails go out immediately; saved facts
/// are returned so the caller can write them in one go.
pub async fn review_facts<P: Prompter, W: Write>(
    prompter: &mut P,
    out: &mut W,
    facts: &[FactRecord],
    email: Option<&EmailSender>,
) -> Result<ReviewOutcome> {
    let mut outcome = ReviewOutcome::default();

    for (i, fact) in facts.iter().enumerate() {
        match prompter.fact_action(i + 1, fact)? {
            FactAction::Save => {
                outcome.saved.push(fact.clone());
                writeln!(out, "Fact saved.")?;
            }
            FactAction::Email => {
                let recipient = prompter.recipient()?;
                let result = send_digest(email, &recipient, std::slice::from_ref(fact)).await;
                report_email(out, result)?;
            }
            FactAction::Skip => {}
            FactAction::Exit => {
                outcome.exited = true;
                break;
            }
        }
    }

    Ok(outcome)
}

/// Offer to save the batch into a new numbered file, optionally mailing it.
pub async fn manage_batch<P: Prompter, W: Write>(
    prompter: &mut P,
    out: &mut W,
    facts: &[FactRecord],
    dir: &Path,
    file_name: &str,
    email: Option<&EmailSender>,
) -> Result<BatchOutcome> {
    let action = prompter.batch_action()?;
    if action == BatchAction::Exit {
        return Ok(BatchOutcome::Quit);
    }

    let path = unique_path(dir, file_name);
    FactFile::new(&path).write_new(facts)?;
    writeln!(out, "Facts saved to {}", path.display())?;

    if action == BatchAction::Save {
        return Ok(BatchOutcome::Saved(path));
    }

    let recipient = prompter.recipient()?;
    let result = match email {
        Some(sender) => sender.send_file(&recipient, &path).await,
        None => Err(OutputError::EmailNotConfigured),
    };
    report_email(out, result)?;

    Ok(BatchOutcome::Emailed(path))
}

async fn send_digest(
    email: Option<&EmailSender>,
    recipient: &str,
    facts: &[FactRecord],
) -> Result<(), OutputError> {
    match email {
        Some(sender) => sender.send_digest(recipient, facts).await,
        None => Err(OutputError::EmailNotConfigured),
    }
}

// A failed delivery never aborts the session
fn report_email<W: Write>(out: &mut W, result: Result<(), OutputError>) -> io::Result<()> {
    match result {
        Ok(()) => writeln!(out, "Email sent successfully!")?,
        Err(OutputError::EmailNotConfigured) => {
            warn!("{}", OutputError::EmailNotConfigured);
            writeln!(out, "Email sending failed: not configured")?;
        }
        Err(e) => {
            error!("Email sending failed: {}", e);
            writeln!(out, "Email sending failed: {}", e)?;
        }
    }
    out.flush()
}
