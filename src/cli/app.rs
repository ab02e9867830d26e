use anyhow::Result;
use std::io::Write;
use std::path::{Path, PathBuf};
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::cli::{
    args::Command,
    prompt::Prompter,
    session::{BatchOutcome, manage_batch, review_facts},
};
use crate::config::Config;
use crate::facts::fetch_facts;
use crate::output::{EmailSender, FactFile, print_facts};
use crate::reddit::PostSource;

const WATCH_LIMIT: u32 = 10;
const INTERACTIVE_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cycle {
    Continue,
    Stop,
}

/// Drives the fetch, present and save loop for one command.
pub struct App<S, P, W> {
    source: S,
    prompter: P,
    out: W,
    config: Config,
    email: Option<EmailSender>,
    shutdown: CancellationToken,
}

impl<S, P, W> App<S, P, W>
where
    S: PostSource,
    P: Prompter,
    W: Write,
{
    pub fn new(
        source: S,
        prompter: P,
        out: W,
        config: Config,
        email: Option<EmailSender>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            source,
            prompter,
            out,
            config,
            email,
            shutdown,
        }
    }

    /// Run `command` until it asks to stop, the token is cancelled, or after
    /// one cycle when `--once` was given.
    pub async fn run(&mut self, command: Command) -> Result<()> {
        info!(
            "Polling r/{} every {}s",
            self.config.subreddit(),
            self.config.poll_interval().as_secs()
        );

        loop {
            if self.shutdown.is_cancelled() {
                break;
            }

            let cycle = match self.cycle(command).await {
                Ok(cycle) => cycle,
                Err(e) => {
                    // Keep polling; the next cycle may succeed
                    error!("Loop error: {:#}", e);
                    Cycle::Continue
                }
            };

            if cycle == Cycle::Stop || command.once() {
                break;
            }

            tokio::select! {
                _ = self.shutdown.cancelled() => break,
                _ = sleep(self.config.poll_interval()) => {}
            }
        }

        info!("Stopped polling");
        Ok(())
    }

    async fn cycle(&mut self, command: Command) -> Result<Cycle> {
        let limit = self.config.fetch_limit().unwrap_or(match command {
            Command::Watch { .. } => WATCH_LIMIT,
            _ => INTERACTIVE_LIMIT,
        });

        let facts = fetch_facts(
            &self.source,
            self.config.subreddit(),
            limit,
            self.config.retained_fields(),
        )
        .await;

        print_facts(&mut self.out, &facts)?;

        match command {
            Command::Watch { .. } => {
                FactFile::new(self.config.output_path()).append(&facts)?;
                Ok(Cycle::Continue)
            }
            Command::Review { .. } => {
                let outcome =
                    review_facts(&mut self.prompter, &mut self.out, &facts, self.email.as_ref())
                        .await?;
                if !outcome.saved.is_empty() {
                    FactFile::new(self.config.output_path()).append(&outcome.saved)?;
                }
                if outcome.exited {
                    info!(
                        "Review left early with {} of {} facts saved",
                        outcome.saved.len(),
                        facts.len()
                    );
                }
                Ok(Cycle::Continue)
            }
            Command::Batch { .. } => {
                let (dir, file_name) = split_output_path(self.config.output_path());
                let outcome = manage_batch(
                    &mut self.prompter,
                    &mut self.out,
                    &facts,
                    &dir,
                    &file_name,
                    self.email.as_ref(),
                )
                .await?;

                Ok(match outcome {
                    BatchOutcome::Quit => Cycle::Stop,
                    BatchOutcome::Saved(_) | BatchOutcome::Emailed(_) => Cycle::Continue,
                })
            }
        }
    }
}

fn split_output_path(path: &Path) -> (PathBuf, String) {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "til_facts.txt".to_string());

    (dir, file_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::prompt::{BatchAction, FactAction};
    use crate::cli::session::tests::ScriptedPrompter;
    use crate::facts::RawPost;
    use crate::reddit::{MockPostSource, RedditError};
    use std::collections::VecDeque;
    use std::fs;
    use std::time::Duration;
    use tempfile::tempdir;

    fn batch() -> Vec<RawPost> {
        vec![
            RawPost::new("TIL that the moon has moonquakes", "http://x", 50, false),
            RawPost::new("TIL something nsfw", "http://y", 100, true),
            RawPost::new("TIL bees can count", "http://z", 12, false),
        ]
    }

    fn config(output: &Path) -> Config {
        Config::default()
            .with_subreddit("todayilearned")
            .with_output_path(output)
            .with_poll_interval(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_watch_once_appends_facts() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("til_facts.txt");

        let mut source = MockPostSource::new();
        source
            .expect_fetch_posts()
            .withf(|_, limit| *limit == WATCH_LIMIT)
            .times(1)
            .returning(|_, _| Ok(batch()));

        let mut out = Vec::new();
        {
            let mut app = App::new(
                source,
                ScriptedPrompter::default(),
                &mut out,
                config(&output),
                None,
                CancellationToken::new(),
            );
            app.run(Command::Watch { once: true }).await.unwrap();
        }

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "1. The moon has moonquakes. (Source: http://x, Score: 50)\n\
             2. Bees can count. (Source: http://z, Score: 12)\n"
        );
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.contains("Fact: The moon has moonquakes.\nSource: http://x\n"));
    }

    #[tokio::test]
    async fn test_watch_survives_source_failure() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("til_facts.txt");

        let mut source = MockPostSource::new();
        source
            .expect_fetch_posts()
            .times(1)
            .returning(|_, _| Err(RedditError::ConnectTimeout));

        let mut app = App::new(
            source,
            ScriptedPrompter::default(),
            std::io::sink(),
            config(&output),
            None,
            CancellationToken::new(),
        );
        app.run(Command::Watch { once: true }).await.unwrap();

        assert_eq!(fs::read_to_string(&output).unwrap_or_default(), "");
    }

    #[tokio::test]
    async fn test_review_saves_chosen_facts() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("til_facts.txt");

        let mut source = MockPostSource::new();
        source
            .expect_fetch_posts()
            .withf(|_, limit| *limit == INTERACTIVE_LIMIT)
            .times(1)
            .returning(|_, _| Ok(batch()));

        let prompter = ScriptedPrompter {
            fact_actions: VecDeque::from([FactAction::Skip, FactAction::Save]),
            ..Default::default()
        };

        let mut app = App::new(
            source,
            prompter,
            std::io::sink(),
            config(&output),
            None,
            CancellationToken::new(),
        );
        app.run(Command::Review { once: true }).await.unwrap();

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "1. Bees can count. (Source: http://z, Score: 12)\n"
        );
    }

    #[tokio::test]
    async fn test_review_exit_keeps_polling() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("til_facts.txt");

        let mut source = MockPostSource::new();
        source
            .expect_fetch_posts()
            .times(1)
            .returning(|_, _| Ok(batch()));

        let prompter = ScriptedPrompter {
            fact_actions: VecDeque::from([FactAction::Save, FactAction::Exit]),
            ..Default::default()
        };

        let mut out = Vec::new();
        {
            let mut app = App::new(
                source,
                prompter,
                &mut out,
                config(&output),
                None,
                CancellationToken::new(),
            );
            let cycle = app.cycle(Command::Review { once: false }).await.unwrap();
            assert_eq!(cycle, Cycle::Continue);
            assert_eq!(app.prompter.asked, vec![1, 2]);
        }

        assert_eq!(
            fs::read_to_string(&output).unwrap(),
            "1. The moon has moonquakes. (Source: http://x, Score: 50)\n"
        );
        let printed = String::from_utf8(out).unwrap();
        assert!(printed.ends_with("Fact saved.\n"));
    }

    #[tokio::test]
    async fn test_batch_exit_stops_loop() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("til_facts.txt");

        let mut source = MockPostSource::new();
        source
            .expect_fetch_posts()
            .times(2)
            .returning(|_, _| Ok(batch()));

        let prompter = ScriptedPrompter {
            batch_actions: VecDeque::from([BatchAction::Save, BatchAction::Exit]),
            ..Default::default()
        };

        let mut app = App::new(
            source,
            prompter,
            std::io::sink(),
            config(&output),
            None,
            CancellationToken::new(),
        );
        app.run(Command::Batch { once: false }).await.unwrap();

        assert!(output.exists());
        assert!(!dir.path().join("til_facts_1.txt").exists());
    }

    #[tokio::test]
    async fn test_cancelled_token_stops_before_fetching() {
        let mut source = MockPostSource::new();
        source.expect_fetch_posts().times(0);

        let shutdown = CancellationToken::new();
        shutdown.cancel();

        let dir = tempdir().unwrap();
        let mut app = App::new(
            source,
            ScriptedPrompter::default(),
            std::io::sink(),
            config(&dir.path().join("til_facts.txt")),
            None,
            shutdown,
        );
        app.run(Command::Watch { once: false }).await.unwrap();
    }

    #[test]
    fn test_split_output_path() {
        assert_eq!(
            split_output_path(Path::new("til_facts.txt")),
            (PathBuf::from("."), "til_facts.txt".to_string())
        );
        assert_eq!(
            split_output_path(Path::new("/var/facts/out.txt")),
            (PathBuf::from("/var/facts"), "out.txt".to_string())
        );
    }
}
