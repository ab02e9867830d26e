use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::config::Config;
use crate::facts::RetainedFields;

#[derive(Debug, Parser)]
#[command(
    name = "tilfetch",
    version,
    about = "Poll r/todayilearned and turn new posts into tidy facts"
)]
pub struct Cli {
    /// Community to poll (default: todayilearned)
    #[arg(long, global = true)]
    pub subreddit: Option<String>,

    /// Posts requested per cycle
    #[arg(long, global = true, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub limit: Option<u32>,

    /// Seconds to wait between cycles
    #[arg(long = "interval-secs", global = true)]
    pub interval_secs: Option<u64>,

    /// Fact file to write to
    #[arg(long, global = true)]
    pub output: Option<PathBuf>,

    /// Post fields kept next to each fact: url, score, url,score or none
    #[arg(long, global = true)]
    pub fields: Option<RetainedFields>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Print new facts and append them to the fact file every cycle
    Watch {
        /// Run a single cycle and exit
        #[arg(long)]
        once: bool,
    },
    /// Decide fact by fact whether to save, email or skip it
    Review {
        #[arg(long)]
        once: bool,
    },
    /// Save or email each fetched batch as a new file
    Batch {
        #[arg(long)]
        once: bool,
    },
}

impl Command {
    pub fn once(&self) -> bool {
        match self {
            Self::Watch { once } | Self::Review { once } | Self::Batch { once } => *once,
        }
    }
}

impl Cli {
    /// Layer command-line overrides on top of the environment config.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(subreddit) = &self.subreddit {
            config = config.with_subreddit(subreddit.clone());
        }
        if let Some(limit) = self.limit {
            config = config.with_fetch_limit(limit);
        }
        if let Some(secs) = self.interval_secs {
            config = config.with_poll_interval(Duration::from_secs(secs));
        }
        if let Some(output) = &self.output {
            config = config.with_output_path(output.clone());
        }
        if let Some(fields) = self.fields {
            config = config.with_retained_fields(fields);
        }
        config
    }
}
