use anyhow::{Context, Result};
use clap::Parser;
use tilfetch::{
    cli::{App, Cli, TerminalPrompter},
    config::Config,
    output::EmailSender,
    reddit::RedditClient,
};
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine, real deployments set the variables directly
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let config = cli.apply(Config::from_env()?);

    let client = RedditClient::new(config.reddit().clone())?;
    client
        .verify()
        .await
        .context("Reddit API connection failed")?;

    let email = config
        .email()
        .cloned()
        .map(EmailSender::new)
        .transpose()?;
    if email.is_none() {
        warn!("Email delivery disabled: POSTMARK_SERVER_TOKEN or EMAIL_SENDER not set");
    }

    let shutdown = CancellationToken::new();
    {
        let shutdown = shutdown.clone();
        tokio::spawn(async move {
            if let Err(e) = signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
                return;
            }
            info!("Received shutdown signal, stopping after the current cycle...");
            shutdown.cancel();
        });
    }

    let mut app = App::new(
        client,
        TerminalPrompter::default(),
        std::io::stdout(),
        config,
        email,
        shutdown,
    );
    app.run(cli.command).await
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    if std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
}
