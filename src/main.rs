use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{info, warn};

use standup_bot::app::messages::MessageKind;
use standup_bot::app::run::{run_daemon, run_once};
use standup_bot::chat::Delivery;
use standup_bot::github;
use standup_bot::util::config::{AppConfig, Overrides};

#[derive(Parser, Debug)]
#[command(name = "standup-bot", version, about = "Post team reminders to a chat space")]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Chat-space incoming webhook URL
    #[arg(long, env = "WEBHOOK_URL", global = true)]
    webhook_url: Option<String>,

    /// Comma separated owner/name repositories to watch
    #[arg(long, env = "GITHUB_REPOS", global = true)]
    repos: Option<String>,

    /// Hide PRs older than this many days
    #[arg(long, env = "PR_MAX_AGE_DAYS", global = true)]
    max_age_days: Option<u32>,

    /// Log messages instead of posting them
    #[arg(
        long,
        env = "DRY_RUN",
        global = true,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    dry_run: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    debug: bool,

    /// Also write logs to a daily rolling file in this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Build and post one message now
    Send {
        #[arg(value_enum)]
        kind: MessageKind,
    },
    /// Post messages according to the configured schedule
    Daemon,
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    config.apply_overrides(Overrides {
        webhook_url: cli.webhook_url,
        repos: cli.repos,
        max_age_days: cli.max_age_days,
        dry_run: cli.dry_run,
    });

    let _guard = setup_logging(cli.debug, cli.log_dir.as_deref())?;

    info!(dry_run = config.chat.dry_run, "standup-bot starting");

    let token = github::auth::resolve_token(config.github.token.as_deref());
    if token.is_none() {
        warn!("No GitHub token found, PR reminders will be empty");
    }

    let delivery = Delivery::from_config(&config.chat);

    match cli.command {
        Command::Send { kind } => {
            if run_once(kind, &config, token.as_deref(), &delivery).await {
                Ok(ExitCode::SUCCESS)
            } else {
                Ok(ExitCode::FAILURE)
            }
        }
        Command::Daemon => {
            run_daemon(&config, token.as_deref(), &delivery).await?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn setup_logging(
    debug: bool,
    log_dir: Option<&std::path::Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let default_level = if debug {
        "standup_bot=debug"
    } else {
        "standup_bot=info"
    };
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter());

    let Some(log_dir) = log_dir else {
        tracing_subscriber::registry().with(stderr_layer).init();
        return Ok(None);
    };

    std::fs::create_dir_all(log_dir)?;
    let file_appender = tracing_appender::rolling::daily(log_dir, "standup-bot.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_filter(filter());

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(file_layer)
        .init();

    Ok(Some(guard))
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases live in one test: the environment is process-wide.
    #[test]
    fn test_dry_run_from_env_and_flag() {
        for (value, expected) in [
            ("1", true),
            ("yes", true),
            ("true", true),
            ("0", false),
            ("false", false),
            ("off", false),
        ] {
            // SAFETY: no other test in this binary reads the environment.
            unsafe { std::env::set_var("DRY_RUN", value) };
            let cli = Cli::try_parse_from(["standup-bot", "send", "standup"]);
            unsafe { std::env::remove_var("DRY_RUN") };

            let cli = cli.unwrap_or_else(|e| panic!("DRY_RUN={value} rejected: {e}"));
            assert_eq!(cli.dry_run, expected, "DRY_RUN={value}");
        }

        let cli = Cli::try_parse_from(["standup-bot", "--dry-run", "send", "weekly"]).unwrap();
        assert!(cli.dry_run);
        assert!(matches!(
            cli.command,
            Command::Send {
                kind: MessageKind::Weekly
            }
        ));
    }
}
