// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Command-line entrypoint for the ACP replay agent

use std::ffi::OsString;
use std::path::PathBuf;
use std::process::ExitCode;

use acp_replay_agent::{Diagnostics, ReplayError, SessionConfig, StdioReplayer};
use acp_replay_logging::CliLoggingArgs;
use anyhow::Context;
use clap::{CommandFactory, Parser};
use tokio_util::sync::CancellationToken;
use tracing::info;

const COMPONENT: &str = "acp-replay-agent";
const BANNER: &str = concat!("ACP Replay Agent v", env!("CARGO_PKG_VERSION"));
const USAGE: &str = "acp-replay-agent <replay_file_path> <project_root>";

const HELP_TEMPLATE: &str = "\
{before-help}
A tool for testing Agent Client Protocol (ACP) implementations
by replaying recorded communication sessions.

Usage:
  {usage}

Arguments:
{positionals}

Options:
{options}
{after-help}";

const EXAMPLE: &str = "\
Example:
  acp-replay-agent recordings/session.log /home/dev/project";

#[derive(Debug, Parser)]
#[command(
    name = COMPONENT,
    before_help = BANNER,
    after_help = EXAMPLE,
    override_usage = USAGE,
    help_template = HELP_TEMPLATE,
    disable_help_flag = true,
    disable_version_flag = true
)]
struct Args {
    /// Path to replay log file with OUT:/IN: markers
    #[arg(value_name = "replay_file_path", allow_hyphen_values = true)]
    transcript: PathBuf,

    /// Project root path to replace 'cwd' fields
    #[arg(value_name = "project_root", allow_hyphen_values = true)]
    project_root: String,

    /// Anything after the two positionals is accepted and ignored.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, hide = true)]
    ignored: Vec<OsString>,

    /// Logging options must precede the positionals.
    #[command(flatten)]
    logging: CliLoggingArgs,
}

enum Invocation {
    Help,
    Version,
    Replay(Args),
}

fn parse_invocation(argv: Vec<OsString>) -> Result<Invocation, clap::Error> {
    match argv.get(1).and_then(|a| a.to_str()) {
        Some("-h" | "--help" | "help") => return Ok(Invocation::Help),
        Some("-v" | "--version" | "version") => return Ok(Invocation::Version),
        _ => {}
    }
    Args::try_parse_from(argv).map(Invocation::Replay)
}

fn print_usage_error(err: &clap::Error) {
    if err.kind() != clap::error::ErrorKind::MissingRequiredArgument {
        // clap's rendering carries its own usage block; keep the headline only.
        if let Some(headline) = err.render().to_string().lines().next() {
            eprintln!("{headline}");
        }
    }
    eprintln!("Usage: {USAGE}");
    eprintln!();
    eprintln!("Example:");
    eprintln!("  acp-replay-agent /path/to/replay.txt /path/to/project");
    eprintln!();
    eprintln!("For help: acp-replay-agent --help");
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = match parse_invocation(std::env::args_os().collect()) {
        Ok(Invocation::Help) => {
            println!("{}", Args::command().render_help());
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Version) => {
            println!("{BANNER}");
            return ExitCode::SUCCESS;
        }
        Ok(Invocation::Replay(args)) => args,
        Err(err) => {
            print_usage_error(&err);
            return ExitCode::FAILURE;
        }
    };

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let message = err
                .downcast_ref::<ReplayError>()
                .map(ReplayError::diagnostic)
                .unwrap_or_else(|| format!("Unexpected error: {err:#}"));
            Diagnostics::stderr().fatal(message);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    args.logging.init(COMPONENT).context("Failed to initialize logging")?;
    if !args.ignored.is_empty() {
        tracing::debug!(ignored = ?args.ignored, "Ignoring extra arguments");
    }

    let config = SessionConfig::new(args.transcript, args.project_root);
    info!(transcript = %config.transcript.display(), "Loading transcript");

    let mut replayer = StdioReplayer::from_config(&config).await?;
    replayer.run().await?;

    // Keep the process alive so the harness driving the agent does not see
    // its peer exit; only an external signal ends the session.
    let shutdown = CancellationToken::new();
    cancel_on_signal(shutdown.clone())?;
    replayer.idle(shutdown).await;
    Ok(())
}

#[cfg(unix)]
fn cancel_on_signal(shutdown: CancellationToken) -> anyhow::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint =
        signal(SignalKind::interrupt()).context("Failed to set up signal handler")?;
    let mut sigterm =
        signal(SignalKind::terminate()).context("Failed to set up signal handler")?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigint.recv() => {
                info!(operation = "shutdown", signal = "SIGINT", "Received SIGINT, shutting down");
            }
            _ = sigterm.recv() => {
                info!(operation = "shutdown", signal = "SIGTERM", "Received SIGTERM, shutting down");
            }
        }
        shutdown.cancel();
    });
    Ok(())
}

#[cfg(not(unix))]
fn cancel_on_signal(shutdown: CancellationToken) -> anyhow::Result<()> {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!(operation = "shutdown", signal = "ctrl-c", "Received Ctrl-C, shutting down");
                shutdown.cancel();
            }
            Err(e) => tracing::warn!(error = %e, "Failed to listen for Ctrl-C"),
        }
    });
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<OsString> {
        std::iter::once("acp-replay-agent")
            .chain(args.iter().copied())
            .map(OsString::from)
            .collect()
    }

    #[test]
    fn help_and_version_words_are_recognized_first() {
        for word in ["-h", "--help", "help"] {
            assert!(matches!(parse_invocation(argv(&[word])), Ok(Invocation::Help)));
        }
        for word in ["-v", "--version", "version"] {
            assert!(matches!(parse_invocation(argv(&[word, "x"])), Ok(Invocation::Version)));
        }
    }

    #[test]
    fn two_positionals_start_a_replay() {
        let Ok(Invocation::Replay(args)) =
            parse_invocation(argv(&["--log-level", "debug", "session.log", "/work"]))
        else {
            panic!("expected replay invocation");
        };
        assert_eq!(args.transcript, PathBuf::from("session.log"));
        assert_eq!(args.project_root, "/work");
        assert_eq!(
            args.logging.log_level,
            Some(acp_replay_logging::CliLogLevel::Debug)
        );
    }

    #[test]
    fn extra_arguments_and_hyphenated_values_are_accepted() {
        let Ok(Invocation::Replay(args)) =
            parse_invocation(argv(&["-session.log", "-root", "extra", "--more"]))
        else {
            panic!("expected replay invocation");
        };
        assert_eq!(args.transcript, PathBuf::from("-session.log"));
        assert_eq!(args.project_root, "-root");
        assert_eq!(args.ignored, vec![OsString::from("extra"), OsString::from("--more")]);
    }

    #[test]
    fn single_positional_is_a_missing_argument() {
        let Err(err) = parse_invocation(argv(&["session.log"])) else {
            panic!("expected usage error");
        };
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);
    }

    #[test]
    fn help_text_mentions_usage_and_arguments() {
        let help = Args::command().render_help().to_string();
        assert!(help.starts_with(BANNER));
        assert!(help.contains(USAGE));
        assert!(help.contains("replay_file_path"));
        assert!(help.contains("--log-level"));
        assert!(help.contains("Example:"));
    }

    #[test]
    fn command_definition_is_consistent() {
        Args::command().debug_assert();
    }
}
