//! `proxyprobe`: send test requests to the proxy edge function and print
//! what comes back.

mod settings;

use clap::{Parser, Subcommand};
use proxyprobe_client::{run_session_probe, run_shared_message_probe, ProxyClient, Reporter};
use proxyprobe_core::{IdentifierKind, ProbeResult};
use settings::{Settings, DEFAULT_CONFIG_PATH};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "proxyprobe", about = "Manual test client for the proxy edge function")]
struct Cli {
    /// Path to config file [default: proxyprobe.toml, optional]
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Project base URL (overrides config and PROXYPROBE_BASE_URL)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Bearer token (overrides config and PROXYPROBE_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,

    /// Emit logs as JSON on stderr
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a session for an agent, then post a message into it
    Session {
        /// Agent ID (overrides config and PROXYPROBE_AGENT_ID)
        #[arg(long)]
        agent_id: Option<String>,
        /// Message for the update request
        #[arg(short, long)]
        message: Option<String>,
    },
    /// Send one message through a shared agent link
    Shared {
        /// Share ID (overrides config and PROXYPROBE_SHARE_ID)
        #[arg(long)]
        share_id: Option<String>,
        /// Message to send
        #[arg(short, long)]
        message: Option<String>,
    },
}

impl Cli {
    /// The flags as the highest-priority settings layer, plus the flow they select.
    fn flag_layer(&self) -> (Settings, IdentifierKind) {
        let mut flags = Settings {
            base_url: self.base_url.clone(),
            token: self.token.clone(),
            ..Settings::default()
        };
        let kind = match &self.command {
            Commands::Session { agent_id, message } => {
                flags.agent_id = agent_id.clone();
                flags.message = message.clone();
                IdentifierKind::Agent
            }
            Commands::Shared { share_id, message } => {
                flags.share_id = share_id.clone();
                flags.message = message.clone();
                IdentifierKind::Share
            }
        };
        (flags, kind)
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Runs the selected flow with `env` as the environment settings layer.
async fn run<W: Write>(cli: &Cli, env: Settings, reporter: &mut Reporter<W>) -> ProbeResult<()> {
    let file = match &cli.config {
        Some(path) => Settings::from_file(path, true).await?,
        None => Settings::from_file(DEFAULT_CONFIG_PATH.as_ref(), false).await?,
    };
    let (flags, kind) = cli.flag_layer();
    let (config, message) = file.overlay(env).overlay(flags).resolve(kind)?;

    info!(?config, %kind, "Starting probe");
    let client = ProxyClient::new(config)?;

    match kind {
        IdentifierKind::Agent => {
            let report = run_session_probe(&client, &message, reporter).await?;
            info!(chained = report.update.is_some(), "Session probe finished");
        }
        IdentifierKind::Share => {
            let report = run_shared_message_probe(&client, &message, reporter).await?;
            info!(session_id = %report.session_id, "Shared-message probe finished");
        }
    }
    Ok(())
}

/// Prints how a run ended and maps it to the process exit code.
fn outcome<W: Write>(res: ProbeResult<()>, reporter: &mut Reporter<W>) -> ProbeResult<ExitCode> {
    match res {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(e) if e.is_guidance() => {
            reporter.failure(&e)?;
            Ok(ExitCode::SUCCESS)
        }
        Err(e) => {
            error!(kind = e.label(), error = %e, "Probe failed");
            reporter.failure(&e)?;
            Ok(ExitCode::FAILURE)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // A missing .env file is the normal case
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.json_logs);

    let mut reporter = Reporter::new(std::io::stdout());
    let res = run(&cli, Settings::from_env(), &mut reporter).await;
    Ok(outcome(res, &mut reporter)?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use proxyprobe_core::ProbeError;

    /// An empty config file, so the working directory's proxyprobe.toml is never read.
    fn empty_config() -> (tempfile::TempDir, String) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        std::fs::write(&path, "").unwrap();
        let path = path.to_string_lossy().into_owned();
        (dir, path)
    }

    async fn run_args(args: &[&str]) -> (ProbeResult<()>, String) {
        let cli = Cli::parse_from(args.iter().copied());
        let mut reporter = Reporter::new(Vec::new());
        let res = run(&cli, Settings::default(), &mut reporter).await;
        (res, String::from_utf8(reporter.into_inner()).unwrap())
    }

    fn render_outcome(res: ProbeResult<()>) -> (ExitCode, String) {
        let mut reporter = Reporter::new(Vec::new());
        let code = outcome(res, &mut reporter).unwrap();
        (code, String::from_utf8(reporter.into_inner()).unwrap())
    }

    #[tokio::test]
    async fn placeholder_agent_guides_before_connection_settings() {
        let (_dir, config) = empty_config();
        let (res, out) = run_args(&["proxyprobe", "session", "-c", config.as_str()]).await;

        let err = res.unwrap_err();
        assert!(err.is_guidance());
        assert!(out.is_empty());

        let (code, out) = render_outcome(Err(err));
        assert_eq!(code, ExitCode::SUCCESS);
        assert_eq!(
            out,
            "Please replace 'your-agent-id-here' with an actual agent ID\n"
        );
    }

    #[tokio::test]
    async fn placeholder_share_guides_before_connection_settings() {
        let (_dir, config) = empty_config();
        let (res, _) = run_args(&["proxyprobe", "shared", "--config", config.as_str()]).await;
        assert!(matches!(res, Err(ProbeError::Placeholder { .. })));
    }

    #[tokio::test]
    async fn real_agent_without_base_url_is_config_error() {
        let (_dir, config) = empty_config();
        let (res, _) = run_args(&[
            "proxyprobe",
            "session",
            "-c",
            config.as_str(),
            "--agent-id",
            "a-1",
        ])
        .await;

        let (code, out) = render_outcome(res);
        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.starts_with("\nConfig Error: base_url is not set"));
    }

    #[tokio::test]
    async fn unreachable_proxy_exits_with_failure() {
        let (_dir, config) = empty_config();
        let (res, _) = run_args(&[
            "proxyprobe",
            "session",
            "-c",
            config.as_str(),
            "--agent-id",
            "a-1",
            "--base-url",
            "http://127.0.0.1:1",
            "--token",
            "t",
        ])
        .await;

        assert!(matches!(res, Err(ProbeError::Network(_))));
        let (code, out) = render_outcome(res);
        assert_eq!(code, ExitCode::FAILURE);
        assert!(out.starts_with("\nRequest Error: "));
    }

    #[test]
    fn successful_run_exits_cleanly_and_prints_nothing_extra() {
        let (code, out) = render_outcome(Ok(()));
        assert_eq!(code, ExitCode::SUCCESS);
        assert!(out.is_empty());
    }

    #[test]
    fn config_flag_is_accepted_after_subcommand() {
        let cli = Cli::parse_from(["proxyprobe", "session", "-c", "x.toml"]);
        assert_eq!(cli.config, Some(PathBuf::from("x.toml")));

        let cli = Cli::parse_from(["proxyprobe", "--config", "y.toml", "shared"]);
        assert_eq!(cli.config, Some(PathBuf::from("y.toml")));
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn session_flags_become_top_layer() {
        let cli = Cli::parse_from([
            "proxyprobe",
            "session",
            "--agent-id",
            "a-9",
            "--base-url",
            "https://x.supabase.co",
            "-m",
            "yo",
        ]);
        let (flags, kind) = cli.flag_layer();
        assert_eq!(kind, IdentifierKind::Agent);
        assert_eq!(flags.agent_id.as_deref(), Some("a-9"));
        assert_eq!(flags.base_url.as_deref(), Some("https://x.supabase.co"));
        assert_eq!(flags.message.as_deref(), Some("yo"));
        assert!(flags.share_id.is_none());
    }

    #[test]
    fn shared_subcommand_selects_share_id() {
        let cli = Cli::parse_from(["proxyprobe", "--token", "t", "shared", "--share-id", "s-1"]);
        let (flags, kind) = cli.flag_layer();
        assert_eq!(kind, IdentifierKind::Share);
        assert_eq!(flags.share_id.as_deref(), Some("s-1"));
        assert_eq!(flags.token.as_deref(), Some("t"));
    }
}
