use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, error, info, warn};

use crate::core::auth::Session;
use crate::core::error::LauncherResult;
use crate::core::launch::{
    LaunchObserver, LaunchOrchestrator, LaunchReport, LaunchRequest, LaunchStage,
};
use crate::core::state::AppState;
use crate::core::version::{resolve_version, LATEST_ALIAS};

#[derive(Parser, Debug)]
#[command(name = "ttyhlauncher", version, about = "Verify and launch a cached game client")]
pub struct Cli {
    /// Launcher data directory (cache, settings, logs).
    #[arg(long, global = true, env = "TTYH_LAUNCHER_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Verify the selected version and run it.
    Launch(LaunchArgs),
    /// Print the version `latest` resolves to.
    Latest {
        #[arg(long)]
        offline: bool,
    },
}

#[derive(Args, Debug)]
pub struct LaunchArgs {
    /// Version id or `latest`; defaults to the saved selection.
    #[arg(long)]
    pub version: Option<String>,

    /// Player name; saved for the next run.
    #[arg(long)]
    pub player: Option<String>,

    /// Never contact the update server.
    #[arg(long)]
    pub offline: bool,

    #[arg(long, requires = "access_token")]
    pub uuid: Option<String>,

    #[arg(long, requires = "uuid")]
    pub access_token: Option<String>,
}

impl LaunchArgs {
    fn session(&self) -> Session {
        if self.offline {
            return Session::offline();
        }
        match (&self.uuid, &self.access_token) {
            (Some(uuid), Some(token)) => Session::online(uuid.as_str(), token.as_str()),
            _ => {
                warn!("No session given, launching offline");
                Session::offline()
            }
        }
    }
}

/// Reports pipeline progress to the terminal log.
struct ConsoleObserver;

impl LaunchObserver for ConsoleObserver {
    fn stage_changed(&self, stage: LaunchStage) {
        debug!("Stage: {:?}", stage);
    }

    fn set_foreground_visible(&self, visible: bool) {
        if visible {
            info!("Client stopped, launcher back in foreground");
        } else {
            info!("Client running, launcher in background");
        }
    }
}

pub async fn execute(state: &mut AppState, command: Command) -> ExitCode {
    match command {
        Command::Launch(args) => match launch(state, args).await {
            Ok(report) => {
                print_report(&report);
                ExitCode::from(report.exit_code())
            }
            Err(e) => {
                error!("{}", e);
                ExitCode::from(1)
            }
        },
        Command::Latest { offline } => match latest(state, offline).await {
            Ok(version) => {
                println!("{}", version);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{}", e);
                ExitCode::from(1)
            }
        },
    }
}

async fn launch(state: &mut AppState, args: LaunchArgs) -> LauncherResult<LaunchReport> {
    if let Some(player) = args.player.as_deref().map(str::trim) {
        if !player.is_empty() && player != state.launcher_settings.player_name {
            state.launcher_settings.player_name = player.to_string();
            state.save_settings()?;
        }
    }

    let request = LaunchRequest {
        version: args
            .version
            .clone()
            .unwrap_or_else(|| state.launcher_settings.version.clone()),
        player_name: state.launcher_settings.player_name.clone(),
        session: args.session(),
    };

    let orchestrator = LaunchOrchestrator::from_state(state);
    Ok(orchestrator.launch(&request, &ConsoleObserver).await)
}

async fn latest(state: &AppState, offline: bool) -> LauncherResult<String> {
    let session = if offline {
        Session::offline()
    } else {
        Session::online("", "")
    };
    let orchestrator = LaunchOrchestrator::from_state(state);
    let resolver = orchestrator.resolver_for(&session);
    resolve_version(LATEST_ALIAS, resolver.as_ref()).await
}

fn print_report(report: &LaunchReport) {
    match report {
        LaunchReport::Success => info!("Client exited normally"),
        LaunchReport::UpdateRequired { reason } => {
            eprintln!("Update required: {}", reason);
        }
        LaunchReport::AbnormalExit { code, log_path } => {
            eprintln!(
                "Client exited with code {}. See {} for details.",
                code,
                log_path.display()
            );
        }
        LaunchReport::ProcessFailed(e) => eprintln!("Could not run the client: {}", e),
        LaunchReport::Failed(e) => eprintln!("Launch failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn launch_args_parse_online_session() {
        let cli = Cli::try_parse_from([
            "ttyhlauncher",
            "--data-dir",
            "/tmp/ttyh",
            "launch",
            "--version",
            "1.7.10",
            "--uuid",
            "abc",
            "--access-token",
            "tok",
        ])
        .unwrap();

        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/ttyh")));
        let Command::Launch(args) = cli.command else {
            panic!("expected launch");
        };
        assert_eq!(args.version.as_deref(), Some("1.7.10"));
        let session = args.session();
        assert!(session.is_online());
        assert_eq!(session.uuid, "abc");
    }

    #[test]
    fn offline_flag_wins_over_credentials() {
        let cli = Cli::try_parse_from([
            "ttyhlauncher",
            "launch",
            "--offline",
            "--uuid",
            "abc",
            "--access-token",
            "tok",
        ])
        .unwrap();
        let Command::Launch(args) = cli.command else {
            panic!("expected launch");
        };
        assert!(!args.session().is_online());
    }

    #[test]
    fn uuid_requires_access_token() {
        assert!(Cli::try_parse_from(["ttyhlauncher", "launch", "--uuid", "abc"]).is_err());
    }

    #[test]
    fn latest_accepts_offline_flag() {
        let cli = Cli::try_parse_from(["ttyhlauncher", "latest", "--offline"]).unwrap();
        assert!(matches!(cli.command, Command::Latest { offline: true }));
    }
}
