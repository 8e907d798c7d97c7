mod commands;
pub mod core;

use std::process::ExitCode;

use clap::Parser;

use crate::commands::Cli;
use crate::core::cache::CacheLayout;
use crate::core::logging;
use crate::core::state::AppState;

pub fn run() -> ExitCode {
    let cli = Cli::parse();

    // Logging comes first so warnings from loading settings are kept.
    let data_dir = AppState::resolve_data_dir(cli.data_dir.clone());
    let _log_guard = logging::init_logging(&CacheLayout::new(&data_dir).logs_dir());

    let mut state = match AppState::new(Some(data_dir)) {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("Cannot open launcher data directory: {}", e);
            return ExitCode::from(1);
        }
    };
    tracing::info!("ttyhlauncher starting, data dir {:?}", state.data_dir);

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Cannot start async runtime: {}", e);
            return ExitCode::from(1);
        }
    };

    runtime.block_on(commands::execute(&mut state, cli.command))
}
