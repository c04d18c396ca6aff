//! `revise`: command-line boards over local storage.
//!
//! Configuration via CLI flags, environment variables, or config file
//! (`~/.config/revise/config.toml`).
//!
//! ```bash
//! # Create a project and a task in it
//! revise --user alice project-add "Launch" --color green
//! revise --user alice task-add "Fix login bug" --project <ID> --priority high
//!
//! # Show the board, filtered
//! REVISE_USER=alice revise board --project <ID> --search login
//! ```

use std::io;
use std::path::Path;
use std::process::ExitCode;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;

use revise::cli::{self, CliError, Command};
use revise::config::{CliArgs, ReviseConfig};
use revise::session::Session;

fn main() -> ExitCode {
    let cli = CliArgs::parse();
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: CliArgs) -> Result<(), CliError> {
    let config = ReviseConfig::load(&cli)?;
    let persistence = config.open_persistence()?;

    let mut session = Session::new(persistence);
    session.switch_identity(config.user.clone());

    let command = cli.command.unwrap_or(Command::Board {
        project: None,
        search: String::new(),
        priority: None,
        assignee: None,
    });
    let mut stdout = io::stdout().lock();
    cli::run(command, &mut session, config.limits, &mut stdout)
}

/// Initialize logging.
///
/// Logs go to stderr unless `file_path` is given, in which case they are
/// appended to that file through a non-blocking writer. The returned
/// [`WorkerGuard`] must be held until shutdown so buffered entries are
/// flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let Some((log_dir, file_name)) = file_path.and_then(split_log_path) else {
        tracing_subscriber::fmt()
            .with_writer(io::stderr)
            .with_env_filter(env_filter)
            .init();
        return None;
    };

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

fn split_log_path(path: &Path) -> Option<(&Path, &str)> {
    let file_name = path.file_name()?.to_str()?;
    let dir = path.parent().filter(|d| !d.as_os_str().is_empty()).unwrap_or(Path::new("."));
    Some((dir, file_name))
}
