//! Bankline CLI - a small bank in your terminal

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use bankline_core::config::Config;
use clap::{Parser, Subcommand};

mod commands;
mod output;
mod prompt;
mod session;

use commands::{logs, menu};

/// Bankline - register users, open accounts and move money from a menu
#[derive(Parser)]
#[command(name = "bankline", version, about, long_about = None)]
struct Cli {
    /// JSON file the bank is loaded from at start and saved to on exit
    #[arg(long, env = "BANK_DATA_FILE", global = true)]
    data_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the interactive menu (the default)
    Menu,

    /// View and manage the local event log
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let result = Config::load().and_then(|config| run(cli, config));
    ExitCode::from(exit_status(result, &mut std::io::stderr()))
}

fn run(cli: Cli, config: Config) -> Result<()> {
    let data_file = cli.data_file.filter(|p| !p.as_os_str().is_empty());

    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => menu::run(config.with_data_file(data_file)),
        Commands::Logs { command } => logs::run(command, &config),
    }
}

/// 0 on success; otherwise report the error chain and return 1
fn exit_status(result: Result<()>, err: &mut impl Write) -> u8 {
    match result {
        Ok(()) => 0,
        Err(e) => {
            output::error(err, &format!("{:#}", e)).ok();
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use bankline_core::adapters::json_file::JsonFileRepository;
    use tempfile::TempDir;

    fn start_menu(dir: &TempDir, data_file: &std::path::Path) -> (u8, String) {
        let cli = Cli::try_parse_from(["bankline", "--data-file", data_file.to_str().unwrap()]).unwrap();
        let mut stderr = Vec::new();
        let code = exit_status(run(cli, Config::new(dir.path(), None)), &mut stderr);
        (code, String::from_utf8(stderr).unwrap())
    }

    #[test]
    fn test_malformed_data_file_exits_with_failure() {
        let dir = TempDir::new().unwrap();
        let data_file = dir.path().join("bank.json");
        fs::write(&data_file, "{ not json").unwrap();

        let (code, stderr) = start_menu(&dir, &data_file);
        assert_eq!(code, 1);
        assert!(stderr.contains("Failed to load bank data"));
        assert!(stderr.contains("not a valid data file"));
        // Nothing is logged for a session that never started
        assert!(!dir.path().join("logs.duckdb").exists());
    }

    #[test]
    fn test_data_file_in_use_exits_with_failure() {
        let dir = TempDir::new().unwrap();
        let data_file = dir.path().join("bank.json");
        let _held = JsonFileRepository::open(&data_file).unwrap();

        let (code, stderr) = start_menu(&dir, &data_file);
        assert_eq!(code, 1);
        assert!(stderr.contains("in use by another session"));
    }

    #[test]
    fn test_success_exits_with_zero() {
        assert_eq!(exit_status(Ok(()), &mut Vec::new()), 0);
    }

    #[test]
    fn test_menu_is_the_default_command() {
        let cli = Cli::try_parse_from(["bankline"]).unwrap();
        assert!(cli.command.is_none());

        let cli = Cli::try_parse_from(["bankline", "logs", "list", "--command", "deposit"]).unwrap();
        assert!(matches!(cli.command, Some(Commands::Logs { .. })));
        assert!(Cli::try_parse_from(["bankline", "logs", "list", "--command", "exit"]).is_err());
    }
}
