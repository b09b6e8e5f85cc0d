//! Logs command - inspect the event log left behind by menu sessions

use std::io::{self, Write};

use anyhow::Result;
use chrono::{Duration, Local, TimeZone, Utc};
use clap::builder::PossibleValuesParser;
use clap::Subcommand;
use colored::Colorize;
use dialoguer::Confirm;

use bankline_core::config::Config;
use bankline_core::{LogFilter, LoggingService};

use crate::output::{self, create_table, format_size};
use crate::session::MenuChoice;

#[derive(Subcommand)]
pub enum LogsCommands {
    /// Show recent events, newest first
    List {
        /// Number of entries to show
        #[arg(short, long, default_value = "50")]
        limit: usize,
        /// Only events from one menu command
        #[arg(long, value_parser = PossibleValuesParser::new(MenuChoice::logged_commands()))]
        command: Option<String>,
        /// Only rejected operations
        #[arg(long)]
        errors: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete events older than a number of days
    Clear {
        /// Age in days; newer events are kept
        #[arg(long, default_value = "30")]
        older_than_days: i64,
        /// Skip confirmation prompt
        #[arg(long, short = 'f')]
        force: bool,
    },
    /// Completed and rejected operations per menu command
    Stats {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: LogsCommands, config: &Config) -> Result<()> {
    let service = LoggingService::new(&config.app_dir, env!("CARGO_PKG_VERSION"))?;
    let mut out = io::stdout();

    match command {
        LogsCommands::List {
            limit,
            command,
            errors,
            json,
        } => {
            let mut filter = LogFilter::recent(limit);
            if let Some(command) = command {
                filter = filter.for_command(command);
            }
            if errors {
                filter = filter.errors_only();
            }
            list(&service, &filter, json, &mut out)
        }
        LogsCommands::Clear {
            older_than_days,
            force,
        } => {
            if !force {
                let confirmed = Confirm::new()
                    .with_prompt(format!("Delete events older than {} days?", older_than_days))
                    .default(false)
                    .interact()?;
                if !confirmed {
                    writeln!(out, "{}", "Cancelled.".dimmed())?;
                    return Ok(());
                }
            }
            let deleted = service.delete_before(cutoff_ms(older_than_days))?;
            output::success(&mut out, &format!("Deleted {} log entries", deleted))?;
            Ok(())
        }
        LogsCommands::Stats { json } => stats(&service, json, &mut out),
    }
}

/// Unix ms timestamp `days` days before now
fn cutoff_ms(days: i64) -> i64 {
    (Utc::now() - Duration::days(days)).timestamp_millis()
}

fn format_timestamp(timestamp_ms: i64) -> String {
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.format("%d/%m/%Y %H:%M:%S").to_string())
        .unwrap_or_else(|| timestamp_ms.to_string())
}

fn list(service: &LoggingService, filter: &LogFilter, json: bool, out: &mut impl Write) -> Result<()> {
    let entries = service.query(filter)?;

    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(&entries)?)?;
        return Ok(());
    }
    if entries.is_empty() {
        writeln!(out, "No log entries found.")?;
        return Ok(());
    }

    let mut table = create_table();
    table.set_header(vec!["Time", "Event", "Error"]);
    for entry in entries {
        let error = entry.error_message.unwrap_or_default();
        table.add_row(vec![format_timestamp(entry.timestamp), entry.event, error]);
    }
    writeln!(out, "{}", table)?;
    Ok(())
}

fn stats(service: &LoggingService, json: bool, out: &mut impl Write) -> Result<()> {
    let per_command = service.command_stats()?;
    let total = service.count()?;
    let errors = service.error_count()?;
    let db_path = service.db_path();
    let size_bytes = std::fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);

    if json {
        let report = serde_json::json!({
            "total_entries": total,
            "error_count": errors,
            "commands": per_command,
            "database_path": db_path.to_string_lossy(),
            "database_size_bytes": size_bytes,
        });
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    writeln!(out, "{}", "Event log".bold())?;
    if per_command.is_empty() {
        writeln!(out, "No menu operations recorded.")?;
    } else {
        let mut table = create_table();
        table.set_header(vec!["Command", "Completed", "Rejected"]);
        for row in &per_command {
            table.add_row(vec![
                row.command.clone(),
                row.completed.to_string(),
                row.rejected.to_string(),
            ]);
        }
        writeln!(out, "{}", table)?;
    }
    writeln!(out, "{} entries, {} rejected", total, errors)?;
    writeln!(out, "{} ({})", db_path.display(), format_size(size_bytes))?;
    Ok(())
}
