//! Output formatting utilities

use std::io::{self, Write};

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, ContentArrangement, Table};
use rust_decimal::Decimal;

/// Print a success message
pub fn success(out: &mut impl Write, msg: &str) -> io::Result<()> {
    writeln!(out, "{}", msg.green())
}

/// Print an error message
pub fn error(out: &mut impl Write, msg: &str) -> io::Result<()> {
    writeln!(out, "{}", msg.red())
}

/// Print an info message
pub fn info(out: &mut impl Write, msg: &str) -> io::Result<()> {
    writeln!(out, "{}", msg.cyan())
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Format bytes as human-readable size
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} bytes", bytes)
    }
}

/// Format money the Brazilian way: `R$ 1.234,56`, negatives as `R$ -100,00`
pub fn format_currency(amount: Decimal) -> String {
    let rounded = amount.round_dp(2);
    let negative = rounded < Decimal::ZERO;
    let text = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    format!("R$ {}{},{}", if negative { "-" } else { "" }, grouped, frac_part)
}
