//! Output formatting utilities

use clap::ValueEnum;
use colored::Colorize;
use optimizer_lib::{Configuration, ScalingDecision};
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

/// Output format for CLI commands
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Table format (default)
    #[default]
    Table,
    /// JSON format
    Json,
}

/// Print a table of rows; an empty list prints a notice instead
pub fn print_table<T: Tabled>(rows: &[T]) {
    if rows.is_empty() {
        println!("{}", "No items found".yellow());
        return;
    }
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{}", table);
}

/// Pretty-print any serializable value as JSON
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn print_warning(message: &str) {
    println!("{} {}", "⚠".yellow().bold(), message);
}

pub fn print_info(message: &str) {
    println!("{} {}", "ℹ".blue().bold(), message);
}

/// Hourly USD amount, four decimals to keep burstable prices readable
pub fn format_hourly(amount: f64) -> String {
    format!("${:.4}/h", amount)
}

pub fn format_memory(gib: f64) -> String {
    if gib.fract() == 0.0 {
        format!("{:.0} GiB", gib)
    } else {
        format!("{:.2} GiB", gib)
    }
}

/// Signed resource delta, `+` meaning missing capacity
pub fn format_delta(value: f64, unit: &str) -> String {
    let formatted = if value.fract() == 0.0 {
        format!("{:+.0}{}", value, unit)
    } else {
        format!("{:+.2}{}", value, unit)
    };
    if value > 0.0 {
        formatted.red().to_string()
    } else if value < 0.0 {
        formatted.yellow().to_string()
    } else {
        formatted.green().to_string()
    }
}

pub fn format_configuration(config: Option<&Configuration>) -> String {
    match config {
        Some(config) => config.to_string(),
        None => "none feasible".dimmed().to_string(),
    }
}

pub fn color_decision(decision: ScalingDecision) -> String {
    let label = decision.to_string();
    match decision {
        ScalingDecision::Upgrade => label.red().bold().to_string(),
        ScalingDecision::Downgrade => label.yellow().bold().to_string(),
        ScalingDecision::Optimal => label.green().bold().to_string(),
    }
}
