//! Output formatting

use anyhow::Result;
use chrono::{DateTime, Local, Utc};
use clap::ValueEnum;
use colored::Colorize;
use helpdesk_domain::labels::{priority_label, status_label};
use helpdesk_domain::{Locale, Priority, TicketStatus};
use serde::Serialize;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Json,
    Yaml,
}

impl OutputFormat {
    /// Print `data` as JSON/YAML, or the rows built by `rows` as a table.
    pub fn print<T, R, F>(&self, data: &T, rows: F) -> Result<()>
    where
        T: Serialize + ?Sized,
        R: Tabled,
        F: FnOnce() -> Vec<R>,
    {
        match self {
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(data)?),
            OutputFormat::Yaml => print!("{}", serde_yaml::to_string(data)?),
            OutputFormat::Table => {
                let rows = rows();
                if rows.is_empty() {
                    println!("{}", "(no results)".dimmed());
                } else {
                    println!("{}", Table::new(rows).with(Style::rounded()));
                }
            }
        }
        Ok(())
    }

    pub fn is_table(&self) -> bool {
        matches!(self, OutputFormat::Table)
    }
}

pub fn success(message: &str) {
    println!("{} {}", "✓".green(), message);
}

pub fn warn(message: &str) {
    eprintln!("{} {}", "!".yellow(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", "Error:".red().bold(), message);
}

pub fn heading(text: &str) {
    println!("{}", text.bold());
}

pub fn field(name: &str, value: &str) {
    println!("  {:<14} {}", format!("{}:", name).dimmed(), value);
}

pub fn status(status: TicketStatus, locale: Locale) -> String {
    let label = status_label(status, locale);
    match status {
        TicketStatus::Open => label.blue().to_string(),
        TicketStatus::InProgress => label.yellow().to_string(),
        TicketStatus::Resolved => label.green().to_string(),
        TicketStatus::Canceled => label.dimmed().to_string(),
        TicketStatus::Unknown(_) => label.to_string(),
    }
}

pub fn priority(priority: Priority, locale: Locale) -> String {
    let label = priority_label(priority, locale);
    match priority {
        Priority::High => label.red().to_string(),
        _ => label.to_string(),
    }
}

pub fn timestamp(value: Option<DateTime<Utc>>) -> String {
    value
        .map(|ts| ts.with_timezone(&Local).format("%d/%m/%Y %H:%M").to_string())
        .unwrap_or_else(|| "-".into())
}

/// Deadline cell, flagged when overdue.
pub fn deadline(value: Option<DateTime<Utc>>, overdue: bool) -> String {
    let text = timestamp(value);
    if overdue {
        format!("{} {}", text, "(late)".red().bold())
    } else {
        text
    }
}

pub fn or_dash(value: Option<&str>) -> String {
    value.filter(|v| !v.is_empty()).unwrap_or("-").to_string()
}
