mod assign;
mod catalogs;
mod config;
mod repair;
mod show;
mod token;
mod unassign;

pub use assign::{AssignOptions, cmd_assign};
pub use catalogs::cmd_catalogs;
pub use config::{cmd_config_get, cmd_config_path, cmd_config_set, cmd_config_show};
pub use repair::cmd_repair;
pub use show::cmd_show;
pub use token::{cmd_token_clear, cmd_token_set, cmd_token_status};
pub use unassign::cmd_unassign;

use std::io::{self, BufRead, Write};
use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::Value;

use crate::cli::OutputOptions;
use crate::config::Config;
use crate::error::Result;
use crate::remote::{HttpRepairService, RepairService, StoredTokenProvider, TokenStorage};
use crate::types::{Catalogs, PotholeRepairRecord};

/// Result of a command, printable as JSON or as human-readable text
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print according to `output`; falls back to JSON when no text was set
    pub fn print(self, output: OutputOptions) -> Result<()> {
        match self.text {
            Some(text) if !output.json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

/// Pretty-print a JSON value to stdout
pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Effective config plus a service backed by the stored token
fn connect() -> Result<(Config, HttpRepairService)> {
    let config = Config::effective()?;
    let tokens = Arc::new(StoredTokenProvider::new(TokenStorage::default_location()));
    let service = HttpRepairService::from_config(&config, tokens)?;
    Ok((config, service))
}

/// Catalogs for display purposes; ids are shown raw if they can't be loaded
async fn catalogs_for_display(service: &dyn RepairService) -> Catalogs {
    match service.fetch_catalogs().await {
        Ok(catalogs) => catalogs,
        Err(e) => {
            tracing::warn!(error = %e, "could not load catalogs; showing raw ids");
            Catalogs::default()
        }
    }
}

/// Ask a yes/no question on stderr, reading the answer from stdin
fn confirm(prompt: &str) -> Result<bool> {
    let mut stderr = io::stderr();
    write!(stderr, "{prompt} [y/N] ")?;
    stderr.flush()?;

    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "yes" | "si" | "sí"))
}

fn label_line(label: &str, value: impl std::fmt::Display) -> String {
    format!("  {:<14} {}\n", format!("{label}:"), value)
}

fn unset() -> String {
    "not set".dimmed().to_string()
}

/// Human-readable rendering of a record, resolving catalog names
pub(crate) fn format_record(record: &PotholeRepairRecord, catalogs: &Catalogs) -> String {
    let mut text = String::new();

    text.push_str(&format!(
        "{} {}\n",
        "Report".green().bold(),
        format!("#{}", record.pothole_id).cyan()
    ));
    text.push_str(&label_line("Citizen", &record.citizen_name));
    text.push_str(&label_line(
        "Reported",
        record
            .date_reported
            .map(|d| d.strftime("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(unset),
    ));
    text.push_str(&label_line("Location", record.location()));
    text.push('\n');

    match record.repair_id {
        Some(id) => text.push_str(&format!(
            "{} {}\n",
            "Repair".green().bold(),
            format!("#{id}").cyan()
        )),
        None => text.push_str(&format!(
            "{} {}\n",
            "Repair".green().bold(),
            "unassigned".dimmed()
        )),
    }

    let named = |id: Option<u64>, name: Option<&str>| match (id, name) {
        (None, _) => unset(),
        (Some(_), Some(name)) => name.to_string(),
        (Some(id), None) => format!("#{id}"),
    };
    text.push_str(&label_line(
        "Squad",
        named(
            record.squad_id,
            record.squad_id.and_then(|id| catalogs.squad_name(id)),
        ),
    ));
    text.push_str(&label_line(
        "Start",
        record.start_date.map(|d| d.to_string()).unwrap_or_else(unset),
    ));
    text.push_str(&label_line(
        "End",
        record.end_date.map(|d| d.to_string()).unwrap_or_else(unset),
    ));
    text.push_str(&label_line(
        "Status",
        named(
            record.status_id,
            record.status_id.and_then(|id| catalogs.status_name(id)),
        ),
    ));

    text.trim_end().to_string()
}
