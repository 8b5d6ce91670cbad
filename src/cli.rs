use clap::{Parser, Subcommand};
use jiff::civil::Date;

use crate::types::{AssignmentField, ReportId};

#[derive(Parser)]
#[command(name = "baches")]
#[command(about = "Pothole repair management client")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// How a command should present its result
#[derive(Debug, Clone, Copy, Default)]
pub struct OutputOptions {
    pub json: bool,
}

impl OutputOptions {
    pub fn json(json: bool) -> Self {
        Self { json }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Open the interactive repair manager
    #[command(visible_alias = "r")]
    Repair {
        /// Report to look up on startup
        #[arg(long, value_parser = parse_report_id)]
        id: Option<ReportId>,
    },

    /// List repair squads and statuses
    Catalogs {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a pothole report and its repair assignment
    #[command(visible_alias = "s")]
    Show {
        /// Pothole report id
        #[arg(value_parser = parse_report_id)]
        id: ReportId,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Assign or update the repair for a report
    Assign {
        /// Pothole report id
        #[arg(value_parser = parse_report_id)]
        id: ReportId,

        /// Squad id (see `baches catalogs`)
        #[arg(long)]
        squad: Option<u64>,

        /// Start date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        start: Option<Date>,

        /// End date (YYYY-MM-DD)
        #[arg(long, value_parser = parse_date)]
        end: Option<Date>,

        /// Repair status id (see `baches catalogs`)
        #[arg(long)]
        status: Option<u64>,

        /// Clear a field: squadId, startDate, endDate, statusId (repeatable)
        #[arg(long, value_parser = parse_field)]
        clear: Vec<AssignmentField>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Remove the repair assigned to a report
    Unassign {
        /// Pothole report id
        #[arg(value_parser = parse_report_id)]
        id: ReportId,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage the stored access token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub enum TokenAction {
    /// Store the access token sent as X-Auth-Token
    Set {
        /// Token value
        token: String,
    },
    /// Remove the stored token
    Clear,
    /// Report whether a token is available and where it comes from
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show the effective configuration
    Show {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Get a single value (base_url, timeout_ms, notification_ms)
    Get {
        key: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Set a value in the config file
    Set {
        key: String,
        value: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the config file location
    Path,
}

fn parse_report_id(s: &str) -> Result<ReportId, String> {
    s.parse().map_err(|e: crate::error::BachesError| e.to_string())
}

fn parse_date(s: &str) -> Result<Date, String> {
    s.trim()
        .parse::<Date>()
        .map_err(|e| format!("invalid date '{s}' (expected YYYY-MM-DD): {e}"))
}

fn parse_field(s: &str) -> Result<AssignmentField, String> {
    s.parse().map_err(|e: crate::error::BachesError| e.to_string())
}
