pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod logging;
pub mod remote;
pub mod tui;
pub mod types;

pub use config::Config;
pub use error::{BachesError, FailureKind, Result};
pub use remote::{HttpRepairService, RepairService};
pub use types::{
    AssignmentEdit, AssignmentField, Catalogs, PotholeRepairRecord, RepairStatus, ReportId, Squad,
};
