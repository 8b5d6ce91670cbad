use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, confirm, connect};
use crate::cli::OutputOptions;
use crate::error::{BachesError, Result};
use crate::remote::RepairService;
use crate::types::ReportId;

/// Remove the repair assigned to a report
///
/// The report itself stays; only its assignment is deleted on the backend.
pub async fn cmd_unassign(id: ReportId, yes: bool, output: OutputOptions) -> Result<()> {
    let (_, service) = connect()?;
    let record = service.fetch_by_report_id(id).await?;

    let Some(repair_id) = record.repair_id else {
        return Err(BachesError::Other(format!(
            "report #{id} has no repair assigned"
        )));
    };

    if !yes && !confirm(&format!("Delete repair #{repair_id} for report #{id}?"))? {
        return CommandOutput::new(json!({
            "action": "unassign",
            "potholeId": id.get(),
            "cancelled": true,
        }))
        .with_text("Cancelled".dimmed().to_string())
        .print(output);
    }

    let confirmation = service.delete(id).await?;

    CommandOutput::new(json!({
        "action": "unassign",
        "potholeId": id.get(),
        "repairId": repair_id,
        "message": confirmation,
    }))
    .with_text(format!(
        "{} repair #{} from report {}: {}",
        "Removed".green(),
        repair_id,
        format!("#{id}").cyan(),
        confirmation
    ))
    .print(output)
}
