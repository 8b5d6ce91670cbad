use jiff::civil::Date;
use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, catalogs_for_display, connect, format_record};
use crate::cli::OutputOptions;
use crate::error::{BachesError, Result};
use crate::remote::RepairService;
use crate::types::{AssignmentEdit, AssignmentField, ReportId};

/// Field changes requested on the command line
#[derive(Debug, Clone, Default)]
pub struct AssignOptions {
    pub squad: Option<u64>,
    pub start: Option<Date>,
    pub end: Option<Date>,
    pub status: Option<u64>,
    pub clear: Vec<AssignmentField>,
}

impl AssignOptions {
    /// Turn the options into edits, one per field.
    ///
    /// Setting and clearing the same field, or asking for nothing at all, is
    /// rejected before any request is made.
    pub fn edits(&self) -> Result<Vec<AssignmentEdit>> {
        let mut edits = Vec::new();
        if let Some(id) = self.squad {
            edits.push(AssignmentEdit::Squad(Some(id)));
        }
        if let Some(date) = self.start {
            edits.push(AssignmentEdit::StartDate(Some(date)));
        }
        if let Some(date) = self.end {
            edits.push(AssignmentEdit::EndDate(Some(date)));
        }
        if let Some(id) = self.status {
            edits.push(AssignmentEdit::Status(Some(id)));
        }

        for field in &self.clear {
            if edits.iter().any(|e| e.field() == *field) {
                return Err(BachesError::Other(format!(
                    "cannot both set and clear {field}"
                )));
            }
            if !edits.contains(&field.cleared()) {
                edits.push(field.cleared());
            }
        }

        if edits.is_empty() {
            return Err(BachesError::Other(
                "nothing to change: pass --squad, --start, --end, --status or --clear".to_string(),
            ));
        }
        Ok(edits)
    }
}

/// Fetch a report, apply the requested changes, and save it
pub async fn cmd_assign(id: ReportId, options: AssignOptions, output: OutputOptions) -> Result<()> {
    let edits = options.edits()?;

    let (_, service) = connect()?;
    let mut record = service.fetch_by_report_id(id).await?;
    let creating = !record.has_repair();
    for edit in edits {
        record.apply_edit(edit);
    }

    let confirmation = service.save(&record).await?;
    tracing::debug!(pothole_id = id.get(), %confirmation, "assignment saved");

    let json_output = json!({
        "action": if creating { "repair_created" } else { "repair_updated" },
        "potholeId": id.get(),
        "message": confirmation,
        "record": record,
    });

    if output.json {
        return CommandOutput::new(json_output).print(output);
    }

    // The saved record carries the repair id assigned by the backend
    let saved = service.fetch_by_report_id(id).await.unwrap_or(record);
    let catalogs = catalogs_for_display(&service).await;
    let verb = if creating { "Created" } else { "Updated" };
    let text = format!(
        "{} repair for report {}: {}\n\n{}",
        verb.green(),
        format!("#{id}").cyan(),
        confirmation,
        format_record(&saved, &catalogs)
    );

    CommandOutput::new(json_output).with_text(text).print(output)
}
