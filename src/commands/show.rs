use super::{CommandOutput, catalogs_for_display, connect, format_record};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::remote::RepairService;
use crate::types::ReportId;

/// Display a pothole report with its repair assignment
pub async fn cmd_show(id: ReportId, output: OutputOptions) -> Result<()> {
    let (_, service) = connect()?;
    let record = service.fetch_by_report_id(id).await?;

    if output.json {
        return CommandOutput::new(serde_json::to_value(&record)?).print(output);
    }

    let catalogs = catalogs_for_display(&service).await;
    CommandOutput::new(serde_json::to_value(&record)?)
        .with_text(format_record(&record, &catalogs))
        .print(output)
}
