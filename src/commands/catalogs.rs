use owo_colors::OwoColorize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

use super::{CommandOutput, connect};
use crate::cli::OutputOptions;
use crate::error::Result;
use crate::remote::RepairService;

#[derive(Tabled)]
struct CatalogRow {
    #[tabled(rename = "ID")]
    id: u64,
    #[tabled(rename = "Name")]
    name: String,
}

fn table<I: IntoIterator<Item = CatalogRow>>(rows: I) -> String {
    let rows: Vec<CatalogRow> = rows.into_iter().collect();
    if rows.is_empty() {
        return "  (none)".dimmed().to_string();
    }
    let mut table = Table::new(rows);
    table.with(Style::rounded());
    table.to_string()
}

/// List repair squads and statuses
pub async fn cmd_catalogs(output: OutputOptions) -> Result<()> {
    let (_, service) = connect()?;
    let catalogs = service.fetch_catalogs().await?;

    let text = format!(
        "{}\n{}\n\n{}\n{}",
        "Squads".green().bold(),
        table(catalogs.squads.iter().map(|s| CatalogRow {
            id: s.squad_id,
            name: s.squad_name.clone(),
        })),
        "Statuses".green().bold(),
        table(catalogs.statuses.iter().map(|s| CatalogRow {
            id: s.status_id,
            name: s.status_name.clone(),
        })),
    );

    CommandOutput::new(json!(catalogs)).with_text(text).print(output)
}
