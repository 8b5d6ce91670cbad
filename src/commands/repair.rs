use std::sync::Arc;

use iocraft::prelude::*;
use owo_colors::OwoColorize;

use super::connect;
use crate::error::{BachesError, Result};
use crate::logging::log_file_path;
use crate::remote::{RepairService, StoredTokenProvider, TokenStorage};
use crate::tui::RepairManager;
use crate::types::ReportId;

/// Launch the interactive repair manager
///
/// Logging has already been pointed at the log file by the caller; the
/// terminal belongs to the TUI until it exits.
pub async fn cmd_repair(initial_id: Option<ReportId>) -> Result<()> {
    let (config, service) = connect()?;

    let tokens = StoredTokenProvider::new(TokenStorage::default_location());
    if tokens.lookup().is_none() {
        eprintln!(
            "{} no access token stored; protected requests will be rejected. Run: baches token set <token>",
            "warning:".yellow().bold()
        );
    }

    tracing::info!(
        base_url = %config.base_url,
        log_file = %log_file_path().display(),
        "starting repair manager"
    );

    let service: Arc<dyn RepairService> = Arc::new(service);
    element!(RepairManager(
        service: Some(service),
        initial_id,
        notification_lifetime: Some(config.notification_lifetime()),
        subtitle: Some(config.base_url.clone()),
    ))
    .fullscreen()
    .await
    .map_err(|e| BachesError::Other(format!("TUI error: {e}")))
}
