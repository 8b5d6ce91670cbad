//! Repair record service: the four operations the backend exposes under
//! `/api/repair-management`.
//!
//! None of these touch local state. Callers decide what a success or failure
//! means for whatever they are displaying.

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;
use crate::types::{Catalogs, PotholeRepairRecord, ReportId};

use super::client::ApiClient;
use super::token::TokenProvider;

pub const API_PREFIX: &str = "/api/repair-management";

/// Operations on repair records.
///
/// Object safe so the view-model can be driven by a fake in tests.
#[async_trait]
pub trait RepairService: Send + Sync {
    /// Crew and status catalogs.
    async fn fetch_catalogs(&self) -> Result<Catalogs>;

    /// The report with its repair assignment, if any.
    async fn fetch_by_report_id(&self, id: ReportId) -> Result<PotholeRepairRecord>;

    /// Create or update the assignment of `record.pothole_id`.
    ///
    /// A record without `repair_id` creates a repair. Returns the backend's
    /// confirmation text.
    async fn save(&self, record: &PotholeRepairRecord) -> Result<String>;

    /// Remove the repair assignment of a report. Returns the backend's
    /// confirmation text.
    async fn delete(&self, id: ReportId) -> Result<String>;
}

/// [`RepairService`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpRepairService {
    client: ApiClient,
}

impl HttpRepairService {
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    pub fn from_config(config: &Config, tokens: Arc<dyn TokenProvider>) -> Result<Self> {
        Ok(Self::new(ApiClient::new(config, tokens)?))
    }
}

#[async_trait]
impl RepairService for HttpRepairService {
    async fn fetch_catalogs(&self) -> Result<Catalogs> {
        self.client.get_json(&format!("{API_PREFIX}/catalogs")).await
    }

    async fn fetch_by_report_id(&self, id: ReportId) -> Result<PotholeRepairRecord> {
        self.client.get_json(&format!("{API_PREFIX}/{id}")).await
    }

    async fn save(&self, record: &PotholeRepairRecord) -> Result<String> {
        tracing::info!(
            pothole_id = record.pothole_id,
            creating = !record.has_repair(),
            "saving repair assignment"
        );
        self.client
            .post_json_text(&format!("{API_PREFIX}/save"), record)
            .await
    }

    async fn delete(&self, id: ReportId) -> Result<String> {
        tracing::info!(pothole_id = id.get(), "deleting repair assignment");
        self.client
            .delete_text(&format!("{API_PREFIX}/delete/{id}"))
            .await
    }
}
