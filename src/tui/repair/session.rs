//! Effect execution for the repair manager.
//!
//! `run_effect` is the only place the view-model touches the network: it runs
//! one `RepairEffect` against a `RepairService` and turns the outcome into the
//! completion action the reducer expects. `RepairSession` strings reducer and
//! runner together without a terminal, which is how the headless tests drive
//! whole workflows.

use std::sync::Arc;

use crate::remote::RepairService;

use super::model::{RepairAction, RepairEffect, RepairState, ServiceFailure, reduce_repair_state};

/// Run one effect and return the completion action.
pub async fn run_effect(service: &dyn RepairService, effect: RepairEffect) -> RepairAction {
    match effect {
        RepairEffect::LoadCatalogs => {
            let result = service.fetch_catalogs().await;
            if let Err(e) = &result {
                tracing::warn!(error = %e, "failed to load catalogs");
            }
            RepairAction::CatalogsLoaded(result.map_err(ServiceFailure::from))
        }
        RepairEffect::FetchRecord(pending) => {
            tracing::debug!(
                pothole_id = pending.id.get(),
                request_id = pending.request_id,
                refresh = pending.refresh,
                "fetching report"
            );
            let result = service.fetch_by_report_id(pending.id).await;
            RepairAction::SearchCompleted {
                request_id: pending.request_id,
                result: result.map_err(ServiceFailure::from),
            }
        }
        RepairEffect::SaveRecord(record) => {
            let result = service.save(&record).await;
            if let Err(e) = &result {
                tracing::warn!(pothole_id = record.pothole_id, error = %e, "save failed");
            }
            RepairAction::SaveCompleted {
                submitted: record,
                result: result.map_err(ServiceFailure::from),
            }
        }
        RepairEffect::DeleteRepair(id) => {
            let result = service.delete(id).await;
            if let Err(e) = &result {
                tracing::warn!(pothole_id = id.get(), error = %e, "delete failed");
            }
            RepairAction::DeleteCompleted {
                id,
                result: result.map_err(ServiceFailure::from),
            }
        }
    }
}

/// Reducer plus service, without a UI.
pub struct RepairSession {
    state: RepairState,
    service: Arc<dyn RepairService>,
}

impl RepairSession {
    pub fn new(service: Arc<dyn RepairService>) -> Self {
        Self::with_state(service, RepairState::default())
    }

    pub fn with_state(service: Arc<dyn RepairService>, state: RepairState) -> Self {
        Self { state, service }
    }

    pub fn state(&self) -> &RepairState {
        &self.state
    }

    pub fn into_state(self) -> RepairState {
        self.state
    }

    /// Reduce an action without running its effect.
    ///
    /// The returned effect can be completed later with [`run_effect`] and
    /// [`RepairSession::apply`], which is how out-of-order completions are
    /// reproduced.
    pub fn apply(&mut self, action: RepairAction) -> Option<RepairEffect> {
        let (state, effect) = reduce_repair_state(self.state.clone(), action);
        self.state = state;
        effect
    }

    /// Reduce an action and run every effect it triggers to completion.
    pub async fn dispatch(&mut self, action: RepairAction) {
        let mut next = Some(action);
        while let Some(action) = next.take() {
            if let Some(effect) = self.apply(action) {
                next = Some(run_effect(self.service.as_ref(), effect).await);
            }
        }
    }

    /// Type `text` into the search box and submit it.
    pub async fn search(&mut self, text: &str) {
        self.dispatch(RepairAction::UpdateSearchInput(text.to_string()))
            .await;
        self.dispatch(RepairAction::Search).await;
    }
}
