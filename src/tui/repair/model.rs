//! Repair manager model types for testable state management
//!
//! This module separates state (`RepairState`) from view (`RepairViewModel`).
//! Every transition happens in `reduce_repair_state` in response to a discrete
//! action; anything that needs the network is returned as a `RepairEffect`
//! and comes back later as a completion action.

use std::time::{Duration, Instant};

use iocraft::prelude::{KeyCode, KeyModifiers};
use jiff::ToSpan;
use jiff::civil::Date;

use crate::config::DEFAULT_NOTIFICATION_MS;
use crate::error::{BachesError, FailureKind};
use crate::tui::components::footer::Shortcut;
use crate::tui::components::toast::Toast;
use crate::types::{
    AssignmentEdit, AssignmentField, Catalogs, PotholeRepairRecord, ReportId, cycle_entry,
};

use super::shortcuts::compute_repair_shortcuts;

pub const NOT_FOUND_MESSAGE: &str = "Este reporte de bache no existe o no se encontró.";
pub const SAVE_FAILED_MESSAGE: &str = "Error al guardar";
pub const DELETE_FAILED_MESSAGE: &str = "Error al eliminar";
pub const SAVED_MESSAGE: &str = "Reparación guardada";
pub const DELETED_MESSAGE: &str = "Reparación eliminada";
pub const CATALOGS_FAILED_MESSAGE: &str = "No se pudieron cargar los catálogos";
pub const CATALOGS_LOADED_MESSAGE: &str = "Catálogos cargados";
pub const UNSET_DATE: &str = "Sin fecha";

pub fn confirm_delete_prompt(id: ReportId) -> String {
    format!("¿Seguro que deseas eliminar la reparación del reporte #{id}?")
}

// ============================================================================
// State Types
// ============================================================================

/// Which part of the screen receives key presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Search,
    Form,
}

/// Derived screen mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairMode {
    /// Nothing fetched (or the last fetch failed)
    Idle,
    /// A record is cached and shown read-only
    Viewing,
    /// The edit buffer is live
    Editing,
}

/// An outstanding fetch of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingSearch {
    pub request_id: u64,
    pub id: ReportId,
    /// Issued after a save to pick up server-assigned fields
    pub refresh: bool,
}

/// Cloneable summary of a service failure carried by completion actions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceFailure {
    pub kind: FailureKind,
    pub message: String,
    /// Text the backend sent, if any
    pub backend_message: Option<String>,
}

impl ServiceFailure {
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            backend_message: None,
        }
    }

    pub fn with_backend_message(mut self, message: impl Into<String>) -> Self {
        self.backend_message = Some(message.into());
        self
    }

    /// The backend's text when present, otherwise `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        self.backend_message
            .clone()
            .unwrap_or_else(|| fallback.to_string())
    }
}

impl From<&BachesError> for ServiceFailure {
    fn from(error: &BachesError) -> Self {
        Self {
            kind: error.kind(),
            message: error.to_string(),
            backend_message: error.backend_message().map(str::to_string),
        }
    }
}

impl From<BachesError> for ServiceFailure {
    fn from(error: BachesError) -> Self {
        ServiceFailure::from(&error)
    }
}

/// Raw state that changes during user interaction
#[derive(Debug, Clone)]
pub struct RepairState {
    // Search
    /// Text of the search box; always empty or a positive integer
    pub search_input: String,
    /// Report the last search found missing (drives the warning banner)
    pub missing_report: Option<ReportId>,

    // Data
    /// Crew and status catalogs, once loaded
    pub catalogs: Option<Catalogs>,
    /// Last fetched record
    pub record: Option<PotholeRepairRecord>,
    /// Working copy while editing
    pub edit_buffer: Option<PotholeRepairRecord>,

    // Navigation
    pub focus: Focus,
    pub focused_field: AssignmentField,

    // Modals
    /// Report whose repair the open delete confirmation targets
    pub confirm_delete: Option<ReportId>,
    /// Optional toast notification to display
    pub toast: Option<Toast>,
    pub notification_lifetime: Duration,

    // In flight
    pub pending_search: Option<PendingSearch>,
    pub next_request_id: u64,
    pub saving: bool,
    pub deleting: bool,
    pub catalogs_loading: bool,

    /// Whether the application should exit
    pub should_exit: bool,
}

impl Default for RepairState {
    fn default() -> Self {
        Self {
            search_input: String::new(),
            missing_report: None,
            catalogs: None,
            record: None,
            edit_buffer: None,
            focus: Focus::default(),
            focused_field: AssignmentField::default(),
            confirm_delete: None,
            toast: None,
            notification_lifetime: Duration::from_millis(DEFAULT_NOTIFICATION_MS),
            pending_search: None,
            next_request_id: 1,
            saving: false,
            deleting: false,
            catalogs_loading: false,
            should_exit: false,
        }
    }
}

impl RepairState {
    pub fn with_notification_lifetime(mut self, lifetime: Duration) -> Self {
        self.notification_lifetime = lifetime;
        self
    }

    pub fn mode(&self) -> RepairMode {
        if self.edit_buffer.is_some() {
            RepairMode::Editing
        } else if self.record.is_some() {
            RepairMode::Viewing
        } else {
            RepairMode::Idle
        }
    }

    pub fn is_editing(&self) -> bool {
        self.edit_buffer.is_some()
    }

    /// The edit buffer when editing, otherwise the cached record
    pub fn displayed(&self) -> Option<&PotholeRepairRecord> {
        self.edit_buffer.as_ref().or(self.record.as_ref())
    }

    /// A user-initiated search is outstanding
    pub fn is_searching(&self) -> bool {
        self.pending_search.is_some_and(|p| !p.refresh)
    }

    pub fn can_delete(&self) -> bool {
        !self.deleting && self.displayed().is_some_and(|r| r.has_repair())
    }

    fn displayed_id(&self) -> Option<ReportId> {
        self.displayed().and_then(|r| r.report_id())
    }

    /// Drop an outstanding post-save refresh of `id`
    fn cancel_refresh(&mut self, id: ReportId) {
        if self.pending_search.is_some_and(|p| p.refresh && p.id == id) {
            self.pending_search = None;
        }
    }

    fn begin_fetch(&mut self, id: ReportId, refresh: bool) -> PendingSearch {
        let pending = PendingSearch {
            request_id: self.next_request_id,
            id,
            refresh,
        };
        self.next_request_id += 1;
        self.pending_search = Some(pending);
        pending
    }

    fn shows_report(&self, pothole_id: u64) -> bool {
        self.record
            .as_ref()
            .is_some_and(|r| r.pothole_id == pothole_id)
    }

    fn notify(&mut self, toast: Toast) {
        self.toast = Some(toast);
    }

    fn edit_focused(&mut self, edit: impl FnOnce(&PotholeRepairRecord, Option<&Catalogs>) -> Option<AssignmentEdit>) {
        let catalogs = self.catalogs.as_ref();
        if let Some(buffer) = self.edit_buffer.as_mut()
            && let Some(change) = edit(buffer, catalogs)
        {
            buffer.apply_edit(change);
        }
    }
}

// ============================================================================
// Action Types
// ============================================================================

/// Work the reducer asks the caller to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairEffect {
    LoadCatalogs,
    FetchRecord(PendingSearch),
    SaveRecord(PotholeRepairRecord),
    DeleteRepair(ReportId),
}

/// All possible actions on the repair manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepairAction {
    // Search
    /// Replace the search text; ignored unless empty or a positive integer
    UpdateSearchInput(String),
    Search,
    SearchCompleted {
        request_id: u64,
        result: Result<PotholeRepairRecord, ServiceFailure>,
    },

    // Editing
    BeginEdit,
    CancelEdit,
    EditField(AssignmentEdit),
    /// Step the focused field: next/previous catalog entry or +/- one day
    AdjustField { forward: bool },
    /// Move the focused date field by a number of days
    ShiftDate(i32),
    SetToday,
    ClearField,
    NextField,
    PrevField,
    Save,
    SaveCompleted {
        submitted: PotholeRepairRecord,
        result: Result<String, ServiceFailure>,
    },

    // Delete
    RequestDelete,
    ConfirmDelete,
    CancelDelete,
    DeleteCompleted {
        id: ReportId,
        result: Result<String, ServiceFailure>,
    },

    // Catalogs
    LoadCatalogs,
    CatalogsLoaded(Result<Catalogs, ServiceFailure>),

    // Notifications
    DismissNotification,
    ExpireNotification(Instant),

    // Focus and app
    FocusSearch,
    FocusForm,
    Quit,
}

// ============================================================================
// View Model Types
// ============================================================================

/// Computed view model for rendering the repair manager
#[derive(Debug, Clone)]
pub struct RepairViewModel {
    pub mode: RepairMode,
    pub search: SearchViewModel,
    /// Warning banner text
    pub banner: Option<String>,
    pub report: Option<ReportViewModel>,
    pub assignment: Option<AssignmentViewModel>,
    pub actions: Vec<ActionButton>,
    /// Confirmation prompt, when the delete guard is open
    pub confirm_prompt: Option<String>,
    pub toast: Option<Toast>,
    pub shortcuts: Vec<Shortcut>,
    /// Short status shown in the header
    pub status: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchViewModel {
    pub input: String,
    pub is_focused: bool,
    /// "Buscar" is enabled
    pub can_search: bool,
    pub is_searching: bool,
}

/// Read-only report panel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportViewModel {
    pub pothole_id: u64,
    pub citizen_name: String,
    pub date_reported: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssignmentViewModel {
    pub repair_id: Option<u64>,
    pub is_editable: bool,
    pub fields: Vec<FieldViewModel>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViewModel {
    pub field: AssignmentField,
    pub label: &'static str,
    pub value: String,
    pub is_set: bool,
    pub is_focused: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionButton {
    pub key: &'static str,
    pub label: String,
    pub enabled: bool,
}

impl ActionButton {
    fn new(key: &'static str, label: impl Into<String>, enabled: bool) -> Self {
        Self {
            key,
            label: label.into(),
            enabled,
        }
    }
}

// ============================================================================
// Pure Functions
// ============================================================================

/// Pure function: compute view model from state
pub fn compute_repair_view_model(state: &RepairState) -> RepairViewModel {
    let mode = state.mode();
    let displayed = state.displayed();
    let editing = state.is_editing();

    let report = displayed.map(|r| ReportViewModel {
        pothole_id: r.pothole_id,
        citizen_name: r.citizen_name.clone(),
        date_reported: r
            .date_reported
            .map(|d| d.strftime("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| UNSET_DATE.to_string()),
        location: r.location(),
    });

    let assignment = displayed.map(|r| {
        let fields = AssignmentField::ALL
            .iter()
            .map(|&field| {
                let (value, is_set) = field_display(r, field, state.catalogs.as_ref());
                FieldViewModel {
                    field,
                    label: field.label(),
                    value,
                    is_set,
                    is_focused: editing && state.focused_field == field,
                }
            })
            .collect();
        AssignmentViewModel {
            repair_id: r.repair_id,
            is_editable: editing,
            fields,
        }
    });

    let delete_button = ActionButton::new(
        "d",
        if state.deleting { "..." } else { "Eliminar" },
        state.can_delete(),
    );
    let actions = match mode {
        RepairMode::Idle => Vec::new(),
        RepairMode::Viewing => vec![ActionButton::new("e", "Modificar", true), delete_button],
        RepairMode::Editing => vec![
            ActionButton::new("Esc", "Cancelar", true),
            ActionButton::new(
                "C-s",
                if state.saving { "Guardando..." } else { "Guardar" },
                !state.saving,
            ),
            delete_button,
        ],
    };

    let status = if state.catalogs_loading {
        Some("Cargando catálogos...".to_string())
    } else if state.is_searching() {
        Some("Buscando...".to_string())
    } else {
        None
    };

    RepairViewModel {
        mode,
        search: SearchViewModel {
            input: state.search_input.clone(),
            is_focused: state.focus == Focus::Search && state.confirm_delete.is_none(),
            can_search: !state.search_input.is_empty() && !state.is_searching(),
            is_searching: state.is_searching(),
        },
        banner: state.missing_report.map(|_| NOT_FOUND_MESSAGE.to_string()),
        report,
        assignment,
        actions,
        confirm_prompt: state.confirm_delete.map(confirm_delete_prompt),
        toast: state.toast.clone(),
        shortcuts: compute_repair_shortcuts(state),
        status,
    }
}

fn field_display(
    record: &PotholeRepairRecord,
    field: AssignmentField,
    catalogs: Option<&Catalogs>,
) -> (String, bool) {
    let empty = Catalogs::default();
    let catalogs = catalogs.unwrap_or(&empty);
    match field {
        AssignmentField::Squad => (
            catalogs.squad_label(record.squad_id),
            record.squad_id.is_some(),
        ),
        AssignmentField::Status => (
            catalogs.status_label(record.status_id),
            record.status_id.is_some(),
        ),
        AssignmentField::StartDate | AssignmentField::EndDate => match record.date_of(field) {
            Some(date) => (date.to_string(), true),
            None => (UNSET_DATE.to_string(), false),
        },
    }
}

fn today() -> Date {
    jiff::Zoned::now().date()
}

fn shift_date(date: Date, days: i32) -> Date {
    date.checked_add(days.days()).unwrap_or(date)
}

/// Pure function: apply action to state (reducer pattern)
///
/// Returns the new state and, when the action needs I/O, the effect to run.
/// The effect's outcome must be fed back as the matching `*Completed` /
/// `CatalogsLoaded` action.
pub fn reduce_repair_state(
    mut state: RepairState,
    action: RepairAction,
) -> (RepairState, Option<RepairEffect>) {
    let mut effect = None;

    match action {
        // Search
        RepairAction::UpdateSearchInput(text) => {
            if text.is_empty()
                || (text.chars().all(|c| c.is_ascii_digit()) && text.parse::<ReportId>().is_ok())
            {
                state.search_input = text;
            }
        }
        RepairAction::Search => {
            let Ok(id) = state.search_input.parse::<ReportId>() else {
                return (state, None);
            };
            if state
                .pending_search
                .is_some_and(|p| p.id == id && !p.refresh)
            {
                return (state, None);
            }
            state.edit_buffer = None;
            state.focus = Focus::Form;
            let pending = state.begin_fetch(id, false);
            effect = Some(RepairEffect::FetchRecord(pending));
        }
        RepairAction::SearchCompleted { request_id, result } => {
            let Some(pending) = state.pending_search else {
                return (state, None);
            };
            if pending.request_id != request_id {
                // Superseded by a newer search
                return (state, None);
            }
            state.pending_search = None;

            match (result, pending.refresh) {
                (Ok(record), false) => {
                    state.edit_buffer = None;
                    state.missing_report = None;
                    state.record = Some(record);
                }
                (Ok(record), true) => {
                    if let Some(buffer) = state.edit_buffer.as_mut()
                        && buffer.pothole_id == record.pothole_id
                        && buffer.repair_id.is_none()
                    {
                        buffer.repair_id = record.repair_id;
                    }
                    state.missing_report = None;
                    state.record = Some(record);
                }
                (Err(failure), false) => {
                    state.record = None;
                    state.edit_buffer = None;
                    if failure.kind == FailureKind::NotFound {
                        state.missing_report = Some(pending.id);
                        state.notify(Toast::warning(NOT_FOUND_MESSAGE));
                    } else {
                        state.missing_report = None;
                        state.notify(Toast::error(failure.user_message(&failure.message)));
                    }
                }
                (Err(failure), true) => {
                    state.notify(Toast::warning(format!(
                        "No se pudo actualizar el reporte #{}: {}",
                        pending.id,
                        failure.user_message(&failure.message)
                    )));
                }
            }

            // An open confirmation only ever targets the report on screen
            if state.confirm_delete.is_some() && state.confirm_delete != state.displayed_id() {
                state.confirm_delete = None;
            }
        }

        // Editing
        RepairAction::BeginEdit => {
            if state.edit_buffer.is_none()
                && let Some(record) = state.record.clone()
            {
                state.edit_buffer = Some(record);
                state.focused_field = AssignmentField::default();
                state.focus = Focus::Form;
            }
        }
        RepairAction::CancelEdit => {
            state.edit_buffer = None;
        }
        RepairAction::EditField(edit) => {
            if let Some(buffer) = state.edit_buffer.as_mut() {
                buffer.apply_edit(edit);
            }
        }
        RepairAction::AdjustField { forward } => {
            let field = state.focused_field;
            state.edit_focused(|record, catalogs| {
                let empty = Catalogs::default();
                let catalogs = catalogs.unwrap_or(&empty);
                match field {
                    AssignmentField::Squad => Some(AssignmentEdit::Squad(cycle_entry(
                        &catalogs.squads,
                        record.squad_id,
                        forward,
                    ))),
                    AssignmentField::Status => Some(AssignmentEdit::Status(cycle_entry(
                        &catalogs.statuses,
                        record.status_id,
                        forward,
                    ))),
                    AssignmentField::StartDate | AssignmentField::EndDate => {
                        let next = match record.date_of(field) {
                            Some(date) => shift_date(date, if forward { 1 } else { -1 }),
                            None => today(),
                        };
                        AssignmentEdit::date(field, Some(next))
                    }
                }
            });
        }
        RepairAction::ShiftDate(days) => {
            let field = state.focused_field;
            state.edit_focused(|record, _| {
                let base = record.date_of(field).unwrap_or_else(today);
                AssignmentEdit::date(field, Some(shift_date(base, days)))
            });
        }
        RepairAction::SetToday => {
            let field = state.focused_field;
            state.edit_focused(|_, _| AssignmentEdit::date(field, Some(today())));
        }
        RepairAction::ClearField => {
            let field = state.focused_field;
            state.edit_focused(|_, _| Some(field.cleared()));
        }
        RepairAction::NextField => {
            if state.is_editing() {
                state.focused_field = state.focused_field.next();
            }
        }
        RepairAction::PrevField => {
            if state.is_editing() {
                state.focused_field = state.focused_field.prev();
            }
        }
        RepairAction::Save => {
            if !state.saving
                && let Some(buffer) = state.edit_buffer.clone()
            {
                state.saving = true;
                effect = Some(RepairEffect::SaveRecord(buffer));
            }
        }
        RepairAction::SaveCompleted { submitted, result } => {
            state.saving = false;
            match result {
                Ok(message) => {
                    let message = message.trim();
                    state.notify(Toast::success(if message.is_empty() {
                        SAVED_MESSAGE
                    } else {
                        message
                    }));

                    if !state.shows_report(submitted.pothole_id) {
                        return (state, None);
                    }
                    if state
                        .edit_buffer
                        .as_ref()
                        .is_some_and(|b| b.pothole_id == submitted.pothole_id)
                    {
                        state.edit_buffer = None;
                    }
                    let id = submitted.report_id();
                    state.record = Some(submitted);

                    // Pick up the server-assigned repair id unless the user
                    // already moved on to another report
                    if let Some(id) = id
                        && state.pending_search.is_none_or(|p| p.id == id)
                    {
                        let pending = state.begin_fetch(id, true);
                        effect = Some(RepairEffect::FetchRecord(pending));
                    }
                }
                Err(failure) => {
                    state.notify(Toast::error(failure.user_message(SAVE_FAILED_MESSAGE)));
                }
            }
        }

        // Delete
        RepairAction::RequestDelete => {
            if state.can_delete() {
                state.confirm_delete = state.displayed_id();
            }
        }
        RepairAction::ConfirmDelete => {
            let Some(target) = state.confirm_delete.take() else {
                return (state, None);
            };
            if state.displayed_id() == Some(target) && state.can_delete() {
                state.deleting = true;
                state.cancel_refresh(target);
                effect = Some(RepairEffect::DeleteRepair(target));
            }
        }
        RepairAction::CancelDelete => {
            state.confirm_delete = None;
        }
        RepairAction::DeleteCompleted { id, result } => {
            state.deleting = false;
            match result {
                Ok(message) => {
                    let message = message.trim();
                    state.notify(Toast::success(if message.is_empty() {
                        DELETED_MESSAGE
                    } else {
                        message
                    }));
                    state.cancel_refresh(id);
                    if state.shows_report(id.get()) {
                        if let Some(record) = state.record.as_mut() {
                            record.clear_assignment();
                        }
                        state.edit_buffer = None;
                    }
                }
                Err(failure) => {
                    state.notify(Toast::error(failure.user_message(DELETE_FAILED_MESSAGE)));
                }
            }
        }

        // Catalogs
        RepairAction::LoadCatalogs => {
            if !state.catalogs_loading && state.catalogs.is_none() {
                state.catalogs_loading = true;
                effect = Some(RepairEffect::LoadCatalogs);
            }
        }
        RepairAction::CatalogsLoaded(result) => {
            state.catalogs_loading = false;
            match result {
                Ok(catalogs) => {
                    state.catalogs = Some(catalogs);
                    // Replace a stale retry hint once a reload succeeds
                    if state
                        .toast
                        .as_ref()
                        .is_some_and(|t| t.message.starts_with(CATALOGS_FAILED_MESSAGE))
                    {
                        state.notify(Toast::info(CATALOGS_LOADED_MESSAGE));
                    }
                }
                Err(failure) => state.notify(Toast::error(format!(
                    "{CATALOGS_FAILED_MESSAGE}: {} (r para reintentar)",
                    failure.user_message(&failure.message)
                ))),
            }
        }

        // Notifications
        RepairAction::DismissNotification => {
            state.toast = None;
        }
        RepairAction::ExpireNotification(now) => {
            if state
                .toast
                .as_ref()
                .is_some_and(|t| t.is_expired(now, state.notification_lifetime))
            {
                state.toast = None;
            }
        }

        // Focus and app
        RepairAction::FocusSearch => {
            state.focus = Focus::Search;
        }
        RepairAction::FocusForm => {
            state.focus = Focus::Form;
        }
        RepairAction::Quit => {
            state.should_exit = true;
        }
    }

    (state, effect)
}

/// Convert a key event to a RepairAction based on current state
pub fn key_to_action(
    code: KeyCode,
    modifiers: KeyModifiers,
    state: &RepairState,
) -> Option<RepairAction> {
    // Delete confirmation captures all input
    if state.confirm_delete.is_some() {
        return match code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                Some(RepairAction::ConfirmDelete)
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Char('c') | KeyCode::Esc => {
                Some(RepairAction::CancelDelete)
            }
            _ => None,
        };
    }

    if code == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
        return Some(RepairAction::Quit);
    }

    if state.focus == Focus::Search {
        return search_key_to_action(code, modifiers, state);
    }

    if state.is_editing() {
        return edit_key_to_action(code, modifiers, state);
    }

    normal_key_to_action(code, modifiers)
}

fn search_key_to_action(
    code: KeyCode,
    modifiers: KeyModifiers,
    state: &RepairState,
) -> Option<RepairAction> {
    match code {
        KeyCode::Enter => Some(RepairAction::Search),
        KeyCode::Esc | KeyCode::Tab => Some(RepairAction::FocusForm),
        KeyCode::Backspace => {
            let mut text = state.search_input.clone();
            text.pop();
            Some(RepairAction::UpdateSearchInput(text))
        }
        KeyCode::Char(c)
            if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(RepairAction::UpdateSearchInput(format!(
                "{}{c}",
                state.search_input
            )))
        }
        _ => None,
    }
}

fn edit_key_to_action(
    code: KeyCode,
    modifiers: KeyModifiers,
    state: &RepairState,
) -> Option<RepairAction> {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('s') => Some(RepairAction::Save),
            _ => None,
        };
    }

    let on_date = state.focused_field.is_date();
    match code {
        KeyCode::Esc => Some(RepairAction::CancelEdit),
        KeyCode::Tab | KeyCode::Down | KeyCode::Char('j') => Some(RepairAction::NextField),
        KeyCode::BackTab | KeyCode::Up | KeyCode::Char('k') => Some(RepairAction::PrevField),
        KeyCode::Right | KeyCode::Char('l') | KeyCode::Char(' ') => {
            Some(RepairAction::AdjustField { forward: true })
        }
        KeyCode::Left | KeyCode::Char('h') => Some(RepairAction::AdjustField { forward: false }),
        KeyCode::Char(']') if on_date => Some(RepairAction::ShiftDate(7)),
        KeyCode::Char('[') if on_date => Some(RepairAction::ShiftDate(-7)),
        KeyCode::Char('t') if on_date => Some(RepairAction::SetToday),
        KeyCode::Backspace | KeyCode::Delete | KeyCode::Char('x') => {
            Some(RepairAction::ClearField)
        }
        KeyCode::Char('d') => Some(RepairAction::RequestDelete),
        _ => None,
    }
}

fn normal_key_to_action(code: KeyCode, modifiers: KeyModifiers) -> Option<RepairAction> {
    if modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }

    match code {
        KeyCode::Char('/') => Some(RepairAction::FocusSearch),
        KeyCode::Char('e') | KeyCode::Enter => Some(RepairAction::BeginEdit),
        KeyCode::Char('d') => Some(RepairAction::RequestDelete),
        KeyCode::Char('r') => Some(RepairAction::LoadCatalogs),
        KeyCode::Char('x') => Some(RepairAction::DismissNotification),
        KeyCode::Char('q') | KeyCode::Esc => Some(RepairAction::Quit),
        _ => None,
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RepairStatus, Squad};
    use jiff::civil::date;

    fn id(n: u64) -> ReportId {
        ReportId::new(n).unwrap()
    }

    fn report(pothole_id: u64) -> PotholeRepairRecord {
        PotholeRepairRecord {
            citizen_name: "Ana".to_string(),
            street_name: "Hidalgo".to_string(),
            between_streets: "Morelos y Allende".to_string(),
            ..PotholeRepairRecord::new(pothole_id)
        }
    }

    fn repaired(pothole_id: u64) -> PotholeRepairRecord {
        PotholeRepairRecord {
            repair_id: Some(7),
            squad_id: Some(1),
            start_date: Some(date(2025, 3, 1)),
            end_date: Some(date(2025, 3, 4)),
            status_id: Some(2),
            ..report(pothole_id)
        }
    }

    fn catalogs() -> Catalogs {
        Catalogs {
            squads: vec![
                Squad { squad_id: 1, squad_name: "Norte".into() },
                Squad { squad_id: 3, squad_name: "Sur".into() },
            ],
            statuses: vec![
                RepairStatus { status_id: 1, status_name: "Pendiente".into() },
                RepairStatus { status_id: 2, status_name: "En proceso".into() },
            ],
        }
    }

    fn not_found() -> ServiceFailure {
        ServiceFailure::new(FailureKind::NotFound, "not found")
    }

    fn reduce(state: RepairState, action: RepairAction) -> RepairState {
        reduce_repair_state(state, action).0
    }

    /// Type `text` and submit; returns the state and the fetch request
    fn search(state: RepairState, text: &str) -> (RepairState, PendingSearch) {
        let state = reduce(state, RepairAction::UpdateSearchInput(text.to_string()));
        match reduce_repair_state(state, RepairAction::Search) {
            (state, Some(RepairEffect::FetchRecord(pending))) => (state, pending),
            (_, other) => panic!("expected a fetch, got {other:?}"),
        }
    }

    fn viewing(record: PotholeRepairRecord) -> RepairState {
        let text = record.pothole_id.to_string();
        let (state, pending) = search(RepairState::default(), &text);
        reduce(
            state,
            RepairAction::SearchCompleted {
                request_id: pending.request_id,
                result: Ok(record),
            },
        )
    }

    fn editing(record: PotholeRepairRecord) -> RepairState {
        reduce(viewing(record), RepairAction::BeginEdit)
    }

    // ========================================================================
    // Search
    // ========================================================================

    #[test]
    fn test_search_issues_one_fetch_and_shows_record() {
        for n in [1u64, 42, 999, u64::from(u32::MAX)] {
            let (state, pending) = search(RepairState::default(), &n.to_string());
            assert_eq!(pending.id.get(), n);
            assert!(!pending.refresh);
            assert!(state.is_searching());

            let state = reduce(
                state,
                RepairAction::SearchCompleted {
                    request_id: pending.request_id,
                    result: Ok(report(n)),
                },
            );
            assert_eq!(state.mode(), RepairMode::Viewing);
            assert_eq!(state.displayed().unwrap().pothole_id, n);
            assert!(state.pending_search.is_none());
        }
    }

    #[test]
    fn test_search_rejected_for_invalid_ids() {
        for text in ["", "0", "-5", "abc"] {
            let state = RepairState {
                search_input: text.to_string(),
                ..RepairState::default()
            };
            let (state, effect) = reduce_repair_state(state, RepairAction::Search);
            assert_eq!(effect, None, "fetched for {text:?}");
            assert!(state.pending_search.is_none());
        }
    }

    #[test]
    fn test_search_input_shaping() {
        let state = reduce(RepairState::default(), RepairAction::UpdateSearchInput("12".into()));
        assert_eq!(state.search_input, "12");
        for rejected in ["12a", "-1", "0", " 3", "1.5"] {
            let next = reduce(state.clone(), RepairAction::UpdateSearchInput(rejected.into()));
            assert_eq!(next.search_input, "12", "accepted {rejected:?}");
        }
        let state = reduce(state, RepairAction::UpdateSearchInput(String::new()));
        assert_eq!(state.search_input, "");
    }

    #[test]
    fn test_duplicate_search_is_ignored_while_outstanding() {
        let (state, _) = search(RepairState::default(), "42");
        let (state, effect) = reduce_repair_state(state, RepairAction::Search);
        assert_eq!(effect, None);

        // A different id supersedes
        let (_, pending) = search(state, "43");
        assert_eq!(pending.id.get(), 43);
    }

    #[test]
    fn test_stale_search_completion_is_discarded() {
        let (state, first) = search(RepairState::default(), "1");
        let (state, second) = search(state, "2");

        let state = reduce(
            state,
            RepairAction::SearchCompleted {
                request_id: first.request_id,
                result: Ok(report(1)),
            },
        );
        assert!(state.record.is_none());
        assert!(state.is_searching());

        let state = reduce(
            state,
            RepairAction::SearchCompleted {
                request_id: second.request_id,
                result: Ok(report(2)),
            },
        );
        assert_eq!(state.record.unwrap().pothole_id, 2);
    }

    #[test]
    fn test_not_found_keeps_input_and_clears_record() {
        let state = viewing(report(42));
        let (state, pending) = search(state, "999");
        let state = reduce(
            state,
            RepairAction::SearchCompleted {
                request_id: pending.request_id,
                result: Err(not_found()),
            },
        );

        assert_eq!(state.search_input, "999");
        assert!(state.record.is_none());
        assert_eq!(state.mode(), RepairMode::Idle);
        assert_eq!(state.missing_report, Some(id(999)));

        let vm = compute_repair_view_model(&state);
        assert_eq!(vm.banner.as_deref(), Some(NOT_FOUND_MESSAGE));
        assert!(vm.report.is_none());
        assert_eq!(vm.toast.unwrap().level, crate::tui::components::toast::ToastLevel::Warning);
    }

    #[test]
    fn test_network_failure_shows_error_without_banner() {
        let (state, pending) = search(RepairState::default(), "5");
        let failure = ServiceFailure::new(FailureKind::Network, "timed out");
        let state = reduce(
            state,
            RepairAction::SearchCompleted {
                request_id: pending.request_id,
                result: Err(failure),
            },
        );
        assert!(state.missing_report.is_none());
        let toast = state.toast.unwrap();
        assert_eq!(toast.level, crate::tui::components::toast::ToastLevel::Error);
        assert_eq!(toast.message, "timed out");
    }

    #[test]
    fn test_successful_search_clears_banner() {
        let (state, pending) = search(RepairState::default(), "999");
        let state = reduce(
            state,
            RepairAction::SearchCompleted {
                request_id: pending.request_id,
                result: Err(not_found()),
            },
        );
        let (state, pending) = search(state, "42");
        let state = reduce(
            state,
            RepairAction::SearchCompleted {
                request_id: pending.request_id,
                result: Ok(report(42)),
            },
        );
        assert!(state.missing_report.is_none());
    }

    #[test]
    fn test_search_drops_edit_buffer() {
        let state = editing(repaired(42));
        let state = reduce(state, RepairAction::EditField(AssignmentEdit::Squad(Some(3))));
        let (state, _) = search(state, "43");
        assert!(!state.is_editing());
        assert_eq!(state.record.as_ref().unwrap().squad_id, Some(1));
    }

    // ========================================================================
    // Editing
    // ========================================================================

    #[test]
    fn test_begin_then_cancel_restores_cached_record() {
        let before = viewing(repaired(42));
        let cached = before.record.clone();

        let state = reduce(before, RepairAction::BeginEdit);
        assert_eq!(state.mode(), RepairMode::Editing);
        let state = reduce(state, RepairAction::EditField(AssignmentEdit::Status(Some(1))));
        let state = reduce(state, RepairAction::CancelEdit);

        assert_eq!(state.mode(), RepairMode::Viewing);
        assert_eq!(state.displayed().cloned(), cached);
    }

    #[test]
    fn test_begin_edit_requires_record() {
        let state = reduce(RepairState::default(), RepairAction::BeginEdit);
        assert_eq!(state.mode(), RepairMode::Idle);
    }

    #[test]
    fn test_last_edit_wins_without_network() {
        let state = editing(report(42));
        let (state, first) =
            reduce_repair_state(state, RepairAction::EditField(AssignmentEdit::Squad(Some(3))));
        let (state, second) =
            reduce_repair_state(state, RepairAction::EditField(AssignmentEdit::Squad(Some(5))));
        assert_eq!(first, None);
        assert_eq!(second, None);
        assert_eq!(state.edit_buffer.as_ref().unwrap().squad_id, Some(5));
        assert_eq!(state.record.as_ref().unwrap().squad_id, None);
    }

    #[test]
    fn test_edit_ignored_outside_editing() {
        let state = viewing(report(42));
        let state = reduce(state, RepairAction::EditField(AssignmentEdit::Squad(Some(3))));
        assert_eq!(state.displayed().unwrap().squad_id, None);
    }

    #[test]
    fn test_adjust_cycles_catalog_entries() {
        let mut state = editing(report(42));
        state.catalogs = Some(catalogs());

        let state = reduce(state, RepairAction::AdjustField { forward: true });
        assert_eq!(state.edit_buffer.as_ref().unwrap().squad_id, Some(1));
        let state = reduce(state, RepairAction::AdjustField { forward: true });
        assert_eq!(state.edit_buffer.as_ref().unwrap().squad_id, Some(3));
        let state = reduce(state, RepairAction::AdjustField { forward: true });
        assert_eq!(state.edit_buffer.as_ref().unwrap().squad_id, None);

        let state = reduce(state, RepairAction::PrevField);
        assert_eq!(state.focused_field, AssignmentField::Status);
        let state = reduce(state, RepairAction::AdjustField { forward: false });
        assert_eq!(state.edit_buffer.as_ref().unwrap().status_id, Some(2));
    }

    #[test]
    fn test_date_editing() {
        let state = editing(repaired(42));
        let state = reduce(state, RepairAction::NextField);
        assert_eq!(state.focused_field, AssignmentField::StartDate);

        let state = reduce(state, RepairAction::AdjustField { forward: true });
        assert_eq!(state.edit_buffer.as_ref().unwrap().start_date, Some(date(2025, 3, 2)));
        let state = reduce(state, RepairAction::ShiftDate(-7));
        assert_eq!(state.edit_buffer.as_ref().unwrap().start_date, Some(date(2025, 2, 23)));
        let state = reduce(state, RepairAction::ClearField);
        assert_eq!(state.edit_buffer.as_ref().unwrap().start_date, None);
        let state = reduce(state, RepairAction::SetToday);
        assert!(state.edit_buffer.as_ref().unwrap().start_date.is_some());
        assert_eq!(state.edit_buffer.as_ref().unwrap().end_date, Some(date(2025, 3, 4)));
    }

    // ========================================================================
    // Save
    // ========================================================================

    #[test]
    fn test_save_emits_buffer_once() {
        let state = editing(report(42));
        let state = reduce(state, RepairAction::EditField(AssignmentEdit::Squad(Some(1))));
        let (state, effect) = reduce_repair_state(state, RepairAction::Save);
        let Some(RepairEffect::SaveRecord(sent)) = effect else {
            panic!("expected save effect");
        };
        assert_eq!(sent.squad_id, Some(1));
        assert_eq!(sent.repair_id, None);
        assert!(state.saving);

        let (state, effect) = reduce_repair_state(state, RepairAction::Save);
        assert_eq!(effect, None);
        assert!(state.saving);
    }

    #[test]
    fn test_save_success_exits_editing_and_refreshes() {
        let state = editing(report(42));
        let state = reduce(state, RepairAction::EditField(AssignmentEdit::Squad(Some(1))));
        let (state, effect) = reduce_repair_state(state, RepairAction::Save);
        let Some(RepairEffect::SaveRecord(sent)) = effect else {
            panic!("expected save effect");
        };

        let (state, effect) = reduce_repair_state(
            state,
            RepairAction::SaveCompleted {
                submitted: sent,
                result: Ok("Reparación registrada".into()),
            },
        );
        assert!(!state.saving);
        assert_eq!(state.mode(), RepairMode::Viewing);
        assert_eq!(state.record.as_ref().unwrap().squad_id, Some(1));
        assert_eq!(state.toast.as_ref().unwrap().message, "Reparación registrada");

        let Some(RepairEffect::FetchRecord(refresh)) = effect else {
            panic!("expected refresh");
        };
        assert!(refresh.refresh);
        assert_eq!(refresh.id.get(), 42);
        assert!(!state.is_searching());
    }

    #[test]
    fn test_save_failure_keeps_edits() {
        let state = editing(report(42));
        let state = reduce(state, RepairAction::EditField(AssignmentEdit::Status(Some(2))));
        let (state, effect) = reduce_repair_state(state, RepairAction::Save);
        let Some(RepairEffect::SaveRecord(sent)) = effect else {
            panic!("expected save effect");
        };

        let failure = ServiceFailure::new(FailureKind::Validation, "rejected")
            .with_backend_message("La fecha fin es anterior al inicio");
        let state = reduce(
            state,
            RepairAction::SaveCompleted {
                submitted: sent.clone(),
                result: Err(failure),
            },
        );
        assert_eq!(state.mode(), RepairMode::Editing);
        assert_eq!(state.edit_buffer.as_ref(), Some(&sent));
        assert_eq!(
            state.toast.as_ref().unwrap().message,
            "La fecha fin es anterior al inicio"
        );

        let (state, _) = reduce_repair_state(state, RepairAction::Save);
        let state = reduce(
            state,
            RepairAction::SaveCompleted {
                submitted: sent,
                result: Err(ServiceFailure::new(FailureKind::Network, "timed out")),
            },
        );
        assert_eq!(state.toast.unwrap().message, SAVE_FAILED_MESSAGE);
    }

    #[test]
    fn test_save_completion_for_other_record_does_not_mutate_display() {
        let state = editing(report(42));
        let (state, effect) = reduce_repair_state(state, RepairAction::Save);
        let Some(RepairEffect::SaveRecord(sent)) = effect else {
            panic!("expected save effect");
        };

        let (state, pending) = search(state, "43");
        let state = reduce(
            state,
            RepairAction::SearchCompleted {
                request_id: pending.request_id,
                result: Ok(report(43)),
            },
        );
        let (state, effect) = reduce_repair_state(
            state,
            RepairAction::SaveCompleted {
                submitted: sent,
                result: Ok("ok".into()),
            },
        );
        assert_eq!(effect, None);
        assert_eq!(state.record.unwrap().pothole_id, 43);
    }

    #[test]
    fn test_refresh_failure_keeps_record() {
        let state = editing(report(42));
        let (state, effect) = reduce_repair_state(state, RepairAction::Save);
        let Some(RepairEffect::SaveRecord(sent)) = effect else {
            panic!("expected save effect");
        };
        let (state, effect) = reduce_repair_state(
            state,
            RepairAction::SaveCompleted {
                submitted: sent,
                result: Ok("ok".into()),
            },
        );
        let Some(RepairEffect::FetchRecord(refresh)) = effect else {
            panic!("expected refresh");
        };
        let state = reduce(
            state,
            RepairAction::SearchCompleted {
                request_id: refresh.request_id,
                result: Err(ServiceFailure::new(FailureKind::Network, "down")),
            },
        );
        assert_eq!(state.record.unwrap().pothole_id, 42);
        assert!(state.missing_report.is_none());
    }

    // ========================================================================
    // Delete
    // ========================================================================

    #[test]
    fn test_delete_requires_repair_and_confirmation() {
        let state = viewing(report(42));
        let state = reduce(state, RepairAction::RequestDelete);
        assert_eq!(state.confirm_delete, None);

        let state = viewing(repaired(42));
        let (state, effect) = reduce_repair_state(state, RepairAction::RequestDelete);
        assert_eq!(state.confirm_delete, Some(id(42)));
        assert_eq!(effect, None);
        assert_eq!(
            compute_repair_view_model(&state).confirm_prompt.as_deref(),
            Some("¿Seguro que deseas eliminar la reparación del reporte #42?")
        );

        let state = reduce(state, RepairAction::CancelDelete);
        assert_eq!(state.confirm_delete, None);
        assert!(!state.deleting);

        let state = reduce(state, RepairAction::RequestDelete);
        let (state, effect) = reduce_repair_state(state, RepairAction::ConfirmDelete);
        assert_eq!(effect, Some(RepairEffect::DeleteRepair(id(42))));
        assert!(state.deleting);
        assert!(!state.can_delete());
    }

    #[test]
    fn test_delete_success_clears_assignment_only() {
        let state = editing(repaired(42));
        let state = reduce(state, RepairAction::RequestDelete);
        let state = reduce(state, RepairAction::ConfirmDelete);
        let state = reduce(
            state,
            RepairAction::DeleteCompleted {
                id: id(42),
                result: Ok(String::new()),
            },
        );

        assert_eq!(state.mode(), RepairMode::Viewing);
        let record = state.record.as_ref().unwrap();
        assert_eq!(record.repair_id, None);
        assert_eq!(record.squad_id, None);
        assert_eq!(record.start_date, None);
        assert_eq!(record.end_date, None);
        assert_eq!(record.status_id, None);
        assert_eq!(record.pothole_id, 42);
        assert_eq!(record.citizen_name, "Ana");
        assert_eq!(record.street_name, "Hidalgo");
        assert_eq!(record.between_streets, "Morelos y Allende");
        assert_eq!(state.toast.unwrap().message, DELETED_MESSAGE);
    }

    #[test]
    fn test_delete_failure_leaves_state() {
        let state = viewing(repaired(42));
        let state = reduce(state, RepairAction::RequestDelete);
        let state = reduce(state, RepairAction::ConfirmDelete);
        let state = reduce(
            state,
            RepairAction::DeleteCompleted {
                id: id(42),
                result: Err(not_found()),
            },
        );
        assert_eq!(state.record.unwrap(), repaired(42));
        assert!(!state.deleting);
        assert_eq!(state.toast.unwrap().message, DELETE_FAILED_MESSAGE);
    }

    #[test]
    fn test_delete_completion_for_other_record_is_ignored() {
        let state = viewing(repaired(43));
        let state = reduce(
            state,
            RepairAction::DeleteCompleted {
                id: id(42),
                result: Ok("ok".into()),
            },
        );
        assert_eq!(state.record.unwrap(), repaired(43));
    }

    #[test]
    fn test_confirmation_closes_when_another_report_arrives() {
        let (state, pending) = search(viewing(repaired(42)), "43");
        let state = reduce(state, RepairAction::RequestDelete);
        assert_eq!(state.confirm_delete, Some(id(42)));

        let state = reduce(
            state,
            RepairAction::SearchCompleted {
                request_id: pending.request_id,
                result: Ok(repaired(43)),
            },
        );
        assert_eq!(state.confirm_delete, None);
        assert!(compute_repair_view_model(&state).confirm_prompt.is_none());

        let (state, effect) = reduce_repair_state(state, RepairAction::ConfirmDelete);
        assert_eq!(effect, None);
        assert!(!state.deleting);
    }

    #[test]
    fn test_confirm_never_deletes_a_report_other_than_the_one_confirmed() {
        let mut state = viewing(repaired(42));
        state = reduce(state, RepairAction::RequestDelete);
        // Swap the record underneath an open dialog
        state.record = Some(repaired(43));

        let (state, effect) = reduce_repair_state(state, RepairAction::ConfirmDelete);
        assert_eq!(effect, None);
        assert_eq!(state.confirm_delete, None);
        assert!(!state.deleting);
    }

    #[test]
    fn test_confirmation_survives_refresh_of_same_report() {
        let state = viewing(repaired(42));
        let (state, pending) = search(state, "42");
        let state = reduce(state, RepairAction::RequestDelete);
        let state = reduce(
            state,
            RepairAction::SearchCompleted {
                request_id: pending.request_id,
                result: Ok(repaired(42)),
            },
        );
        assert_eq!(state.confirm_delete, Some(id(42)));
    }

    #[test]
    fn test_late_refresh_does_not_restore_deleted_repair() {
        let state = editing(repaired(42));
        let state = reduce(state, RepairAction::EditField(AssignmentEdit::Status(Some(1))));
        let (state, effect) = reduce_repair_state(state, RepairAction::Save);
        let Some(RepairEffect::SaveRecord(sent)) = effect else {
            panic!("expected save effect");
        };
        let (state, effect) = reduce_repair_state(
            state,
            RepairAction::SaveCompleted {
                submitted: sent,
                result: Ok("ok".into()),
            },
        );
        let Some(RepairEffect::FetchRecord(refresh)) = effect else {
            panic!("expected refresh");
        };

        let state = reduce(state, RepairAction::RequestDelete);
        let (state, effect) = reduce_repair_state(state, RepairAction::ConfirmDelete);
        assert_eq!(effect, Some(RepairEffect::DeleteRepair(id(42))));
        assert!(state.pending_search.is_none());

        let state = reduce(
            state,
            RepairAction::DeleteCompleted {
                id: id(42),
                result: Ok(String::new()),
            },
        );
        // Answered by the server before the delete landed
        let state = reduce(
            state,
            RepairAction::SearchCompleted {
                request_id: refresh.request_id,
                result: Ok(repaired(42)),
            },
        );

        let record = state.record.as_ref().unwrap();
        assert_eq!(record.repair_id, None);
        assert_eq!(record.squad_id, None);
        assert!(!state.can_delete());
    }

    #[test]
    fn test_delete_success_drops_pending_refresh_of_same_report() {
        let mut state = viewing(repaired(42));
        state.begin_fetch(id(42), true);
        let state = reduce(
            state,
            RepairAction::DeleteCompleted {
                id: id(42),
                result: Ok("ok".into()),
            },
        );
        assert!(state.pending_search.is_none());

        let mut state = viewing(repaired(42));
        state.begin_fetch(id(43), false);
        let state = reduce(
            state,
            RepairAction::DeleteCompleted {
                id: id(42),
                result: Ok("ok".into()),
            },
        );
        assert!(state.is_searching());
    }

    #[test]
    fn test_in_flight_flags_gate_only_their_trigger() {
        let state = editing(repaired(42));
        let (state, _) = reduce_repair_state(state, RepairAction::Save);
        assert!(state.saving);
        let state = reduce(state, RepairAction::RequestDelete);
        assert!(state.confirm_delete.is_some());
        let (state, effect) = reduce_repair_state(state, RepairAction::ConfirmDelete);
        assert!(matches!(effect, Some(RepairEffect::DeleteRepair(_))));
        let (_, effect) = reduce_repair_state(state, RepairAction::Search);
        assert!(matches!(effect, Some(RepairEffect::FetchRecord(_))));
    }

    // ========================================================================
    // Catalogs and notifications
    // ========================================================================

    #[test]
    fn test_catalogs_load_once_and_retry_after_failure() {
        let (state, effect) = reduce_repair_state(RepairState::default(), RepairAction::LoadCatalogs);
        assert_eq!(effect, Some(RepairEffect::LoadCatalogs));
        let (state, effect) = reduce_repair_state(state, RepairAction::LoadCatalogs);
        assert_eq!(effect, None);

        let state = reduce(
            state,
            RepairAction::CatalogsLoaded(Err(ServiceFailure::new(FailureKind::Network, "down"))),
        );
        assert!(state.toast.is_some());
        let (state, effect) = reduce_repair_state(state, RepairAction::LoadCatalogs);
        assert_eq!(effect, Some(RepairEffect::LoadCatalogs));

        let state = reduce(state, RepairAction::CatalogsLoaded(Ok(catalogs())));
        let toast = state.toast.as_ref().unwrap();
        assert_eq!(toast.level, crate::tui::components::toast::ToastLevel::Info);
        assert_eq!(toast.message, CATALOGS_LOADED_MESSAGE);
        let (_, effect) = reduce_repair_state(state, RepairAction::LoadCatalogs);
        assert_eq!(effect, None);
    }

    #[test]
    fn test_first_catalog_load_is_silent() {
        let state = reduce(RepairState::default(), RepairAction::LoadCatalogs);
        let state = reduce(state, RepairAction::CatalogsLoaded(Ok(catalogs())));
        assert!(state.toast.is_none());

        // An unrelated toast is left alone
        let mut state = reduce(RepairState::default(), RepairAction::LoadCatalogs);
        state.notify(Toast::error(SAVE_FAILED_MESSAGE));
        let state = reduce(state, RepairAction::CatalogsLoaded(Ok(catalogs())));
        assert_eq!(state.toast.unwrap().message, SAVE_FAILED_MESSAGE);
    }

    #[test]
    fn test_notification_expires_after_lifetime() {
        let state = RepairState::default().with_notification_lifetime(Duration::from_millis(4000));
        let state = reduce(
            state,
            RepairAction::DeleteCompleted {
                id: id(1),
                result: Ok("hecho".into()),
            },
        );
        let created = state.toast.as_ref().unwrap().timestamp;

        let state = reduce(
            state,
            RepairAction::ExpireNotification(created + Duration::from_millis(3000)),
        );
        assert!(state.toast.is_some());
        let state = reduce(
            state,
            RepairAction::ExpireNotification(created + Duration::from_millis(4000)),
        );
        assert!(state.toast.is_none());
    }

    // ========================================================================
    // View model
    // ========================================================================

    #[test]
    fn test_view_model_actions_per_mode() {
        let vm = compute_repair_view_model(&RepairState::default());
        assert_eq!(vm.mode, RepairMode::Idle);
        assert!(vm.actions.is_empty());
        assert!(!vm.search.can_search);

        let vm = compute_repair_view_model(&viewing(report(42)));
        let labels: Vec<_> = vm.actions.iter().map(|a| (a.label.as_str(), a.enabled)).collect();
        assert_eq!(labels, vec![("Modificar", true), ("Eliminar", false)]);
        assert!(!vm.assignment.unwrap().is_editable);

        let mut state = editing(repaired(42));
        state.saving = true;
        let vm = compute_repair_view_model(&state);
        let labels: Vec<_> = vm.actions.iter().map(|a| (a.label.as_str(), a.enabled)).collect();
        assert_eq!(
            labels,
            vec![("Cancelar", true), ("Guardando...", false), ("Eliminar", true)]
        );
    }

    #[test]
    fn test_view_model_field_values() {
        let mut state = editing(repaired(42));
        state.catalogs = Some(catalogs());
        let vm = compute_repair_view_model(&state);
        let report = vm.report.unwrap();
        assert_eq!(report.location, "Hidalgo (Morelos y Allende)");
        assert_eq!(report.date_reported, UNSET_DATE);

        let fields = vm.assignment.unwrap().fields;
        let values: Vec<_> = fields.iter().map(|f| f.value.as_str()).collect();
        assert_eq!(values, vec!["Norte", "2025-03-01", "2025-03-04", "En proceso"]);
        assert!(fields[0].is_focused);
        assert!(!fields[1].is_focused);
    }

    #[test]
    fn test_view_model_search_button() {
        let (state, _) = search(RepairState::default(), "42");
        let vm = compute_repair_view_model(&state);
        assert!(vm.search.is_searching);
        assert!(!vm.search.can_search);
        assert_eq!(vm.status.as_deref(), Some("Buscando..."));
    }

    // ========================================================================
    // Keys
    // ========================================================================

    #[test]
    fn test_keys_in_search_focus() {
        let state = RepairState {
            search_input: "4".into(),
            ..RepairState::default()
        };
        assert_eq!(
            key_to_action(KeyCode::Char('2'), KeyModifiers::NONE, &state),
            Some(RepairAction::UpdateSearchInput("42".into()))
        );
        assert_eq!(
            key_to_action(KeyCode::Backspace, KeyModifiers::NONE, &state),
            Some(RepairAction::UpdateSearchInput(String::new()))
        );
        assert_eq!(
            key_to_action(KeyCode::Enter, KeyModifiers::NONE, &state),
            Some(RepairAction::Search)
        );
        assert_eq!(
            key_to_action(KeyCode::Char('q'), KeyModifiers::CONTROL, &state),
            Some(RepairAction::Quit)
        );
    }

    #[test]
    fn test_keys_by_mode() {
        let state = viewing(repaired(42));
        assert_eq!(state.focus, Focus::Form);
        assert_eq!(
            key_to_action(KeyCode::Char('e'), KeyModifiers::NONE, &state),
            Some(RepairAction::BeginEdit)
        );
        assert_eq!(
            key_to_action(KeyCode::Char('/'), KeyModifiers::NONE, &state),
            Some(RepairAction::FocusSearch)
        );

        let state = reduce(state, RepairAction::BeginEdit);
        assert_eq!(
            key_to_action(KeyCode::Char('s'), KeyModifiers::CONTROL, &state),
            Some(RepairAction::Save)
        );
        assert_eq!(
            key_to_action(KeyCode::Esc, KeyModifiers::NONE, &state),
            Some(RepairAction::CancelEdit)
        );
        assert_eq!(
            key_to_action(KeyCode::Char('t'), KeyModifiers::NONE, &state),
            None
        );

        let state = reduce(state, RepairAction::RequestDelete);
        assert_eq!(
            key_to_action(KeyCode::Char('y'), KeyModifiers::NONE, &state),
            Some(RepairAction::ConfirmDelete)
        );
        assert_eq!(
            key_to_action(KeyCode::Char('e'), KeyModifiers::NONE, &state),
            None
        );
    }
}
