use jiff::civil::{Date, DateTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BachesError;

/// A citizen pothole report together with its (optional) repair assignment.
///
/// The report half is read-only in this client; only the assignment half is
/// ever edited and sent back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PotholeRepairRecord {
    pub pothole_id: u64,

    // Report data
    #[serde(default)]
    pub citizen_name: String,
    #[serde(default)]
    pub date_reported: Option<DateTime>,
    #[serde(default)]
    pub street_name: String,
    #[serde(default)]
    pub between_streets: String,

    // Repair assignment
    #[serde(default)]
    pub repair_id: Option<u64>,
    #[serde(default)]
    pub squad_id: Option<u64>,
    #[serde(default)]
    pub start_date: Option<Date>,
    #[serde(default)]
    pub end_date: Option<Date>,
    #[serde(default)]
    pub status_id: Option<u64>,
}

impl PotholeRepairRecord {
    /// A report with no repair assignment yet.
    pub fn new(pothole_id: u64) -> Self {
        Self {
            pothole_id,
            citizen_name: String::new(),
            date_reported: None,
            street_name: String::new(),
            between_streets: String::new(),
            repair_id: None,
            squad_id: None,
            start_date: None,
            end_date: None,
            status_id: None,
        }
    }

    /// Whether a repair exists for this report (and can therefore be deleted).
    pub fn has_repair(&self) -> bool {
        self.repair_id.is_some()
    }

    /// Drop every assignment field, keeping the report untouched.
    pub fn clear_assignment(&mut self) {
        self.repair_id = None;
        self.squad_id = None;
        self.start_date = None;
        self.end_date = None;
        self.status_id = None;
    }

    /// Replace exactly one assignment field.
    pub fn apply_edit(&mut self, edit: AssignmentEdit) {
        match edit {
            AssignmentEdit::Squad(v) => self.squad_id = v,
            AssignmentEdit::StartDate(v) => self.start_date = v,
            AssignmentEdit::EndDate(v) => self.end_date = v,
            AssignmentEdit::Status(v) => self.status_id = v,
        }
    }

    /// Copy of the record with one field replaced.
    pub fn with_edit(&self, edit: AssignmentEdit) -> Self {
        let mut next = self.clone();
        next.apply_edit(edit);
        next
    }

    pub fn date_of(&self, field: AssignmentField) -> Option<Date> {
        match field {
            AssignmentField::StartDate => self.start_date,
            AssignmentField::EndDate => self.end_date,
            AssignmentField::Squad | AssignmentField::Status => None,
        }
    }

    /// "Street (between streets)" as shown on the report panel
    pub fn location(&self) -> String {
        if self.between_streets.is_empty() {
            self.street_name.clone()
        } else {
            format!("{} ({})", self.street_name, self.between_streets)
        }
    }

    pub fn report_id(&self) -> Option<ReportId> {
        ReportId::new(self.pothole_id)
    }
}

/// Identifier of a citizen report. Always a positive integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReportId(u64);

impl ReportId {
    pub fn new(id: u64) -> Option<Self> {
        if id == 0 { None } else { Some(ReportId(id)) }
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl FromStr for ReportId {
    type Err = BachesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Err(BachesError::InvalidReportId(s.to_string()));
        }
        trimmed
            .parse::<u64>()
            .ok()
            .and_then(ReportId::new)
            .ok_or_else(|| BachesError::InvalidReportId(s.to_string()))
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A repair crew that can be assigned to a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Squad {
    pub squad_id: u64,
    pub squad_name: String,
}

/// A repair status (pending, in progress, finished, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairStatus {
    pub status_id: u64,
    pub status_name: String,
}

/// Common view over catalog rows
pub trait CatalogEntry {
    fn id(&self) -> u64;
    fn name(&self) -> &str;
}

impl CatalogEntry for Squad {
    fn id(&self) -> u64 {
        self.squad_id
    }

    fn name(&self) -> &str {
        &self.squad_name
    }
}

impl CatalogEntry for RepairStatus {
    fn id(&self) -> u64 {
        self.status_id
    }

    fn name(&self) -> &str {
        &self.status_name
    }
}

/// Reference lists used to populate the selectable assignment fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalogs {
    #[serde(default)]
    pub squads: Vec<Squad>,
    #[serde(default)]
    pub statuses: Vec<RepairStatus>,
}

impl Catalogs {
    pub fn squad_name(&self, id: u64) -> Option<&str> {
        lookup_name(&self.squads, id)
    }

    pub fn status_name(&self, id: u64) -> Option<&str> {
        lookup_name(&self.statuses, id)
    }

    /// Label for an optional squad id; unknown ids fall back to `#id`.
    pub fn squad_label(&self, id: Option<u64>) -> String {
        label_for(&self.squads, id)
    }

    pub fn status_label(&self, id: Option<u64>) -> String {
        label_for(&self.statuses, id)
    }
}

fn lookup_name<E: CatalogEntry>(entries: &[E], id: u64) -> Option<&str> {
    entries.iter().find(|e| e.id() == id).map(|e| e.name())
}

fn label_for<E: CatalogEntry>(entries: &[E], id: Option<u64>) -> String {
    match id {
        None => UNSET_LABEL.to_string(),
        Some(id) => lookup_name(entries, id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{id}")),
    }
}

/// Shown for an assignment field that has no value yet
pub const UNSET_LABEL: &str = "Sin asignar";

/// Step through `[unset, e0, e1, ...]` (wrapping) starting from `current`.
///
/// An id that is not in the catalog is treated like "unset".
pub fn cycle_entry<E: CatalogEntry>(entries: &[E], current: Option<u64>, forward: bool) -> Option<u64> {
    if entries.is_empty() {
        return current;
    }
    // Slot 0 is "unset", slot i+1 is entries[i]
    let slots = entries.len() + 1;
    let position = current
        .and_then(|id| entries.iter().position(|e| e.id() == id))
        .map(|i| i + 1)
        .unwrap_or(0);
    let next = if forward {
        (position + 1) % slots
    } else {
        (position + slots - 1) % slots
    };
    if next == 0 {
        None
    } else {
        Some(entries[next - 1].id())
    }
}

/// The editable fields of a repair assignment, in form order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssignmentField {
    #[default]
    Squad,
    StartDate,
    EndDate,
    Status,
}

impl AssignmentField {
    pub const ALL: [AssignmentField; 4] = [
        AssignmentField::Squad,
        AssignmentField::StartDate,
        AssignmentField::EndDate,
        AssignmentField::Status,
    ];

    /// Get the next field (wrapping)
    pub fn next(self) -> Self {
        match self {
            AssignmentField::Squad => AssignmentField::StartDate,
            AssignmentField::StartDate => AssignmentField::EndDate,
            AssignmentField::EndDate => AssignmentField::Status,
            AssignmentField::Status => AssignmentField::Squad,
        }
    }

    /// Get the previous field (wrapping)
    pub fn prev(self) -> Self {
        match self {
            AssignmentField::Squad => AssignmentField::Status,
            AssignmentField::StartDate => AssignmentField::Squad,
            AssignmentField::EndDate => AssignmentField::StartDate,
            AssignmentField::Status => AssignmentField::EndDate,
        }
    }

    pub fn is_date(self) -> bool {
        matches!(self, AssignmentField::StartDate | AssignmentField::EndDate)
    }

    /// Name of the field in the JSON payload
    pub fn wire_name(self) -> &'static str {
        match self {
            AssignmentField::Squad => "squadId",
            AssignmentField::StartDate => "startDate",
            AssignmentField::EndDate => "endDate",
            AssignmentField::Status => "statusId",
        }
    }

    /// Form label
    pub fn label(self) -> &'static str {
        match self {
            AssignmentField::Squad => "Cuadrilla",
            AssignmentField::StartDate => "Fecha Inicio",
            AssignmentField::EndDate => "Fecha Fin",
            AssignmentField::Status => "Estado",
        }
    }

    /// An edit that clears this field
    pub fn cleared(self) -> AssignmentEdit {
        match self {
            AssignmentField::Squad => AssignmentEdit::Squad(None),
            AssignmentField::StartDate => AssignmentEdit::StartDate(None),
            AssignmentField::EndDate => AssignmentEdit::EndDate(None),
            AssignmentField::Status => AssignmentEdit::Status(None),
        }
    }
}

impl fmt::Display for AssignmentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name())
    }
}

impl FromStr for AssignmentField {
    type Err = BachesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "squadId" | "squad" => Ok(AssignmentField::Squad),
            "startDate" | "start" => Ok(AssignmentField::StartDate),
            "endDate" | "end" => Ok(AssignmentField::EndDate),
            "statusId" | "status" => Ok(AssignmentField::Status),
            other => Err(BachesError::Other(format!(
                "unknown assignment field '{other}', expected one of: squadId, startDate, endDate, statusId"
            ))),
        }
    }
}

/// A single-field change to the edit buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignmentEdit {
    Squad(Option<u64>),
    StartDate(Option<Date>),
    EndDate(Option<Date>),
    Status(Option<u64>),
}

impl AssignmentEdit {
    pub fn field(&self) -> AssignmentField {
        match self {
            AssignmentEdit::Squad(_) => AssignmentField::Squad,
            AssignmentEdit::StartDate(_) => AssignmentField::StartDate,
            AssignmentEdit::EndDate(_) => AssignmentField::EndDate,
            AssignmentEdit::Status(_) => AssignmentField::Status,
        }
    }

    /// Build an edit for a date field; `None` for the id fields.
    pub fn date(field: AssignmentField, value: Option<Date>) -> Option<Self> {
        match field {
            AssignmentField::StartDate => Some(AssignmentEdit::StartDate(value)),
            AssignmentField::EndDate => Some(AssignmentEdit::EndDate(value)),
            AssignmentField::Squad | AssignmentField::Status => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn sample() -> PotholeRepairRecord {
        PotholeRepairRecord {
            citizen_name: "Ana".to_string(),
            street_name: "Av. Juárez".to_string(),
            between_streets: "Madero y 5 de Mayo".to_string(),
            repair_id: Some(7),
            squad_id: Some(1),
            start_date: Some(date(2025, 3, 1)),
            end_date: Some(date(2025, 3, 4)),
            status_id: Some(2),
            ..PotholeRepairRecord::new(42)
        }
    }

    #[test]
    fn test_report_id_parse() {
        assert_eq!("42".parse::<ReportId>().unwrap().get(), 42);
        assert_eq!(" 7 ".parse::<ReportId>().unwrap().get(), 7);
        for bad in ["", "0", "-5", "abc", "4.2", "+3", "00"] {
            assert!(bad.parse::<ReportId>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_deserialize_fresh_report() {
        let json = r#"{
            "potholeId": 42,
            "citizenName": "Ana",
            "dateReported": "2025-02-10T09:15:30.123",
            "streetName": "Hidalgo",
            "betweenStreets": "Morelos y Allende",
            "repairId": null
        }"#;
        let record: PotholeRepairRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.pothole_id, 42);
        assert!(!record.has_repair());
        assert_eq!(record.squad_id, None);
        assert_eq!(record.date_reported.unwrap().date(), date(2025, 2, 10));
    }

    #[test]
    fn test_serialize_uses_wire_names_and_explicit_nulls() {
        let mut record = PotholeRepairRecord::new(42);
        record.squad_id = Some(1);
        record.start_date = Some(date(2025, 3, 1));
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["potholeId"], 42);
        assert_eq!(value["squadId"], 1);
        assert_eq!(value["startDate"], "2025-03-01");
        assert!(value["repairId"].is_null());
        assert!(value.as_object().unwrap().contains_key("endDate"));
    }

    #[test]
    fn test_clear_assignment_keeps_report() {
        let mut record = sample();
        record.clear_assignment();
        assert_eq!(record.repair_id, None);
        assert_eq!(record.squad_id, None);
        assert_eq!(record.start_date, None);
        assert_eq!(record.end_date, None);
        assert_eq!(record.status_id, None);
        assert_eq!(record.pothole_id, 42);
        assert_eq!(record.citizen_name, "Ana");
        assert_eq!(record.location(), "Av. Juárez (Madero y 5 de Mayo)");
    }

    #[test]
    fn test_with_edit_replaces_one_field() {
        let record = sample();
        let edited = record.with_edit(AssignmentEdit::Squad(Some(5)));
        assert_eq!(edited.squad_id, Some(5));
        assert_eq!(edited.status_id, record.status_id);
        assert_eq!(record.squad_id, Some(1));
    }

    #[test]
    fn test_cycle_entry_wraps_through_unset() {
        let squads = vec![
            Squad { squad_id: 1, squad_name: "Norte".into() },
            Squad { squad_id: 3, squad_name: "Sur".into() },
        ];
        assert_eq!(cycle_entry(&squads, None, true), Some(1));
        assert_eq!(cycle_entry(&squads, Some(1), true), Some(3));
        assert_eq!(cycle_entry(&squads, Some(3), true), None);
        assert_eq!(cycle_entry(&squads, None, false), Some(3));
        assert_eq!(cycle_entry(&squads, Some(99), true), Some(1));
        let empty: Vec<Squad> = Vec::new();
        assert_eq!(cycle_entry(&empty, Some(4), true), Some(4));
    }

    #[test]
    fn test_catalog_labels() {
        let catalogs = Catalogs {
            squads: vec![Squad { squad_id: 1, squad_name: "Norte".into() }],
            statuses: vec![RepairStatus { status_id: 2, status_name: "En proceso".into() }],
        };
        assert_eq!(catalogs.squad_label(Some(1)), "Norte");
        assert_eq!(catalogs.squad_label(Some(9)), "#9");
        assert_eq!(catalogs.squad_label(None), UNSET_LABEL);
        assert_eq!(catalogs.status_label(Some(2)), "En proceso");
    }

    #[test]
    fn test_assignment_field_names() {
        assert_eq!("squadId".parse::<AssignmentField>().unwrap(), AssignmentField::Squad);
        assert_eq!("end".parse::<AssignmentField>().unwrap(), AssignmentField::EndDate);
        assert!("citizenName".parse::<AssignmentField>().is_err());
        assert_eq!(AssignmentField::Status.next(), AssignmentField::Squad);
        assert_eq!(AssignmentField::Squad.prev(), AssignmentField::Status);
    }
}
