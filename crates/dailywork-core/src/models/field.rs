use chrono::NaiveDate;
use serde_json::{json, Map, Value};

use super::user::UserId;
use super::work::{WorkId, WorkRecord, WorkStatus};
use crate::error::WorkflowError;

/// An inline edit of a single daily-work field.
///
/// Each variant maps to one wire key of the update endpoint. `None` clears the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldChange {
    Status(WorkStatus),
    Assigned(Option<UserId>),
    Incharge(Option<UserId>),
    CompletionTime(Option<String>),
    RfiSubmissionDate(Option<NaiveDate>),
    InspectionDetails(Option<String>),
}

impl FieldChange {
    pub const KEYS: [&'static str; 6] = [
        "status",
        "assigned",
        "incharge",
        "completion_time",
        "rfi_submission_date",
        "inspection_details",
    ];

    pub fn key(&self) -> &'static str {
        match self {
            FieldChange::Status(_) => "status",
            FieldChange::Assigned(_) => "assigned",
            FieldChange::Incharge(_) => "incharge",
            FieldChange::CompletionTime(_) => "completion_time",
            FieldChange::RfiSubmissionDate(_) => "rfi_submission_date",
            FieldChange::InspectionDetails(_) => "inspection_details",
        }
    }

    pub fn value(&self) -> Value {
        match self {
            FieldChange::Status(status) => json!(status),
            FieldChange::Assigned(user) | FieldChange::Incharge(user) => json!(user),
            FieldChange::CompletionTime(text) | FieldChange::InspectionDetails(text) => json!(text),
            FieldChange::RfiSubmissionDate(date) => json!(date),
        }
    }

    /// Request body for the update endpoint: `{ id, <key>: <value> }`.
    pub fn payload(&self, id: WorkId) -> Value {
        let mut body = Map::new();
        body.insert("id".to_string(), json!(id));
        body.insert(self.key().to_string(), self.value());
        Value::Object(body)
    }

    /// Parse a `key=value` style edit. Blank input or `null` clears optional fields.
    pub fn parse(key: &str, raw: &str) -> Result<Self, WorkflowError> {
        let raw = raw.trim();
        let cleared = raw.is_empty() || raw.eq_ignore_ascii_case("null");
        let invalid = |err: anyhow::Error| WorkflowError::InvalidInput(err.to_string());

        let change = match key.trim() {
            "status" => FieldChange::Status(raw.parse().map_err(invalid)?),
            "assigned" if cleared => FieldChange::Assigned(None),
            "assigned" => FieldChange::Assigned(Some(raw.parse().map_err(invalid)?)),
            "incharge" if cleared => FieldChange::Incharge(None),
            "incharge" => FieldChange::Incharge(Some(raw.parse().map_err(invalid)?)),
            "completion_time" if cleared => FieldChange::CompletionTime(None),
            "completion_time" => FieldChange::CompletionTime(Some(raw.to_string())),
            "rfi_submission_date" if cleared => FieldChange::RfiSubmissionDate(None),
            "rfi_submission_date" => {
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    WorkflowError::InvalidInput(format!(
                        "Invalid RFI submission date (expected YYYY-MM-DD): {}",
                        raw
                    ))
                })?;
                FieldChange::RfiSubmissionDate(Some(date))
            }
            "inspection_details" if cleared => FieldChange::InspectionDetails(None),
            "inspection_details" => FieldChange::InspectionDetails(Some(raw.to_string())),
            other => {
                return Err(WorkflowError::InvalidInput(format!(
                    "Unknown field: {} (expected one of: {})",
                    other,
                    Self::KEYS.join(", ")
                )))
            }
        };

        Ok(change)
    }

    /// The record as it looks once the backend has accepted this change.
    pub fn apply(&self, record: &WorkRecord) -> WorkRecord {
        let mut next = record.clone();
        match self {
            FieldChange::Status(status) => next.status = *status,
            FieldChange::Assigned(user) => next.assigned = *user,
            FieldChange::Incharge(user) => next.incharge = *user,
            FieldChange::CompletionTime(text) => next.completion_time = text.clone(),
            FieldChange::RfiSubmissionDate(date) => next.rfi_submission_date = *date,
            FieldChange::InspectionDetails(text) => next.inspection_details = text.clone(),
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::fixtures::record;

    #[test]
    fn status_payload_matches_update_endpoint() {
        let change = FieldChange::Status(WorkStatus::Completed);
        assert_eq!(
            change.payload(WorkId(3)),
            json!({"id": 3, "status": "completed"})
        );
    }

    #[test]
    fn cleared_fields_serialize_as_null() {
        let change = FieldChange::Incharge(None);
        assert_eq!(
            change.payload(WorkId(8)),
            json!({"id": 8, "incharge": null})
        );
    }

    #[test]
    fn date_payload_uses_iso_format() {
        let change = FieldChange::parse("rfi_submission_date", "2024-06-30").unwrap();
        assert_eq!(
            change.payload(WorkId(1)),
            json!({"id": 1, "rfi_submission_date": "2024-06-30"})
        );
    }

    #[test]
    fn parse_each_key() {
        assert_eq!(
            FieldChange::parse("status", "Emergency").unwrap(),
            FieldChange::Status(WorkStatus::Emergency)
        );
        assert_eq!(
            FieldChange::parse("assigned", "12").unwrap(),
            FieldChange::Assigned(Some(UserId(12)))
        );
        assert_eq!(
            FieldChange::parse("incharge", "null").unwrap(),
            FieldChange::Incharge(None)
        );
        assert_eq!(
            FieldChange::parse("completion_time", "2024-06-30 17:45").unwrap(),
            FieldChange::CompletionTime(Some("2024-06-30 17:45".to_string()))
        );
        assert_eq!(
            FieldChange::parse("inspection_details", "  ").unwrap(),
            FieldChange::InspectionDetails(None)
        );
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(matches!(
            FieldChange::parse("colour", "red"),
            Err(WorkflowError::InvalidInput(_))
        ));
        assert!(FieldChange::parse("status", "done").is_err());
        assert!(FieldChange::parse("assigned", "bob").is_err());
        assert!(FieldChange::parse("rfi_submission_date", "30/06/2024").is_err());
    }

    #[test]
    fn apply_touches_only_its_field() {
        let before = record(4, "pavement", WorkStatus::New);
        let after = FieldChange::InspectionDetails(Some("Passed".into())).apply(&before);
        assert_eq!(after.inspection_details.as_deref(), Some("Passed"));
        assert_eq!(after.status, before.status);
        assert_eq!(after.file, before.file);
        assert_eq!(before.inspection_details, None);
    }
}
