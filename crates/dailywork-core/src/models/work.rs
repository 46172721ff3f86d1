use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use super::field::FieldChange;
use super::user::UserId;

/// Opaque daily-work identifier as issued by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkId(pub i64);

impl Display for WorkId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl FromStr for WorkId {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<i64>()
            .map(WorkId)
            .map_err(|_| anyhow::anyhow!("Invalid daily work id: {}", s))
    }
}

/// Work category. Only "structure" is exempt from the RFI document requirement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkType(pub String);

impl WorkType {
    pub const STRUCTURE: &'static str = "structure";

    pub fn new(value: impl Into<String>) -> Self {
        WorkType(value.into())
    }

    pub fn is_structure(&self) -> bool {
        self.0.trim().eq_ignore_ascii_case(Self::STRUCTURE)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for WorkType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WorkStatus {
    New,
    Resubmission,
    Completed,
    Emergency,
}

impl WorkStatus {
    pub const ALL: [WorkStatus; 4] = [
        WorkStatus::New,
        WorkStatus::Resubmission,
        WorkStatus::Completed,
        WorkStatus::Emergency,
    ];

    /// Every status can move directly to every other status. Staying put is not a transition.
    pub fn can_transition_to(self, next: WorkStatus) -> bool {
        self != next
    }

    pub fn transitions(self) -> impl Iterator<Item = WorkStatus> {
        Self::ALL
            .into_iter()
            .filter(move |next| self.can_transition_to(*next))
    }
}

impl Display for WorkStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            WorkStatus::New => write!(f, "new"),
            WorkStatus::Resubmission => write!(f, "resubmission"),
            WorkStatus::Completed => write!(f, "completed"),
            WorkStatus::Emergency => write!(f, "emergency"),
        }
    }
}

impl FromStr for WorkStatus {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(WorkStatus::New),
            "resubmission" => Ok(WorkStatus::Resubmission),
            "completed" => Ok(WorkStatus::Completed),
            "emergency" => Ok(WorkStatus::Emergency),
            _ => Err(anyhow::anyhow!("Invalid work status: {}", s)),
        }
    }
}

// Rows edited by hand sometimes carry "Completed" or "NEW".
impl<'de> Deserialize<'de> for WorkStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One row of the daily-works table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkRecord {
    pub id: WorkId,
    pub number: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub work_type: WorkType,
    pub status: WorkStatus,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assigned: Option<UserId>,
    #[serde(default)]
    pub incharge: Option<UserId>,
    #[serde(default)]
    pub completion_time: Option<String>,
    #[serde(default)]
    pub rfi_submission_date: Option<NaiveDate>,
    #[serde(default)]
    pub inspection_details: Option<String>,
    #[serde(default)]
    pub resubmission_count: Option<u32>,
    #[serde(default)]
    pub file: Option<String>,
}

impl WorkRecord {
    /// Whether applying `change` needs an uploaded RFI document first.
    pub fn requires_document(&self, change: &FieldChange) -> bool {
        matches!(change, FieldChange::Status(WorkStatus::Completed))
            && !self.work_type.is_structure()
    }

    /// Completed non-structure work must carry a document.
    pub fn satisfies_completion_invariant(&self) -> bool {
        self.status != WorkStatus::Completed || self.work_type.is_structure() || self.file.is_some()
    }

    /// Name of the assembled RFI document uploaded for this record.
    pub fn document_file_name(&self) -> String {
        super::upload::document_file_name(&self.number)
    }
}
