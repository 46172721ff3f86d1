//! Record fixtures shared by unit tests.

use super::work::{WorkId, WorkRecord, WorkStatus, WorkType};

pub(crate) fn record(id: i64, work_type: &str, status: WorkStatus) -> WorkRecord {
    WorkRecord {
        id: WorkId(id),
        number: format!("RFI-{}", id),
        date: None,
        work_type: WorkType::new(work_type),
        status,
        location: None,
        description: None,
        assigned: None,
        incharge: None,
        completion_time: None,
        rfi_submission_date: None,
        inspection_details: None,
        resubmission_count: None,
        file: None,
    }
}
