//! Helpers shared by the `dailywork` binary: tracing setup, the page snapshot
//! file, and table rendering.

use anyhow::Context;
use dailywork_core::{DailyWorksPage, WorkStore};
use std::io::Write;
use std::path::Path;

/// Truncate a string to max_len characters, appending "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Initialize tracing for CLI binaries.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

/// Read the daily-works page props from a JSON file.
pub fn load_snapshot(path: &Path) -> anyhow::Result<DailyWorksPage> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))
}

/// Write `page` with its records replaced by the current store contents.
///
/// The file is replaced atomically so an interrupted write never leaves a
/// truncated snapshot behind.
pub fn save_snapshot(path: &Path, page: &DailyWorksPage, store: &WorkStore) -> anyhow::Result<()> {
    let mut page = page.clone();
    page.daily_works.data = store.to_vec();

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("Failed to create temporary file in {}", dir.display()))?;
    serde_json::to_writer_pretty(&mut tmp, &page).context("Serialize snapshot")?;
    tmp.write_all(b"\n").context("Write snapshot")?;
    tmp.persist(path)
        .with_context(|| format!("Failed to replace snapshot {}", path.display()))?;
    Ok(())
}

/// Render the records as a fixed-width table, resolving user ids to names.
pub fn format_table(page: &DailyWorksPage, store: &WorkStore) -> String {
    let mut out = format!(
        "{:<6} {:<14} {:<12} {:<13} {:<20} {:<16} {}\n",
        "ID", "NUMBER", "TYPE", "STATUS", "LOCATION", "ASSIGNED", "FILE"
    );
    for record in store.iter() {
        let assigned = page
            .user_name(record.assigned)
            .map(str::to_string)
            .or_else(|| record.assigned.map(|id| format!("#{}", id.0)))
            .unwrap_or_else(|| "-".to_string());
        out.push_str(&format!(
            "{:<6} {:<14} {:<12} {:<13} {:<20} {:<16} {}\n",
            record.id.to_string(),
            truncate_string(&record.number, 14),
            truncate_string(record.work_type.as_str(), 12),
            record.status.to_string(),
            truncate_string(record.location.as_deref().unwrap_or("-"), 20),
            truncate_string(&assigned, 16),
            record.file.as_deref().unwrap_or("-"),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dailywork_core::models::{Paginated, User, UserId, WorkId, WorkStatus};
    use dailywork_core::{reduce, StoreAction};
    use dailywork_services::test_helpers::work_record;
    use tempfile::TempDir;

    fn page() -> DailyWorksPage {
        let mut assigned = work_record(1, "pavement", WorkStatus::New);
        assigned.assigned = Some(UserId(7));
        DailyWorksPage {
            incharges: vec![],
            juniors: vec![User {
                id: UserId(7),
                name: "Nadia".to_string(),
                designation: None,
            }],
            daily_works: Paginated::single(vec![
                assigned,
                work_record(2, "structure", WorkStatus::Emergency),
            ]),
        }
    }

    #[test]
    fn truncate_string_short() {
        assert_eq!(truncate_string("hello", 10), "hello");
        assert_eq!(truncate_string("", 5), "");
    }

    #[test]
    fn truncate_string_long() {
        assert_eq!(truncate_string("hello world", 8), "hello...");
        assert_eq!(truncate_string("abc", 2), "...");
    }

    #[test]
    fn truncate_string_counts_characters() {
        assert_eq!(truncate_string("ঢাকা-সড়ক", 20), "ঢাকা-সড়ক");
        assert_eq!(truncate_string("éééééé", 5), "éé...");
    }

    #[test]
    fn snapshot_round_trips_merged_store() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("daily_works.json");
        let original = page();

        let store = reduce(
            &WorkStore::from_page(&original),
            &StoreAction::FileAttached {
                id: WorkId(1),
                url: "/files/1.pdf".to_string(),
            },
        );
        save_snapshot(&path, &original, &store).unwrap();

        let loaded = load_snapshot(&path).unwrap();
        assert_eq!(loaded.juniors, original.juniors);
        assert_eq!(loaded.daily_works.data.len(), 2);
        assert_eq!(
            loaded.daily_works.data[0].file.as_deref(),
            Some("/files/1.pdf")
        );
    }

    #[test]
    fn load_snapshot_reports_path() {
        let err = load_snapshot(Path::new("/nonexistent/daily_works.json")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/daily_works.json"));
    }

    #[test]
    fn table_resolves_user_names() {
        let page = page();
        let table = format_table(&page, &WorkStore::from_page(&page));
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("Nadia"));
        assert!(lines[1].contains("new"));
        assert!(lines[2].contains("structure"));
        assert!(lines[2].contains("emergency"));
    }
}
