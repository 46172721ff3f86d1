//! Record store
//!
//! The daily-works table state is a [`WorkStore`]: records keyed by id plus the
//! display order. State changes are expressed as [`StoreAction`]s and applied by
//! [`reduce`], a pure function returning a new store. [`SharedStore`] holds the
//! current state for concurrent workflows and swaps it atomically on dispatch.

use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use crate::models::{DailyWorksPage, FieldChange, WorkId, WorkRecord};

/// Committed facts that change local state. Only dispatched after the backend confirmed them.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreAction {
    /// Replace the whole collection (page load, pagination).
    Replace(Vec<WorkRecord>),
    /// A field update was accepted.
    FieldCommitted { id: WorkId, change: FieldChange },
    /// An RFI document was uploaded and the server returned its URL.
    FileAttached { id: WorkId, url: String },
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkStore {
    records: BTreeMap<WorkId, WorkRecord>,
    order: Vec<WorkId>,
}

impl WorkStore {
    pub fn new(records: impl IntoIterator<Item = WorkRecord>) -> Self {
        let mut store = WorkStore::default();
        for record in records {
            if !store.records.contains_key(&record.id) {
                store.order.push(record.id);
            }
            store.records.insert(record.id, record);
        }
        store
    }

    pub fn from_page(page: &DailyWorksPage) -> Self {
        Self::new(page.daily_works.data.iter().cloned())
    }

    pub fn get(&self, id: WorkId) -> Option<&WorkRecord> {
        self.records.get(&id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Records in table order.
    pub fn iter(&self) -> impl Iterator<Item = &WorkRecord> {
        self.order.iter().filter_map(|id| self.records.get(id))
    }

    pub fn to_vec(&self) -> Vec<WorkRecord> {
        self.iter().cloned().collect()
    }

    fn with_record(&self, id: WorkId, update: impl FnOnce(&WorkRecord) -> WorkRecord) -> Self {
        let Some(current) = self.records.get(&id) else {
            tracing::debug!(work_id = %id, "Ignoring store action for unknown record");
            return self.clone();
        };
        let mut next = self.clone();
        next.records.insert(id, update(current));
        next
    }
}

/// Apply `action` to `state`, returning the new state. `state` is left untouched.
pub fn reduce(state: &WorkStore, action: &StoreAction) -> WorkStore {
    match action {
        StoreAction::Replace(records) => WorkStore::new(records.iter().cloned()),
        StoreAction::FieldCommitted { id, change } => {
            state.with_record(*id, |record| change.apply(record))
        }
        StoreAction::FileAttached { id, url } => state.with_record(*id, |record| WorkRecord {
            file: Some(url.clone()),
            ..record.clone()
        }),
    }
}

/// Current store shared between concurrently running record workflows.
#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<WorkStore>>,
}

impl SharedStore {
    pub fn new(store: WorkStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// A consistent copy of the current state.
    pub fn snapshot(&self) -> WorkStore {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn get(&self, id: WorkId) -> Option<WorkRecord> {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(id)
            .cloned()
    }

    /// Reduce the current state with `action` and store the result.
    pub fn dispatch(&self, action: StoreAction) -> WorkStore {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let next = reduce(&guard, &action);
        *guard = next.clone();
        next
    }
}
