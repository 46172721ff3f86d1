//! Daily-work core library
//!
//! Domain models, the status state machine, the record store and its reducer,
//! per-record in-flight tracking, configuration and error types shared by the
//! processing, API client, services and CLI crates.

pub mod backend;
pub mod config;
pub mod error;
pub mod in_flight;
pub mod models;
pub mod store;

// Re-export commonly used types
pub use backend::DailyWorkBackend;
pub use config::WorkflowConfig;
pub use error::{ErrorMetadata, LogLevel, WorkflowError, WorkflowResult};
pub use in_flight::{InFlightGuard, InFlightTracker};
pub use models::{
    DailyWorksPage, DocumentFile, FieldChange, Paginated, UpdateResponse, UploadResult, User,
    UserId, WorkId, WorkRecord, WorkStatus, WorkType,
};
pub use store::{reduce, SharedStore, StoreAction, WorkStore};
