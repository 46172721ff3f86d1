//! Daily-work status gate and field commits

mod service;

pub use service::DailyWorkService;
