//! Configuration loading and management for the Attendance Reconciliation Engine.
//!
//! Reconciliation rules (merge window, grace period, shift windows, base hours)
//! and the keyword vocabularies the ingest stages recognize are plain data with
//! built-in defaults. They can be overridden from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use attendance_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/default").unwrap();
//! println!("Grace: {} minutes", loader.config().policy.early_leave_grace_minutes);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    CommandVocabulary, EVENING_SHIFT_BASE_HOURS, EXPLICIT_FALLBACK_BASE_HOURS,
    EveningShiftPolicy, PolicyConfig, ReconcileConfig, SPLIT_SHIFT_BASE_HOURS, SplitShiftPolicy,
    TimeWindow, Vocabulary,
};
