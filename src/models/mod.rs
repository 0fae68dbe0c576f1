//! Core data models for the Attendance Reconciliation Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod daily_result;
mod employee;
mod override_command;
mod punch;
mod roster;

pub use daily_result::{AuditLogEntry, DailyResult, DayStatus, ReconciliationReport};
pub use employee::EmploymentType;
pub use override_command::{OverrideCommand, OverrideKind, OverrideRow};
pub use punch::{AnomalyCategory, PunchAnomaly, PunchRow, PunchTime, ShiftPunch};
pub use roster::{RosterEntry, ShiftDescriptor};
