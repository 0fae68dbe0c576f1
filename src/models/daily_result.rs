//! Ledger models produced by reconciliation.
//!
//! This module contains the per-day [`DailyResult`], the [`AuditLogEntry`]
//! written whenever a manager override fired, and the
//! [`ReconciliationReport`] bundling every output of one run.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{EmploymentType, PunchAnomaly, RosterEntry, ShiftDescriptor, ShiftPunch};

/// Outcome classification of one reconciled day.
///
/// # Example
///
/// ```
/// use attendance_engine::models::DayStatus;
///
/// let status = DayStatus::HolidaySupport;
/// assert_eq!(serde_json::to_string(&status).unwrap(), "\"holiday_support\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayStatus {
    /// A full-time day measured against its schedule.
    Normal,
    /// A part-time day settled on bucket-rounded hours.
    PartTimeSettlement,
    /// Punches on an unscheduled day, paid as overtime.
    HolidaySupport,
    /// Scheduled, but nothing was punched.
    NoPunchAbsence,
    /// A manager override changed the outcome.
    OverrideApplied,
}

/// The ledger line for one (date, employee).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyResult {
    /// The reconciled day.
    pub date: NaiveDate,
    /// The employee.
    pub employee: String,
    /// Employment type from the roster.
    pub employment_type: EmploymentType,
    /// Shift descriptor after overrides.
    pub shift_descriptor: ShiftDescriptor,
    /// Minutes late against the scheduled start(s).
    pub late_minutes: i64,
    /// Minutes left early beyond the grace allowance.
    pub early_leave_minutes: i64,
    /// Rounded overtime including manual adjustments.
    pub overtime_hours: Decimal,
    /// Credited hours, reported to two decimal places.
    pub total_hours: Decimal,
    /// Outcome classification.
    pub status: DayStatus,
}

/// Evidence that a manager override changed a day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// The overridden day.
    pub date: NaiveDate,
    /// The employee.
    pub employee: String,
    /// What the roster said before overrides.
    pub original_determination: String,
    /// What the overrides resolved to.
    pub override_summary: String,
    /// Reasons, in table order.
    pub reasons: Vec<String>,
}

/// Everything one reconciliation run produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// One line per reconciled (date, employee), in roster order.
    pub ledger: Vec<DailyResult>,
    /// One entry per key where an override fired, in ledger order.
    pub audit_trail: Vec<AuditLogEntry>,
    /// The punch cleaner's data-quality log.
    pub anomalies: Vec<PunchAnomaly>,
    /// The flattened roster, exposed for verification.
    pub roster: Vec<RosterEntry>,
    /// The cleaned punch records.
    pub punches: Vec<ShiftPunch>,
}

impl ReconciliationReport {
    /// Sum of overtime across the ledger.
    pub fn total_overtime_hours(&self) -> Decimal {
        self.ledger
            .iter()
            .fold(Decimal::ZERO, |total, r| total.saturating_add(r.overtime_hours))
    }

    /// Ledger lines for one employee, in order.
    pub fn ledger_for<'a>(&'a self, employee: &'a str) -> impl Iterator<Item = &'a DailyResult> {
        self.ledger.iter().filter(move |r| r.employee == employee)
    }
}
