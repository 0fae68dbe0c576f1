//! End-to-end reconciliation of one batch of exported tables.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::calculation::reconcile_days;
use crate::config::ReconcileConfig;
use crate::error::EngineResult;
use crate::ingest::{clean_punches, flatten_roster, parse_overrides};
use crate::models::{OverrideRow, PunchRow, ReconciliationReport};

/// The three source tables of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationInput {
    /// Raw punch log rows, in export order.
    pub punches: Vec<PunchRow>,
    /// Roster calendar grid, row by row.
    pub roster: Vec<Vec<String>>,
    /// Manager exception table rows.
    pub overrides: Vec<OverrideRow>,
}

/// Runs the cleaner, flattener, override parser and engine over one batch.
///
/// Only a roster without a recognizable header row fails the run; every
/// other irregularity is absorbed as data.
///
/// # Example
///
/// ```
/// use attendance_engine::config::ReconcileConfig;
/// use attendance_engine::models::PunchRow;
/// use attendance_engine::pipeline::{reconcile, ReconciliationInput};
///
/// let input = ReconciliationInput {
///     punches: vec![
///         PunchRow::new("Chen", ""),
///         PunchRow::new("上班", "2026-01-05 10:55"),
///         PunchRow::new("下班", "2026-01-05 23:05"),
///     ],
///     roster: vec![
///         vec!["姓名".to_string(), "Chen".to_string()],
///         vec!["2026-01-05".to_string(), String::new()],
///     ],
///     overrides: vec![],
/// };
///
/// let report = reconcile(&input, &ReconcileConfig::default()).unwrap();
/// assert_eq!(report.ledger.len(), 1);
/// assert_eq!(report.total_overtime_hours().to_string(), "3.5");
/// ```
pub fn reconcile(
    input: &ReconciliationInput,
    config: &ReconcileConfig,
) -> EngineResult<ReconciliationReport> {
    let roster = flatten_roster(&input.roster, config)?;
    let cleaned = clean_punches(&input.punches, config);
    let commands = parse_overrides(&input.overrides, config);

    let outcome = reconcile_days(&roster, &cleaned.punches, &commands, config);

    info!(
        punch_rows = input.punches.len(),
        shift_records = cleaned.punches.len(),
        anomalies = cleaned.anomalies.len(),
        roster_entries = roster.len(),
        override_commands = commands.len(),
        "Batch reconciled"
    );

    Ok(ReconciliationReport {
        ledger: outcome.ledger,
        audit_trail: outcome.audit_trail,
        anomalies: cleaned.anomalies,
        roster,
        punches: cleaned.punches,
    })
}
