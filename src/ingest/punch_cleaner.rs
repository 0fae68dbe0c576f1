//! Punch log cleaning.
//!
//! The exported punch log is a flat list of `(label, time)` rows: a name row
//! starts each employee's block, followed by clock-in/clock-out rows and the
//! occasional terminal marker or register line. [`PunchCleaner`] walks it once,
//! pairing punches into [`ShiftPunch`] records and reporting every irregularity
//! as a [`PunchAnomaly`].

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{ReconcileConfig, Vocabulary};
use crate::models::{AnomalyCategory, PunchAnomaly, PunchRow, PunchTime, ShiftPunch};

/// What a punch log label means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PunchAction {
    /// Blank, placeholder, register noise or a totals line.
    Ignore,
    /// A clock-in punch.
    ClockIn,
    /// A clock-out punch.
    ClockOut,
    /// The terminal flagged a missing clock-out.
    NoClockOut,
    /// The terminal flagged a missing clock-in.
    NoClockIn,
    /// Any other label starts a new employee's block.
    Name,
}

/// Classifies a punch log label against the vocabulary.
pub fn classify_label(label: &str, vocabulary: &Vocabulary) -> PunchAction {
    let label = label.trim();

    if vocabulary.is_placeholder(label)
        || vocabulary.noise_labels.iter().any(|noise| noise == label)
        || vocabulary
            .totals_markers
            .iter()
            .any(|marker| label.contains(marker.as_str()))
    {
        PunchAction::Ignore
    } else if vocabulary.clock_in.iter().any(|k| k == label) {
        PunchAction::ClockIn
    } else if vocabulary.clock_out.iter().any(|k| k == label) {
        PunchAction::ClockOut
    } else if vocabulary
        .no_clock_out_markers
        .iter()
        .any(|marker| label.contains(marker.as_str()))
    {
        PunchAction::NoClockOut
    } else if vocabulary
        .no_clock_in_markers
        .iter()
        .any(|marker| label.contains(marker.as_str()))
    {
        PunchAction::NoClockIn
    } else {
        PunchAction::Name
    }
}

/// Scan state for the current employee's block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    /// No clock-in is waiting for its clock-out.
    Idle,
    /// A clock-in is waiting for its clock-out.
    AwaitingClockOut(PunchTime),
}

/// The cleaner's output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CleanedPunches {
    /// Paired and orphaned punch records, in log order.
    pub punches: Vec<ShiftPunch>,
    /// Data-quality log, in log order.
    pub anomalies: Vec<PunchAnomaly>,
}

/// Single-pass punch log cleaner.
///
/// # Example
///
/// ```
/// use attendance_engine::config::ReconcileConfig;
/// use attendance_engine::ingest::PunchCleaner;
/// use attendance_engine::models::PunchRow;
///
/// let config = ReconcileConfig::default();
/// let mut cleaner = PunchCleaner::new(&config);
/// for row in [
///     PunchRow::new("Chen", ""),
///     PunchRow::new("上班", "2026-01-05 10:55"),
///     PunchRow::new("上班", "2026-01-05 10:58"),
///     PunchRow::new("下班", "2026-01-05 23:05"),
/// ] {
///     cleaner.feed(&row);
/// }
/// let cleaned = cleaner.finish();
///
/// assert_eq!(cleaned.punches.len(), 1);
/// assert!(cleaned.anomalies.is_empty());
/// ```
#[derive(Debug)]
pub struct PunchCleaner<'a> {
    vocabulary: &'a Vocabulary,
    merge_window_minutes: i64,
    retain_orphan_clock_outs: bool,
    employee: String,
    state: ScanState,
    output: CleanedPunches,
}

impl<'a> PunchCleaner<'a> {
    /// Creates a cleaner with the configured vocabulary and merge window.
    pub fn new(config: &'a ReconcileConfig) -> Self {
        Self {
            vocabulary: &config.vocabulary,
            merge_window_minutes: config.policy.merge_window_minutes,
            retain_orphan_clock_outs: config.policy.retain_orphan_clock_outs,
            employee: String::new(),
            state: ScanState::Idle,
            output: CleanedPunches::default(),
        }
    }

    /// The current scan state.
    pub fn state(&self) -> &ScanState {
        &self.state
    }

    /// The employee whose block is being read.
    pub fn current_employee(&self) -> &str {
        &self.employee
    }

    /// Consumes one log row.
    pub fn feed(&mut self, row: &PunchRow) {
        match classify_label(&row.label, self.vocabulary) {
            PunchAction::Ignore => {}
            PunchAction::ClockIn => self.clock_in(PunchTime::parse(&row.time)),
            PunchAction::ClockOut => self.clock_out(PunchTime::parse(&row.time)),
            PunchAction::NoClockOut => self.no_clock_out(PunchTime::parse(&row.time)),
            PunchAction::NoClockIn => self.no_clock_in(PunchTime::parse(&row.time)),
            PunchAction::Name => self.switch_employee(row.label.trim()),
        }
    }

    /// Ends the scan, flushing any clock-in still waiting.
    pub fn finish(mut self) -> CleanedPunches {
        if let ScanState::AwaitingClockOut(pending) = self.take_state() {
            self.flag(AnomalyCategory::MissingClockOutAtEndOfLog, pending.clone());
            self.flush_orphan(pending);
        }

        debug!(
            punches = self.output.punches.len(),
            anomalies = self.output.anomalies.len(),
            "Punch log cleaned"
        );
        self.output
    }

    fn clock_in(&mut self, time: PunchTime) {
        match self.take_state() {
            ScanState::Idle => self.state = ScanState::AwaitingClockOut(time),
            ScanState::AwaitingClockOut(pending) => match pending.gap(&time) {
                Some(gap) if gap <= Duration::minutes(self.merge_window_minutes) => {
                    debug!(
                        employee = %self.employee,
                        pending = %pending,
                        discarded = %time,
                        "Merged duplicate clock-in"
                    );
                    self.state = ScanState::AwaitingClockOut(pending);
                }
                _ => {
                    self.flag(AnomalyCategory::ConsecutiveClockIn, pending.clone());
                    self.flush_orphan(pending);
                    self.state = ScanState::AwaitingClockOut(time);
                }
            },
        }
    }

    fn clock_out(&mut self, time: PunchTime) {
        match self.take_state() {
            ScanState::AwaitingClockOut(pending) => {
                let record = ShiftPunch::complete(&self.employee, pending, time);
                self.output.punches.push(record);
            }
            ScanState::Idle => {
                self.flag(AnomalyCategory::ClockOutWithoutClockIn, time.clone());
                if self.retain_orphan_clock_outs {
                    let record = ShiftPunch::orphan_clock_out(&self.employee, time);
                    self.output.punches.push(record);
                }
            }
        }
    }

    fn no_clock_out(&mut self, time: PunchTime) {
        match self.take_state() {
            ScanState::AwaitingClockOut(pending) => {
                self.flag(AnomalyCategory::SystemMarkedNoClockOut, pending.clone());
                self.flush_orphan(pending);
            }
            ScanState::Idle => self.flag(AnomalyCategory::SystemMarkedNoClockOut, time),
        }
    }

    fn no_clock_in(&mut self, time: PunchTime) {
        if let ScanState::AwaitingClockOut(pending) = self.take_state() {
            self.flush_orphan(pending);
        }
        self.flag(AnomalyCategory::SystemMarkedNoClockIn, time.clone());
        let record = ShiftPunch::orphan_clock_out(&self.employee, time);
        self.output.punches.push(record);
    }

    fn switch_employee(&mut self, name: &str) {
        if let ScanState::AwaitingClockOut(pending) = self.take_state() {
            self.flag(
                AnomalyCategory::SwitchedEmployeeWithoutClockOut,
                pending.clone(),
            );
            self.flush_orphan(pending);
        }
        self.employee = name.to_string();
    }

    fn take_state(&mut self) -> ScanState {
        std::mem::replace(&mut self.state, ScanState::Idle)
    }

    fn flush_orphan(&mut self, clock_in: PunchTime) {
        let record = ShiftPunch::orphan_clock_in(&self.employee, clock_in);
        self.output.punches.push(record);
    }

    fn flag(&mut self, category: AnomalyCategory, timestamp: PunchTime) {
        debug!(employee = %self.employee, ?category, timestamp = %timestamp, "Punch anomaly");
        self.output.anomalies.push(PunchAnomaly {
            employee: self.employee.clone(),
            category,
            timestamp,
        });
    }
}

/// Cleans a whole punch log in one pass.
pub fn clean_punches(rows: &[PunchRow], config: &ReconcileConfig) -> CleanedPunches {
    let mut cleaner = PunchCleaner::new(config);
    for row in rows {
        cleaner.feed(row);
    }
    cleaner.finish()
}
