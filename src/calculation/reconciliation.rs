//! The reconciliation engine.
//!
//! For every (date, employee) key the engine folds the manager's commands into
//! an [`OverrideEffect`], gathers the day's punches, and settles the day under
//! one of the branches below. Keys are processed in roster order, followed by
//! keys that only the override table names.
//!
//! | scheduled | punches | result                                          |
//! |-----------|---------|-------------------------------------------------|
//! | no        | none    | nothing, unless an hour adjustment is recorded  |
//! | yes       | none    | zero hours, absence                             |
//! | no        | some    | holiday support, all hours are overtime         |
//! | yes       | some    | part-time settlement or a full-time shift rule  |

use std::collections::{HashMap, HashSet};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ReconcileConfig;
use crate::models::{
    AuditLogEntry, DailyResult, DayStatus, EmploymentType, OverrideCommand, RosterEntry,
    ShiftDescriptor, ShiftPunch,
};

use super::override_effect::{OverrideEffect, PunchSide};
use super::shift_rules::{
    ScheduledRange, ShiftMeasurement, measure_explicit_shift, measure_normal_shift,
};
use super::worked_time::{
    bucket_round_minutes, floor_to_half_hour, minutes_to_hours, overtime_over_base,
    paired_minutes,
};

/// Original determination recorded for keys that only the override table names.
pub const NOT_ROSTERED: &str = "not rostered";

/// The settled outcome of one (date, employee) key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayOutcome {
    /// The ledger line, absent for a silent day off.
    pub result: Option<DailyResult>,
    /// Present whenever at least one command fired.
    pub audit: Option<AuditLogEntry>,
}

/// Ledger and audit trail of a whole run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationOutcome {
    /// One line per settled key.
    pub ledger: Vec<DailyResult>,
    /// One entry per key touched by an override.
    pub audit_trail: Vec<AuditLogEntry>,
}

/// Settles one day.
///
/// `punches` are the recorded timestamps anchored to the entry's key; the
/// override effect's backfills are merged in here. `rostered` is false for a
/// key synthesized from the override table.
pub fn reconcile_day(
    entry: &RosterEntry,
    rostered: bool,
    punches: &[NaiveDateTime],
    effect: &OverrideEffect,
    config: &ReconcileConfig,
) -> DayOutcome {
    let (scheduled_working, descriptor) =
        effect.resolve_schedule(entry.scheduled_working, &entry.shift_descriptor);
    let punches = merge_backfills(entry.date, punches, effect, &descriptor, config);

    let settled = Settlement {
        entry,
        descriptor: &descriptor,
        effect,
    };

    let result = match (scheduled_working, punches.is_empty()) {
        (false, true) => {
            (!effect.manual_delta.is_zero()).then(|| settled.absent(DayStatus::OverrideApplied))
        }
        (true, true) => Some(settled.absent(settled.status(DayStatus::NoPunchAbsence))),
        (false, false) => Some(settled.holiday_support(&punches)),
        (true, false) => Some(match entry.employment_type {
            EmploymentType::PartTime => settled.part_time(&punches),
            EmploymentType::FullTime => settled.full_time(&punches, config),
        }),
    };

    let audit = effect.has_override().then(|| AuditLogEntry {
        date: entry.date,
        employee: entry.employee.clone(),
        original_determination: if rostered {
            entry.determination()
        } else {
            NOT_ROSTERED.to_string()
        },
        override_summary: effect.summary(scheduled_working, &descriptor),
        reasons: effect.reasons.clone(),
    });

    if let Some(result) = &result {
        debug!(
            date = %entry.date,
            employee = %entry.employee,
            status = ?result.status,
            total_hours = %result.total_hours,
            overtime_hours = %result.overtime_hours,
            "Day settled"
        );
    }

    DayOutcome { result, audit }
}

/// Reconciles every key of a run.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::reconcile_days;
/// use attendance_engine::config::ReconcileConfig;
/// use attendance_engine::models::{
///     DayStatus, EmploymentType, PunchTime, RosterEntry, ShiftDescriptor, ShiftPunch,
/// };
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
/// let roster = vec![RosterEntry {
///     date,
///     employee: "Chen".to_string(),
///     employment_type: EmploymentType::FullTime,
///     shift_descriptor: ShiftDescriptor::NormalShift,
///     scheduled_working: true,
/// }];
/// let punches = vec![ShiftPunch::complete(
///     "Chen",
///     PunchTime::parse("2026-01-05 10:55"),
///     PunchTime::parse("2026-01-05 23:05"),
/// )];
///
/// let outcome = reconcile_days(&roster, &punches, &[], &ReconcileConfig::default());
///
/// assert_eq!(outcome.ledger.len(), 1);
/// assert_eq!(outcome.ledger[0].overtime_hours.to_string(), "3.5");
/// assert_eq!(outcome.ledger[0].status, DayStatus::Normal);
/// assert!(outcome.audit_trail.is_empty());
/// ```
pub fn reconcile_days(
    roster: &[RosterEntry],
    punches: &[ShiftPunch],
    commands: &[OverrideCommand],
    config: &ReconcileConfig,
) -> ReconciliationOutcome {
    let punch_index = index_punches(punches);

    let mut command_index: HashMap<(NaiveDate, &str), Vec<&OverrideCommand>> = HashMap::new();
    for command in commands {
        command_index
            .entry((command.date, command.employee.as_str()))
            .or_default()
            .push(command);
    }

    let mut employment_types: HashMap<&str, EmploymentType> = HashMap::new();
    let mut rostered_keys: HashSet<(NaiveDate, &str)> = HashSet::new();
    for entry in roster {
        employment_types
            .entry(entry.employee.as_str())
            .or_insert(entry.employment_type);
        rostered_keys.insert(entry.key());
    }

    let mut seen_unrostered: HashSet<(NaiveDate, &str)> = HashSet::new();
    let unrostered: Vec<RosterEntry> = commands
        .iter()
        .map(|command| (command.date, command.employee.as_str()))
        .filter(|key| !rostered_keys.contains(key) && seen_unrostered.insert(*key))
        .map(|(date, employee)| RosterEntry {
            date,
            employee: employee.to_string(),
            employment_type: employment_types
                .get(employee)
                .copied()
                .unwrap_or_default(),
            shift_descriptor: ShiftDescriptor::Off,
            scheduled_working: false,
        })
        .collect();

    let days = roster
        .iter()
        .map(|entry| (entry, true))
        .chain(unrostered.iter().map(|entry| (entry, false)));

    let mut outcome = ReconciliationOutcome::default();
    for (entry, rostered) in days {
        let key = entry.key();
        let effect = OverrideEffect::fold(
            command_index
                .get(&key)
                .into_iter()
                .flatten()
                .copied(),
        );
        let day_punches = punch_index.get(&key).map(Vec::as_slice).unwrap_or(&[]);

        let day = reconcile_day(entry, rostered, day_punches, &effect, config);
        outcome.ledger.extend(day.result);
        outcome.audit_trail.extend(day.audit);
    }

    info!(
        roster_days = roster.len(),
        override_only_days = unrostered.len(),
        ledger_lines = outcome.ledger.len(),
        audit_entries = outcome.audit_trail.len(),
        "Reconciliation completed"
    );

    outcome
}

/// Groups parsed punch timestamps by the key their record is anchored to.
///
/// Records with no parseable side carry no anchor and are left out.
pub fn index_punches(punches: &[ShiftPunch]) -> HashMap<(NaiveDate, &str), Vec<NaiveDateTime>> {
    let mut index: HashMap<(NaiveDate, &str), Vec<NaiveDateTime>> = HashMap::new();
    for punch in punches {
        let Some(date) = punch.anchor_date() else {
            continue;
        };
        index
            .entry((date, punch.employee()))
            .or_default()
            .extend(punch.timestamps());
    }
    index
}

/// Merges backfilled punches into the recorded ones and sorts the day.
///
/// A backfilled clock-out on an overnight range that falls at or before the
/// range's end time belongs to the following morning.
fn merge_backfills(
    date: NaiveDate,
    recorded: &[NaiveDateTime],
    effect: &OverrideEffect,
    descriptor: &ShiftDescriptor,
    config: &ReconcileConfig,
) -> Vec<NaiveDateTime> {
    let overnight = match descriptor {
        ShiftDescriptor::Explicit(text) => {
            ScheduledRange::resolve(date, text, &config.vocabulary.range_separators)
                .filter(ScheduledRange::is_overnight)
        }
        _ => None,
    };

    let mut punches = recorded.to_vec();
    punches.extend(effect.backfills.iter().map(|backfill| {
        let at = date.and_time(backfill.time);
        let rolls_over = overnight.is_some_and(|range| {
            backfill.side == PunchSide::ClockOut && backfill.time <= range.end.time()
        });
        if rolls_over { at + Duration::days(1) } else { at }
    }));
    punches.sort();
    punches
}

/// Builds ledger lines for one key.
struct Settlement<'a> {
    entry: &'a RosterEntry,
    descriptor: &'a ShiftDescriptor,
    effect: &'a OverrideEffect,
}

impl Settlement<'_> {
    /// `fallback` unless an override fired.
    fn status(&self, fallback: DayStatus) -> DayStatus {
        if self.effect.has_override() {
            DayStatus::OverrideApplied
        } else {
            fallback
        }
    }

    fn line(
        &self,
        measurement: Option<&ShiftMeasurement>,
        overtime_hours: Decimal,
        total_hours: Decimal,
        status: DayStatus,
    ) -> DailyResult {
        DailyResult {
            date: self.entry.date,
            employee: self.entry.employee.clone(),
            employment_type: self.entry.employment_type,
            shift_descriptor: self.descriptor.clone(),
            late_minutes: measurement.map_or(0, |m| m.late_minutes),
            early_leave_minutes: measurement.map_or(0, |m| m.early_leave_minutes),
            overtime_hours,
            total_hours,
            status,
        }
    }

    fn absent(&self, status: DayStatus) -> DailyResult {
        self.line(None, self.effect.manual_delta, Decimal::ZERO, status)
    }

    /// Unscheduled work: every hour counts as overtime.
    fn holiday_support(&self, punches: &[NaiveDateTime]) -> DailyResult {
        let minutes = paired_minutes(punches);
        let worked_hours = minutes_to_hours(minutes);
        let overtime = match self.entry.employment_type {
            EmploymentType::PartTime => bucket_round_minutes(minutes),
            EmploymentType::FullTime => floor_to_half_hour(worked_hours),
        };

        self.line(
            None,
            overtime.saturating_add(self.effect.manual_delta),
            worked_hours.round_dp(2),
            DayStatus::HolidaySupport,
        )
    }

    /// Part-time days settle completed half hours with no overtime.
    fn part_time(&self, punches: &[NaiveDateTime]) -> DailyResult {
        self.line(
            None,
            self.effect.manual_delta,
            bucket_round_minutes(paired_minutes(punches)),
            self.status(DayStatus::PartTimeSettlement),
        )
    }

    fn full_time(&self, punches: &[NaiveDateTime], config: &ReconcileConfig) -> DailyResult {
        let measurement = match self.descriptor {
            ShiftDescriptor::Explicit(range) => measure_explicit_shift(
                self.entry.date,
                range,
                punches,
                &config.policy,
                &config.vocabulary.range_separators,
            ),
            ShiftDescriptor::NormalShift | ShiftDescriptor::Off => {
                measure_normal_shift(self.entry.date, punches, &config.policy)
            }
        };

        let worked_hours = measurement.worked_hours();
        let overtime = overtime_over_base(worked_hours, measurement.base_hours);

        self.line(
            Some(&measurement),
            overtime.saturating_add(self.effect.manual_delta),
            worked_hours.round_dp(2),
            self.status(DayStatus::Normal),
        )
    }
}
