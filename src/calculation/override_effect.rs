//! Folding a day's manager commands into one effect.
//!
//! Commands for the same (date, employee) are applied in table order by a
//! left fold over [`OverrideEffect`]. The resulting effect is then applied to
//! the roster fact and the punch list by the reconciliation engine.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::{OverrideCommand, OverrideKind, ShiftDescriptor};

/// Scheduling decision carried by an override effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleOverride {
    /// The roster decides.
    #[default]
    Unchanged,
    /// Forced to a working day on the default shift.
    ForcedWorking,
    /// Forced to a day off. Nothing later on the same key undoes this.
    ForcedOff,
}

/// Which side of a shift a backfilled punch stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PunchSide {
    /// A clock-in.
    ClockIn,
    /// A clock-out.
    ClockOut,
}

/// A punch injected by a backfill command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Backfill {
    /// Which side was missing.
    pub side: PunchSide,
    /// Wall-clock time on the key's date.
    pub time: NaiveTime,
}

/// The combined effect of every command targeting one (date, employee).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideEffect {
    /// Scheduling decision.
    pub schedule: ScheduleOverride,
    /// Injected punches, in table order.
    pub backfills: Vec<Backfill>,
    /// Accumulated hour adjustment.
    pub manual_delta: Decimal,
    /// One reason per command that fired.
    pub reasons: Vec<String>,
}

impl OverrideEffect {
    /// Folds commands, in order, into one effect.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::calculation::{OverrideEffect, ScheduleOverride};
    /// use attendance_engine::models::{OverrideCommand, OverrideKind};
    /// use chrono::NaiveDate;
    ///
    /// let command = |kind| OverrideCommand {
    ///     date: NaiveDate::from_ymd_opt(2026, 1, 5).unwrap(),
    ///     employee: "Wang".to_string(),
    ///     kind,
    ///     reason: String::new(),
    /// };
    ///
    /// let commands = [command(OverrideKind::ForceDayOff), command(OverrideKind::ForceWorking)];
    /// let effect = OverrideEffect::fold(&commands);
    ///
    /// assert_eq!(effect.schedule, ScheduleOverride::ForcedOff);
    /// assert!(effect.has_override());
    /// ```
    pub fn fold<'a, I>(commands: I) -> Self
    where
        I: IntoIterator<Item = &'a OverrideCommand>,
    {
        commands
            .into_iter()
            .fold(Self::default(), |effect, command| effect.apply(command))
    }

    /// Applies one more command.
    pub fn apply(mut self, command: &OverrideCommand) -> Self {
        match command.kind {
            OverrideKind::ForceDayOff => self.schedule = ScheduleOverride::ForcedOff,
            OverrideKind::ForceWorking => {
                if self.schedule != ScheduleOverride::ForcedOff {
                    self.schedule = ScheduleOverride::ForcedWorking;
                }
            }
            OverrideKind::BackfillClockIn(time) => self.push_backfill(PunchSide::ClockIn, time),
            OverrideKind::BackfillClockOut(time) => self.push_backfill(PunchSide::ClockOut, time),
            OverrideKind::AdjustHours(delta) => match self.manual_delta.checked_add(delta) {
                Some(total) => self.manual_delta = total,
                None => warn!(
                    employee = %command.employee,
                    date = %command.date,
                    %delta,
                    "Hour adjustment overflows, ignoring it"
                ),
            },
        }
        self.reasons.push(command.reason_or_label());
        self
    }

    fn push_backfill(&mut self, side: PunchSide, time: Option<NaiveTime>) {
        if let Some(time) = time {
            self.backfills.push(Backfill { side, time });
        }
    }

    /// Whether any command fired.
    pub fn has_override(&self) -> bool {
        !self.reasons.is_empty()
    }

    /// Resolves the working flag and descriptor for the day.
    pub fn resolve_schedule(
        &self,
        scheduled_working: bool,
        descriptor: &ShiftDescriptor,
    ) -> (bool, ShiftDescriptor) {
        match self.schedule {
            ScheduleOverride::Unchanged => (scheduled_working, descriptor.clone()),
            ScheduleOverride::ForcedWorking => (true, ShiftDescriptor::NormalShift),
            ScheduleOverride::ForcedOff => (false, ShiftDescriptor::Off),
        }
    }

    /// One-line description of what the override changed, for the audit
    /// trail.
    pub fn summary(&self, scheduled_working: bool, descriptor: &ShiftDescriptor) -> String {
        let mut parts = vec![if scheduled_working {
            format!("working ({descriptor})")
        } else {
            "day off".to_string()
        }];

        if !self.backfills.is_empty() {
            parts.push(format!("{} backfilled punch(es)", self.backfills.len()));
        }
        if !self.manual_delta.is_zero() {
            let sign = if self.manual_delta.is_sign_positive() { "+" } else { "" };
            parts.push(format!("manual adjustment {sign}{}h", self.manual_delta));
        }

        parts.join("; ")
    }
}
