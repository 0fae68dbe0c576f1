//! Manager override models.
//!
//! An [`OverrideRow`] is a raw line from the exception table; the parser turns
//! recognizable rows into [`OverrideCommand`]s.

use chrono::{NaiveDate, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One raw row of the manager's exception table.
///
/// Every cell is text as exported; missing cells deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideRow {
    /// Date cell.
    #[serde(default)]
    pub date: String,
    /// Employee name cell.
    #[serde(default)]
    pub employee: String,
    /// Command keyword cell.
    #[serde(default)]
    pub command: String,
    /// Backfill time cell.
    #[serde(default)]
    pub time: String,
    /// Signed hour delta cell.
    #[serde(default)]
    pub hours: String,
    /// Free-text reason.
    #[serde(default)]
    pub reason: String,
}

/// What an override does, with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "payload", rename_all = "snake_case")]
pub enum OverrideKind {
    /// Reclassify the day as not working.
    ForceDayOff,
    /// Reclassify the day as a normal working shift.
    ForceWorking,
    /// Inject a clock-in at the given time; `None` when the time cell did not parse.
    BackfillClockIn(Option<NaiveTime>),
    /// Inject a clock-out at the given time; `None` when the time cell did not parse.
    BackfillClockOut(Option<NaiveTime>),
    /// Add a signed number of hours to the day's overtime.
    AdjustHours(Decimal),
}

impl OverrideKind {
    /// Short label used when a command carries no reason text.
    pub fn label(&self) -> &'static str {
        match self {
            OverrideKind::ForceDayOff => "force day off",
            OverrideKind::ForceWorking => "force working",
            OverrideKind::BackfillClockIn(_) => "backfill clock-in",
            OverrideKind::BackfillClockOut(_) => "backfill clock-out",
            OverrideKind::AdjustHours(_) => "adjust hours",
        }
    }
}

/// A parsed manager override for one (date, employee).
///
/// Several commands may share a key; they apply in table order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverrideCommand {
    /// The day the command targets.
    pub date: NaiveDate,
    /// The employee the command targets.
    pub employee: String,
    /// The command and its payload.
    #[serde(flatten)]
    pub kind: OverrideKind,
    /// The manager's reason text.
    pub reason: String,
}

impl OverrideCommand {
    /// True when this command targets the given key.
    pub fn targets(&self, date: NaiveDate, employee: &str) -> bool {
        self.date == date && self.employee == employee
    }

    /// The reason text, or the command label when the reason was left blank.
    pub fn reason_or_label(&self) -> String {
        if self.reason.trim().is_empty() {
            self.kind.label().to_string()
        } else {
            self.reason.clone()
        }
    }
}
