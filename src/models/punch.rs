//! Punch log models.
//!
//! This module defines the raw [`PunchRow`] fed to the cleaner, the parsed
//! [`PunchTime`], the cleaned [`ShiftPunch`] record and the [`PunchAnomaly`]
//! data-quality entries the cleaner reports.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// Date-time layouts accepted in punch log time fields.
const TIMESTAMP_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// One row of the exported punch log: a label and a time field.
///
/// The label is either an employee name or an action keyword; the time field
/// is empty on name rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchRow {
    /// Employee name or action keyword.
    pub label: String,
    /// Raw time text.
    #[serde(default)]
    pub time: String,
}

impl PunchRow {
    /// Creates a row from its two cells.
    pub fn new(label: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            time: time.into(),
        }
    }
}

/// A punch time as it appeared in the log, with its parsed value when the
/// text is a recognizable timestamp.
///
/// Serializes as the raw text.
///
/// # Example
///
/// ```
/// use attendance_engine::models::PunchTime;
///
/// let time = PunchTime::parse("2026/01/05 10:55");
/// assert!(time.parsed().is_some());
///
/// let broken = PunchTime::parse("??:??");
/// assert!(broken.parsed().is_none());
/// assert_eq!(broken.raw(), "??:??");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct PunchTime {
    raw: String,
    parsed: Option<NaiveDateTime>,
}

impl PunchTime {
    /// Parses a raw time field, keeping the text even when it does not parse.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim().to_string();
        let parsed = TIMESTAMP_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(&raw, format).ok());
        Self { raw, parsed }
    }

    /// Wraps an already-known timestamp.
    pub fn at(timestamp: NaiveDateTime) -> Self {
        Self {
            raw: timestamp.format("%Y-%m-%d %H:%M:%S").to_string(),
            parsed: Some(timestamp),
        }
    }

    /// The text as it appeared in the log.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The parsed timestamp, if the text was recognizable.
    pub fn parsed(&self) -> Option<NaiveDateTime> {
        self.parsed
    }

    /// Absolute distance between two punch times, when both parsed.
    pub fn gap(&self, other: &PunchTime) -> Option<Duration> {
        match (self.parsed, other.parsed) {
            (Some(a), Some(b)) => Some((b - a).abs()),
            _ => None,
        }
    }
}

impl From<String> for PunchTime {
    fn from(raw: String) -> Self {
        PunchTime::parse(&raw)
    }
}

impl From<PunchTime> for String {
    fn from(time: PunchTime) -> Self {
        time.raw
    }
}

impl std::fmt::Display for PunchTime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.raw)
    }
}

/// A cleaned clock-in/clock-out record.
///
/// At least one side is always present: records are built through
/// [`ShiftPunch::complete`], [`ShiftPunch::orphan_clock_in`] and
/// [`ShiftPunch::orphan_clock_out`], and deserializing a record with neither
/// side fails. A one-sided record is an orphaned punch, kept so
/// reconciliation can still use the half it has.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ShiftPunchFields")]
pub struct ShiftPunch {
    employee: String,
    clock_in: Option<PunchTime>,
    clock_out: Option<PunchTime>,
}

#[derive(Deserialize)]
struct ShiftPunchFields {
    employee: String,
    #[serde(default)]
    clock_in: Option<PunchTime>,
    #[serde(default)]
    clock_out: Option<PunchTime>,
}

impl TryFrom<ShiftPunchFields> for ShiftPunch {
    type Error = &'static str;

    fn try_from(fields: ShiftPunchFields) -> Result<Self, Self::Error> {
        if fields.clock_in.is_none() && fields.clock_out.is_none() {
            return Err("punch record needs a clock-in or a clock-out");
        }
        Ok(Self {
            employee: fields.employee,
            clock_in: fields.clock_in,
            clock_out: fields.clock_out,
        })
    }
}

impl ShiftPunch {
    /// A paired clock-in and clock-out.
    pub fn complete(employee: &str, clock_in: PunchTime, clock_out: PunchTime) -> Self {
        Self {
            employee: employee.to_string(),
            clock_in: Some(clock_in),
            clock_out: Some(clock_out),
        }
    }

    /// A clock-in whose clock-out never arrived.
    pub fn orphan_clock_in(employee: &str, clock_in: PunchTime) -> Self {
        Self {
            employee: employee.to_string(),
            clock_in: Some(clock_in),
            clock_out: None,
        }
    }

    /// A clock-out with no matching clock-in.
    pub fn orphan_clock_out(employee: &str, clock_out: PunchTime) -> Self {
        Self {
            employee: employee.to_string(),
            clock_in: None,
            clock_out: Some(clock_out),
        }
    }

    /// Employee the punches belong to.
    pub fn employee(&self) -> &str {
        &self.employee
    }

    /// Clock-in time, absent on an orphaned clock-out.
    pub fn clock_in(&self) -> Option<&PunchTime> {
        self.clock_in.as_ref()
    }

    /// Clock-out time, absent on an orphaned clock-in.
    pub fn clock_out(&self) -> Option<&PunchTime> {
        self.clock_out.as_ref()
    }

    /// True when one side is missing.
    pub fn is_orphaned(&self) -> bool {
        self.clock_in.is_none() || self.clock_out.is_none()
    }

    /// The work date this record belongs to: the clock-in date, else the
    /// clock-out date. `None` when neither side parsed.
    pub fn anchor_date(&self) -> Option<NaiveDate> {
        self.clock_in
            .as_ref()
            .and_then(PunchTime::parsed)
            .or_else(|| self.clock_out.as_ref().and_then(PunchTime::parsed))
            .map(|timestamp| timestamp.date())
    }

    /// Parsed timestamps of both sides, clock-in first.
    pub fn timestamps(&self) -> impl Iterator<Item = NaiveDateTime> + '_ {
        self.clock_in
            .iter()
            .chain(self.clock_out.iter())
            .filter_map(PunchTime::parsed)
    }
}

/// Categories of punch-log data-quality problems.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyCategory {
    /// Two clock-ins further apart than the merge window with no clock-out between.
    ConsecutiveClockIn,
    /// A clock-out with no pending clock-in.
    ClockOutWithoutClockIn,
    /// The terminal flagged a missing clock-out.
    SystemMarkedNoClockOut,
    /// The terminal flagged a missing clock-in.
    SystemMarkedNoClockIn,
    /// The log moved on to another employee while a clock-in was pending.
    SwitchedEmployeeWithoutClockOut,
    /// The log ended while a clock-in was pending.
    MissingClockOutAtEndOfLog,
}

impl AnomalyCategory {
    /// Human-readable description for reviewers.
    pub fn description(self) -> &'static str {
        match self {
            AnomalyCategory::ConsecutiveClockIn => "two clock-ins in a row with no clock-out",
            AnomalyCategory::ClockOutWithoutClockIn => "clock-out recorded without a clock-in",
            AnomalyCategory::SystemMarkedNoClockOut => {
                "terminal marked no clock-out, confirm departure time"
            }
            AnomalyCategory::SystemMarkedNoClockIn => {
                "terminal marked no clock-in, confirm arrival time"
            }
            AnomalyCategory::SwitchedEmployeeWithoutClockOut => {
                "next employee started before this clock-in was closed"
            }
            AnomalyCategory::MissingClockOutAtEndOfLog => "log ended before a clock-out",
        }
    }
}

/// One entry of the data-quality log.
///
/// Informational only; anomalies never feed back into calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PunchAnomaly {
    /// Employee the anomaly was observed for.
    pub employee: String,
    /// What went wrong.
    pub category: AnomalyCategory,
    /// The punch time the anomaly refers to.
    pub timestamp: PunchTime,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_datetime(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").unwrap()
    }

    #[test]
    fn test_parse_accepts_slash_and_dash_layouts() {
        let expected = make_datetime("2026-01-05 10:55:00");
        assert_eq!(PunchTime::parse("2026/01/05 10:55").parsed(), Some(expected));
        assert_eq!(PunchTime::parse("2026-01-05 10:55:00").parsed(), Some(expected));
        assert_eq!(PunchTime::parse(" 2026-01-05T10:55:00 ").parsed(), Some(expected));
    }

    #[test]
    fn test_parse_keeps_raw_text_when_unparseable() {
        let time = PunchTime::parse("nan");
        assert_eq!(time.raw(), "nan");
        assert!(time.parsed().is_none());
    }

    #[test]
    fn test_gap_requires_both_parsed() {
        let a = PunchTime::parse("2026-01-05 10:00");
        let b = PunchTime::parse("2026-01-05 10:07");
        assert_eq!(a.gap(&b), Some(Duration::minutes(7)));
        assert_eq!(b.gap(&a), Some(Duration::minutes(7)));
        assert_eq!(a.gap(&PunchTime::parse("bad")), None);
    }

    #[test]
    fn test_gap_keeps_seconds() {
        let a = PunchTime::parse("2026-01-05 10:00:00");
        let b = PunchTime::parse("2026-01-05 10:10:50");
        assert_eq!(a.gap(&b), Some(Duration::seconds(650)));
    }

    #[test]
    fn test_punch_time_serializes_as_raw_text() {
        let time = PunchTime::parse("2026/01/05 10:55");
        assert_eq!(serde_json::to_string(&time).unwrap(), "\"2026/01/05 10:55\"");

        let back: PunchTime = serde_json::from_str("\"2026/01/05 10:55\"").unwrap();
        assert_eq!(back, time);
    }

    #[test]
    fn test_anchor_date_prefers_clock_in() {
        let punch = ShiftPunch::complete(
            "Chen",
            PunchTime::parse("2026-01-05 22:00"),
            PunchTime::parse("2026-01-06 03:00"),
        );
        assert_eq!(punch.anchor_date(), NaiveDate::from_ymd_opt(2026, 1, 5));
        assert!(!punch.is_orphaned());
    }

    #[test]
    fn test_anchor_date_falls_back_to_clock_out() {
        let punch = ShiftPunch::orphan_clock_out("Chen", PunchTime::parse("2026-01-06 03:00"));
        assert_eq!(punch.anchor_date(), NaiveDate::from_ymd_opt(2026, 1, 6));
        assert!(punch.is_orphaned());
    }

    #[test]
    fn test_anchor_date_none_when_nothing_parses() {
        let punch = ShiftPunch::orphan_clock_in("Chen", PunchTime::parse("garbage"));
        assert_eq!(punch.anchor_date(), None);
        assert_eq!(punch.timestamps().count(), 0);
    }

    #[test]
    fn test_deserializing_sideless_record_fails() {
        let record: ShiftPunch =
            serde_json::from_str(r#"{"employee":"Chen","clock_out":"2026-01-06 03:00"}"#).unwrap();
        assert_eq!(record.clock_out().map(PunchTime::raw), Some("2026-01-06 03:00"));
        assert!(record.clock_in().is_none());

        let sideless = serde_json::from_str::<ShiftPunch>(r#"{"employee":"Chen"}"#);
        assert!(sideless.is_err());

        let nulls = serde_json::from_str::<ShiftPunch>(
            r#"{"employee":"Chen","clock_in":null,"clock_out":null}"#,
        );
        assert!(nulls.is_err());
    }

    #[test]
    fn test_anomaly_category_serialization() {
        assert_eq!(
            serde_json::to_string(&AnomalyCategory::SwitchedEmployeeWithoutClockOut).unwrap(),
            "\"switched_employee_without_clock_out\""
        );
    }
}
