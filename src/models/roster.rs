//! Roster models.
//!
//! A [`RosterEntry`] is one normalized scheduling fact: who is expected to work
//! on which day, and under which [`ShiftDescriptor`].

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EmploymentType;

const NORMAL_SHIFT: &str = "normal_shift";
const OFF: &str = "off";

/// How a rostered day is described.
///
/// Serializes as a plain string: `"normal_shift"`, `"off"`, or the explicit
/// range text verbatim (for example `"1100-1500"`).
///
/// # Example
///
/// ```
/// use attendance_engine::models::ShiftDescriptor;
///
/// assert_eq!(ShiftDescriptor::from("off".to_string()), ShiftDescriptor::Off);
/// assert_eq!(
///     ShiftDescriptor::from("2200-0300".to_string()),
///     ShiftDescriptor::Explicit("2200-0300".to_string())
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShiftDescriptor {
    /// The store's standard pattern, resolved from punch timing.
    NormalShift,
    /// Not working.
    Off,
    /// An explicit `HHMM-HHMM` style range, kept as written.
    Explicit(String),
}

impl ShiftDescriptor {
    /// The descriptor's text form.
    pub fn as_str(&self) -> &str {
        match self {
            ShiftDescriptor::NormalShift => NORMAL_SHIFT,
            ShiftDescriptor::Off => OFF,
            ShiftDescriptor::Explicit(range) => range,
        }
    }
}

impl From<String> for ShiftDescriptor {
    fn from(text: String) -> Self {
        match text.as_str() {
            NORMAL_SHIFT => ShiftDescriptor::NormalShift,
            OFF => ShiftDescriptor::Off,
            _ => ShiftDescriptor::Explicit(text),
        }
    }
}

impl From<ShiftDescriptor> for String {
    fn from(descriptor: ShiftDescriptor) -> Self {
        match descriptor {
            ShiftDescriptor::Explicit(range) => range,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for ShiftDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One normalized scheduling fact from the roster grid.
///
/// The `(date, employee)` key is unique within one flattened roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    /// The rostered day.
    pub date: NaiveDate,
    /// Employee name as written in the header row.
    pub employee: String,
    /// Inferred from the title row.
    pub employment_type: EmploymentType,
    /// How the day is described.
    pub shift_descriptor: ShiftDescriptor,
    /// Whether the employee is expected at work.
    pub scheduled_working: bool,
}

impl RosterEntry {
    /// The join key used across all stages.
    pub fn key(&self) -> (NaiveDate, &str) {
        (self.date, self.employee.as_str())
    }

    /// Short wording of the rostered determination, used in audit entries.
    pub fn determination(&self) -> String {
        if self.scheduled_working {
            format!("working ({})", self.shift_descriptor)
        } else {
            "day off".to_string()
        }
    }
}
