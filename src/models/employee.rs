//! Employment type for rostered staff.

use serde::{Deserialize, Serialize};

/// Represents the type of employment arrangement.
///
/// Part-time staff are settled on bucket-rounded hours; full-time staff are
/// measured against a scheduled shift and earn rounded overtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Full-time employment, paid against a scheduled shift.
    #[default]
    FullTime,
    /// Part-time employment, paid on worked hours.
    PartTime,
}

impl EmploymentType {
    /// Returns true if the employee is part-time.
    ///
    /// # Examples
    ///
    /// ```
    /// use attendance_engine::models::EmploymentType;
    ///
    /// assert!(EmploymentType::PartTime.is_part_time());
    /// assert!(!EmploymentType::FullTime.is_part_time());
    /// ```
    pub fn is_part_time(self) -> bool {
        self == EmploymentType::PartTime
    }
}

impl std::fmt::Display for EmploymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EmploymentType::FullTime => write!(f, "full_time"),
            EmploymentType::PartTime => write!(f, "part_time"),
        }
    }
}
