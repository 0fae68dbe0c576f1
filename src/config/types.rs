//! Configuration types for attendance reconciliation.
//!
//! Every field has a built-in default, so a YAML file only needs to name the
//! values a store changes. The defaults reproduce the house rules: a 10-minute
//! duplicate clock-in window, a 30-minute early-leave grace, an 11:00–14:30 +
//! 17:00–23:00 split shift and a 15:00–23:00 evening shift.

use chrono::NaiveTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 8.5 hours.
pub const SPLIT_SHIFT_BASE_HOURS: Decimal = Decimal::from_parts(85, 0, 0, false, 1);

/// 8.0 hours.
pub const EVENING_SHIFT_BASE_HOURS: Decimal = Decimal::from_parts(8, 0, 0, false, 0);

/// Base hours used when an explicit range cannot be parsed.
pub const EXPLICIT_FALLBACK_BASE_HOURS: Decimal = Decimal::from_parts(85, 0, 0, false, 1);

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap_or(NaiveTime::MIN)
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// A scheduled working window within one day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeWindow {
    /// Scheduled start.
    pub start: NaiveTime,
    /// Scheduled close.
    pub end: NaiveTime,
}

impl TimeWindow {
    /// Creates a window from hour/minute pairs.
    pub fn from_hm(start: (u32, u32), end: (u32, u32)) -> Self {
        Self {
            start: hm(start.0, start.1),
            end: hm(end.0, end.1),
        }
    }
}

/// The two-window split shift worked by full-time staff on lunch and dinner service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplitShiftPolicy {
    /// Lunch window.
    pub first_window: TimeWindow,
    /// Dinner window.
    pub second_window: TimeWindow,
    /// Hours a split shift is worth before overtime.
    pub base_hours: Decimal,
    /// A first punch before this time selects the split shift.
    pub starts_before: NaiveTime,
    /// This many punches or more selects the split shift.
    pub min_punches: usize,
}

impl Default for SplitShiftPolicy {
    fn default() -> Self {
        Self {
            first_window: TimeWindow::from_hm((11, 0), (14, 30)),
            second_window: TimeWindow::from_hm((17, 0), (23, 0)),
            base_hours: SPLIT_SHIFT_BASE_HOURS,
            starts_before: hm(13, 0),
            min_punches: 4,
        }
    }
}

/// The single evening window used when a normal shift is not a split shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EveningShiftPolicy {
    /// Evening window.
    pub window: TimeWindow,
    /// Hours an evening shift is worth before overtime.
    pub base_hours: Decimal,
}

impl Default for EveningShiftPolicy {
    fn default() -> Self {
        Self {
            window: TimeWindow::from_hm((15, 0), (23, 0)),
            base_hours: EVENING_SHIFT_BASE_HOURS,
        }
    }
}

/// Numeric rules applied by the cleaner and the reconciliation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// A repeated clock-in within this many minutes is duplicate noise.
    pub merge_window_minutes: i64,
    /// Keep a clock-out with no clock-in as an orphaned record.
    pub retain_orphan_clock_outs: bool,
    /// Departures this many minutes or less before close are forgiven.
    pub early_leave_grace_minutes: i64,
    /// Split shift rules.
    pub split_shift: SplitShiftPolicy,
    /// Evening shift rules.
    pub evening_shift: EveningShiftPolicy,
    /// Base hours when an explicit range does not parse.
    pub explicit_fallback_base_hours: Decimal,
    /// Minutes deducted from the first-to-last span when an explicit shift
    /// has an odd number of punches.
    pub odd_punch_break_deduction_minutes: i64,
    /// Year used to resolve dates written without one (`1/5`, `1月5日`).
    /// Partial dates are rejected when unset.
    pub reference_year: Option<i32>,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            merge_window_minutes: 10,
            retain_orphan_clock_outs: true,
            early_leave_grace_minutes: 30,
            split_shift: SplitShiftPolicy::default(),
            evening_shift: EveningShiftPolicy::default(),
            explicit_fallback_base_hours: EXPLICIT_FALLBACK_BASE_HOURS,
            odd_punch_break_deduction_minutes: 0,
            reference_year: None,
        }
    }
}

/// Keywords that map override table commands to override kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandVocabulary {
    /// Keywords for forcing a day off.
    pub force_day_off: Vec<String>,
    /// Keywords for forcing a working day.
    pub force_working: Vec<String>,
    /// Keywords for injecting a clock-in.
    pub backfill_clock_in: Vec<String>,
    /// Keywords for injecting a clock-out.
    pub backfill_clock_out: Vec<String>,
    /// Keywords for a manual hour adjustment.
    pub adjust_hours: Vec<String>,
}

impl Default for CommandVocabulary {
    fn default() -> Self {
        Self {
            force_day_off: strings(&["強制休假", "改休假", "force_day_off"]),
            force_working: strings(&["強制上班", "改上班", "force_working"]),
            backfill_clock_in: strings(&["補上班卡", "補上班", "backfill_clock_in"]),
            backfill_clock_out: strings(&["補下班卡", "補下班", "backfill_clock_out"]),
            adjust_hours: strings(&["時數調整", "加減時數", "adjust_hours"]),
        }
    }
}

/// Words the ingest stages recognize in punch logs, roster grids and
/// override tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vocabulary {
    /// Punch labels meaning clock-in (exact match).
    pub clock_in: Vec<String>,
    /// Punch labels meaning clock-out (exact match).
    pub clock_out: Vec<String>,
    /// Label fragments the terminal writes when a clock-out is missing.
    pub no_clock_out_markers: Vec<String>,
    /// Label fragments the terminal writes when a clock-in is missing.
    pub no_clock_in_markers: Vec<String>,
    /// Register and system lines to skip (exact match).
    pub noise_labels: Vec<String>,
    /// Fragments identifying totals lines.
    pub totals_markers: Vec<String>,
    /// Labels of the roster's employee-name header cell.
    pub name_header_labels: Vec<String>,
    /// Title fragments marking a part-time column (case-sensitive).
    pub part_time_markers: Vec<String>,
    /// Cell texts treated as blank.
    pub placeholders: Vec<String>,
    /// Fragments marking a day off, leave or absence.
    pub day_off_markers: Vec<String>,
    /// Characters separating the two ends of an explicit range.
    pub range_separators: Vec<char>,
    /// Override command keywords.
    pub commands: CommandVocabulary,
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self {
            clock_in: strings(&["上班", "clock_in"]),
            clock_out: strings(&["下班", "clock_out"]),
            no_clock_out_markers: strings(&["無下班", "no_clock_out"]),
            no_clock_in_markers: strings(&["無上班", "no_clock_in"]),
            noise_labels: strings(&["結帳收銀", "admin"]),
            totals_markers: strings(&["總時數", "Total"]),
            name_header_labels: strings(&["姓名", "員工姓名", "Name"]),
            part_time_markers: strings(&["PT", "兼職", "工讀"]),
            placeholders: strings(&["", "nan", "NaN", "None", "-", "--"]),
            day_off_markers: strings(&["休", "假", "off", "OFF", "Off", "leave", "absent"]),
            range_separators: vec!['-', '~'],
            commands: CommandVocabulary::default(),
        }
    }
}

impl Vocabulary {
    /// True for blank cells and placeholder texts.
    pub fn is_placeholder(&self, cell: &str) -> bool {
        let cell = cell.trim();
        cell.is_empty() || self.placeholders.iter().any(|p| p == cell)
    }

    /// True when the cell contains a day-off, leave or absence marker.
    pub fn is_day_off(&self, cell: &str) -> bool {
        self.day_off_markers
            .iter()
            .any(|marker| cell.contains(marker.as_str()))
    }

    /// True when the text contains a range separator.
    pub fn has_range_separator(&self, cell: &str) -> bool {
        cell.chars().any(|c| self.range_separators.contains(&c))
    }

    /// True when the cell is the roster's name-header label.
    pub fn is_name_header(&self, cell: &str) -> bool {
        let cell = cell.trim();
        self.name_header_labels
            .iter()
            .any(|label| label.eq_ignore_ascii_case(cell))
    }

    /// True when a job title marks its column as part-time.
    pub fn is_part_time_title(&self, title: &str) -> bool {
        self.part_time_markers
            .iter()
            .any(|marker| title.contains(marker.as_str()))
    }
}

/// The complete reconciliation configuration.
///
/// # Example
///
/// ```
/// use attendance_engine::config::ReconcileConfig;
///
/// let config = ReconcileConfig::default();
/// assert_eq!(config.policy.merge_window_minutes, 10);
/// assert_eq!(config.policy.early_leave_grace_minutes, 30);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// Numeric rules.
    pub policy: PolicyConfig,
    /// Recognized words.
    pub vocabulary: Vocabulary,
}

impl ReconcileConfig {
    /// Returns a copy with the reference year set.
    pub fn with_reference_year(mut self, year: i32) -> Self {
        self.policy.reference_year = Some(year);
        self
    }
}
