//! Full-time shift rules.
//!
//! A scheduled full-time day is measured against one of three patterns:
//!
//! - **Split shift** for `normal_shift` days that start before the split
//!   threshold or carry enough punches for two windows.
//! - **Evening shift** for the remaining `normal_shift` days.
//! - **Explicit range** when the roster cell carries start and end times.
//!
//! Each pattern yields a [`ShiftMeasurement`]: lateness, early departure,
//! worked minutes and the base day length that overtime is counted above.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PolicyConfig;
use crate::ingest::parse_time_range;

use super::worked_time::{minutes_late, minutes_to_hours, paired_minutes, span_minutes};

/// Which rule measured a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShiftPattern {
    /// Two windows with an unpaid gap.
    SplitShift,
    /// One evening window.
    EveningShift,
    /// Start and end taken from the roster cell.
    ExplicitRange,
    /// The roster cell carried a range that did not parse.
    UnparsedRange,
}

/// How a departure after the scheduled close is credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LateDeparture {
    /// Time after the close counts as worked.
    Credit,
    /// Credit stops at the close.
    Clip,
}

/// The credited end of a working day after applying the grace rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    /// Where worked time stops being counted.
    pub credited_out: NaiveDateTime,
    /// Minutes left before the close, when beyond the grace allowance.
    pub early_leave_minutes: i64,
}

/// Applies the grace rule to the last punch of a day.
///
/// A departure within `grace_minutes` of the close is forgiven and credited
/// up to the close. An earlier departure is recorded as early leave, in
/// minutes rounded up, and credited as punched.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::{resolve_departure, LateDeparture};
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
/// let close = day.and_hms_opt(23, 0, 0).unwrap();
///
/// let forgiven = resolve_departure(day.and_hms_opt(22, 40, 0).unwrap(), close, 30, LateDeparture::Credit);
/// assert_eq!(forgiven.credited_out, close);
/// assert_eq!(forgiven.early_leave_minutes, 0);
///
/// let early = resolve_departure(day.and_hms_opt(22, 0, 0).unwrap(), close, 30, LateDeparture::Credit);
/// assert_eq!(early.early_leave_minutes, 60);
/// ```
pub fn resolve_departure(
    last_punch: NaiveDateTime,
    close: NaiveDateTime,
    grace_minutes: i64,
    late_departure: LateDeparture,
) -> Departure {
    let shortfall = close - last_punch;

    if shortfall > Duration::minutes(grace_minutes) {
        Departure {
            credited_out: last_punch,
            early_leave_minutes: (shortfall.num_seconds() + 59) / 60,
        }
    } else if shortfall > Duration::zero() || late_departure == LateDeparture::Clip {
        Departure {
            credited_out: close,
            early_leave_minutes: 0,
        }
    } else {
        Departure {
            credited_out: last_punch,
            early_leave_minutes: 0,
        }
    }
}

/// The outcome of measuring one full-time day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftMeasurement {
    /// Rule that produced this measurement.
    pub pattern: ShiftPattern,
    /// Minutes late against the scheduled start(s).
    pub late_minutes: i64,
    /// Minutes of unforgiven early departure.
    pub early_leave_minutes: i64,
    /// Credited worked minutes.
    pub worked_minutes: i64,
    /// Length of the scheduled day in hours.
    pub base_hours: Decimal,
}

impl ShiftMeasurement {
    /// Worked time in hours.
    pub fn worked_hours(&self) -> Decimal {
        minutes_to_hours(self.worked_minutes)
    }
}

/// A scheduled range resolved onto a calendar date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledRange {
    /// Scheduled start.
    pub start: NaiveDateTime,
    /// Scheduled end, on the next day for overnight ranges.
    pub end: NaiveDateTime,
}

impl ScheduledRange {
    /// Resolves a range text onto `date`. An end earlier than the start
    /// wraps past midnight.
    pub fn resolve(date: NaiveDate, text: &str, separators: &[char]) -> Option<Self> {
        let (start, end) = parse_time_range(text, separators)?;
        Some(Self::on(date, start, end))
    }

    /// Places a start and end time on `date`.
    pub fn on(date: NaiveDate, start: NaiveTime, end: NaiveTime) -> Self {
        let start_at = date.and_time(start);
        let mut end_at = date.and_time(end);
        if end < start {
            end_at += Duration::days(1);
        }
        Self {
            start: start_at,
            end: end_at,
        }
    }

    /// Whether the range crosses midnight.
    pub fn is_overnight(&self) -> bool {
        self.end.date() > self.start.date()
    }

    /// Span of the range in hours.
    pub fn hours(&self) -> Decimal {
        minutes_to_hours(span_minutes(self.start, self.end))
    }
}

/// Measures a `normal_shift` day, choosing between the split and evening
/// patterns from the first punch and the punch count.
///
/// `punches` must be sorted and non-empty; an empty slice measures as zero.
pub fn measure_normal_shift(
    date: NaiveDate,
    punches: &[NaiveDateTime],
    policy: &PolicyConfig,
) -> ShiftMeasurement {
    let split = &policy.split_shift;
    let is_split = punches
        .first()
        .is_some_and(|first| first.time() < split.starts_before)
        || punches.len() >= split.min_punches;

    if is_split {
        measure_split_shift(date, punches, policy)
    } else {
        measure_evening_shift(date, punches, policy)
    }
}

/// Measures a day against the two split-shift windows.
///
/// With at least `min_punches` punches the first window is capped at its
/// close and the second starts no earlier than its opening; further breaks
/// inside the second window are not credited. With fewer, the day is one
/// span from the first punch to the credited departure.
pub fn measure_split_shift(
    date: NaiveDate,
    punches: &[NaiveDateTime],
    policy: &PolicyConfig,
) -> ShiftMeasurement {
    let split = &policy.split_shift;
    let (Some(&first), Some(&last)) = (punches.first(), punches.last()) else {
        return empty_measurement(ShiftPattern::SplitShift, split.base_hours);
    };

    let first_open = date.and_time(split.first_window.start);
    let first_close = date.and_time(split.first_window.end);
    let second_open = date.and_time(split.second_window.start);
    let second_close = date.and_time(split.second_window.end);

    let departure = resolve_departure(
        last,
        second_close,
        policy.early_leave_grace_minutes,
        LateDeparture::Credit,
    );

    let mut late_minutes = minutes_late(first, first_open);
    let worked_minutes = match (punches.get(1), punches.get(2)) {
        (Some(&break_out), Some(&return_in)) if punches.len() >= split.min_punches => {
            late_minutes += minutes_late(return_in, second_open);
            span_minutes(first, break_out.min(first_close))
                + second_window_minutes(&punches[2..], second_open, departure.credited_out)
        }
        _ => span_minutes(first, departure.credited_out),
    };

    ShiftMeasurement {
        pattern: ShiftPattern::SplitShift,
        late_minutes,
        early_leave_minutes: departure.early_leave_minutes,
        worked_minutes,
        base_hours: split.base_hours,
    }
}

/// Worked minutes after the break. An even tail is read as (in, out) pairs
/// with the last out replaced by the credited departure; an odd tail is one
/// span from the return to the departure.
fn second_window_minutes(
    tail: &[NaiveDateTime],
    open: NaiveDateTime,
    credited_out: NaiveDateTime,
) -> i64 {
    let Some(&return_in) = tail.first() else {
        return 0;
    };
    if tail.len() % 2 != 0 {
        return span_minutes(return_in.max(open), credited_out);
    }

    let last_pair = tail.len() / 2 - 1;
    tail.chunks_exact(2)
        .enumerate()
        .map(|(index, pair)| {
            let clock_out = if index == last_pair { credited_out } else { pair[1] };
            span_minutes(pair[0].max(open), clock_out)
        })
        .sum()
}

/// Measures a day against the single evening window.
pub fn measure_evening_shift(
    date: NaiveDate,
    punches: &[NaiveDateTime],
    policy: &PolicyConfig,
) -> ShiftMeasurement {
    let evening = &policy.evening_shift;
    let (Some(&first), Some(&last)) = (punches.first(), punches.last()) else {
        return empty_measurement(ShiftPattern::EveningShift, evening.base_hours);
    };

    let departure = resolve_departure(
        last,
        date.and_time(evening.window.end),
        policy.early_leave_grace_minutes,
        LateDeparture::Credit,
    );

    ShiftMeasurement {
        pattern: ShiftPattern::EveningShift,
        late_minutes: minutes_late(first, date.and_time(evening.window.start)),
        early_leave_minutes: departure.early_leave_minutes,
        worked_minutes: span_minutes(first, departure.credited_out),
        base_hours: evening.base_hours,
    }
}

/// Measures a day rostered with an explicit range such as `2200-0300`.
///
/// Worked time is clipped to the scheduled range: the first in-time is moved
/// up to the start and the last out-time is the grace-adjusted end. An odd
/// punch count falls back to the clipped first-to-last span less
/// `odd_punch_break_deduction_minutes`. A range that does not parse is
/// measured by the pairing rule against the fallback base day.
pub fn measure_explicit_shift(
    date: NaiveDate,
    range_text: &str,
    punches: &[NaiveDateTime],
    policy: &PolicyConfig,
    separators: &[char],
) -> ShiftMeasurement {
    let Some(range) = ScheduledRange::resolve(date, range_text, separators) else {
        return ShiftMeasurement {
            pattern: ShiftPattern::UnparsedRange,
            late_minutes: 0,
            early_leave_minutes: 0,
            worked_minutes: paired_minutes(punches),
            base_hours: policy.explicit_fallback_base_hours,
        };
    };

    let (Some(&first), Some(&last)) = (punches.first(), punches.last()) else {
        return empty_measurement(ShiftPattern::ExplicitRange, range.hours());
    };

    let departure = resolve_departure(
        last,
        range.end,
        policy.early_leave_grace_minutes,
        LateDeparture::Clip,
    );
    let valid_end = departure.credited_out;
    let valid_start = first.max(range.start);

    let worked_minutes = if punches.len() % 2 == 0 {
        let last_pair = punches.len() / 2 - 1;
        punches
            .chunks_exact(2)
            .enumerate()
            .map(|(index, pair)| {
                let clock_in = if index == 0 { valid_start } else { pair[0] };
                let clock_out = if index == last_pair { valid_end } else { pair[1] };
                span_minutes(clock_in, clock_out)
            })
            .sum()
    } else {
        (span_minutes(valid_start, valid_end) - policy.odd_punch_break_deduction_minutes).max(0)
    };

    ShiftMeasurement {
        pattern: ShiftPattern::ExplicitRange,
        late_minutes: minutes_late(first, range.start),
        early_leave_minutes: departure.early_leave_minutes,
        worked_minutes,
        base_hours: range.hours(),
    }
}

fn empty_measurement(pattern: ShiftPattern, base_hours: Decimal) -> ShiftMeasurement {
    ShiftMeasurement {
        pattern,
        late_minutes: 0,
        early_leave_minutes: 0,
        worked_minutes: 0,
        base_hours,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, 5).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        day().and_hms_opt(h, m, 0).unwrap()
    }

    fn next_day_at(h: u32, m: u32) -> NaiveDateTime {
        at(h, m) + Duration::days(1)
    }

    fn policy() -> PolicyConfig {
        PolicyConfig::default()
    }

    const SEPARATORS: [char; 2] = ['-', '~'];

    // ==========================================================================
    // Grace rule
    // ==========================================================================

    #[test]
    fn test_grace_stay_late_is_credited() {
        let departure = resolve_departure(at(23, 5), at(23, 0), 30, LateDeparture::Credit);
        assert_eq!(departure.credited_out, at(23, 5));
        assert_eq!(departure.early_leave_minutes, 0);
    }

    #[test]
    fn test_grace_stay_late_is_clipped() {
        let departure = resolve_departure(at(23, 5), at(23, 0), 30, LateDeparture::Clip);
        assert_eq!(departure.credited_out, at(23, 0));
    }

    #[test]
    fn test_grace_boundary_is_forgiven() {
        let departure = resolve_departure(at(22, 30), at(23, 0), 30, LateDeparture::Credit);
        assert_eq!(departure.credited_out, at(23, 0));
        assert_eq!(departure.early_leave_minutes, 0);
    }

    #[test]
    fn test_grace_exceeded_records_full_shortfall() {
        let departure = resolve_departure(at(22, 29), at(23, 0), 30, LateDeparture::Credit);
        assert_eq!(departure.credited_out, at(22, 29));
        assert_eq!(departure.early_leave_minutes, 31);
    }

    #[test]
    fn test_grace_compares_seconds() {
        let close = at(17, 0);
        let just_outside = close - Duration::seconds(30 * 60 + 50);
        let departure = resolve_departure(just_outside, close, 30, LateDeparture::Clip);
        assert_eq!(departure.credited_out, just_outside);
        assert_eq!(departure.early_leave_minutes, 31);

        let just_inside = close - Duration::seconds(29 * 60 + 50);
        let departure = resolve_departure(just_inside, close, 30, LateDeparture::Clip);
        assert_eq!(departure.credited_out, close);
        assert_eq!(departure.early_leave_minutes, 0);
    }

    // ==========================================================================
    // Split shift
    // ==========================================================================

    #[test]
    fn test_split_two_punches_on_time() {
        let m = measure_normal_shift(day(), &[at(10, 55), at(23, 5)], &policy());

        assert_eq!(m.pattern, ShiftPattern::SplitShift);
        assert_eq!(m.late_minutes, 0);
        assert_eq!(m.early_leave_minutes, 0);
        assert_eq!(m.worked_minutes, 730);
        assert_eq!(m.base_hours, dec("8.5"));
    }

    #[test]
    fn test_split_two_punches_late_and_forgiven() {
        let m = measure_normal_shift(day(), &[at(11, 20), at(22, 40)], &policy());

        assert_eq!(m.late_minutes, 20);
        assert_eq!(m.early_leave_minutes, 0);
        assert_eq!(m.worked_minutes, 700);
    }

    #[test]
    fn test_split_four_punches_uses_both_windows() {
        let punches = [at(11, 5), at(14, 45), at(17, 10), at(23, 0)];
        let m = measure_normal_shift(day(), &punches, &policy());

        assert_eq!(m.late_minutes, 15);
        // 11:05-14:30 plus 17:10-23:00
        assert_eq!(m.worked_minutes, 205 + 350);
    }

    #[test]
    fn test_split_four_punches_early_return_starts_at_window() {
        let punches = [at(11, 0), at(14, 0), at(16, 30), at(22, 0)];
        let m = measure_normal_shift(day(), &punches, &policy());

        assert_eq!(m.late_minutes, 0);
        assert_eq!(m.early_leave_minutes, 60);
        // 11:00-14:00 plus 17:00-22:00
        assert_eq!(m.worked_minutes, 180 + 300);
    }

    #[test]
    fn test_split_six_punches_skips_dinner_break() {
        let punches = [at(11, 0), at(14, 30), at(17, 0), at(19, 0), at(19, 30), at(23, 0)];
        let m = measure_normal_shift(day(), &punches, &policy());

        assert_eq!(m.late_minutes, 0);
        // 11:00-14:30 plus 17:00-19:00 plus 19:30-23:00
        assert_eq!(m.worked_minutes, 210 + 120 + 210);
    }

    #[test]
    fn test_split_five_punches_spans_from_return() {
        let punches = [at(11, 0), at(14, 30), at(17, 0), at(19, 0), at(23, 0)];
        let m = measure_normal_shift(day(), &punches, &policy());

        // 11:00-14:30 plus 17:00-23:00
        assert_eq!(m.worked_minutes, 210 + 360);
    }

    #[test]
    fn test_four_punches_force_split_even_after_threshold() {
        let punches = [at(14, 0), at(14, 20), at(17, 0), at(23, 0)];
        let m = measure_normal_shift(day(), &punches, &policy());
        assert_eq!(m.pattern, ShiftPattern::SplitShift);
    }

    // ==========================================================================
    // Evening shift
    // ==========================================================================

    #[test]
    fn test_evening_shift_selected_after_threshold() {
        let m = measure_normal_shift(day(), &[at(15, 10), at(23, 30)], &policy());

        assert_eq!(m.pattern, ShiftPattern::EveningShift);
        assert_eq!(m.late_minutes, 10);
        assert_eq!(m.worked_minutes, 500);
        assert_eq!(m.base_hours, dec("8"));
    }

    #[test]
    fn test_evening_shift_early_leave() {
        let m = measure_normal_shift(day(), &[at(15, 0), at(21, 0)], &policy());
        assert_eq!(m.early_leave_minutes, 120);
        assert_eq!(m.worked_minutes, 360);
    }

    // ==========================================================================
    // Explicit range
    // ==========================================================================

    #[test]
    fn test_explicit_range_clips_both_ends() {
        let m = measure_explicit_shift(
            day(),
            "1100-1500",
            &[at(10, 45), at(15, 20)],
            &policy(),
            &SEPARATORS,
        );

        assert_eq!(m.pattern, ShiftPattern::ExplicitRange);
        assert_eq!(m.late_minutes, 0);
        assert_eq!(m.worked_minutes, 240);
        assert_eq!(m.base_hours, dec("4"));
    }

    #[test]
    fn test_explicit_overnight_range() {
        let m = measure_explicit_shift(
            day(),
            "2200-0300",
            &[at(22, 10), next_day_at(2, 40)],
            &policy(),
            &SEPARATORS,
        );

        assert_eq!(m.late_minutes, 10);
        assert_eq!(m.early_leave_minutes, 0);
        // credited through to 03:00
        assert_eq!(m.worked_minutes, 290);
        assert_eq!(m.base_hours, dec("5"));
    }

    #[test]
    fn test_explicit_early_leave_beyond_grace() {
        let m = measure_explicit_shift(
            day(),
            "09:00~17:00",
            &[at(9, 0), at(12, 0), at(13, 0), at(16, 0)],
            &policy(),
            &SEPARATORS,
        );

        assert_eq!(m.early_leave_minutes, 60);
        assert_eq!(m.worked_minutes, 180 + 180);
    }

    #[test]
    fn test_explicit_odd_punches_use_deduction() {
        let mut policy = policy();
        policy.odd_punch_break_deduction_minutes = 30;

        let m = measure_explicit_shift(
            day(),
            "0900-1700",
            &[at(9, 0), at(12, 0), at(17, 0)],
            &policy,
            &SEPARATORS,
        );

        assert_eq!(m.worked_minutes, 450);
    }

    #[test]
    fn test_unparsed_range_falls_back() {
        let m = measure_explicit_shift(
            day(),
            "ab-cd",
            &[at(9, 0), at(17, 0)],
            &policy(),
            &SEPARATORS,
        );

        assert_eq!(m.pattern, ShiftPattern::UnparsedRange);
        assert_eq!(m.late_minutes, 0);
        assert_eq!(m.early_leave_minutes, 0);
        assert_eq!(m.worked_minutes, 480);
        assert_eq!(m.base_hours, dec("8.5"));
    }

    #[test]
    fn test_scheduled_range_overnight_flag() {
        let range = ScheduledRange::resolve(day(), "2200-0300", &SEPARATORS).unwrap();
        assert!(range.is_overnight());
        assert_eq!(range.end, next_day_at(3, 0));
    }
}
