//! Worked-time arithmetic shared by every shift rule.
//!
//! Durations are carried as whole minutes and only converted to [`Decimal`]
//! hours at the edges, so half-hour flooring never sees binary rounding noise.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

const MINUTES_PER_HOUR: Decimal = Decimal::from_parts(60, 0, 0, false, 0);
const HALF_HOUR: Decimal = Decimal::from_parts(5, 0, 0, false, 1);
const HALF_HOUR_MINUTES: i64 = 30;

/// Whole minutes from `start` to `end`, clamped at zero.
pub fn span_minutes(start: NaiveDateTime, end: NaiveDateTime) -> i64 {
    (end - start).num_minutes().max(0)
}

/// Minutes by which `actual` falls after `expected`, clamped at zero.
pub fn minutes_late(actual: NaiveDateTime, expected: NaiveDateTime) -> i64 {
    span_minutes(expected, actual)
}

/// Worked minutes under the pairing rule.
///
/// An even number of punches is read as consecutive (in, out) pairs and the
/// pair spans are summed. An odd number collapses to last minus first. The
/// punches must already be sorted.
///
/// # Example
///
/// ```
/// use attendance_engine::calculation::paired_minutes;
/// use chrono::NaiveDate;
///
/// let day = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
/// let at = |h, m| day.and_hms_opt(h, m, 0).unwrap();
///
/// assert_eq!(paired_minutes(&[at(11, 0), at(14, 0), at(17, 0), at(22, 0)]), 480);
/// assert_eq!(paired_minutes(&[at(11, 0), at(14, 0), at(22, 0)]), 660);
/// assert_eq!(paired_minutes(&[]), 0);
/// ```
pub fn paired_minutes(punches: &[NaiveDateTime]) -> i64 {
    if punches.len() % 2 == 0 {
        punches
            .chunks_exact(2)
            .map(|pair| span_minutes(pair[0], pair[1]))
            .sum()
    } else {
        match (punches.first(), punches.last()) {
            (Some(first), Some(last)) => span_minutes(*first, *last),
            _ => 0,
        }
    }
}

/// Converts minutes to exact decimal hours.
pub fn minutes_to_hours(minutes: i64) -> Decimal {
    Decimal::from(minutes) / MINUTES_PER_HOUR
}

/// Credits only completed half-hours: `floor(minutes / 30) * 0.5`.
///
/// ```
/// use attendance_engine::calculation::bucket_round_minutes;
/// use rust_decimal::Decimal;
///
/// assert_eq!(bucket_round_minutes(47), Decimal::new(5, 1));
/// assert_eq!(bucket_round_minutes(29), Decimal::ZERO);
/// ```
pub fn bucket_round_minutes(minutes: i64) -> Decimal {
    Decimal::from(minutes.max(0) / HALF_HOUR_MINUTES) * HALF_HOUR
}

/// Floors hours to the nearest lower half hour.
pub fn floor_to_half_hour(hours: Decimal) -> Decimal {
    (hours / HALF_HOUR).floor() * HALF_HOUR
}

/// Overtime above a base day, floored to half hours and never negative.
pub fn overtime_over_base(worked_hours: Decimal, base_hours: Decimal) -> Decimal {
    floor_to_half_hour((worked_hours - base_hours).max(Decimal::ZERO))
}
