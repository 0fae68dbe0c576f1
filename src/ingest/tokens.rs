//! Parsing of the loose date and time tokens found in exported tables.

use chrono::{NaiveDate, NaiveTime};

const FULL_DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

const CLOCK_FORMATS: [&str; 2] = ["%H:%M:%S", "%H:%M"];

/// Parses the leading date token of a cell.
///
/// Fully qualified dates always parse. Month/day forms (`1/5`, `01-05`,
/// `1月5日`) need a `reference_year` and are rejected without one. Anything
/// after the first whitespace or opening parenthesis is ignored, so
/// `"1/5(一)"` and `"2026-01-05 00:00:00"` both work.
///
/// # Example
///
/// ```
/// use attendance_engine::ingest::parse_date_token;
/// use chrono::NaiveDate;
///
/// let expected = NaiveDate::from_ymd_opt(2026, 1, 5);
/// assert_eq!(parse_date_token("2026/01/05", None), expected);
/// assert_eq!(parse_date_token("1/5(一)", Some(2026)), expected);
/// assert_eq!(parse_date_token("1/5", None), None);
/// ```
pub fn parse_date_token(cell: &str, reference_year: Option<i32>) -> Option<NaiveDate> {
    let token = cell
        .trim()
        .split(|c: char| c.is_whitespace() || c == '(' || c == '（')
        .next()?;
    if token.is_empty() {
        return None;
    }

    if let Some(date) = FULL_DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(token, format).ok())
    {
        return Some(date);
    }

    let year = reference_year?;
    let month_day = token
        .replace('月', "/")
        .replace('日', "")
        .replace('-', "/");
    NaiveDate::parse_from_str(&format!("{year}/{month_day}"), "%Y/%m/%d").ok()
}

/// Parses a wall-clock time: `HH:MM:SS`, `HH:MM`, `HHMM`, or the time part of
/// a full date-time.
///
/// ```
/// use attendance_engine::ingest::parse_clock_time;
/// use chrono::NaiveTime;
///
/// assert_eq!(parse_clock_time("0930"), NaiveTime::from_hms_opt(9, 30, 0));
/// assert_eq!(parse_clock_time("2026-01-05 22:15:00"), NaiveTime::from_hms_opt(22, 15, 0));
/// ```
pub fn parse_clock_time(text: &str) -> Option<NaiveTime> {
    let token = text
        .trim()
        .rsplit(|c: char| c.is_whitespace() || c == 'T')
        .next()?;

    if let Some(time) = CLOCK_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(token, format).ok())
    {
        return Some(time);
    }

    if (3..=4).contains(&token.len()) && token.chars().all(|c| c.is_ascii_digit()) {
        let padded = format!("{token:0>4}");
        return NaiveTime::parse_from_str(&padded, "%H%M").ok();
    }

    None
}

/// Splits an explicit range such as `1100-1500` or `22:00~03:00` into its
/// two clock times.
pub fn parse_time_range(text: &str, separators: &[char]) -> Option<(NaiveTime, NaiveTime)> {
    let (start, end) = text.trim().split_once(|c: char| separators.contains(&c))?;
    Some((parse_clock_time(start)?, parse_clock_time(end)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    fn time(h: u32, m: u32) -> Option<NaiveTime> {
        NaiveTime::from_hms_opt(h, m, 0)
    }

    #[test]
    fn test_full_dates_parse_without_reference_year() {
        assert_eq!(parse_date_token("2026-01-05", None), date(2026, 1, 5));
        assert_eq!(parse_date_token("2026.1.5", None), date(2026, 1, 5));
        assert_eq!(parse_date_token("2026-01-05 00:00:00", None), date(2026, 1, 5));
    }

    #[test]
    fn test_partial_dates_use_reference_year() {
        assert_eq!(parse_date_token("01/05", Some(2026)), date(2026, 1, 5));
        assert_eq!(parse_date_token("1-5", Some(2026)), date(2026, 1, 5));
        assert_eq!(parse_date_token("1月5日", Some(2026)), date(2026, 1, 5));
        assert_eq!(parse_date_token("12/31 (Wed)", Some(2025)), date(2025, 12, 31));
    }

    #[test]
    fn test_non_dates_rejected() {
        assert_eq!(parse_date_token("", Some(2026)), None);
        assert_eq!(parse_date_token("姓名", Some(2026)), None);
        assert_eq!(parse_date_token("Total", Some(2026)), None);
        assert_eq!(parse_date_token("1100-1500", Some(2026)), None);
        assert_eq!(parse_date_token("2/30", Some(2026)), None);
    }

    #[test]
    fn test_clock_time_layouts() {
        assert_eq!(parse_clock_time("09:30:00"), time(9, 30));
        assert_eq!(parse_clock_time("9:30"), time(9, 30));
        assert_eq!(parse_clock_time("930"), time(9, 30));
        assert_eq!(parse_clock_time("2026-01-05T17:00:00"), time(17, 0));
        assert_eq!(parse_clock_time("late"), None);
        assert_eq!(parse_clock_time("2500"), None);
    }

    #[test]
    fn test_time_range() {
        let separators = ['-', '~'];
        assert_eq!(
            parse_time_range("1100-1500", &separators),
            Some((time(11, 0).unwrap(), time(15, 0).unwrap()))
        );
        assert_eq!(
            parse_time_range("22:00~03:00", &separators),
            Some((time(22, 0).unwrap(), time(3, 0).unwrap()))
        );
        assert_eq!(
            parse_time_range("早班 1100-1500", &separators),
            Some((time(11, 0).unwrap(), time(15, 0).unwrap()))
        );
        assert_eq!(parse_time_range("1100", &separators), None);
        assert_eq!(parse_time_range("ab-cd", &separators), None);
    }
}
