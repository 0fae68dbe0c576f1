//! Manager exception table parsing.
//!
//! The exception table is authored by hand and exported with stray header and
//! footer rows, so parsing is forgiving: rows without a recognizable date or
//! employee are skipped, unknown command keywords are ignored, and unparseable
//! hour or time cells fall back to defaults.

use std::str::FromStr;

use chrono::NaiveTime;
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::{CommandVocabulary, ReconcileConfig};
use crate::models::{OverrideCommand, OverrideKind, OverrideRow};

use super::tokens::{parse_clock_time, parse_date_token};

/// Command kinds without their payload, as recognized from keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKeyword {
    /// Force a day off.
    ForceDayOff,
    /// Force a working day.
    ForceWorking,
    /// Inject a clock-in.
    BackfillClockIn,
    /// Inject a clock-out.
    BackfillClockOut,
    /// Adjust hours.
    AdjustHours,
}

/// Maps a command cell to a keyword. Matching is exact after trimming and
/// ignores ASCII case.
pub fn match_command(cell: &str, commands: &CommandVocabulary) -> Option<CommandKeyword> {
    let cell = cell.trim();
    let matches = |keywords: &[String]| keywords.iter().any(|k| k.eq_ignore_ascii_case(cell));

    if matches(&commands.force_day_off) {
        Some(CommandKeyword::ForceDayOff)
    } else if matches(&commands.force_working) {
        Some(CommandKeyword::ForceWorking)
    } else if matches(&commands.backfill_clock_in) {
        Some(CommandKeyword::BackfillClockIn)
    } else if matches(&commands.backfill_clock_out) {
        Some(CommandKeyword::BackfillClockOut)
    } else if matches(&commands.adjust_hours) {
        Some(CommandKeyword::AdjustHours)
    } else {
        None
    }
}

/// Largest hour delta accepted from one row: every hour of a 31-day month.
pub const MAX_HOUR_DELTA: Decimal = Decimal::from_parts(744, 0, 0, false, 0);

/// Parses a signed hour delta, defaulting to zero. Deltas larger than
/// [`MAX_HOUR_DELTA`] in either direction are discarded.
///
/// ```
/// use attendance_engine::ingest::parse_hour_delta;
/// use rust_decimal::Decimal;
///
/// assert_eq!(parse_hour_delta("-8"), Decimal::new(-8, 0));
/// assert_eq!(parse_hour_delta("+1.5"), Decimal::new(15, 1));
/// assert_eq!(parse_hour_delta("n/a"), Decimal::ZERO);
/// assert_eq!(parse_hour_delta("100000"), Decimal::ZERO);
/// ```
pub fn parse_hour_delta(cell: &str) -> Decimal {
    let cell = cell.trim();
    let cell = cell.strip_prefix('+').unwrap_or(cell);
    let delta = Decimal::from_str(cell).unwrap_or(Decimal::ZERO);

    if delta.abs() > MAX_HOUR_DELTA {
        warn!(cell, "Hour delta out of range, using 0");
        return Decimal::ZERO;
    }
    delta
}

/// Parses a backfill time cell, normalized to whole seconds.
pub fn parse_backfill_time(cell: &str) -> Option<NaiveTime> {
    parse_clock_time(cell)
}

/// Parses one exception table row.
///
/// Returns `None` for rows without a date or employee, and for unknown
/// command keywords.
pub fn parse_override_row(row: &OverrideRow, config: &ReconcileConfig) -> Option<OverrideCommand> {
    let date = parse_date_token(&row.date, config.policy.reference_year)?;

    let employee = row.employee.trim();
    if employee.is_empty() {
        return None;
    }

    let kind = match match_command(&row.command, &config.vocabulary.commands)? {
        CommandKeyword::ForceDayOff => OverrideKind::ForceDayOff,
        CommandKeyword::ForceWorking => OverrideKind::ForceWorking,
        CommandKeyword::BackfillClockIn => {
            OverrideKind::BackfillClockIn(parse_backfill_time(&row.time))
        }
        CommandKeyword::BackfillClockOut => {
            OverrideKind::BackfillClockOut(parse_backfill_time(&row.time))
        }
        CommandKeyword::AdjustHours => OverrideKind::AdjustHours(parse_hour_delta(&row.hours)),
    };

    Some(OverrideCommand {
        date,
        employee: employee.to_string(),
        kind,
        reason: row.reason.trim().to_string(),
    })
}

/// Parses the whole exception table, preserving row order.
///
/// # Example
///
/// ```
/// use attendance_engine::config::ReconcileConfig;
/// use attendance_engine::ingest::parse_overrides;
/// use attendance_engine::models::{OverrideKind, OverrideRow};
///
/// let rows = vec![
///     OverrideRow { date: "日期".into(), ..Default::default() },
///     OverrideRow {
///         date: "2026-01-05".into(),
///         employee: "Wang".into(),
///         command: "adjust_hours".into(),
///         hours: "-8".into(),
///         reason: "inventory day".into(),
///         ..Default::default()
///     },
/// ];
///
/// let commands = parse_overrides(&rows, &ReconcileConfig::default());
/// assert_eq!(commands.len(), 1);
/// assert!(matches!(commands[0].kind, OverrideKind::AdjustHours(_)));
/// ```
pub fn parse_overrides(rows: &[OverrideRow], config: &ReconcileConfig) -> Vec<OverrideCommand> {
    let commands: Vec<OverrideCommand> = rows
        .iter()
        .filter_map(|row| parse_override_row(row, config))
        .collect();

    debug!(
        rows = rows.len(),
        commands = commands.len(),
        "Override table parsed"
    );
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn row(date: &str, employee: &str, command: &str, time: &str, hours: &str) -> OverrideRow {
        OverrideRow {
            date: date.to_string(),
            employee: employee.to_string(),
            command: command.to_string(),
            time: time.to_string(),
            hours: hours.to_string(),
            reason: "manager note".to_string(),
        }
    }

    fn config() -> ReconcileConfig {
        ReconcileConfig::default().with_reference_year(2026)
    }

    #[test]
    fn test_match_command_keywords() {
        let commands = CommandVocabulary::default();
        assert_eq!(
            match_command("強制休假", &commands),
            Some(CommandKeyword::ForceDayOff)
        );
        assert_eq!(
            match_command(" FORCE_WORKING ", &commands),
            Some(CommandKeyword::ForceWorking)
        );
        assert_eq!(
            match_command("補下班卡", &commands),
            Some(CommandKeyword::BackfillClockOut)
        );
        assert_eq!(match_command("打卡", &commands), None);
    }

    #[test]
    fn test_backfill_time_normalized() {
        let command =
            parse_override_row(&row("1/5", "Chen", "補上班", "9:5", ""), &config()).unwrap();
        assert_eq!(
            command.kind,
            OverrideKind::BackfillClockIn(NaiveTime::from_hms_opt(9, 5, 0))
        );
        assert_eq!(command.date, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }

    #[test]
    fn test_unparseable_backfill_time_is_none() {
        let command =
            parse_override_row(&row("1/5", "Chen", "補下班", "around ten", ""), &config())
                .unwrap();
        assert_eq!(command.kind, OverrideKind::BackfillClockOut(None));
    }

    #[test]
    fn test_hour_delta_defaults_to_zero() {
        let command =
            parse_override_row(&row("1/5", "Wang", "時數調整", "", "abc"), &config()).unwrap();
        assert_eq!(command.kind, OverrideKind::AdjustHours(Decimal::ZERO));
    }

    #[test]
    fn test_hour_delta_out_of_range_is_discarded() {
        let command = parse_override_row(
            &row("1/5", "Wang", "時數調整", "", "79228162514264337593543950335"),
            &config(),
        )
        .unwrap();
        assert_eq!(command.kind, OverrideKind::AdjustHours(Decimal::ZERO));

        assert_eq!(parse_hour_delta("-744"), Decimal::new(-744, 0));
        assert_eq!(parse_hour_delta("744.5"), Decimal::ZERO);
    }

    #[test]
    fn test_non_date_rows_and_unknown_commands_skipped() {
        let rows = vec![
            row("日期", "員工", "指令", "時間", "時數"),
            row("1/5", "Chen", "強制休假", "", ""),
            row("1/5", "Chen", "請客", "", ""),
            row("1/5", "", "強制休假", "", ""),
            row("合計", "", "", "", "12"),
            row("1/6", "Chen", "強制上班", "", ""),
        ];

        let commands = parse_overrides(&rows, &config());

        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].kind, OverrideKind::ForceDayOff);
        assert_eq!(commands[1].kind, OverrideKind::ForceWorking);
    }

    #[test]
    fn test_partial_dates_need_reference_year() {
        let commands = parse_overrides(
            &[row("1/5", "Chen", "強制休假", "", "")],
            &ReconcileConfig::default(),
        );
        assert!(commands.is_empty());
    }
}
