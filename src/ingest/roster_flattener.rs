//! Roster grid flattening.
//!
//! Schedules arrive as a calendar grid: a header row of employee names (with an
//! optional job-title row above it), then one row per day whose first cell is
//! the date. [`flatten_roster`] turns that grid into one [`RosterEntry`] per
//! (date, employee).

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::{ReconcileConfig, Vocabulary};
use crate::error::{EngineError, EngineResult};
use crate::models::{EmploymentType, RosterEntry, ShiftDescriptor};

use super::tokens::parse_date_token;

/// One employee column of the roster grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RosterColumn {
    /// Column index in the grid.
    pub index: usize,
    /// Employee name from the header row.
    pub name: String,
    /// Inferred from the title row above the header.
    pub employment_type: EmploymentType,
}

/// Finds the name-header row and maps its employee columns.
///
/// Employee columns are the non-blank cells to the right of the header label.
/// A column is part-time when the cell above it (the title row) carries a
/// part-time marker.
pub fn locate_columns(
    grid: &[Vec<String>],
    vocabulary: &Vocabulary,
) -> EngineResult<(usize, Vec<RosterColumn>)> {
    let (header_index, label_index) = grid
        .iter()
        .enumerate()
        .find_map(|(row_index, row)| {
            row.iter()
                .position(|cell| vocabulary.is_name_header(cell))
                .map(|label_index| (row_index, label_index))
        })
        .ok_or_else(|| EngineError::RosterHeaderNotFound {
            rows_scanned: grid.len(),
            labels: vocabulary.name_header_labels.join(", "),
        })?;

    let title_row = header_index.checked_sub(1).map(|i| &grid[i]);

    let columns = grid[header_index]
        .iter()
        .enumerate()
        .skip(label_index + 1)
        .filter(|(_, cell)| !vocabulary.is_placeholder(cell) && !vocabulary.is_name_header(cell))
        .map(|(index, cell)| {
            let part_time = title_row
                .and_then(|row| row.get(index))
                .is_some_and(|title| vocabulary.is_part_time_title(title));
            RosterColumn {
                index,
                name: cell.trim().to_string(),
                employment_type: if part_time {
                    EmploymentType::PartTime
                } else {
                    EmploymentType::FullTime
                },
            }
        })
        .collect();

    Ok((header_index, columns))
}

/// Classifies one roster cell into a descriptor and a working flag.
///
/// # Example
///
/// ```
/// use attendance_engine::config::Vocabulary;
/// use attendance_engine::ingest::classify_cell;
/// use attendance_engine::models::{EmploymentType, ShiftDescriptor};
///
/// let vocabulary = Vocabulary::default();
/// assert_eq!(
///     classify_cell("", EmploymentType::FullTime, &vocabulary),
///     (ShiftDescriptor::NormalShift, true)
/// );
/// assert_eq!(
///     classify_cell("", EmploymentType::PartTime, &vocabulary),
///     (ShiftDescriptor::Off, false)
/// );
/// assert_eq!(
///     classify_cell("1100-1500", EmploymentType::PartTime, &vocabulary),
///     (ShiftDescriptor::Explicit("1100-1500".to_string()), true)
/// );
/// ```
pub fn classify_cell(
    cell: &str,
    employment_type: EmploymentType,
    vocabulary: &Vocabulary,
) -> (ShiftDescriptor, bool) {
    let cell = cell.trim();

    if vocabulary.is_placeholder(cell) {
        return match employment_type {
            EmploymentType::PartTime => (ShiftDescriptor::Off, false),
            EmploymentType::FullTime => (ShiftDescriptor::NormalShift, true),
        };
    }

    if vocabulary.is_day_off(cell) {
        return (ShiftDescriptor::Off, false);
    }

    if vocabulary.has_range_separator(cell) {
        (ShiftDescriptor::Explicit(cell.to_string()), true)
    } else {
        (ShiftDescriptor::NormalShift, true)
    }
}

/// Flattens a roster grid into normalized daily entries.
///
/// Fails with [`EngineError::RosterHeaderNotFound`] when no row carries a
/// name-header label; no partial result is returned in that case. Rows whose
/// first cell is not a date are skipped. A repeated (date, employee) keeps its
/// first occurrence.
pub fn flatten_roster(
    grid: &[Vec<String>],
    config: &ReconcileConfig,
) -> EngineResult<Vec<RosterEntry>> {
    let vocabulary = &config.vocabulary;
    let (header_index, columns) = locate_columns(grid, vocabulary)?;

    debug!(
        header_row = header_index,
        employees = columns.len(),
        "Roster header located"
    );

    let mut seen: HashSet<(NaiveDate, String)> = HashSet::new();
    let mut entries = Vec::new();

    for row in grid.iter().skip(header_index + 1) {
        let Some(first_cell) = row.first() else {
            continue;
        };
        let Some(date) = parse_date_token(first_cell, config.policy.reference_year) else {
            continue;
        };

        for column in &columns {
            if !seen.insert((date, column.name.clone())) {
                warn!(%date, employee = %column.name, "Duplicate roster entry ignored");
                continue;
            }

            let cell = row.get(column.index).map(String::as_str).unwrap_or("");
            let (shift_descriptor, scheduled_working) =
                classify_cell(cell, column.employment_type, vocabulary);

            entries.push(RosterEntry {
                date,
                employee: column.name.clone(),
                employment_type: column.employment_type,
                shift_descriptor,
                scheduled_working,
            });
        }
    }

    debug!(entries = entries.len(), "Roster flattened");
    Ok(entries)
}
