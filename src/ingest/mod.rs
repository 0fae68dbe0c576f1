//! Ingest stages: the three independent passes over the source tables.
//!
//! - [`clean_punches`] pairs the raw punch log into shift records and logs
//!   data-quality anomalies.
//! - [`flatten_roster`] turns the calendar-grid schedule into daily facts.
//! - [`parse_overrides`] turns the manager's exception table into commands.
//!
//! The stages share nothing but configuration and can run in any order.

mod override_parser;
mod punch_cleaner;
mod roster_flattener;
mod tokens;

pub use override_parser::{
    CommandKeyword, match_command, parse_backfill_time, parse_hour_delta, parse_override_row,
    parse_overrides,
};
pub use punch_cleaner::{
    CleanedPunches, PunchAction, PunchCleaner, ScanState, classify_label, clean_punches,
};
pub use roster_flattener::{RosterColumn, classify_cell, flatten_roster, locate_columns};
pub use tokens::{parse_clock_time, parse_date_token, parse_time_range};
