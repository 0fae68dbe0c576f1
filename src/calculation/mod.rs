//! Reconciliation logic for the Attendance Engine.
//!
//! This module settles each (date, employee) day once the three ingest stages
//! have run: folding manager overrides, measuring full-time shifts against
//! their windows with the grace rule, bucket-rounding part-time hours, and
//! producing the ledger and audit trail.

mod override_effect;
mod reconciliation;
mod shift_rules;
mod worked_time;

pub use override_effect::{Backfill, OverrideEffect, PunchSide, ScheduleOverride};
pub use reconciliation::{
    DayOutcome, NOT_ROSTERED, ReconciliationOutcome, index_punches, reconcile_day,
    reconcile_days,
};
pub use shift_rules::{
    Departure, LateDeparture, ScheduledRange, ShiftMeasurement, ShiftPattern,
    measure_evening_shift, measure_explicit_shift, measure_normal_shift, measure_split_shift,
    resolve_departure,
};
pub use worked_time::{
    bucket_round_minutes, floor_to_half_hour, minutes_late, minutes_to_hours, overtime_over_base,
    paired_minutes, span_minutes,
};
