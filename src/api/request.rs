//! Request types for the Attendance Engine API.
//!
//! This module defines the JSON request body of the `/reconcile` endpoint.

use serde::{Deserialize, Serialize};

use crate::models::{OverrideRow, PunchRow};
use crate::pipeline::ReconciliationInput;

/// Request body for the `/reconcile` endpoint.
///
/// Carries the three exported tables of one batch. `punches` and `roster`
/// are required; `overrides` may be omitted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// Punch log rows in export order.
    pub punches: Vec<PunchRow>,
    /// Roster grid, one array of cells per row.
    pub roster: Vec<Vec<String>>,
    /// Manager exception table rows.
    #[serde(default)]
    pub overrides: Vec<OverrideRow>,
    /// Year for month/day dates, replacing the configured one for this
    /// request.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_year: Option<i32>,
}

impl From<ReconcileRequest> for ReconciliationInput {
    fn from(req: ReconcileRequest) -> Self {
        ReconciliationInput {
            punches: req.punches,
            roster: req.roster,
            overrides: req.overrides,
        }
    }
}
