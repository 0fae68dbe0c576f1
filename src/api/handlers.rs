//! HTTP request handlers for the Attendance Engine API.

use std::borrow::Cow;
use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::config::ReconcileConfig;
use crate::pipeline::{ReconciliationInput, reconcile};

use super::request::ReconcileRequest;
use super::response::{ApiError, ApiErrorResponse, ReconcileResponse};
use super::state::AppState;

/// Version reported in every response envelope.
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/reconcile", post(reconcile_handler))
        .with_state(state)
}

/// Handler for POST /reconcile.
///
/// Runs one batch through the pipeline and returns the report.
async fn reconcile_handler(
    State(state): State<AppState>,
    payload: Result<Json<ReconcileRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing reconciliation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = rejection_to_error(rejection, correlation_id);
            return json_response(StatusCode::BAD_REQUEST, error);
        }
    };

    let config = effective_config(state.config(), request.reference_year);
    let input: ReconciliationInput = request.into();

    let start_time = Instant::now();
    match reconcile(&input, &config) {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                ledger_lines = report.ledger.len(),
                audit_entries = report.audit_trail.len(),
                anomalies = report.anomalies.len(),
                total_overtime_hours = %report.total_overtime_hours(),
                duration_us = start_time.elapsed().as_micros(),
                "Reconciliation completed successfully"
            );
            json_response(
                StatusCode::OK,
                ReconcileResponse {
                    run_id: correlation_id,
                    engine_version: ENGINE_VERSION.to_string(),
                    generated_at: Utc::now(),
                    report,
                },
            )
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Reconciliation failed"
            );
            let api_error: ApiErrorResponse = err.into();
            json_response(api_error.status, api_error.error)
        }
    }
}

fn rejection_to_error(rejection: JsonRejection, correlation_id: Uuid) -> ApiError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    }
}

fn json_response<T: serde::Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// A request's own reference year replaces the configured one.
fn effective_config(
    base: &ReconcileConfig,
    reference_year: Option<i32>,
) -> Cow<'_, ReconcileConfig> {
    match reference_year {
        Some(year) => Cow::Owned(base.clone().with_reference_year(year)),
        None => Cow::Borrowed(base),
    }
}
