//! HTTP API module for the Attendance Engine.
//!
//! This module exposes the batch pipeline as a single `POST /reconcile`
//! endpoint.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::{ENGINE_VERSION, create_router};
pub use request::ReconcileRequest;
pub use response::{ApiError, ApiErrorResponse, ReconcileResponse};
pub use state::AppState;
