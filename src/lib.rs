//! Attendance Reconciliation Engine
//!
//! This crate reconciles three exported tables of a shift-based workplace into
//! a daily attendance ledger: a raw punch log, a calendar-grid roster, and a
//! manager exception table. It cleans and pairs punches, flattens the roster
//! into daily facts, applies manager overrides, and settles each day's
//! lateness, early departure, worked hours and overtime.
//!
//! The stages are available individually ([`ingest`], [`calculation`]) or as
//! one batch through [`pipeline::reconcile`]; [`api`] serves the batch over
//! HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod ingest;
pub mod models;
pub mod pipeline;
