#![deny(clippy::all)]

//! Adaptive study scheduling and progress analytics for exam
//! preparation.
//!
//! The crate turns a raw attempt history plus a problem catalog into a
//! day-by-day study plan under a time budget, a tiered mastery
//! assessment, and a trend-based forecast of when a target accuracy
//! will be reached. Every operation is a pure function over in-memory
//! snapshots: the caller loads the data, picks a reference date, and
//! renders the plain data structures that come back. Nothing here does
//! I/O, keeps state between calls, or reads the clock.
//!
//! Module map:
//!
//! - [`ingest`] - coercion boundary from raw tabular rows to typed data
//! - [`aggregate`] - per-unit / per-tier / per-day statistics
//! - [`weakness`] - remediation priority ranking and menu sizing
//! - [`schedule`] - spaced review detection and budgeted day planning
//! - [`progression`] - three-stage difficulty-tier mastery assessment
//! - [`forecast`] - least-squares goal-date projection
//! - [`report`] - weekly summary, insights, badges, countdown roadmap
//! - [`engine`] - facade bundling the operations behind one settings value

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod error;
pub mod forecast;
pub mod ingest;
pub mod progression;
pub mod report;
pub mod schedule;
pub mod types;
pub mod weakness;

pub use aggregate::{aggregate as aggregate_snapshot, Aggregate};
pub use config::{AnalysisWindow, PlanParams, StudySettings, TimePolicy};
pub use engine::StudyEngine;
pub use error::IngestError;
pub use forecast::forecast_goal_date;
pub use ingest::{ingest_attempt_rows, ingest_problem_rows, RawAttemptRow, RawProblemRow};
pub use progression::evaluate_tier_progression;
pub use schedule::{build_plan, REVIEW_INTERVALS};
pub use types::*;
pub use weakness::{rank_weaknesses, todays_menu, MenuItem, RankedUnit};
