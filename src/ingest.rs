//! Coercion boundary between raw tabular data and typed rows.
//!
//! Callers load the attempt log and problem catalog from external
//! sources (spreadsheets, CSV exports) as string fields. Everything
//! downstream assumes clean numeric and date types, so the rules here
//! are deliberately blunt: unparseable dates or result labels drop the
//! row, non-numeric numbers coerce to zero, and a missing difficulty
//! label falls back to mid.

use chrono::NaiveDate;
use tracing::warn;

use crate::error::IngestError;
use crate::types::{AttemptLogEntry, AttemptResult, DifficultyTier, ProblemMaster};

const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// One attempt row as it arrives from the caller's data source.
#[derive(Debug, Clone, Default)]
pub struct RawAttemptRow {
    pub date: String,
    pub problem_id: String,
    pub result: String,
    pub answer_time_secs: String,
    pub miss_reason: String,
    pub study_minutes: String,
}

/// One catalog row as it arrives from the caller's data source.
#[derive(Debug, Clone, Default)]
pub struct RawProblemRow {
    pub id: String,
    pub subject: String,
    pub genre: String,
    pub unit: String,
    pub target_answer_time_secs: String,
    pub target_accuracy_percent: String,
    pub difficulty_tier: String,
    pub frequency_weight: String,
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

/// Non-numeric or negative values coerce to zero.
fn coerce_non_negative(s: &str) -> f64 {
    s.trim().parse::<f64>().unwrap_or(0.0).max(0.0)
}

pub fn parse_attempt_row(raw: &RawAttemptRow) -> Result<AttemptLogEntry, IngestError> {
    let date = parse_date(&raw.date).ok_or_else(|| IngestError::InvalidDate(raw.date.clone()))?;
    let result = AttemptResult::parse(&raw.result)
        .ok_or_else(|| IngestError::InvalidResult(raw.result.clone()))?;

    let miss_reason = match raw.miss_reason.trim() {
        "" => None,
        reason => Some(reason.to_string()),
    };

    Ok(AttemptLogEntry {
        date,
        problem_id: raw.problem_id.trim().to_string(),
        result,
        answer_time_secs: coerce_non_negative(&raw.answer_time_secs),
        miss_reason,
        study_minutes: coerce_non_negative(&raw.study_minutes),
    })
}

pub fn parse_problem_row(raw: &RawProblemRow) -> Result<ProblemMaster, IngestError> {
    let id = raw.id.trim();
    if id.is_empty() {
        return Err(IngestError::EmptyProblemId);
    }

    let frequency_weight = match raw.frequency_weight.trim().parse::<f64>() {
        Ok(w) if w > 0.0 => w,
        _ => 1.0,
    };

    Ok(ProblemMaster {
        id: id.to_string(),
        subject: raw.subject.trim().to_string(),
        genre: raw.genre.trim().to_string(),
        unit: raw.unit.trim().to_string(),
        target_answer_time_secs: coerce_non_negative(&raw.target_answer_time_secs),
        target_accuracy_percent: coerce_non_negative(&raw.target_accuracy_percent),
        difficulty_tier: DifficultyTier::parse(&raw.difficulty_tier),
        frequency_weight,
    })
}

/// Parses every row it can, dropping the rest with a warning.
pub fn ingest_attempt_rows(rows: &[RawAttemptRow]) -> Vec<AttemptLogEntry> {
    let mut entries = Vec::with_capacity(rows.len());
    for (idx, raw) in rows.iter().enumerate() {
        match parse_attempt_row(raw) {
            Ok(entry) => entries.push(entry),
            Err(err) => warn!(row = idx, %err, "dropping attempt row"),
        }
    }
    entries
}

/// Parses every catalog row it can, dropping the rest with a warning.
pub fn ingest_problem_rows(rows: &[RawProblemRow]) -> Vec<ProblemMaster> {
    let mut problems = Vec::with_capacity(rows.len());
    for (idx, raw) in rows.iter().enumerate() {
        match parse_problem_row(raw) {
            Ok(problem) => problems.push(problem),
            Err(err) => warn!(row = idx, %err, "dropping catalog row"),
        }
    }
    problems
}
