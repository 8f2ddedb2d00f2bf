//! Orders units by remediation priority.
//!
//! Two scores live here and they are not interchangeable. The ordering
//! score `(1 - accuracy) * attempts` ranks units for the scheduler and
//! the "top priority" displays: it weights volume, so a unit missed once
//! in passing ranks below a unit missed repeatedly. The display score
//! `(1 - accuracy) * 2 + clamp(time_ratio - 1, 0, 1)` instead weights
//! the accuracy gap together with time overrun and drives the
//! recommended daily question counts.

use serde::{Deserialize, Serialize};

use crate::types::UnitStats;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedUnit {
    pub unit: String,
    pub priority_score: f64,
    pub accuracy: f64,
    pub attempts: u32,
}

/// The canonical weak list: units with at least one attempt, sorted
/// descending by ordering score. The sort is stable, so ties keep the
/// first-appearance order of the input.
pub fn rank_weaknesses(units: &[UnitStats]) -> Vec<RankedUnit> {
    let mut ranked: Vec<RankedUnit> = units
        .iter()
        .filter(|u| u.attempts >= 1)
        .map(|u| RankedUnit {
            unit: u.unit.clone(),
            priority_score: u.priority_score,
            accuracy: u.accuracy,
            attempts: u.attempts,
        })
        .collect();
    ranked.sort_by(|a, b| {
        b.priority_score
            .partial_cmp(&a.priority_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Accuracy-gap plus time-overrun score used for daily menu sizing.
pub fn display_priority(unit: &UnitStats) -> f64 {
    let time_term = if unit.avg_target_time_secs > 0.0 {
        (unit.avg_answer_time_secs / unit.avg_target_time_secs - 1.0).clamp(0.0, 1.0)
    } else {
        0.0
    };
    (1.0 - unit.accuracy) * 2.0 + time_term
}

/// Suggested number of problems for one sitting of this unit, between 1
/// and 5.
pub fn recommended_question_count(unit: &UnitStats) -> u32 {
    ((display_priority(unit) * 4.0) as u32).clamp(1, 5)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub unit: String,
    pub question_count: u32,
    pub display_priority: f64,
}

/// The day's suggested menu: the `top_n` units by display score, each
/// with a question count.
pub fn todays_menu(units: &[UnitStats], top_n: usize) -> Vec<MenuItem> {
    let mut by_display: Vec<&UnitStats> = units.iter().filter(|u| u.attempts >= 1).collect();
    by_display.sort_by(|a, b| {
        display_priority(b)
            .partial_cmp(&display_priority(a))
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    by_display
        .into_iter()
        .take(top_n)
        .map(|u| MenuItem {
            unit: u.unit.clone(),
            question_count: recommended_question_count(u),
            display_priority: display_priority(u),
        })
        .collect()
}
