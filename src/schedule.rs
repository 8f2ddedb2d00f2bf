//! Builds the day-by-day study plan: spaced reviews first, then weak
//! units, packed greedily under the daily time budget.
//!
//! Review-due detection is stateless spaced repetition: a unit studied on
//! day X resurfaces on X+1, X+3, X+7, X+14 and X+30. Exact-day match
//! only, no per-item ease state; the whole schedule is derivable from the
//! log alone, so replanning with the same snapshot gives the same plan.

use std::collections::{BTreeMap, HashMap};

use chrono::{Duration, NaiveDate};
use tracing::debug;

use crate::aggregate::{aggregate, catalog_index, units_by_date};
use crate::config::{AnalysisWindow, PlanParams, StudySettings};
use crate::types::{
    AttemptLogEntry, DayPlan, PlanOrigin, PlannedUnit, ProblemMaster, StudyPlan,
};
use crate::weakness::rank_weaknesses;

/// Forgetting-curve offsets in days.
pub const REVIEW_INTERVALS: [i64; 5] = [1, 3, 7, 14, 30];

/// Plans `params.future_days` days forward (capped by the exam date) and
/// optionally replays `params.past_days` days backward from the log.
///
/// Returns `None` when there is nothing to plan: no exam date, an exam
/// date already passed, an empty log, or no day that ends up with any
/// content.
pub fn build_plan(
    log: &[AttemptLogEntry],
    catalog: &[ProblemMaster],
    settings: &StudySettings,
    params: &PlanParams,
    today: NaiveDate,
) -> Option<StudyPlan> {
    let exam_date = settings.exam_date?;
    let days_left = (exam_date - today).num_days();
    if days_left < 0 || log.is_empty() {
        return None;
    }

    let agg = aggregate(
        log,
        catalog,
        &AnalysisWindow::all(),
        settings.time_policy.factor(),
    );
    let weak = rank_weaknesses(&agg.units);
    let studied = units_by_date(log, catalog);
    let subject_of = unit_subjects(catalog);

    let unit_time = params.unit_time_minutes;
    let limit = settings.daily_limit_minutes;

    let mut plan: StudyPlan = BTreeMap::new();

    for back in (1..=i64::from(params.past_days)).rev() {
        let date = today - Duration::days(back);
        plan.insert(date, replay_day(log, catalog, &subject_of, date, unit_time));
    }

    let horizon = i64::from(params.future_days).min(days_left + 1);
    for ahead in 0..horizon {
        let date = today + Duration::days(ahead);

        let mut due: Vec<&str> = Vec::new();
        for offset in REVIEW_INTERVALS {
            if let Some(studied_units) = studied.get(&(date - Duration::days(offset))) {
                for unit in studied_units {
                    if !due.contains(&unit.as_str()) {
                        due.push(unit.as_str());
                    }
                }
            }
        }

        let mut units: Vec<PlannedUnit> = Vec::new();
        let mut total = 0u32;

        for &unit in &due {
            if total + unit_time <= limit && !contains(&units, unit) {
                units.push(planned(unit, &subject_of, PlanOrigin::Review));
                total += unit_time;
            }
        }

        let mut weak_idx = 0;
        while total + unit_time <= limit && weak_idx < weak.len() {
            let name = weak[weak_idx].unit.as_str();
            if !contains(&units, name) {
                units.push(planned(name, &subject_of, PlanOrigin::Weakness));
                total += unit_time;
            }
            weak_idx += 1;
        }

        // Keep consuming the ranking as filler if the budget allows.
        while total + unit_time <= limit {
            let Some(ranked) = weak.get(weak_idx) else {
                break;
            };
            if !contains(&units, &ranked.unit) {
                units.push(planned(&ranked.unit, &subject_of, PlanOrigin::Fill));
                total += unit_time;
            }
            weak_idx += 1;
        }

        // Minimum guarantee: a remediation backlog never leaves a future
        // day empty, even when one unit does not fit the budget.
        if units.is_empty() {
            if let Some(top) = weak.first() {
                units.push(planned(&top.unit, &subject_of, PlanOrigin::Weakness));
                total += unit_time;
            }
        }

        if !units.is_empty() {
            plan.insert(date, DayPlan {
                units,
                total_minutes: total,
            });
        }
    }

    debug!(days = plan.len(), days_left, "study plan built");
    if plan.is_empty() {
        None
    } else {
        Some(plan)
    }
}

/// Past days skip packing and replay what the log says actually
/// happened: one entry per distinct unit studied, summing recorded study
/// minutes with a per-unit default when nothing was recorded.
fn replay_day(
    log: &[AttemptLogEntry],
    catalog: &[ProblemMaster],
    subject_of: &HashMap<String, String>,
    date: NaiveDate,
    unit_time: u32,
) -> DayPlan {
    let by_id = catalog_index(catalog);
    let mut order: Vec<String> = Vec::new();
    let mut minutes: HashMap<String, f64> = HashMap::new();

    for entry in log.iter().filter(|e| e.date == date) {
        let Some(problem) = by_id.get(entry.problem_id.as_str()) else {
            continue;
        };
        if !minutes.contains_key(&problem.unit) {
            order.push(problem.unit.clone());
        }
        *minutes.entry(problem.unit.clone()).or_insert(0.0) += entry.study_minutes;
    }

    let mut total = 0.0;
    let units: Vec<PlannedUnit> = order
        .into_iter()
        .map(|unit| {
            let recorded = minutes.get(&unit).copied().unwrap_or(0.0);
            total += if recorded > 0.0 {
                recorded
            } else {
                f64::from(unit_time)
            };
            planned(&unit, subject_of, PlanOrigin::Completed)
        })
        .collect();

    DayPlan {
        units,
        total_minutes: total.round() as u32,
    }
}

fn unit_subjects(catalog: &[ProblemMaster]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for problem in catalog {
        map.entry(problem.unit.clone())
            .or_insert_with(|| problem.subject.clone());
    }
    map
}

fn contains(units: &[PlannedUnit], name: &str) -> bool {
    units.iter().any(|u| u.name == name)
}

fn planned(name: &str, subject_of: &HashMap<String, String>, origin: PlanOrigin) -> PlannedUnit {
    PlannedUnit {
        name: name.to_string(),
        subject: subject_of.get(name).cloned(),
        origin,
    }
}
