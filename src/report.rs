//! Rule-based reporting over the same snapshot the planner sees: the
//! weekly summary, actionable insights, achievement badges and the
//! countdown roadmap. Everything returns plain data for the caller to
//! render.

use chrono::{Duration, NaiveDate};

use crate::aggregate::{catalog_index, Aggregate};
use crate::config::StudySettings;
use crate::types::{
    AttemptLogEntry, Badge, Insight, InsightPriority, ProblemMaster, RoadmapPhase, WeeklySummary,
};

/// Summary of the seven days up to `today`. `None` when that window has
/// no attempts.
pub fn weekly_summary(
    log: &[AttemptLogEntry],
    catalog: &[ProblemMaster],
    today: NaiveDate,
) -> Option<WeeklySummary> {
    let week_ago = today - Duration::days(7);
    let window: Vec<&AttemptLogEntry> = log.iter().filter(|e| e.date >= week_ago).collect();
    if window.is_empty() {
        return None;
    }

    let attempts = window.len() as u32;
    let misses = window.iter().filter(|e| e.is_miss()).count() as u32;
    let accuracy_percent = f64::from(attempts - misses) / f64::from(attempts) * 100.0;
    let total_study_minutes: f64 = window.iter().map(|e| e.study_minutes).sum();

    let mut dates: Vec<NaiveDate> = window.iter().map(|e| e.date).collect();
    dates.sort();
    dates.dedup();

    let by_id = catalog_index(catalog);
    let mut unit_counts: Vec<(String, u32)> = Vec::new();
    for entry in &window {
        if let Some(problem) = by_id.get(entry.problem_id.as_str()) {
            match unit_counts.iter_mut().find(|(u, _)| u == &problem.unit) {
                Some(slot) => slot.1 += 1,
                None => unit_counts.push((problem.unit.clone(), 1)),
            }
        }
    }
    let top = unit_counts.iter().max_by_key(|(_, n)| *n).cloned();

    let comment = if accuracy_percent >= 80.0 {
        "Excellent work. Keep this pace going."
    } else if accuracy_percent >= 60.0 {
        "Solid progress. Keep an eye on your weak spots when reviewing."
    } else {
        "The fundamentals need more work. Build them up steadily, no rush."
    };

    Some(WeeklySummary {
        start: week_ago,
        end: today,
        study_days: dates.len() as u32,
        attempts,
        total_study_minutes,
        accuracy_percent,
        top_unit: top.as_ref().map(|(u, _)| u.clone()),
        top_unit_attempts: top.map(|(_, n)| n).unwrap_or(0),
        comment: comment.to_string(),
        next_week_goal_percent: (accuracy_percent + 5.0).min(100.0),
    })
}

/// Pattern-matched observations over the snapshot, strongest signals
/// first. An empty log produces an empty list.
pub fn insights(
    log: &[AttemptLogEntry],
    catalog: &[ProblemMaster],
    agg: &Aggregate,
    settings: &StudySettings,
    today: NaiveDate,
) -> Vec<Insight> {
    let mut out = Vec::new();

    // Worst unit with enough attempts to mean something.
    let worst = agg
        .units
        .iter()
        .filter(|u| u.attempts >= 3 && u.accuracy < 0.5)
        .min_by(|a, b| {
            a.accuracy
                .partial_cmp(&b.accuracy)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
    if let Some(unit) = worst {
        out.push(Insight {
            category: "weakness".to_string(),
            priority: InsightPriority::High,
            message: format!(
                "\"{}\" is the biggest weak spot ({:.0}% accuracy). Drill the fundamentals until the patterns stick.",
                unit.unit,
                unit.accuracy * 100.0
            ),
        });
    }

    if let Some(exam_date) = settings.exam_date {
        let days_left = (exam_date - today).num_days();
        if days_left > 0 {
            let gap = settings.target_accuracy - agg.overall.accuracy;
            if gap > 0.2 && days_left < 30 {
                out.push(Insight {
                    category: "pace".to_string(),
                    priority: InsightPriority::Urgent,
                    message: format!(
                        "{days_left} days left with a {:.1}% accuracy gap to close. That is roughly {:.2}% improvement needed per day; concentrated study recommended.",
                        gap * 100.0,
                        gap / days_left as f64 * 100.0
                    ),
                });
            } else if gap > 0.0 && days_left >= 30 {
                out.push(Insight {
                    category: "pace".to_string(),
                    priority: InsightPriority::Medium,
                    message: format!(
                        "{days_left} days left is enough to reach the target at the current pace. Keep going and shore up weak units."
                    ),
                });
            } else if gap <= 0.0 {
                out.push(Insight {
                    category: "pace".to_string(),
                    priority: InsightPriority::Low,
                    message: "Target already achieved. Maintain your level and take on harder problems.".to_string(),
                });
            }
        }
    }

    // Week-over-week comparison needs enough history to be meaningful.
    if log.len() >= 10 {
        let week_ago = today - Duration::days(7);
        let two_weeks_ago = today - Duration::days(14);
        let rate = |entries: &[&AttemptLogEntry]| -> Option<f64> {
            if entries.is_empty() {
                return None;
            }
            let correct = entries.iter().filter(|e| !e.is_miss()).count();
            Some(correct as f64 / entries.len() as f64)
        };
        let this_week: Vec<&AttemptLogEntry> = log.iter().filter(|e| e.date >= week_ago).collect();
        let last_week: Vec<&AttemptLogEntry> = log
            .iter()
            .filter(|e| e.date >= two_weeks_ago && e.date < week_ago)
            .collect();
        if let (Some(this_rate), Some(last_rate)) = (rate(&this_week), rate(&last_week)) {
            let improvement = this_rate - last_rate;
            if improvement > 0.05 {
                out.push(Insight {
                    category: "momentum".to_string(),
                    priority: InsightPriority::Medium,
                    message: format!(
                        "Accuracy is up {:.1}% on last week. Keep the streak going.",
                        improvement * 100.0
                    ),
                });
            } else if improvement < -0.05 {
                out.push(Insight {
                    category: "momentum".to_string(),
                    priority: InsightPriority::Medium,
                    message: format!(
                        "Accuracy slipped {:.1}% from last week. A rest may help; go back over the basics without forcing it.",
                        improvement.abs() * 100.0
                    ),
                });
            }
        }
    }

    if let Some(excess) = mean_time_excess(log, catalog, settings.time_policy.factor()) {
        if excess > 10.0 {
            out.push(Insight {
                category: "timeManagement".to_string(),
                priority: InsightPriority::Medium,
                message: format!(
                    "Answers run {excess:.0}s over target on average. Time to shift from accuracy-first toward speed."
                ),
            });
        } else if excess < -5.0 {
            out.push(Insight {
                category: "timeManagement".to_string(),
                priority: InsightPriority::Low,
                message: "Answer speed is ample. Reserve the spare time for double-checking careless mistakes.".to_string(),
            });
        }
    }

    out
}

/// Mean of answer time minus policy-adjusted target over catalog-matched
/// attempts. `None` when nothing matched.
fn mean_time_excess(
    log: &[AttemptLogEntry],
    catalog: &[ProblemMaster],
    factor: f64,
) -> Option<f64> {
    let by_id = catalog_index(catalog);
    let mut sum = 0.0;
    let mut count = 0u32;
    for entry in log {
        if let Some(problem) = by_id.get(entry.problem_id.as_str()) {
            sum += entry.answer_time_secs - problem.target_answer_time_secs * factor;
            count += 1;
        }
    }
    if count == 0 {
        None
    } else {
        Some(sum / f64::from(count))
    }
}

/// Achievement badges earned by the snapshot.
pub fn badges(agg: &Aggregate, today: NaiveDate) -> Vec<Badge> {
    let mut out = Vec::new();

    if agg.overall.attempts >= 10 {
        out.push(Badge::Beginner);
    }

    if let Some(last) = agg.daily_accuracy.last() {
        let current = (today - last.date).num_days() <= 1;
        out.push(Badge::Streak {
            days: agg.overall.streak_days,
            current,
        });
    }

    for genre in &agg.genres {
        if genre.attempts >= 5 && genre.accuracy >= 0.8 {
            out.push(Badge::GenreMaster {
                genre: genre.genre.clone(),
            });
        }
    }

    if agg.overall.attempts >= 10
        && agg.overall.accuracy >= 0.8
        && agg.overall.avg_target_time_secs > 0.0
        && agg.overall.avg_answer_time_secs <= agg.overall.avg_target_time_secs * 0.8
    {
        out.push(Badge::Speedster);
    }

    out
}

/// Backward-planned preparation phases: foundation work takes 40% of the
/// runway (50% when well behind target), practice up to the 80% mark,
/// and the final sprint the rest. `None` when the exam is today or past.
pub fn countdown_roadmap(
    exam_date: NaiveDate,
    current_rate: f64,
    target_rate: f64,
    today: NaiveDate,
) -> Option<Vec<RoadmapPhase>> {
    let days_left = (exam_date - today).num_days();
    if days_left <= 0 {
        return None;
    }

    let base_ratio = if current_rate < target_rate - 0.2 {
        0.5
    } else {
        0.4
    };
    let base_days = (days_left as f64 * base_ratio) as i64;
    let practice_days = (days_left as f64 * (0.8 - base_ratio)) as i64;

    let base_end = today + Duration::days(base_days);
    let practice_end = base_end + Duration::days(practice_days);

    Some(vec![
        RoadmapPhase {
            phase: "foundation".to_string(),
            start: today,
            end: base_end,
        },
        RoadmapPhase {
            phase: "practice".to_string(),
            start: base_end,
            end: practice_end,
        },
        RoadmapPhase {
            phase: "final".to_string(),
            start: practice_end,
            end: exam_date,
        },
    ])
}
