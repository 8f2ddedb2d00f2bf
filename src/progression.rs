//! Three-stage mastery progression over the difficulty tiers.
//!
//! A tier is mastered only when accuracy and catalog coverage both clear
//! their gates; neither alone advances the learner. Low gates Basic
//! Consolidation, mid gates Standard Practice, and everything past that
//! is Advanced Practice. High-tier mastery is tracked but opens no
//! further phase.

use std::collections::{HashMap, HashSet};

use crate::aggregate::{aggregate, Aggregate};
use crate::config::AnalysisWindow;
use crate::types::{
    AttemptLogEntry, DifficultyTier, Phase, ProblemMaster, ProgressionReport, TierProgress,
    TierStats, TierStatus,
};

const ACCURACY_GATE: f64 = 0.8;
const COVERAGE_GATE: f64 = 70.0;

pub fn is_mastered(stats: &TierStats) -> bool {
    stats.accuracy >= ACCURACY_GATE && stats.coverage_percent >= COVERAGE_GATE
}

fn status_of(stats: &TierStats) -> TierStatus {
    if is_mastered(stats) {
        TierStatus::Completed
    } else if stats.attempts > 0 {
        TierStatus::InProgress
    } else {
        TierStatus::NotStarted
    }
}

pub fn evaluate_tier_progression(
    log: &[AttemptLogEntry],
    catalog: &[ProblemMaster],
) -> ProgressionReport {
    let agg = aggregate(log, catalog, &AnalysisWindow::all(), 1.0);
    evaluate_from_aggregate(&agg, log, catalog)
}

pub fn evaluate_from_aggregate(
    agg: &Aggregate,
    log: &[AttemptLogEntry],
    catalog: &[ProblemMaster],
) -> ProgressionReport {
    let tiers: Vec<TierProgress> = agg
        .tiers
        .iter()
        .map(|stats| TierProgress {
            tier: stats.tier,
            status: status_of(stats),
            mastered: is_mastered(stats),
            stats: stats.clone(),
        })
        .collect();

    let low = &tiers[DifficultyTier::Low.index()];
    let mid = &tiers[DifficultyTier::Mid.index()];

    let (phase, active) = if !low.mastered {
        (Phase::BasicConsolidation, DifficultyTier::Low)
    } else if !mid.mastered {
        (Phase::StandardPractice, DifficultyTier::Mid)
    } else {
        (Phase::AdvancedPractice, DifficultyTier::High)
    };

    let (next_unit, recommendations) = match phase {
        Phase::AdvancedPractice => (
            None,
            vec![
                "Keep working through the advanced problem set.".to_string(),
                "Push accuracy on high-difficulty problems toward the 80% line.".to_string(),
                "Start trimming answer time as well.".to_string(),
            ],
        ),
        _ => {
            let coverage = tiers[active.index()].stats.coverage_percent;
            match most_frequent_unsolved_unit(log, catalog, active) {
                Some(unit) => {
                    let lead = match phase {
                        Phase::BasicConsolidation => format!("Start with \"{unit}\"."),
                        _ => format!("Take on \"{unit}\" next."),
                    };
                    let recs = vec![
                        lead,
                        format!(
                            "Aim for 80% accuracy on {}-difficulty problems.",
                            active.as_str()
                        ),
                        format!("Current {}-tier coverage: {coverage:.0}%.", active.as_str()),
                    ];
                    (Some(unit), recs)
                }
                None => (
                    None,
                    vec![
                        format!(
                            "Every {}-difficulty problem has been attempted; review the tier instead of starting new material.",
                            active.as_str()
                        ),
                        "Stabilizing accuracy at 80% or better is the goal.".to_string(),
                    ],
                ),
            }
        }
    };

    ProgressionReport {
        tiers,
        phase,
        next_unit,
        recommendations,
    }
}

/// The unit with the most never-attempted catalog problems at `tier`,
/// ties broken by catalog order. `None` when the tier is fully covered.
fn most_frequent_unsolved_unit(
    log: &[AttemptLogEntry],
    catalog: &[ProblemMaster],
    tier: DifficultyTier,
) -> Option<String> {
    let attempted: HashSet<&str> = log.iter().map(|e| e.problem_id.as_str()).collect();

    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, u32)> = Vec::new();
    for problem in catalog
        .iter()
        .filter(|p| p.difficulty_tier == tier && !attempted.contains(p.id.as_str()))
    {
        match index.get(problem.unit.as_str()) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                index.insert(problem.unit.as_str(), counts.len());
                counts.push((problem.unit.clone(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().next().map(|(unit, _)| unit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::AttemptResult;
    use chrono::NaiveDate;

    fn problem(id: &str, unit: &str, tier: DifficultyTier) -> ProblemMaster {
        ProblemMaster {
            id: id.to_string(),
            subject: "math".to_string(),
            genre: "non-verbal".to_string(),
            unit: unit.to_string(),
            target_answer_time_secs: 60.0,
            target_accuracy_percent: 80.0,
            difficulty_tier: tier,
            frequency_weight: 1.0,
        }
    }

    fn attempt(day: u32, problem_id: &str, miss: bool) -> AttemptLogEntry {
        AttemptLogEntry {
            date: NaiveDate::from_ymd_opt(2026, 2, day).unwrap(),
            problem_id: problem_id.to_string(),
            result: if miss {
                AttemptResult::Incorrect
            } else {
                AttemptResult::Correct
            },
            answer_time_secs: 45.0,
            miss_reason: None,
            study_minutes: 10.0,
        }
    }

    #[test]
    fn test_mastered_low_moves_to_standard_and_names_next_unit() {
        let catalog = vec![
            problem("P1", "Sets", DifficultyTier::Low),
            problem("P2", "Ratios", DifficultyTier::Mid),
        ];
        let log = vec![attempt(1, "P1", false), attempt(2, "P1", false)];

        let report = evaluate_tier_progression(&log, &catalog);
        assert_eq!(report.phase, Phase::StandardPractice);
        assert_eq!(report.tiers[0].status, TierStatus::Completed);
        assert_eq!(report.tiers[1].status, TierStatus::NotStarted);
        assert_eq!(report.next_unit.as_deref(), Some("Ratios"));
    }

    #[test]
    fn test_both_gates_required_for_mastery() {
        // Perfect accuracy but half the low catalog untouched: coverage
        // gate fails and the phase stays basic.
        let catalog = vec![
            problem("P1", "Sets", DifficultyTier::Low),
            problem("P2", "Logic", DifficultyTier::Low),
        ];
        let log = vec![attempt(1, "P1", false), attempt(2, "P1", false)];

        let report = evaluate_tier_progression(&log, &catalog);
        assert_eq!(report.phase, Phase::BasicConsolidation);
        assert_eq!(report.tiers[0].status, TierStatus::InProgress);
        assert_eq!(report.next_unit.as_deref(), Some("Logic"));
    }

    #[test]
    fn test_fully_attempted_tier_recommends_review() {
        let catalog = vec![
            problem("P1", "Sets", DifficultyTier::Low),
            problem("P2", "Ratios", DifficultyTier::Mid),
        ];
        // Low mastered, the single mid problem attempted but missed.
        let log = vec![
            attempt(1, "P1", false),
            attempt(2, "P1", false),
            attempt(3, "P2", true),
        ];

        let report = evaluate_tier_progression(&log, &catalog);
        assert_eq!(report.phase, Phase::StandardPractice);
        assert_eq!(report.next_unit, None);
        assert!(
            report.recommendations[0].contains("review"),
            "unexpected: {:?}",
            report.recommendations
        );
    }

    #[test]
    fn test_all_tiers_mastered_is_advanced_practice() {
        let catalog = vec![
            problem("P1", "Sets", DifficultyTier::Low),
            problem("P2", "Ratios", DifficultyTier::Mid),
            problem("P3", "Proofs", DifficultyTier::High),
        ];
        let log = vec![attempt(1, "P1", false), attempt(2, "P2", false)];

        let report = evaluate_tier_progression(&log, &catalog);
        assert_eq!(report.phase, Phase::AdvancedPractice);
        assert_eq!(report.next_unit, None);
        assert_eq!(report.tiers[2].status, TierStatus::NotStarted);
        assert_eq!(report.recommendations.len(), 3);
    }

    #[test]
    fn test_next_unit_prefers_most_frequent_unsolved() {
        let catalog = vec![
            problem("P1", "Sets", DifficultyTier::Low),
            problem("P2", "Logic", DifficultyTier::Low),
            problem("P3", "Logic", DifficultyTier::Low),
        ];
        let log = vec![];

        let report = evaluate_tier_progression(&log, &catalog);
        assert_eq!(report.phase, Phase::BasicConsolidation);
        assert_eq!(report.next_unit.as_deref(), Some("Logic"));
        assert!(report.recommendations[0].contains("Logic"));
    }

    #[test]
    fn test_empty_catalog_degrades() {
        let report = evaluate_tier_progression(&[], &[]);
        assert_eq!(report.phase, Phase::BasicConsolidation);
        assert_eq!(report.tiers.len(), 3);
        assert!(report
            .tiers
            .iter()
            .all(|t| t.status == TierStatus::NotStarted));
        assert_eq!(report.next_unit, None);
    }
}
