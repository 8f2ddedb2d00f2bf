//! Joins the attempt log with the problem catalog and reduces it to the
//! per-unit, per-tier, per-subject and per-day statistics every other
//! component consumes.
//!
//! The join is a left join on `problem_id`: attempts that reference no
//! catalog row still count toward the raw totals and the daily accuracy
//! series, but are excluded from unit, tier, subject and genre groupings
//! and can never register a time overrun. An empty log degrades to zeroed
//! stats, never an error.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::AnalysisWindow;
use crate::types::{
    AttemptLogEntry, DailyAccuracy, DifficultyTier, GenreStats, MissCause, OverallStats,
    ProblemMaster, SubjectStats, TierStats, UnitStats,
};

/// Everything derivable from one pass over the joined snapshot.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Aggregate {
    /// First-appearance order, which downstream stable sorts rely on.
    pub units: Vec<UnitStats>,
    /// Always three entries, low then mid then high.
    pub tiers: Vec<TierStats>,
    pub overall: OverallStats,
    /// Ascending by date.
    pub daily_accuracy: Vec<DailyAccuracy>,
    pub subjects: Vec<SubjectStats>,
    pub genres: Vec<GenreStats>,
    /// Miss reasons among incorrect attempts, most frequent first.
    pub miss_causes: Vec<MissCause>,
}

#[derive(Default)]
struct GroupAcc {
    attempts: u32,
    misses: u32,
    answer_time_sum: f64,
    target_time_sum: f64,
}

impl GroupAcc {
    fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            0.0
        } else {
            f64::from(self.attempts - self.misses) / f64::from(self.attempts)
        }
    }
}

/// Order-preserving grouping: keys keep the order they were first seen in.
struct OrderedGroups {
    index: HashMap<String, usize>,
    keys: Vec<String>,
    accs: Vec<GroupAcc>,
}

impl OrderedGroups {
    fn new() -> Self {
        Self {
            index: HashMap::new(),
            keys: Vec::new(),
            accs: Vec::new(),
        }
    }

    fn entry(&mut self, key: &str) -> &mut GroupAcc {
        let idx = match self.index.get(key) {
            Some(&idx) => idx,
            None => {
                self.index.insert(key.to_string(), self.keys.len());
                self.keys.push(key.to_string());
                self.accs.push(GroupAcc::default());
                self.keys.len() - 1
            }
        };
        &mut self.accs[idx]
    }

    fn iter(&self) -> impl Iterator<Item = (&String, &GroupAcc)> {
        self.keys.iter().zip(self.accs.iter())
    }
}

/// Builds the catalog lookup used by the join. First occurrence of an id
/// wins when the catalog itself carries duplicates.
pub fn catalog_index(catalog: &[ProblemMaster]) -> HashMap<&str, &ProblemMaster> {
    let mut index = HashMap::with_capacity(catalog.len());
    for problem in catalog {
        index.entry(problem.id.as_str()).or_insert(problem);
    }
    index
}

pub fn aggregate(
    log: &[AttemptLogEntry],
    catalog: &[ProblemMaster],
    window: &AnalysisWindow,
    time_policy_factor: f64,
) -> Aggregate {
    let by_id = catalog_index(catalog);

    let mut units = OrderedGroups::new();
    let mut subjects = OrderedGroups::new();
    let mut genres = OrderedGroups::new();

    let mut tier_attempts = [0u32; 3];
    let mut tier_misses = [0u32; 3];
    let mut tier_solved: [HashSet<&str>; 3] = Default::default();

    let mut daily: HashMap<NaiveDate, (u32, u32)> = HashMap::new();

    let mut cause_index: HashMap<String, usize> = HashMap::new();
    let mut causes: Vec<MissCause> = Vec::new();

    let mut attempts = 0u32;
    let mut misses = 0u32;
    let mut answer_time_sum = 0.0;
    let mut matched = 0u32;
    let mut target_time_sum = 0.0;
    let mut overruns = 0u32;

    for entry in log.iter().filter(|e| window.contains(e.date)) {
        attempts += 1;
        if entry.is_miss() {
            misses += 1;
        }
        answer_time_sum += entry.answer_time_secs;

        let day = daily.entry(entry.date).or_insert((0, 0));
        day.0 += 1;
        if entry.is_miss() {
            day.1 += 1;
        }

        if entry.is_miss() {
            if let Some(reason) = entry.miss_reason.as_deref() {
                let idx = match cause_index.get(reason) {
                    Some(&idx) => idx,
                    None => {
                        cause_index.insert(reason.to_string(), causes.len());
                        causes.push(MissCause {
                            reason: reason.to_string(),
                            count: 0,
                        });
                        causes.len() - 1
                    }
                };
                causes[idx].count += 1;
            }
        }

        let Some(problem) = by_id.get(entry.problem_id.as_str()) else {
            continue;
        };

        matched += 1;
        let target = problem.target_answer_time_secs * time_policy_factor;
        target_time_sum += target;
        if entry.answer_time_secs > target {
            overruns += 1;
        }

        let acc = units.entry(&problem.unit);
        acc.attempts += 1;
        if entry.is_miss() {
            acc.misses += 1;
        }
        acc.answer_time_sum += entry.answer_time_secs;
        acc.target_time_sum += target;

        let acc = subjects.entry(&problem.subject);
        acc.attempts += 1;
        if entry.is_miss() {
            acc.misses += 1;
        }

        let acc = genres.entry(&problem.genre);
        acc.attempts += 1;
        if entry.is_miss() {
            acc.misses += 1;
        }

        let t = problem.difficulty_tier.index();
        tier_attempts[t] += 1;
        if entry.is_miss() {
            tier_misses[t] += 1;
        }
        tier_solved[t].insert(problem.id.as_str());
    }

    let unit_stats: Vec<UnitStats> = units
        .iter()
        .map(|(unit, acc)| {
            let accuracy = acc.accuracy();
            UnitStats {
                unit: unit.clone(),
                attempts: acc.attempts,
                misses: acc.misses,
                accuracy,
                avg_answer_time_secs: mean(acc.answer_time_sum, acc.attempts),
                avg_target_time_secs: mean(acc.target_time_sum, acc.attempts),
                priority_score: (1.0 - accuracy) * f64::from(acc.attempts),
            }
        })
        .collect();

    let tiers = DifficultyTier::ORDERED
        .iter()
        .map(|&tier| {
            let t = tier.index();
            let total = catalog
                .iter()
                .filter(|p| p.difficulty_tier == tier)
                .count() as u32;
            let solved = tier_solved[t].len() as u32;
            let accuracy = if tier_attempts[t] == 0 {
                0.0
            } else {
                f64::from(tier_attempts[t] - tier_misses[t]) / f64::from(tier_attempts[t])
            };
            let coverage_percent = if total == 0 {
                0.0
            } else {
                f64::from(solved) / f64::from(total) * 100.0
            };
            TierStats {
                tier,
                solved,
                total,
                attempts: tier_attempts[t],
                accuracy,
                coverage_percent,
                top_units: top_units_for_tier(catalog, tier, 5),
            }
        })
        .collect();

    let mut daily_accuracy: Vec<DailyAccuracy> = daily
        .into_iter()
        .map(|(date, (n, m))| DailyAccuracy {
            date,
            attempts: n,
            accuracy: f64::from(n - m) / f64::from(n),
        })
        .collect();
    daily_accuracy.sort_by_key(|d| d.date);

    causes.sort_by(|a, b| b.count.cmp(&a.count));

    let overall = OverallStats {
        attempts,
        accuracy: if attempts == 0 {
            0.0
        } else {
            f64::from(attempts - misses) / f64::from(attempts)
        },
        avg_answer_time_secs: mean(answer_time_sum, attempts),
        avg_target_time_secs: mean(target_time_sum, matched),
        time_overrun_rate: if attempts == 0 {
            0.0
        } else {
            f64::from(overruns) / f64::from(attempts)
        },
        study_days: daily_accuracy.len() as u32,
        streak_days: trailing_streak(&daily_accuracy),
    };

    Aggregate {
        units: unit_stats,
        tiers,
        overall,
        daily_accuracy,
        subjects: subjects
            .iter()
            .map(|(subject, acc)| SubjectStats {
                subject: subject.clone(),
                attempts: acc.attempts,
                misses: acc.misses,
                accuracy: acc.accuracy(),
            })
            .collect(),
        genres: genres
            .iter()
            .map(|(genre, acc)| GenreStats {
                genre: genre.clone(),
                attempts: acc.attempts,
                misses: acc.misses,
                accuracy: acc.accuracy(),
            })
            .collect(),
        miss_causes: causes,
    }
}

fn mean(sum: f64, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

/// Most frequent units in the catalog at one tier, ties broken by first
/// appearance in the catalog.
fn top_units_for_tier(catalog: &[ProblemMaster], tier: DifficultyTier, n: usize) -> Vec<String> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut counts: Vec<(String, u32)> = Vec::new();
    for problem in catalog.iter().filter(|p| p.difficulty_tier == tier) {
        match index.get(problem.unit.as_str()) {
            Some(&idx) => counts[idx].1 += 1,
            None => {
                index.insert(problem.unit.as_str(), counts.len());
                counts.push((problem.unit.clone(), 1));
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().take(n).map(|(unit, _)| unit).collect()
}

/// Length of the consecutive-day run ending at the latest study date.
fn trailing_streak(daily: &[DailyAccuracy]) -> u32 {
    let Some(last) = daily.last() else {
        return 0;
    };
    let mut streak = 1u32;
    let mut current = last.date;
    for day in daily.iter().rev().skip(1) {
        if (current - day.date).num_days() == 1 {
            streak += 1;
            current = day.date;
        } else {
            break;
        }
    }
    streak
}

/// Distinct study dates a unit was practiced on, keyed by date. Used by
/// the scheduler's review-due detection.
pub fn units_by_date<'a>(
    log: &'a [AttemptLogEntry],
    catalog: &[ProblemMaster],
) -> HashMap<NaiveDate, Vec<String>> {
    let by_id = catalog_index(catalog);
    let mut map: HashMap<NaiveDate, Vec<String>> = HashMap::new();
    for entry in log {
        let Some(problem) = by_id.get(entry.problem_id.as_str()) else {
            continue;
        };
        let units = map.entry(entry.date).or_default();
        if !units.iter().any(|u| u == &problem.unit) {
            units.push(problem.unit.clone());
        }
    }
    map
}
