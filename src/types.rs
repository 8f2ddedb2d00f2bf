use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum DifficultyTier {
    Low,
    #[default]
    Mid,
    High,
}

impl DifficultyTier {
    /// Fixed progression order: low problems first, high problems last.
    pub const ORDERED: [DifficultyTier; 3] = [Self::Low, Self::Mid, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Mid => "mid",
            Self::High => "high",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Mid,
        }
    }

    pub fn index(&self) -> usize {
        match self {
            Self::Low => 0,
            Self::Mid => 1,
            Self::High => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttemptResult {
    Correct,
    Incorrect,
}

impl AttemptResult {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Correct => "correct",
            Self::Incorrect => "incorrect",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "correct" => Some(Self::Correct),
            "incorrect" => Some(Self::Incorrect),
            _ => None,
        }
    }
}

/// One catalog problem. Immutable reference data loaded once per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProblemMaster {
    pub id: String,
    pub subject: String,
    pub genre: String,
    pub unit: String,
    pub target_answer_time_secs: f64,
    pub target_accuracy_percent: f64,
    pub difficulty_tier: DifficultyTier,
    pub frequency_weight: f64,
}

/// One recorded practice attempt, day granularity.
///
/// `problem_id` may reference a catalog row or not; unmatched attempts
/// still count toward raw totals but carry no subject/unit/tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttemptLogEntry {
    pub date: NaiveDate,
    pub problem_id: String,
    pub result: AttemptResult,
    pub answer_time_secs: f64,
    pub miss_reason: Option<String>,
    pub study_minutes: f64,
}

impl AttemptLogEntry {
    pub fn is_miss(&self) -> bool {
        self.result == AttemptResult::Incorrect
    }
}

/// Per-unit statistics over the analysis window.
///
/// `priority_score` is the remediation ordering score
/// `(1 - accuracy) * attempts`; it weights volume so that a frequently
/// missed unit outranks a unit missed once in passing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitStats {
    pub unit: String,
    pub attempts: u32,
    pub misses: u32,
    pub accuracy: f64,
    pub avg_answer_time_secs: f64,
    pub avg_target_time_secs: f64,
    pub priority_score: f64,
}

/// Per-difficulty-tier statistics: how much of the tier's catalog has been
/// touched and how accurately.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierStats {
    pub tier: DifficultyTier,
    /// Distinct catalog problems attempted at least once at this tier.
    pub solved: u32,
    /// Distinct catalog problems at this tier.
    pub total: u32,
    pub attempts: u32,
    pub accuracy: f64,
    pub coverage_percent: f64,
    /// Up to five most frequent units in the catalog at this tier.
    pub top_units: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub attempts: u32,
    pub accuracy: f64,
    pub avg_answer_time_secs: f64,
    /// Mean policy-adjusted target time over catalog-matched attempts.
    pub avg_target_time_secs: f64,
    /// Fraction of attempts slower than the policy-adjusted target.
    pub time_overrun_rate: f64,
    pub study_days: u32,
    /// Length of the consecutive-day run ending at the latest study date.
    pub streak_days: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyAccuracy {
    pub date: NaiveDate,
    pub attempts: u32,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStats {
    pub subject: String,
    pub attempts: u32,
    pub misses: u32,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenreStats {
    pub genre: String,
    pub attempts: u32,
    pub misses: u32,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MissCause {
    pub reason: String,
    pub count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanOrigin {
    /// Due for spaced review on this day.
    Review,
    /// Pulled from the weakness ranking.
    Weakness,
    /// Budget filler from the remainder of the weakness ranking.
    Fill,
    /// Replayed from the log on a past day.
    Completed,
}

impl PlanOrigin {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Review => "review",
            Self::Weakness => "weakness",
            Self::Fill => "fill",
            Self::Completed => "completed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlannedUnit {
    pub name: String,
    pub subject: Option<String>,
    pub origin: PlanOrigin,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    pub units: Vec<PlannedUnit>,
    pub total_minutes: u32,
}

/// Calendar-ordered plan, one entry per emitted day.
pub type StudyPlan = BTreeMap<NaiveDate, DayPlan>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    BasicConsolidation,
    StandardPractice,
    AdvancedPractice,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BasicConsolidation => "basicConsolidation",
            Self::StandardPractice => "standardPractice",
            Self::AdvancedPractice => "advancedPractice",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TierStatus {
    Completed,
    InProgress,
    NotStarted,
}

impl TierStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::InProgress => "inProgress",
            Self::NotStarted => "notStarted",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierProgress {
    pub tier: DifficultyTier,
    pub status: TierStatus,
    pub mastered: bool,
    pub stats: TierStats,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressionReport {
    /// Always three entries, low then mid then high.
    pub tiers: Vec<TierProgress>,
    pub phase: Phase,
    /// Suggested next unit inside the active tier, when unattempted
    /// problems remain there.
    pub next_unit: Option<String>,
    pub recommendations: Vec<String>,
}

/// Outcome of the goal-date projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "date", rename_all = "camelCase")]
pub enum Forecast {
    /// Fewer than three distinct study days in the series.
    InsufficientData,
    /// The accuracy series has no variance to extrapolate.
    NoChange,
    /// Current accuracy already meets the target.
    Achieved,
    /// Trend is flat or declining.
    NoImprovement,
    /// The fitted trend already crosses the target.
    Imminent,
    /// Projected date is more than a year out.
    FarFuture,
    /// Projected date the target accuracy will be reached.
    Date(NaiveDate),
}

impl Forecast {
    pub fn status_str(&self) -> &'static str {
        match self {
            Self::InsufficientData => "insufficientData",
            Self::NoChange => "noChange",
            Self::Achieved => "achieved",
            Self::NoImprovement => "noImprovement",
            Self::Imminent => "imminent",
            Self::FarFuture => "farFuture",
            Self::Date(_) => "date",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklySummary {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub study_days: u32,
    pub attempts: u32,
    pub total_study_minutes: f64,
    pub accuracy_percent: f64,
    pub top_unit: Option<String>,
    pub top_unit_attempts: u32,
    pub comment: String,
    pub next_week_goal_percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightPriority {
    Urgent,
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    pub category: String,
    pub priority: InsightPriority,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Badge {
    Beginner,
    Streak { days: u32, current: bool },
    GenreMaster { genre: String },
    Speedster,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapPhase {
    pub phase: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}
