use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// How strictly answer times are judged against catalog targets. The
/// factor multiplies every target time before overrun checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum TimePolicy {
    Strict,
    #[default]
    Standard,
    Lenient,
}

impl TimePolicy {
    pub fn factor(&self) -> f64 {
        match self {
            Self::Strict => 0.9,
            Self::Standard => 1.0,
            Self::Lenient => 1.1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Standard => "standard",
            Self::Lenient => "lenient",
        }
    }

    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "strict" => Self::Strict,
            "lenient" => Self::Lenient,
            _ => Self::Standard,
        }
    }
}

/// Caller-supplied session settings. Threaded explicitly through every
/// operation; the engine holds no other state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudySettings {
    /// Goal accuracy in 0..=1.
    pub target_accuracy: f64,
    pub daily_limit_minutes: u32,
    pub exam_date: Option<NaiveDate>,
    pub time_policy: TimePolicy,
}

impl Default for StudySettings {
    fn default() -> Self {
        Self {
            target_accuracy: 0.8,
            daily_limit_minutes: 60,
            exam_date: None,
            time_policy: TimePolicy::Standard,
        }
    }
}

/// Planning-horizon shape. The default is a forward-only week; the
/// extended shape replays the last week and plans up to four weeks out.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanParams {
    pub future_days: u32,
    pub past_days: u32,
    /// Assumed cost of one unit of study within a day.
    pub unit_time_minutes: u32,
}

impl Default for PlanParams {
    fn default() -> Self {
        Self {
            future_days: 7,
            past_days: 0,
            unit_time_minutes: 20,
        }
    }
}

impl PlanParams {
    pub fn extended() -> Self {
        Self {
            future_days: 28,
            past_days: 7,
            ..Self::default()
        }
    }
}

/// Inclusive date bounds restricting which log entries an analysis sees.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisWindow {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl AnalysisWindow {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn between(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        if let Some(start) = self.start {
            if date < start {
                return false;
            }
        }
        if let Some(end) = self.end {
            if date > end {
                return false;
            }
        }
        true
    }
}
