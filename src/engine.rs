//! Facade tying the components together behind one settings value.
//!
//! The engine owns nothing but the caller-supplied settings; every
//! method is a pure function of its arguments plus those settings, so
//! repeated calls with the same snapshot and the same `today` produce
//! identical output.

use chrono::NaiveDate;

use crate::aggregate::{self, Aggregate};
use crate::config::{AnalysisWindow, PlanParams, StudySettings};
use crate::forecast;
use crate::progression;
use crate::report;
use crate::schedule;
use crate::types::{
    AttemptLogEntry, Badge, DailyAccuracy, Forecast, Insight, ProblemMaster, ProgressionReport,
    RoadmapPhase, StudyPlan, WeeklySummary,
};
use crate::weakness::{self, MenuItem, RankedUnit};

const MENU_SIZE: usize = 3;

#[derive(Debug, Clone, Default)]
pub struct StudyEngine {
    settings: StudySettings,
}

impl StudyEngine {
    pub fn new(settings: StudySettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &StudySettings {
        &self.settings
    }

    pub fn aggregate(
        &self,
        log: &[AttemptLogEntry],
        catalog: &[ProblemMaster],
        window: Option<AnalysisWindow>,
    ) -> Aggregate {
        aggregate::aggregate(
            log,
            catalog,
            &window.unwrap_or_default(),
            self.settings.time_policy.factor(),
        )
    }

    pub fn rank_weaknesses(&self, agg: &Aggregate) -> Vec<RankedUnit> {
        weakness::rank_weaknesses(&agg.units)
    }

    pub fn todays_menu(&self, agg: &Aggregate) -> Vec<MenuItem> {
        weakness::todays_menu(&agg.units, MENU_SIZE)
    }

    /// Seven-day forward plan under the configured daily budget.
    pub fn build_weekly_plan(
        &self,
        log: &[AttemptLogEntry],
        catalog: &[ProblemMaster],
        today: NaiveDate,
    ) -> Option<StudyPlan> {
        self.build_plan(log, catalog, &PlanParams::default(), today)
    }

    /// Plan with an explicit horizon shape, e.g. [`PlanParams::extended`]
    /// for the past-week replay plus four forward weeks.
    pub fn build_plan(
        &self,
        log: &[AttemptLogEntry],
        catalog: &[ProblemMaster],
        params: &PlanParams,
        today: NaiveDate,
    ) -> Option<StudyPlan> {
        schedule::build_plan(log, catalog, &self.settings, params, today)
    }

    pub fn evaluate_tier_progression(
        &self,
        log: &[AttemptLogEntry],
        catalog: &[ProblemMaster],
    ) -> ProgressionReport {
        progression::evaluate_tier_progression(log, catalog)
    }

    pub fn forecast_goal_date(
        &self,
        series: &[DailyAccuracy],
        current_rate: f64,
        today: NaiveDate,
    ) -> Forecast {
        forecast::forecast_goal_date(series, self.settings.target_accuracy, current_rate, today)
    }

    pub fn weekly_summary(
        &self,
        log: &[AttemptLogEntry],
        catalog: &[ProblemMaster],
        today: NaiveDate,
    ) -> Option<WeeklySummary> {
        report::weekly_summary(log, catalog, today)
    }

    pub fn insights(
        &self,
        log: &[AttemptLogEntry],
        catalog: &[ProblemMaster],
        agg: &Aggregate,
        today: NaiveDate,
    ) -> Vec<Insight> {
        report::insights(log, catalog, agg, &self.settings, today)
    }

    pub fn badges(&self, agg: &Aggregate, today: NaiveDate) -> Vec<Badge> {
        report::badges(agg, today)
    }

    pub fn countdown_roadmap(
        &self,
        current_rate: f64,
        today: NaiveDate,
    ) -> Option<Vec<RoadmapPhase>> {
        let exam_date = self.settings.exam_date?;
        report::countdown_roadmap(exam_date, current_rate, self.settings.target_accuracy, today)
    }
}
