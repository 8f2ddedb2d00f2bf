//! End-to-end scenarios through the engine facade: aggregation feeding
//! ranking, planning, progression and forecasting over one shared
//! snapshot, plus the ingest pipeline in front of it.

use chrono::{Duration, NaiveDate};

use juken_core::ingest::{ingest_attempt_rows, RawAttemptRow};
use juken_core::{
    AttemptLogEntry, AttemptResult, DifficultyTier, Forecast, Phase, PlanOrigin, PlanParams,
    ProblemMaster, StudyEngine, StudySettings, TierStatus, TimePolicy,
};

fn day(offset: i64) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 1).unwrap() + Duration::days(offset)
}

fn problem(id: &str, unit: &str, tier: DifficultyTier) -> ProblemMaster {
    ProblemMaster {
        id: id.to_string(),
        subject: "quantitative".to_string(),
        genre: "non-verbal".to_string(),
        unit: unit.to_string(),
        target_answer_time_secs: 60.0,
        target_accuracy_percent: 80.0,
        difficulty_tier: tier,
        frequency_weight: 1.0,
    }
}

fn attempt(date: NaiveDate, problem_id: &str, miss: bool) -> AttemptLogEntry {
    AttemptLogEntry {
        date,
        problem_id: problem_id.to_string(),
        result: if miss {
            AttemptResult::Incorrect
        } else {
            AttemptResult::Correct
        },
        answer_time_secs: 45.0,
        miss_reason: miss.then(|| "careless".to_string()),
        study_minutes: 10.0,
    }
}

fn engine_with_exam(exam: NaiveDate, daily_limit_minutes: u32) -> StudyEngine {
    StudyEngine::new(StudySettings {
        target_accuracy: 0.8,
        daily_limit_minutes,
        exam_date: Some(exam),
        time_policy: TimePolicy::Standard,
    })
}

#[test]
fn mastered_low_tier_yields_standard_practice_and_ratios() {
    let catalog = vec![
        problem("P1", "Sets", DifficultyTier::Low),
        problem("P2", "Ratios", DifficultyTier::Mid),
    ];
    let log = vec![attempt(day(0), "P1", false), attempt(day(1), "P1", false)];

    let engine = StudyEngine::new(StudySettings::default());
    let report = engine.evaluate_tier_progression(&log, &catalog);

    assert_eq!(report.tiers[0].status, TierStatus::Completed);
    assert_eq!(report.tiers[0].stats.coverage_percent, 100.0);
    assert_eq!(report.tiers[0].stats.accuracy, 1.0);
    assert_eq!(report.tiers[1].status, TierStatus::NotStarted);
    assert_eq!(report.phase, Phase::StandardPractice);
    assert_eq!(report.next_unit.as_deref(), Some("Ratios"));
}

#[test]
fn twenty_minute_budget_admits_exactly_one_weak_unit() {
    let catalog = vec![
        problem("PA", "A", DifficultyTier::Mid),
        problem("PB", "B", DifficultyTier::Mid),
        problem("PC", "C", DifficultyTier::Mid),
    ];
    // Attempts far enough back that no review interval lands in the
    // horizon; A misses most so it tops the ranking.
    let old = day(0) - Duration::days(90);
    let mut log = Vec::new();
    for _ in 0..3 {
        log.push(attempt(old, "PA", true));
    }
    for _ in 0..2 {
        log.push(attempt(old, "PB", true));
    }
    log.push(attempt(old, "PC", true));

    let engine = engine_with_exam(day(30), 20);
    let plan = engine.build_weekly_plan(&log, &catalog, day(0)).unwrap();

    let first = &plan[&day(0)];
    assert_eq!(first.units.len(), 1);
    assert_eq!(first.units[0].name, "A");
    assert_eq!(first.units[0].origin, PlanOrigin::Weakness);
    assert_eq!(first.total_minutes, 20);
}

#[test]
fn exam_yesterday_means_no_plan() {
    let catalog = vec![problem("P1", "Sets", DifficultyTier::Low)];
    let log = vec![attempt(day(0), "P1", false)];
    let engine = engine_with_exam(day(-1), 60);
    assert!(engine.build_weekly_plan(&log, &catalog, day(0)).is_none());
}

#[test]
fn spaced_reviews_resurface_on_curve_offsets() {
    let catalog = vec![problem("P1", "Sets", DifficultyTier::Low)];
    let log = vec![attempt(day(0), "P1", false)];
    let engine = engine_with_exam(day(40), 240);
    let params = PlanParams {
        future_days: 31,
        ..PlanParams::default()
    };
    let plan = engine.build_plan(&log, &catalog, &params, day(0)).unwrap();

    for offset in [1i64, 3, 7, 14, 30] {
        let reviewed = plan[&day(offset)]
            .units
            .iter()
            .any(|u| u.name == "Sets" && u.origin == PlanOrigin::Review);
        assert!(reviewed, "expected a review of Sets on day +{offset}");
    }
    for offset in [2i64, 4, 5, 6] {
        let reviewed = plan[&day(offset)]
            .units
            .iter()
            .any(|u| u.name == "Sets" && u.origin == PlanOrigin::Review);
        assert!(!reviewed, "no review should be due on day +{offset}");
    }
}

#[test]
fn extended_horizon_replays_the_past_week() {
    let catalog = vec![problem("P1", "Sets", DifficultyTier::Low)];
    let log = vec![
        attempt(day(-2), "P1", false),
        attempt(day(0), "P1", true),
    ];
    let engine = engine_with_exam(day(40), 60);
    let plan = engine
        .build_plan(&log, &catalog, &PlanParams::extended(), day(0))
        .unwrap();

    let replayed = &plan[&day(-2)];
    assert_eq!(replayed.units.len(), 1);
    assert_eq!(replayed.units[0].origin, PlanOrigin::Completed);
    assert_eq!(replayed.units[0].subject.as_deref(), Some("quantitative"));
    // Recorded ten minutes on that day's single unit.
    assert_eq!(replayed.total_minutes, 10);

    // Quiet past days still emit, future quiet days do not exist while
    // a weak list remains.
    assert!(plan.contains_key(&day(-1)));
    assert!(plan[&day(-1)].units.is_empty());
}

#[test]
fn forecast_reads_target_from_settings() {
    let engine = StudyEngine::new(StudySettings {
        target_accuracy: 0.8,
        ..StudySettings::default()
    });
    let catalog = vec![problem("P1", "Sets", DifficultyTier::Low)];
    let mut log = Vec::new();
    // Accuracy climbing over five days: 0/4, 1/4, 2/4, 3/4, 4/4.
    for d in 0..5i64 {
        for i in 0..4 {
            log.push(attempt(day(d), "P1", i >= d));
        }
    }
    let agg = engine.aggregate(&log, &catalog, None);
    assert_eq!(agg.daily_accuracy.len(), 5);

    let forecast = engine.forecast_goal_date(&agg.daily_accuracy, agg.overall.accuracy, day(5));
    match forecast {
        Forecast::Date(_) | Forecast::Imminent => {}
        other => panic!("climbing series should project a date, got {other:?}"),
    }
}

#[test]
fn raw_rows_flow_through_ingest_into_the_engine() {
    let raw = vec![
        RawAttemptRow {
            date: "2026/06/01".to_string(),
            problem_id: "P1".to_string(),
            result: "correct".to_string(),
            answer_time_secs: "42".to_string(),
            miss_reason: String::new(),
            study_minutes: "20".to_string(),
        },
        RawAttemptRow {
            date: "garbage".to_string(),
            problem_id: "P1".to_string(),
            result: "correct".to_string(),
            answer_time_secs: "42".to_string(),
            miss_reason: String::new(),
            study_minutes: "20".to_string(),
        },
    ];
    let log = ingest_attempt_rows(&raw);
    assert_eq!(log.len(), 1);

    let catalog = vec![problem("P1", "Sets", DifficultyTier::Low)];
    let engine = StudyEngine::new(StudySettings::default());
    let agg = engine.aggregate(&log, &catalog, None);
    assert_eq!(agg.overall.attempts, 1);
    assert_eq!(agg.overall.accuracy, 1.0);
    assert_eq!(agg.units[0].unit, "Sets");
}

#[test]
fn plan_serializes_for_rendering() {
    let catalog = vec![problem("P1", "Sets", DifficultyTier::Low)];
    let log = vec![attempt(day(0), "P1", true)];
    let engine = engine_with_exam(day(10), 60);
    let plan = engine.build_weekly_plan(&log, &catalog, day(0)).unwrap();

    let json = serde_json::to_string(&plan).unwrap();
    assert!(json.contains("totalMinutes"), "unexpected json: {json}");
    assert!(json.contains("Sets"));
}
