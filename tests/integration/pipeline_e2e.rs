//! End-to-end pipeline scenarios.

use chrono::NaiveDate;
use serde_json::json;

use crewplan::config::BaseRate;
use crewplan::core::{Role, Task, TaskGraph, TaskId, TaskKind};
use crewplan::planning::{self, sequence, validator};
use crewplan::{Error, PlannerConfig};

use crate::fixtures::{assert_topological, campaign_request, request};

#[test]
fn test_campaign_produces_twelve_ordered_tasks() {
    let plan = planning::plan(&campaign_request(), &PlannerConfig::default()).unwrap();

    assert_eq!(plan.tasks().len(), 12);
    assert_topological(&plan);
    assert!(plan.total_cost() > 0.0);
    assert!(plan.total_duration_hours() > 0.0);
    assert!(plan.total_tokens() > 0);

    let members: Vec<&str> = plan.assignments().keys().map(String::as_str).collect();
    assert_eq!(members, vec!["Copywriter", "Designer", "PM", "SEO Analyst"]);
    let assigned: usize = plan.assignments().values().map(Vec::len).sum();
    assert_eq!(assigned, 12);
}

#[test]
fn test_campaign_assignees_hold_required_roles() {
    let plan = planning::plan(&campaign_request(), &PlannerConfig::default()).unwrap();
    for task in plan.tasks() {
        let expected = match task.task.role {
            Role::Pm => "PM",
            Role::Copywriter => "Copywriter",
            Role::Designer => "Designer",
            Role::SeoAnalyst => "SEO Analyst",
            Role::Custom(_) => panic!("no custom roles in this team"),
        };
        assert_eq!(task.task.assignee, expected, "task {}", task.id());
    }
}

#[test]
fn test_unknown_deliverable_gets_single_generic_task() {
    let plan = planning::plan(&request(&["PM"], &["Podcast"]), &PlannerConfig::default()).unwrap();

    assert_eq!(plan.tasks().len(), 1);
    let task = &plan.tasks()[0];
    assert_eq!(task.task.kind, TaskKind::Generic);
    assert!(task.task.prerequisites.is_empty());
    assert_eq!(task.task.assignee, "PM");
    assert_eq!(plan.milestones()[0].name, "Podcast");
}

#[test]
fn test_empty_team_is_rejected() {
    let err = planning::plan(&request(&[], &["Blog posts"]), &PlannerConfig::default()).unwrap_err();
    assert!(matches!(err, Error::Validation { ref field, .. } if field == "team"));
}

#[test]
fn test_missing_capability_is_reported() {
    let err = planning::plan(&request(&["PM", "Copywriter"], &["Blog posts"]), &PlannerConfig::default())
        .unwrap_err();
    match err {
        Error::NoEligibleAssignee {
            deliverable,
            capability,
            ..
        } => {
            assert_eq!(deliverable, "Blog posts");
            assert_eq!(capability, "SEO Analyst");
        }
        other => panic!("expected missing capability, got {:?}", other),
    }
}

#[test]
fn test_hand_built_cycle_is_detected() {
    let task = |id: &str, prerequisite: &str| {
        Task::new(TaskId::from(id), TaskKind::Generic, "Loop", "PM", Role::Pm)
            .with_prerequisites([TaskId::from(prerequisite)])
    };
    let graph = TaskGraph::from_tasks(vec!["Loop".into()], vec![task("a", "b"), task("b", "a")]).unwrap();

    match sequence(&graph) {
        Err(Error::Cycle { tasks }) => assert_eq!(tasks, vec![TaskId::from("a"), TaskId::from("b")]),
        other => panic!("expected cycle, got {:?}", other),
    }
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let config = PlannerConfig::default();
    let first = planning::plan(&campaign_request(), &config).unwrap().to_json().unwrap();
    for _ in 0..3 {
        let again = planning::plan(&campaign_request(), &config).unwrap().to_json().unwrap();
        assert_eq!(first, again);
    }
}

#[test]
fn test_webinar_waits_for_landing_page() {
    let plan = planning::plan(
        &request(&["PM", "Copywriter", "Designer", "SEO Analyst"], &["Webinar", "Landing page"]),
        &PlannerConfig::default(),
    )
    .unwrap();
    assert_topological(&plan);

    let webinar = &plan.milestones()[0];
    let landing = &plan.milestones()[1];
    assert_eq!(webinar.name, "Webinar");
    let first_webinar = plan.task(&webinar.tasks[0]).unwrap();
    let last_landing = landing.tasks.last().unwrap();
    assert!(first_webinar.task.prerequisites.contains(last_landing));
}

#[test]
fn test_sizes_scale_estimates() {
    let config = PlannerConfig::default();
    let team = ["PM", "Copywriter", "Designer", "SEO Analyst"];
    let medium = planning::plan(&request(&team, &["Blog posts"]), &config).unwrap();
    let large = planning::plan(
        &json!({
            "objective": "Integration test project",
            "team": team,
            "deliverables": [{"name": "Blog posts", "size": "large"}]
        }),
        &config,
    )
    .unwrap();
    assert!((large.total_duration_hours() - 2.0 * medium.total_duration_hours()).abs() < 1e-9);
    assert!(large.total_cost() > medium.total_cost());
}

#[test]
fn test_start_date_schedules_calendar() {
    let mut raw = campaign_request();
    raw["project_start_date"] = json!("2025/03/03");
    let plan = planning::plan(&raw, &PlannerConfig::default()).unwrap();

    let start = NaiveDate::from_ymd_opt(2025, 3, 3).unwrap();
    for task in plan.tasks() {
        let (begin, end) = (task.start_date.unwrap(), task.end_date.unwrap());
        assert!(begin >= start);
        assert!(end >= begin);
        for prerequisite in &task.task.prerequisites {
            assert!(plan.task(prerequisite).unwrap().end_date.unwrap() < begin);
        }
    }
}

#[test]
fn test_custom_role_uses_default_hourly_rate() {
    let mut config = PlannerConfig::default();
    let plan = planning::plan(&request(&["Videographer"], &["Podcast"]), &config).unwrap();
    assert!(plan.total_cost() > 0.0);

    config.hourly_rates.custom_default = None;
    let err = planning::plan(&request(&["Videographer"], &["Podcast"]), &config).unwrap_err();
    assert_eq!(err.kind(), "configuration");
}

#[test]
fn test_plan_request_matches_raw_pipeline() {
    let config = PlannerConfig::default();
    let request = validator::validate(&campaign_request()).unwrap();
    let direct = planning::plan_request(&request, &config).unwrap();
    let raw = planning::plan(&campaign_request(), &config).unwrap();
    assert_eq!(direct, raw);
}

#[test]
fn test_assignment_respects_capacity_weighting() {
    let raw = json!({
        "objective": "Capacity",
        "team": [{"name": "Writer A", "capacity": 2.0}, "Writer B"],
        "deliverables": ["One", "Two", "Three", "Four", "Five", "Six"]
    });
    let plan = planning::plan(&raw, &PlannerConfig::default()).unwrap();
    assert_eq!(plan.assignments()["Writer A"].len(), 4);
    assert_eq!(plan.assignments()["Writer B"].len(), 2);
}

#[test]
fn test_members_without_tasks_are_listed() {
    let plan = planning::plan(&request(&["PM", "Designer"], &["Podcast"]), &PlannerConfig::default()).unwrap();
    assert_eq!(plan.assignments().len(), 2);
    assert!(plan.assignments().values().any(Vec::is_empty));
}

#[test]
fn test_oversized_schedule_is_a_configuration_error() {
    let mut raw = request(&["PM"], &["Podcast"]);
    raw["project_start_date"] = json!("2025-03-03");

    let mut config = PlannerConfig::default();
    config.rates.set(TaskKind::Generic, Some(BaseRate::new(1e12, 10)));
    let err = planning::plan(&raw, &config).unwrap_err();
    assert!(matches!(err, Error::Configuration { ref key } if key == "rates.generic.hours"));

    let mut config = PlannerConfig::default();
    config.hours_per_day = 1e-300;
    let err = planning::plan(&raw, &config).unwrap_err();
    assert!(matches!(err, Error::Configuration { ref key } if key == "hours_per_day"));
}
