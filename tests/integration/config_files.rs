//! Planner configuration loaded from TOML files.

use std::io::Write;

use tempfile::NamedTempFile;

use crewplan::core::TaskKind;
use crewplan::planning;
use crewplan::{Error, PlannerConfig};

use crate::fixtures::{campaign_request, request};

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_file_tables_replace_defaults_wholesale() {
    let file = write_config(
        r#"
hours_per_day = 6.0

[hourly_rates]
pm = 100.0
copywriter = 50.0
designer = 55.0
seo_analyst = 60.0
"#,
    );
    let config = PlannerConfig::load(file.path()).unwrap();
    assert_eq!(config.hours_per_day, 6.0);
    assert_eq!(config.hourly_rates.pm, Some(100.0));
    assert_eq!(config.hourly_rates.custom_default, None);
    assert_eq!(config.templates, PlannerConfig::default().templates);

    let cheap = planning::plan(&campaign_request(), &PlannerConfig::default()).unwrap();
    let pricey = planning::plan(&campaign_request(), &config).unwrap();
    assert!(pricey.total_cost() > cheap.total_cost());
    assert_eq!(pricey.total_tokens(), cheap.total_tokens());
}

#[test]
fn test_custom_template_from_file() {
    let file = write_config(
        r#"
[[templates]]
deliverable = "Podcast"
steps = [
    { kind = "draft", requires = "copywriter" },
    { kind = "produce" },
]
"#,
    );
    let config = PlannerConfig::load(file.path()).unwrap();
    let plan = planning::plan(&request(&["Copywriter", "Designer"], &["Podcast"]), &config).unwrap();

    let kinds: Vec<TaskKind> = plan.tasks().iter().map(|t| t.task.kind).collect();
    assert_eq!(kinds, vec![TaskKind::Draft, TaskKind::Produce]);
    assert_eq!(plan.tasks()[0].task.assignee, "Copywriter");
    assert_eq!(plan.tasks()[1].task.assignee, "Designer");
}

#[test]
fn test_cyclic_after_is_rejected_on_load() {
    let file = write_config(
        r#"
[[templates]]
deliverable = "A"
steps = [{ kind = "draft" }]
after = ["B"]

[[templates]]
deliverable = "B"
steps = [{ kind = "review" }]
after = ["A"]
"#,
    );
    let err = PlannerConfig::load(file.path()).unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn test_malformed_toml_is_a_toml_error() {
    let file = write_config("hours_per_day = [");
    assert_eq!(PlannerConfig::load(file.path()).unwrap_err().kind(), "toml");
}
