//! Test fixtures for integration tests.

use std::collections::HashMap;

use serde_json::{json, Value};

use crewplan::core::{Plan, TaskId};

/// The reference campaign: four specialists, three known deliverables.
pub fn campaign_request() -> Value {
    json!({
        "objective": "Launch a digital marketing campaign",
        "team": ["PM", "Copywriter", "Designer", "SEO Analyst"],
        "deliverables": ["Blog posts", "Emailing", "Social Ads"]
    })
}

/// Request with the given team and deliverable names.
pub fn request(team: &[&str], deliverables: &[&str]) -> Value {
    json!({
        "objective": "Integration test project",
        "team": team,
        "deliverables": deliverables
    })
}

/// Position of every task id in the plan's sequence.
pub fn positions(plan: &Plan) -> HashMap<TaskId, usize> {
    plan.tasks()
        .iter()
        .enumerate()
        .map(|(i, t)| (t.id().clone(), i))
        .collect()
}

/// Assert every prerequisite precedes its dependent.
pub fn assert_topological(plan: &Plan) {
    let position = positions(plan);
    for task in plan.tasks() {
        for prerequisite in &task.task.prerequisites {
            assert!(
                position[prerequisite] < position[task.id()],
                "{} must come before {}",
                prerequisite,
                task.id()
            );
        }
    }
}
