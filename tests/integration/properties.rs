//! Property-based tests over generated project requests.

use std::collections::HashMap;

use proptest::prelude::*;
use serde_json::{json, Value};

use crewplan::planning::{self, validator};
use crewplan::PlannerConfig;

use crate::fixtures::assert_topological;

// ============================================================================
// Generators
// ============================================================================

/// A deliverable name, either one with a built-in template or an arbitrary one.
fn arb_deliverable() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("Blog posts".to_string()),
        Just("Emailing".to_string()),
        Just("Social Ads".to_string()),
        Just("Landing page".to_string()),
        Just("Video".to_string()),
        Just("Webinar".to_string()),
        "[A-Z][a-z]{2,10}( [a-z]{2,8})?",
    ]
}

/// Optional deliverable size.
fn arb_size() -> impl Strategy<Value = Option<&'static str>> {
    prop_oneof![
        Just(None),
        Just(Some("small")),
        Just(Some("medium")),
        Just(Some("large")),
    ]
}

fn arb_deliverables() -> impl Strategy<Value = Vec<Value>> {
    prop::collection::vec((arb_deliverable(), arb_size()), 1..8).prop_map(|entries| {
        entries
            .into_iter()
            .map(|(name, size)| match size {
                Some(size) => json!({ "name": name, "size": size }),
                None => json!(name),
            })
            .collect()
    })
}

/// Extra team members beyond the four specialists, with optional capacity.
fn arb_extra_member() -> impl Strategy<Value = Value> {
    (
        prop_oneof![
            Just("Writer"),
            Just("Editor"),
            Just("Designer"),
            Just("Strategist"),
            Just("Analyst"),
            Just("Producer"),
        ],
        0u8..50,
        prop::option::of(1u8..4),
    )
        .prop_map(|(label, n, capacity)| {
            let name = format!("{} {}", label, n);
            match capacity {
                Some(capacity) => json!({ "name": name, "capacity": f64::from(capacity) }),
                None => json!(name),
            }
        })
}

/// A request every default template can be staffed for.
fn arb_request() -> impl Strategy<Value = Value> {
    (prop::collection::vec(arb_extra_member(), 0..5), arb_deliverables()).prop_map(
        |(extra, deliverables)| {
            let mut team = vec![json!("PM"), json!("Copywriter"), json!("Designer"), json!("SEO Analyst")];
            team.extend(extra);
            json!({
                "objective": "Generated project",
                "team": team,
                "deliverables": deliverables
            })
        },
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every prerequisite precedes its dependent, and every task is assigned once.
    #[test]
    fn prop_plan_is_topologically_ordered(raw in arb_request()) {
        let plan = planning::plan(&raw, &PlannerConfig::default()).unwrap();
        assert_topological(&plan);

        let assigned: usize = plan.assignments().values().map(Vec::len).sum();
        prop_assert_eq!(assigned, plan.tasks().len());
        let in_milestones: usize = plan.milestones().iter().map(|m| m.tasks.len()).sum();
        prop_assert_eq!(in_milestones, plan.tasks().len());
    }

    /// Identical input gives byte-identical output.
    #[test]
    fn prop_plan_is_deterministic(raw in arb_request()) {
        let config = PlannerConfig::default();
        let first = planning::plan(&raw, &config).unwrap().to_json().unwrap();
        let second = planning::plan(&raw, &config).unwrap().to_json().unwrap();
        prop_assert_eq!(first, second);
    }

    /// Totals equal the per-task sums.
    #[test]
    fn prop_totals_are_conserved(raw in arb_request()) {
        let plan = planning::plan(&raw, &PlannerConfig::default()).unwrap();
        let hours: f64 = plan.tasks().iter().map(|t| t.duration_hours).sum();
        let cost: f64 = plan.tasks().iter().map(|t| t.cost).sum();
        let tokens: u64 = plan.tasks().iter().map(|t| t.tokens).sum();

        prop_assert!((plan.total_duration_hours() - hours).abs() < 1e-9);
        prop_assert!((plan.total_cost() - cost).abs() < 1e-9);
        prop_assert_eq!(plan.total_tokens(), tokens);
    }

    /// With equal capacities and no role constraints, task counts differ by at most one.
    #[test]
    fn prop_round_robin_is_fair(members in 1usize..6, deliverables in 1usize..20) {
        let team: Vec<String> = (0..members).map(|i| format!("Writer {}", i)).collect();
        let items: Vec<String> = (0..deliverables).map(|i| format!("Item {}", i)).collect();
        let raw = json!({ "objective": "Fairness", "team": team, "deliverables": items });

        let plan = planning::plan(&raw, &PlannerConfig::default()).unwrap();
        let counts: HashMap<&String, usize> =
            plan.assignments().iter().map(|(name, ids)| (name, ids.len())).collect();
        let max = counts.values().copied().max().unwrap();
        let min = counts.values().copied().min().unwrap();
        prop_assert!(max - min <= 1, "unfair split {:?}", counts);
    }

    /// Validating a validated request's serialised form returns the same request.
    #[test]
    fn prop_validation_is_idempotent(raw in arb_request()) {
        let once = validator::validate(&raw).unwrap();
        let twice = validator::validate(&serde_json::to_value(&once).unwrap()).unwrap();
        prop_assert_eq!(once, twice);
    }
}
