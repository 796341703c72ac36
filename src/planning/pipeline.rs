//! The full planning pipeline.
//!
//! validate → assign roles → build graph → sequence → estimate → (schedule) → assemble.
//! Each stage receives the previous stage's output and the same `PlannerConfig`;
//! nothing is retained between runs, so a plan is a pure function of its inputs.

use crate::config::PlannerConfig;
use crate::core::{Plan, ProjectRequest, Totals};
use crate::planning::{assembler, builder, calendar, estimator, roles, sequencer, validator};
use crate::Result;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

/// Namespace for content-derived plan ids.
const PLAN_NAMESPACE: Uuid = Uuid::from_u128(0x6f1c_2a4e_93b7_4d0a_8e55_1c7d_0b3f_a912);

/// Stable identifier for a (request, configuration) pair.
pub fn plan_id(request: &ProjectRequest, config: &PlannerConfig) -> Result<Uuid> {
    let canonical = serde_json::to_vec(&(request, config))?;
    Ok(Uuid::new_v5(&PLAN_NAMESPACE, &canonical))
}

/// Validate raw input and plan it.
pub fn plan(raw: &Value, config: &PlannerConfig) -> Result<Plan> {
    let request = validator::validate(raw)?;
    plan_request(&request, config)
}

/// Plan an already-validated request.
///
/// Calendar dates are attached only when the request carries a start date.
pub fn plan_request(request: &ProjectRequest, config: &PlannerConfig) -> Result<Plan> {
    let members = roles::assign(&request.team, &config.roles)?;
    let graph = builder::build(request, &members, config)?;
    let ordered = sequencer::sequence(&graph)?;
    let estimate = estimator::estimate(&ordered, config)?;

    let tasks = match request.project_start_date {
        Some(start) => calendar::schedule(&estimate.tasks, start, config.hours_per_day)?,
        None => estimate.tasks,
    };
    let totals: Totals = estimate.totals;

    let plan = assembler::assemble(plan_id(request, config)?, request, tasks, totals, &members)?;
    info!(
        plan = %plan.id(),
        tasks = plan.tasks().len(),
        total_cost = plan.total_cost(),
        "plan ready"
    );
    Ok(plan)
}
