//! Duration, token, and cost estimation.
//!
//! duration = base hours × complexity, tokens = round(base tokens × complexity),
//! cost = tokens × per-token rate + duration × hourly rate of the assignee's role.
//! Complexity comes from the deliverable's declared size and is 1.0 when
//! undeclared. A missing rate is an error, never a silent zero.

use crate::config::{HourlyRates, PlannerConfig};
use crate::core::{DeliverableSize, PlannedTask, Task, Totals};
use crate::{Error, Result};
use tracing::debug;

/// Estimated tasks in input order, plus their totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Estimate {
    pub tasks: Vec<PlannedTask>,
    pub totals: Totals,
}

fn complexity(size: Option<DeliverableSize>, config: &PlannerConfig) -> f64 {
    match size {
        None => 1.0,
        Some(DeliverableSize::Small) => config.size_multipliers.small,
        Some(DeliverableSize::Medium) => config.size_multipliers.medium,
        Some(DeliverableSize::Large) => config.size_multipliers.large,
    }
}

fn estimate_task(task: &Task, config: &PlannerConfig) -> Result<PlannedTask> {
    let rate_key = format!("rates.{}", task.kind);
    let rate = config
        .rates
        .get(task.kind)
        .ok_or_else(|| Error::configuration(&rate_key))?;
    let hourly = config
        .hourly_rates
        .for_role(&task.role)
        .ok_or_else(|| Error::configuration(HourlyRates::key_for(&task.role)))?;
    if !(hourly.is_finite() && hourly >= 0.0) {
        return Err(Error::configuration(HourlyRates::key_for(&task.role)));
    }

    let multiplier = complexity(task.size, config);
    let duration_hours = rate.hours * multiplier;
    if !(duration_hours.is_finite() && duration_hours > 0.0) {
        return Err(Error::configuration(format!("{}.hours", rate_key)));
    }
    let scaled_tokens = (rate.tokens as f64 * multiplier).round();
    // `u64::MAX as f64` is 2^64, the first value the cast would clamp.
    if !(scaled_tokens.is_finite() && scaled_tokens < u64::MAX as f64) {
        return Err(Error::configuration(format!("{}.tokens", rate_key)));
    }
    let tokens = scaled_tokens as u64;
    let cost = tokens as f64 * config.per_token_rate + duration_hours * hourly;
    if !(cost.is_finite() && cost >= 0.0) {
        return Err(Error::configuration("per_token_rate"));
    }

    Ok(PlannedTask {
        task: task.clone(),
        duration_hours,
        tokens,
        cost,
        start_date: None,
        end_date: None,
    })
}

/// Attach estimates to every task and aggregate totals.
///
/// # Errors
/// `Configuration` naming the missing rate key.
pub fn estimate(tasks: &[Task], config: &PlannerConfig) -> Result<Estimate> {
    let tasks = tasks
        .iter()
        .map(|task| estimate_task(task, config))
        .collect::<Result<Vec<_>>>()?;
    let totals = Totals::of(&tasks)?;

    debug!(
        tasks = tasks.len(),
        hours = totals.duration_hours,
        tokens = totals.tokens,
        cost = totals.cost,
        "estimated tasks"
    );
    Ok(Estimate { tasks, totals })
}
