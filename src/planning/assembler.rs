//! Final plan assembly.

use crate::core::{Milestone, Plan, PlannedTask, ProjectRequest, TaskId, TeamMember, Totals};
use crate::{Error, Result};
use std::collections::BTreeMap;
use tracing::debug;
use uuid::Uuid;

/// Compose sequenced, estimated tasks into an immutable `Plan`.
///
/// Every team member appears in the assignment map, with an empty list when
/// they received no tasks. Milestones follow deliverable declaration order.
///
/// # Errors
/// `Assembly` if a task names an assignee that is not on the team.
pub fn assemble(
    id: Uuid,
    request: &ProjectRequest,
    tasks: Vec<PlannedTask>,
    totals: Totals,
    members: &[TeamMember],
) -> Result<Plan> {
    let mut assignments: BTreeMap<String, Vec<TaskId>> = members
        .iter()
        .map(|m| (m.name.clone(), Vec::new()))
        .collect();

    for planned in &tasks {
        let task = &planned.task;
        let ids = assignments
            .get_mut(&task.assignee)
            .ok_or_else(|| Error::Assembly {
                task: task.id.clone(),
                assignee: task.assignee.clone(),
            })?;
        ids.push(task.id.clone());
    }

    let milestones = request
        .deliverables
        .iter()
        .map(|d| Milestone {
            name: d.name.clone(),
            tasks: tasks
                .iter()
                .filter(|t| t.task.deliverable == d.name)
                .map(|t| t.task.id.clone())
                .collect(),
        })
        .collect();

    debug!(plan = %id, tasks = tasks.len(), members = members.len(), "assembled plan");
    Ok(Plan::new(
        id,
        request.objective.clone(),
        tasks,
        totals,
        assignments,
        milestones,
    ))
}
