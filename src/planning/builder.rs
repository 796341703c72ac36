//! Task graph construction.
//!
//! Every deliverable expands into its template's steps (or one generic task
//! when no template matches). Steps of a deliverable form a chain; the first
//! step additionally waits for the last task of each deliverable named in the
//! template's `after` list. Assignees are picked by weighted round-robin over
//! the members whose role satisfies the step.

use crate::config::{PlannerConfig, TemplateStep};
use crate::core::{DeliverableEntry, ProjectRequest, Task, TaskGraph, TaskId, TaskKind, TeamMember};
use crate::util::slug;
use crate::{Error, Result};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, trace};

/// Weighted round-robin over team members.
///
/// The next assignee is the eligible member with the lowest load, where load is
/// tasks assigned so far divided by capacity. Ties go to the member declared
/// first. Loads accumulate across the whole build.
struct RoundRobin<'a> {
    members: &'a [TeamMember],
    assigned: Vec<u32>,
}

impl<'a> RoundRobin<'a> {
    fn new(members: &'a [TeamMember]) -> Self {
        Self {
            members,
            assigned: vec![0; members.len()],
        }
    }

    fn load(&self, index: usize) -> f64 {
        f64::from(self.assigned[index]) / self.members[index].capacity
    }

    fn next(&mut self, step: &TemplateStep) -> Option<&'a TeamMember> {
        let chosen = (0..self.members.len())
            .filter(|&i| match &step.requires {
                Some(required) => self.members[i].role.satisfies(required),
                None => true,
            })
            .min_by(|&a, &b| match self.load(a).total_cmp(&self.load(b)) {
                Ordering::Equal => a.cmp(&b),
                other => other,
            })?;
        self.assigned[chosen] += 1;
        let members = self.members;
        Some(&members[chosen])
    }
}

/// A deliverable with its resolved steps and pre-allocated task ids.
struct Expansion<'a> {
    entry: &'a DeliverableEntry,
    steps: Vec<TemplateStep>,
    after: Vec<String>,
    ids: Vec<TaskId>,
}

fn expand<'a>(request: &'a ProjectRequest, config: &PlannerConfig) -> Vec<Expansion<'a>> {
    let mut used_slugs = HashSet::new();

    request
        .deliverables
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            let (steps, after) = match config.template_for(&entry.name) {
                Some(template) => (template.steps.clone(), template.after.clone()),
                None => {
                    debug!(deliverable = %entry.name, "no template, using a single generic task");
                    (vec![TemplateStep::new(TaskKind::Generic, None)], Vec::new())
                }
            };

            let base = slug(&entry.name, 48).unwrap_or_else(|| format!("deliverable-{}", i + 1));
            let mut prefix = base.clone();
            let mut n = 2;
            while !used_slugs.insert(prefix.clone()) {
                prefix = format!("{}-{}", base, n);
                n += 1;
            }

            let ids = steps
                .iter()
                .enumerate()
                .map(|(j, step)| TaskId::new(format!("{}-{:02}-{}", prefix, j + 1, step.kind)))
                .collect();

            Expansion {
                entry,
                steps,
                after,
                ids,
            }
        })
        .collect()
}

/// Expand a validated request into an unsequenced task graph.
///
/// # Errors
/// `NoEligibleAssignee` when a step requires a role nobody on the team holds.
pub fn build(request: &ProjectRequest, members: &[TeamMember], config: &PlannerConfig) -> Result<TaskGraph> {
    let expansions = expand(request, config);
    let mut round_robin = RoundRobin::new(members);
    let mut tasks = Vec::new();

    for expansion in &expansions {
        let name = &expansion.entry.name;

        // Last task of every earlier-required deliverable that is part of this request.
        let upstream: Vec<TaskId> = expansion
            .after
            .iter()
            .filter_map(|before| {
                let wanted = before.trim().to_lowercase();
                expansions
                    .iter()
                    .find(|other| other.entry.name.to_lowercase() == wanted)
                    .and_then(|other| other.ids.last().cloned())
            })
            .collect();

        for (j, step) in expansion.steps.iter().enumerate() {
            let member = round_robin.next(step).ok_or_else(|| Error::NoEligibleAssignee {
                deliverable: name.clone(),
                kind: step.kind.to_string(),
                capability: step
                    .requires
                    .as_ref()
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "any role".to_string()),
            })?;

            let prerequisites = if j == 0 {
                upstream.clone()
            } else {
                vec![expansion.ids[j - 1].clone()]
            };

            let id = expansion.ids[j].clone();
            trace!(task = %id, assignee = %member.name, "created task");
            tasks.push(
                Task::new(id, step.kind, name, &member.name, member.role.clone())
                    .with_prerequisites(prerequisites)
                    .with_size(expansion.entry.size),
            );
        }
    }

    let deliverables = request.deliverables.iter().map(|d| d.name.clone()).collect();
    let graph = TaskGraph::from_tasks(deliverables, tasks)?;
    debug!(
        tasks = graph.task_count(),
        dependencies = graph.dependency_count(),
        "built task graph"
    );
    Ok(graph)
}
