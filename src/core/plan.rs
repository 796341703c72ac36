//! The final, immutable plan handed to external renderers.

use crate::core::task::{PlannedTask, TaskId};
use crate::util::slug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Aggregate estimates over a set of tasks.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub duration_hours: f64,
    pub tokens: u64,
    pub cost: f64,
}

impl Totals {
    /// Sum estimates in sequence order.
    ///
    /// # Errors
    /// `Configuration` naming the token rate of the task whose tokens no
    /// longer fit in the running total.
    pub fn of(tasks: &[PlannedTask]) -> crate::Result<Self> {
        tasks.iter().try_fold(Self::default(), |acc, t| {
            let tokens = acc.tokens.checked_add(t.tokens).ok_or_else(|| {
                crate::Error::configuration(format!("rates.{}.tokens", t.task.kind))
            })?;
            Ok(Self {
                duration_hours: acc.duration_hours + t.duration_hours,
                tokens,
                cost: acc.cost + t.cost,
            })
        })
    }
}

/// Task ids belonging to one deliverable, in sequence order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    pub name: String,
    pub tasks: Vec<TaskId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plan {
    id: Uuid,
    objective: String,
    tasks: Vec<PlannedTask>,
    total_duration_hours: f64,
    total_tokens: u64,
    total_cost: f64,
    assignments: BTreeMap<String, Vec<TaskId>>,
    milestones: Vec<Milestone>,
}

impl Plan {
    pub(crate) fn new(
        id: Uuid,
        objective: String,
        tasks: Vec<PlannedTask>,
        totals: Totals,
        assignments: BTreeMap<String, Vec<TaskId>>,
        milestones: Vec<Milestone>,
    ) -> Self {
        Self {
            id,
            objective,
            tasks,
            total_duration_hours: totals.duration_hours,
            total_tokens: totals.tokens,
            total_cost: totals.cost,
            assignments,
            milestones,
        }
    }

    /// Content-derived identifier; identical request and configuration give identical ids.
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn objective(&self) -> &str {
        &self.objective
    }

    /// Tasks in topological order.
    pub fn tasks(&self) -> &[PlannedTask] {
        &self.tasks
    }

    pub fn task(&self, id: &TaskId) -> Option<&PlannedTask> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn totals(&self) -> Totals {
        Totals {
            duration_hours: self.total_duration_hours,
            tokens: self.total_tokens,
            cost: self.total_cost,
        }
    }

    pub fn total_duration_hours(&self) -> f64 {
        self.total_duration_hours
    }

    pub fn total_tokens(&self) -> u64 {
        self.total_tokens
    }

    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    /// Team member name to the ids of their tasks, in sequence order.
    pub fn assignments(&self) -> &BTreeMap<String, Vec<TaskId>> {
        &self.assignments
    }

    pub fn milestones(&self) -> &[Milestone] {
        &self.milestones
    }

    /// File-name-safe stem derived from the objective.
    pub fn file_stem(&self) -> String {
        slug(&self.objective, 80).unwrap_or_else(|| "content-project-plan".to_string())
    }

    /// Return a copy with descriptions replaced for the given task ids.
    ///
    /// Ids not present in the plan are ignored. The receiver is left untouched,
    /// so enrichment of different tasks can run independently and be merged here.
    pub fn with_descriptions(&self, descriptions: &BTreeMap<TaskId, String>) -> Plan {
        let mut plan = self.clone();
        for task in &mut plan.tasks {
            if let Some(description) = descriptions.get(&task.task.id) {
                task.task.description = description.clone();
            }
        }
        plan
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
