//! Task data model for the plan graph.
//!
//! A `Task` is the structural unit produced by the graph builder: what to do,
//! for which deliverable, by whom, and after what. `PlannedTask` is the same
//! task once estimates (and optionally calendar dates) are attached.

use crate::core::request::DeliverableSize;
use crate::core::role::Role;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Stable identifier for a task.
///
/// Assigned once by the graph builder in the form
/// `<deliverable-slug>-<step>-<kind>`, and used by every later stage to refer
/// to the task. Ordering is lexicographic, which the sequencer relies on for
/// its final tie-break.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for TaskId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of sub-task a template step expands into.
///
/// Base duration/token rates are keyed by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    Research,
    Brief,
    Draft,
    Design,
    Produce,
    Review,
    Optimize,
    Schedule,
    Publish,
    /// Single catch-all task for deliverables without a template.
    Generic,
}

impl TaskKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskKind::Research => "research",
            TaskKind::Brief => "brief",
            TaskKind::Draft => "draft",
            TaskKind::Design => "design",
            TaskKind::Produce => "produce",
            TaskKind::Review => "review",
            TaskKind::Optimize => "optimize",
            TaskKind::Schedule => "schedule",
            TaskKind::Publish => "publish",
            TaskKind::Generic => "generic",
        }
    }

    /// Capitalised verb used in structural task descriptions.
    pub fn label(&self) -> &'static str {
        match self {
            TaskKind::Research => "Research",
            TaskKind::Brief => "Brief",
            TaskKind::Draft => "Draft",
            TaskKind::Design => "Design",
            TaskKind::Produce => "Produce",
            TaskKind::Review => "Review",
            TaskKind::Optimize => "Optimize",
            TaskKind::Schedule => "Schedule",
            TaskKind::Publish => "Publish",
            TaskKind::Generic => "Deliver",
        }
    }
}

impl std::fmt::Display for TaskKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single unestimated task in the plan graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    /// Structural description; an external generation layer may replace it later.
    pub description: String,
    /// Name of the deliverable this task produces.
    pub deliverable: String,
    /// Name of the assigned team member.
    pub assignee: String,
    /// Tasks that must finish first, sorted and without duplicates.
    pub prerequisites: Vec<TaskId>,
    pub kind: TaskKind,
    /// Role of the assignee, used to look up the hourly rate.
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<DeliverableSize>,
}

impl Task {
    /// Create a task with no prerequisites and a structural description.
    pub fn new(id: TaskId, kind: TaskKind, deliverable: &str, assignee: &str, role: Role) -> Self {
        Self {
            id,
            description: format!("{}: {}", kind.label(), deliverable),
            deliverable: deliverable.to_string(),
            assignee: assignee.to_string(),
            prerequisites: Vec::new(),
            kind,
            role,
            size: None,
        }
    }

    /// Replace the prerequisite set, normalising it to sorted unique ids.
    pub fn with_prerequisites(mut self, prerequisites: impl IntoIterator<Item = TaskId>) -> Self {
        let mut prerequisites: Vec<TaskId> = prerequisites.into_iter().collect();
        prerequisites.sort();
        prerequisites.dedup();
        self.prerequisites = prerequisites;
        self
    }

    pub fn with_size(mut self, size: Option<DeliverableSize>) -> Self {
        self.size = size;
        self
    }
}

/// A task with its estimates filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedTask {
    #[serde(flatten)]
    pub task: Task,
    pub duration_hours: f64,
    pub tokens: u64,
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
}

impl PlannedTask {
    pub fn id(&self) -> &TaskId {
        &self.task.id
    }
}
