//! Core domain models for plan construction.
//!
//! This module contains the data structures passed between pipeline stages:
//! the validated request, team roles, tasks, the task graph, and the final plan.

pub mod graph;
pub mod plan;
pub mod request;
pub mod role;
pub mod task;

pub use graph::TaskGraph;
pub use plan::{Milestone, Plan, Totals};
pub use request::{DeliverableEntry, DeliverableSize, ProjectRequest, TeamEntry};
pub use role::{Role, RoleRule, TeamMember};
pub use task::{PlannedTask, Task, TaskId, TaskKind};
