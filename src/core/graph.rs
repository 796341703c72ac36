//! Task graph for dependency management.
//!
//! `TaskGraph` stores tasks as nodes of a petgraph `DiGraph` with an edge from
//! every prerequisite to its dependent. Edges are derived from each task's
//! `prerequisites`, so the task records stay the single source of truth.
//! The graph does not reject cycles on construction; the sequencer is the
//! authoritative check.

use crate::core::task::{Task, TaskId};
use crate::error::{Error, Result};
use petgraph::algo::is_cyclic_directed;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use std::collections::HashMap;

pub struct TaskGraph {
    /// The underlying directed graph.
    graph: DiGraph<Task, ()>,
    /// Index mapping from TaskId to NodeIndex for fast lookups.
    task_index: HashMap<TaskId, NodeIndex>,
    /// Deliverable names in declaration order.
    deliverables: Vec<String>,
}

impl TaskGraph {
    /// Create an empty graph for the given deliverable declaration order.
    pub fn new(deliverables: Vec<String>) -> Self {
        Self {
            graph: DiGraph::new(),
            task_index: HashMap::new(),
            deliverables,
        }
    }

    /// Build a graph from tasks whose prerequisites are already set.
    ///
    /// # Errors
    /// - `Validation` if two tasks share an id
    /// - `UnknownPrerequisite` if a prerequisite id is not among `tasks`
    pub fn from_tasks(deliverables: Vec<String>, tasks: Vec<Task>) -> Result<Self> {
        let mut dag = Self::new(deliverables);

        for (i, task) in tasks.into_iter().enumerate() {
            if dag.task_index.contains_key(&task.id) {
                return Err(Error::validation(
                    format!("tasks[{}].id", i),
                    format!("duplicate task id {}", task.id),
                ));
            }
            let id = task.id.clone();
            let index = dag.graph.add_node(task);
            dag.task_index.insert(id, index);
        }

        let mut edges = Vec::new();
        for index in dag.graph.node_indices() {
            let task = &dag.graph[index];
            for prerequisite in &task.prerequisites {
                let from = dag.task_index.get(prerequisite).ok_or_else(|| {
                    Error::UnknownPrerequisite {
                        task: task.id.clone(),
                        prerequisite: prerequisite.clone(),
                    }
                })?;
                edges.push((*from, index));
            }
        }
        for (from, to) in edges {
            dag.graph.add_edge(from, to, ());
        }

        Ok(dag)
    }

    /// Get a reference to a task by its ID.
    pub fn get_task(&self, id: &TaskId) -> Option<&Task> {
        self.task_index
            .get(id)
            .and_then(|&index| self.graph.node_weight(index))
    }

    pub fn task_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Check if `to` directly depends on `from`.
    pub fn has_dependency(&self, from: &TaskId, to: &TaskId) -> bool {
        if let (Some(&from_idx), Some(&to_idx)) =
            (self.task_index.get(from), self.task_index.get(to))
        {
            self.graph.find_edge(from_idx, to_idx).is_some()
        } else {
            false
        }
    }

    /// Tasks that directly depend on the given task.
    pub fn get_dependents(&self, id: &TaskId) -> Vec<&Task> {
        match self.task_index.get(id) {
            Some(&index) => self
                .graph
                .neighbors_directed(index, Direction::Outgoing)
                .filter_map(|neighbor| self.graph.node_weight(neighbor))
                .collect(),
            None => Vec::new(),
        }
    }

    /// All tasks in insertion order.
    pub fn all_tasks(&self) -> Vec<&Task> {
        self.graph.node_weights().collect()
    }

    /// Position of a deliverable in declaration order; unknown names sort last.
    pub fn deliverable_rank(&self, deliverable: &str) -> usize {
        self.deliverables
            .iter()
            .position(|d| d == deliverable)
            .unwrap_or(usize::MAX)
    }

    pub fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Get the underlying graph for advanced operations.
    pub fn graph(&self) -> &DiGraph<Task, ()> {
        &self.graph
    }
}

impl std::fmt::Debug for TaskGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TaskGraph")
            .field("tasks", &self.task_count())
            .field("dependencies", &self.dependency_count())
            .field("deliverables", &self.deliverables.len())
            .finish()
    }
}
