//! Deterministic topological ordering.
//!
//! Kahn's algorithm with a priority queue. Among the tasks whose prerequisites
//! are all placed, the next one is chosen by
//! (a) fewest direct dependents not yet placed,
//! (b) deliverable declaration order,
//! (c) task id.
//! The key depends only on graph content, never on node insertion order.

use crate::core::{Task, TaskGraph, TaskId};
use crate::{Error, Result};
use petgraph::graph::NodeIndex;
use petgraph::Direction;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use tracing::{debug, warn};

type ReadyKey = Reverse<(usize, usize, TaskId, NodeIndex)>;

fn ready_key(graph: &TaskGraph, index: NodeIndex) -> ReadyKey {
    let task = &graph.graph()[index];
    // Every dependent of a ready task is still unplaced.
    let dependents = graph.get_dependents(&task.id).len();
    Reverse((
        dependents,
        graph.deliverable_rank(&task.deliverable),
        task.id.clone(),
        index,
    ))
}

/// Order the tasks of `graph` so that every task follows its prerequisites.
///
/// # Errors
/// `Cycle` listing every task that could not be placed.
pub fn sequence(graph: &TaskGraph) -> Result<Vec<Task>> {
    let g = graph.graph();
    let mut pending: Vec<usize> = g
        .node_indices()
        .map(|i| g.neighbors_directed(i, Direction::Incoming).count())
        .collect();

    let mut ready: BinaryHeap<ReadyKey> = g
        .node_indices()
        .filter(|i| pending[i.index()] == 0)
        .map(|i| ready_key(graph, i))
        .collect();

    let mut ordered = Vec::with_capacity(g.node_count());
    while let Some(Reverse((_, _, _, index))) = ready.pop() {
        ordered.push(g[index].clone());
        for dependent in g.neighbors_directed(index, Direction::Outgoing) {
            pending[dependent.index()] -= 1;
            if pending[dependent.index()] == 0 {
                ready.push(ready_key(graph, dependent));
            }
        }
    }

    if ordered.len() < g.node_count() {
        let mut stuck: Vec<TaskId> = g
            .node_indices()
            .filter(|i| pending[i.index()] > 0)
            .map(|i| g[i].id.clone())
            .collect();
        stuck.sort();
        warn!(tasks = stuck.len(), "dependency cycle in task graph");
        return Err(Error::Cycle { tasks: stuck });
    }

    debug!(tasks = ordered.len(), "sequenced tasks");
    Ok(ordered)
}
