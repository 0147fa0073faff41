//! Topological ordering with cycle detection (Kahn's algorithm).

use std::cmp::Reverse;
use std::collections::{BinaryHeap, VecDeque};

use crate::graph::TaskGraph;
use crate::interner::TaskId;

/// Result of ordering the graph.
///
/// Tasks that cannot be ordered are split into those on (or between) cycles
/// and those that are only downstream of one.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TopologicalOrder {
    /// Orderable tasks, predecessors before successors.
    pub order: Vec<TaskId>,
    /// Blocked tasks that sit on a dependency cycle, in presentation order.
    pub cycle_members: Vec<TaskId>,
    /// Blocked tasks that only depend on a cycle, in presentation order.
    pub downstream_of_cycle: Vec<TaskId>,
}

impl TopologicalOrder {
    pub fn is_acyclic(&self) -> bool {
        self.cycle_members.is_empty()
    }

    pub fn blocked_count(&self) -> usize {
        self.cycle_members.len() + self.downstream_of_cycle.len()
    }
}

/// Order tasks so every task comes after all of its resolved predecessors.
///
/// Ready tasks are released in ascending code order, so the order does not
/// depend on how the caller listed the tasks.
pub fn topological_sort(graph: &TaskGraph<'_>) -> TopologicalOrder {
    let n = graph.len();
    let mut in_degree: Vec<usize> = graph.ids().map(|id| graph.predecessors(id).len()).collect();

    let mut ready: BinaryHeap<Reverse<(&str, TaskId)>> = graph
        .ids()
        .filter(|&id| in_degree[id as usize] == 0)
        .map(|id| Reverse((graph.code(id), id)))
        .collect();

    let mut order: Vec<TaskId> = Vec::with_capacity(n);
    while let Some(Reverse((_, id))) = ready.pop() {
        order.push(id);
        for &succ in graph.successors(id) {
            let degree = &mut in_degree[succ as usize];
            *degree -= 1;
            if *degree == 0 {
                ready.push(Reverse((graph.code(succ), succ)));
            }
        }
    }

    if order.len() == n {
        return TopologicalOrder {
            order,
            ..Default::default()
        };
    }

    let mut ordered = vec![false; n];
    for &id in &order {
        ordered[id as usize] = true;
    }
    let cycle_core = peel_downstream(graph, &ordered);

    let mut cycle_members = Vec::new();
    let mut downstream_of_cycle = Vec::new();
    for id in graph.ids().filter(|&id| !ordered[id as usize]) {
        if cycle_core[id as usize] {
            cycle_members.push(id);
        } else {
            downstream_of_cycle.push(id);
        }
    }

    TopologicalOrder {
        order,
        cycle_members,
        downstream_of_cycle,
    }
}

/// Reverse Kahn over the blocked tasks: repeatedly drop blocked tasks with no
/// blocked successors. What survives lies on or between cycles.
fn peel_downstream(graph: &TaskGraph<'_>, ordered: &[bool]) -> Vec<bool> {
    let mut in_core: Vec<bool> = ordered.iter().map(|&o| !o).collect();
    let mut out_degree: Vec<usize> = graph
        .ids()
        .map(|id| {
            graph
                .successors(id)
                .iter()
                .filter(|&&s| in_core[s as usize])
                .count()
        })
        .collect();

    let mut queue: VecDeque<TaskId> = graph
        .ids()
        .filter(|&id| in_core[id as usize] && out_degree[id as usize] == 0)
        .collect();

    while let Some(id) = queue.pop_front() {
        in_core[id as usize] = false;
        for &pred in graph.predecessors(id) {
            if !in_core[pred as usize] {
                continue;
            }
            let degree = &mut out_degree[pred as usize];
            *degree -= 1;
            if *degree == 0 {
                queue.push_back(pred);
            }
        }
    }

    in_core
}
