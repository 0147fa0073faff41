//! Critical path and bottleneck extraction from computed timings.

use crate::graph::TaskGraph;
use crate::interner::TaskId;
use crate::models::Bottleneck;

use super::types::TaskTiming;

/// All zero-float tasks, ordered by earliest start and then by code.
pub fn critical_path(graph: &TaskGraph<'_>, timings: &[Option<TaskTiming>]) -> Vec<TaskId> {
    let mut critical: Vec<(i64, &str, TaskId)> = graph
        .ids()
        .filter_map(|id| {
            timings[id as usize]
                .filter(TaskTiming::is_critical)
                .map(|t| (t.earliest_start, graph.code(id), id))
        })
        .collect();
    critical.sort_unstable();
    critical.into_iter().map(|(_, _, id)| id).collect()
}

/// Critical tasks with more than `threshold` successors waiting on them.
pub fn find_bottlenecks(
    graph: &TaskGraph<'_>,
    critical_path: &[TaskId],
    threshold: usize,
) -> Vec<Bottleneck> {
    critical_path
        .iter()
        .filter_map(|&id| {
            let successor_count = graph.successors(id).len();
            (successor_count > threshold).then(|| Bottleneck {
                task_code: graph.code(id).to_string(),
                successor_count,
                reason: format!("{successor_count} tasks are waiting on this task to finish"),
            })
        })
        .collect()
}
