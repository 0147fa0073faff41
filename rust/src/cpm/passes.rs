//! Forward and backward CPM passes over a topological order.

use crate::graph::TaskGraph;
use crate::interner::TaskId;
use crate::log_trace;

use super::types::TaskTiming;

/// Earliest start/finish for every ordered task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ForwardPass {
    /// (earliest_start, earliest_finish) indexed by task id; `None` if unordered.
    pub earliest: Vec<Option<(i64, i64)>>,
    /// Max earliest finish over all ordered tasks, 0 if there are none.
    pub project_duration: i64,
}

/// Compute earliest start/finish in topological order.
///
/// A task with no resolved predecessors starts at 0; otherwise it starts when
/// its last predecessor finishes.
pub fn forward_pass(graph: &TaskGraph<'_>, order: &[TaskId], verbosity: u8) -> ForwardPass {
    let mut earliest: Vec<Option<(i64, i64)>> = vec![None; graph.len()];
    let mut project_duration = 0;

    for &id in order {
        // Predecessors always precede `id` in a topological order
        let earliest_start = graph
            .predecessors(id)
            .iter()
            .filter_map(|&pred| earliest[pred as usize].map(|(_, ef)| ef))
            .max()
            .unwrap_or(0);
        let earliest_finish = earliest_start + graph.duration(id);

        earliest[id as usize] = Some((earliest_start, earliest_finish));
        project_duration = project_duration.max(earliest_finish);

        log_trace!(
            verbosity,
            "forward {}: es={} ef={}",
            graph.code(id),
            earliest_start,
            earliest_finish
        );
    }

    ForwardPass {
        earliest,
        project_duration,
    }
}

/// Compute latest start/finish in reverse topological order and combine with
/// the forward pass into full timings.
///
/// A task with no scheduled successors must finish by the project duration;
/// otherwise by the earliest latest-start among its successors.
pub fn backward_pass(
    graph: &TaskGraph<'_>,
    order: &[TaskId],
    forward: &ForwardPass,
    verbosity: u8,
) -> Vec<Option<TaskTiming>> {
    let mut timings: Vec<Option<TaskTiming>> = vec![None; graph.len()];

    for &id in order.iter().rev() {
        let Some((earliest_start, earliest_finish)) = forward.earliest[id as usize] else {
            continue;
        };

        // Successors blocked by a cycle have no timing and impose no limit
        let latest_finish = graph
            .successors(id)
            .iter()
            .filter_map(|&succ| timings[succ as usize].map(|t| t.latest_start))
            .min()
            .unwrap_or(forward.project_duration);
        let latest_start = latest_finish - graph.duration(id);

        let timing = TaskTiming {
            earliest_start,
            earliest_finish,
            latest_start,
            latest_finish,
            float: latest_start - earliest_start,
        };
        debug_assert!(timing.float >= 0, "negative float for {}", graph.code(id));

        log_trace!(
            verbosity,
            "backward {}: ls={} lf={} float={}",
            graph.code(id),
            latest_start,
            latest_finish,
            timing.float
        );
        timings[id as usize] = Some(timing);
    }

    timings
}
