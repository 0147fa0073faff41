//! Grouping of tasks that share an identical predecessor set.

use rustc_hash::FxHashMap;

use crate::graph::TaskGraph;
use crate::interner::TaskId;

use super::types::{ParallelGroup, TaskTiming};

/// Find groups of two or more tasks whose declared predecessor sets are equal.
///
/// Groups are returned in order of first appearance. `timings` is `None` when
/// analysis is disabled, in which case no group gets a start offset.
pub fn parallel_groups(
    graph: &TaskGraph<'_>,
    timings: Option<&[Option<TaskTiming>]>,
) -> Vec<ParallelGroup> {
    let mut slots: FxHashMap<Vec<&str>, usize> = FxHashMap::default();
    let mut groups: Vec<(Vec<&str>, Vec<TaskId>)> = Vec::new();

    for id in graph.ids() {
        let mut key: Vec<&str> = graph
            .task(id)
            .predecessors
            .iter()
            .map(String::as_str)
            .collect();
        key.sort_unstable();
        key.dedup();

        match slots.get(&key) {
            Some(&slot) => groups[slot].1.push(id),
            None => {
                slots.insert(key.clone(), groups.len());
                groups.push((key, vec![id]));
            }
        }
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .map(|(key, members)| ParallelGroup {
            start_offset: timings.and_then(|t| shared_start(graph, &key, t)),
            time_savings_days: time_savings(graph, &members),
            members,
        })
        .collect()
}

/// Day the shared predecessors are all finished.
///
/// Codes that match no task count as finishing at 0. Returns `None` if any
/// shared predecessor is blocked by a cycle.
fn shared_start(
    graph: &TaskGraph<'_>,
    predecessors: &[&str],
    timings: &[Option<TaskTiming>],
) -> Option<i64> {
    let mut start = 0;
    for code in predecessors {
        if let Some(id) = graph.id_of(code) {
            let finish = timings[id as usize]?.earliest_finish;
            start = start.max(finish);
        }
    }
    Some(start)
}

/// Longest duration in the group minus the mean duration.
fn time_savings(graph: &TaskGraph<'_>, members: &[TaskId]) -> f64 {
    let durations: Vec<i64> = members.iter().map(|&id| graph.duration(id)).collect();
    let longest = durations.iter().copied().max().unwrap_or(0) as f64;
    let mean = durations.iter().sum::<i64>() as f64 / durations.len().max(1) as f64;
    longest - mean
}
