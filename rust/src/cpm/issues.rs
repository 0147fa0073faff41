//! Structural defect detection.
//!
//! Issues never stop the computation; they are reported next to the schedule.

use crate::graph::TaskGraph;
use crate::interner::TaskId;
use crate::models::{Issue, IssueType, Severity};

use super::topology::TopologicalOrder;

/// Collect orphans, missing predecessors and circular dependencies, in that
/// order.
pub fn detect_issues(graph: &TaskGraph<'_>, topo: &TopologicalOrder) -> Vec<Issue> {
    let mut issues = find_orphans(graph);
    issues.extend(find_missing_predecessors(graph));
    issues.extend(find_cycles(graph, topo));
    issues
}

/// Tasks that declare no predecessors and have no successors. A single-task
/// list has no orphans.
pub fn find_orphans(graph: &TaskGraph<'_>) -> Vec<Issue> {
    if graph.len() <= 1 {
        return Vec::new();
    }

    graph
        .ids()
        .filter(|&id| graph.task(id).predecessors.is_empty() && graph.successors(id).is_empty())
        .map(|id| Issue {
            issue_type: IssueType::Orphan,
            description: format!(
                "Task {} is not connected to any other task",
                graph.code(id)
            ),
            affected_tasks: vec![graph.code(id).to_string()],
            severity: Severity::Medium,
        })
        .collect()
}

/// One issue per declared predecessor code that names no supplied task.
pub fn find_missing_predecessors(graph: &TaskGraph<'_>) -> Vec<Issue> {
    let mut issues = Vec::new();
    for id in graph.ids() {
        for missing in graph.missing_predecessors(id) {
            issues.push(Issue {
                issue_type: IssueType::MissingPredecessor,
                description: format!(
                    "Predecessor task {} of {} is not in the task list",
                    missing,
                    graph.code(id)
                ),
                affected_tasks: vec![graph.code(id).to_string()],
                severity: Severity::High,
            });
        }
    }
    issues
}

/// Tasks on cycles, and separately the tasks that could not be scheduled
/// because they depend on a cycle.
pub fn find_cycles(graph: &TaskGraph<'_>, topo: &TopologicalOrder) -> Vec<Issue> {
    let mut issues = Vec::new();

    if !topo.cycle_members.is_empty() {
        let codes = code_list(graph, &topo.cycle_members);
        issues.push(Issue {
            issue_type: IssueType::Circular,
            description: format!(
                "Circular dependency among tasks {}; they cannot be scheduled",
                codes.join(", ")
            ),
            affected_tasks: codes,
            severity: Severity::High,
        });
    }

    if !topo.downstream_of_cycle.is_empty() {
        let codes = code_list(graph, &topo.downstream_of_cycle);
        issues.push(Issue {
            issue_type: IssueType::Circular,
            description: format!(
                "Tasks {} depend on a circular dependency and were not scheduled",
                codes.join(", ")
            ),
            affected_tasks: codes,
            severity: Severity::Medium,
        });
    }

    issues
}

fn code_list(graph: &TaskGraph<'_>, ids: &[TaskId]) -> Vec<String> {
    ids.iter().map(|&id| graph.code(id).to_string()).collect()
}
