//! Critical Path Method engine.
//!
//! Orders the graph with Kahn's algorithm, runs the forward and backward
//! passes over that order, and derives float, the critical path, bottlenecks,
//! parallel groups and structural issues. Tasks on or downstream of a cycle
//! are left unscheduled and reported as issues instead of being given
//! made-up times.

mod analysis;
mod issues;
mod parallel;
mod passes;
mod topology;
mod types;

pub use analysis::{critical_path, find_bottlenecks};
pub use issues::{detect_issues, find_cycles, find_missing_predecessors, find_orphans};
pub use parallel::parallel_groups;
pub use passes::{backward_pass, forward_pass, ForwardPass};
pub use topology::{topological_sort, TopologicalOrder};
pub use types::{ParallelGroup, ScheduleAnalysis, TaskTiming};

use crate::config::MappingConfig;
use crate::graph::TaskGraph;
use crate::{log_pass, log_summary};

/// Run the full engine over a built graph.
pub fn analyze(graph: &TaskGraph<'_>, config: &MappingConfig) -> ScheduleAnalysis {
    let verbosity = config.verbosity;

    let order = topological_sort(graph);
    log_pass!(
        verbosity,
        "ordered {} of {} tasks ({} on cycles, {} downstream)",
        order.order.len(),
        graph.len(),
        order.cycle_members.len(),
        order.downstream_of_cycle.len()
    );

    let (timings, project_duration) = if config.analyze_critical_path {
        let forward = forward_pass(graph, &order.order, verbosity);
        log_pass!(verbosity, "forward pass: project duration {}", forward.project_duration);
        let timings = backward_pass(graph, &order.order, &forward, verbosity);
        (timings, forward.project_duration)
    } else {
        (vec![None; graph.len()], 0)
    };

    let critical = critical_path(graph, &timings);
    let bottlenecks = find_bottlenecks(graph, &critical, config.bottleneck_threshold);
    let groups = parallel_groups(
        graph,
        config.analyze_critical_path.then_some(timings.as_slice()),
    );
    let issues = detect_issues(graph, &order);

    log_summary!(
        verbosity,
        "{} tasks, duration {}, {} critical, {} bottlenecks, {} parallel groups, {} issues",
        graph.len(),
        project_duration,
        critical.len(),
        bottlenecks.len(),
        groups.len(),
        issues.len()
    );

    ScheduleAnalysis {
        order,
        timings,
        project_duration,
        critical_path: critical,
        bottlenecks,
        parallel_groups: groups,
        issues,
    }
}
