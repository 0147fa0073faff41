//! Types produced by the CPM engine.

use crate::interner::TaskId;
use crate::models::{Bottleneck, Issue};

use super::topology::TopologicalOrder;

/// Per-task CPM timing, in whole days from the project start.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TaskTiming {
    /// Earliest possible start time (forward pass).
    pub earliest_start: i64,
    /// Earliest possible finish time (forward pass).
    pub earliest_finish: i64,
    /// Latest allowable start time (backward pass).
    pub latest_start: i64,
    /// Latest allowable finish time (backward pass).
    pub latest_finish: i64,
    /// latest_start - earliest_start.
    pub float: i64,
}

impl TaskTiming {
    pub fn is_critical(&self) -> bool {
        self.float == 0
    }
}

/// Tasks with an identical predecessor set.
#[derive(Clone, Debug, PartialEq)]
pub struct ParallelGroup {
    /// Members in presentation order.
    pub members: Vec<TaskId>,
    /// Day the whole group can start, `None` if unknown.
    pub start_offset: Option<i64>,
    pub time_savings_days: f64,
}

/// Everything the engine derives from one task graph.
#[derive(Clone, Debug)]
pub struct ScheduleAnalysis {
    pub order: TopologicalOrder,
    /// Indexed by task id. `None` for blocked tasks, or for every task when
    /// analysis was disabled.
    pub timings: Vec<Option<TaskTiming>>,
    pub project_duration: i64,
    /// Critical task ids ordered by (earliest start, code).
    pub critical_path: Vec<TaskId>,
    pub bottlenecks: Vec<Bottleneck>,
    pub parallel_groups: Vec<ParallelGroup>,
    pub issues: Vec<Issue>,
}

impl ScheduleAnalysis {
    #[inline]
    pub fn timing(&self, id: TaskId) -> Option<&TaskTiming> {
        self.timings[id as usize].as_ref()
    }
}
