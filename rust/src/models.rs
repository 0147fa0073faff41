//! Request and result types for dependency mapping.

use chrono::{NaiveDate, NaiveDateTime};
use pyo3::prelude::*;
use std::fmt;

/// Relationship between a predecessor and its successor.
///
/// Only `FinishToStart` is ever produced; the other kinds exist so the result
/// shape can carry them once other semantics are supported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DependencyType {
    #[default]
    FinishToStart,
    StartToStart,
    FinishToFinish,
    StartToFinish,
}

impl DependencyType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FinishToStart => "FS",
            Self::StartToStart => "SS",
            Self::FinishToFinish => "FF",
            Self::StartToFinish => "SF",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of structural defect found in the dependency graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IssueType {
    Circular,
    MissingPredecessor,
    Orphan,
}

impl IssueType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Circular => "circular",
            Self::MissingPredecessor => "missing_predecessor",
            Self::Orphan => "orphan",
        }
    }
}

impl fmt::Display for IssueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of schedulable work as supplied by the caller.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct Task {
    #[pyo3(get, set)]
    pub code: String,
    #[pyo3(get, set)]
    pub name: String,
    #[pyo3(get, set)]
    pub duration_days: i64,
    /// Codes of tasks that must finish before this one starts.
    #[pyo3(get, set)]
    pub predecessors: Vec<String>,
    #[pyo3(get, set)]
    pub category: Option<String>,
    /// Planned dates as supplied; carried into the matrix, never scheduled on.
    #[pyo3(get, set)]
    pub start_date: Option<NaiveDate>,
    #[pyo3(get, set)]
    pub end_date: Option<NaiveDate>,
}

impl Task {
    pub fn new(
        code: impl Into<String>,
        name: impl Into<String>,
        duration_days: i64,
        predecessors: Vec<String>,
    ) -> Self {
        Self {
            code: code.into(),
            name: name.into(),
            duration_days,
            predecessors,
            category: None,
            start_date: None,
            end_date: None,
        }
    }
}

#[pymethods]
impl Task {
    #[new]
    #[pyo3(signature = (
        code,
        name,
        duration_days,
        predecessors=None,
        category=None,
        start_date=None,
        end_date=None
    ))]
    fn py_new(
        code: String,
        name: String,
        duration_days: i64,
        predecessors: Option<Vec<String>>,
        category: Option<String>,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            code,
            name,
            duration_days,
            predecessors: predecessors.unwrap_or_default(),
            category,
            start_date,
            end_date,
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "Task(code={:?}, duration_days={}, predecessors={:?})",
            self.code, self.duration_days, self.predecessors
        )
    }
}

/// A resolved predecessor reference in the dependency matrix.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct PredecessorLink {
    #[pyo3(get)]
    pub task_code: String,
    pub dependency_type: DependencyType,
    #[pyo3(get)]
    pub lag_days: i64,
}

impl PredecessorLink {
    /// Zero-lag finish-to-start link, the only kind the passes compute.
    pub fn finish_to_start(task_code: impl Into<String>) -> Self {
        Self {
            task_code: task_code.into(),
            dependency_type: DependencyType::FinishToStart,
            lag_days: 0,
        }
    }
}

#[pymethods]
impl PredecessorLink {
    #[getter(dependency_type)]
    fn py_dependency_type(&self) -> &'static str {
        self.dependency_type.as_str()
    }

    fn __repr__(&self) -> String {
        format!(
            "PredecessorLink(task_code={:?}, dependency_type={}, lag_days={})",
            self.task_code, self.dependency_type, self.lag_days
        )
    }
}

/// One row of the dependency matrix.
///
/// Date fields are `None` when critical path analysis is disabled or when the
/// task is blocked by a circular dependency.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct DependencyEntry {
    #[pyo3(get)]
    pub task_code: String,
    #[pyo3(get)]
    pub task_name: String,
    #[pyo3(get)]
    pub category: Option<String>,
    #[pyo3(get)]
    pub start_date: Option<NaiveDate>,
    #[pyo3(get)]
    pub end_date: Option<NaiveDate>,
    #[pyo3(get)]
    pub predecessors: Vec<PredecessorLink>,
    #[pyo3(get)]
    pub successors: Vec<String>,
    #[pyo3(get)]
    pub earliest_start: Option<NaiveDate>,
    #[pyo3(get)]
    pub latest_start: Option<NaiveDate>,
    #[pyo3(get)]
    pub earliest_finish: Option<NaiveDate>,
    #[pyo3(get)]
    pub latest_finish: Option<NaiveDate>,
    #[pyo3(get)]
    pub float_days: Option<i64>,
    #[pyo3(get)]
    pub is_critical: bool,
}

#[pymethods]
impl DependencyEntry {
    fn __repr__(&self) -> String {
        format!(
            "DependencyEntry(task_code={:?}, es={:?}, lf={:?}, float_days={:?}, is_critical={})",
            self.task_code,
            self.earliest_start,
            self.latest_finish,
            self.float_days,
            self.is_critical
        )
    }
}

/// A critical task that many other tasks are waiting on.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct Bottleneck {
    #[pyo3(get)]
    pub task_code: String,
    #[pyo3(get)]
    pub successor_count: usize,
    #[pyo3(get)]
    pub reason: String,
}

#[pymethods]
impl Bottleneck {
    fn __repr__(&self) -> String {
        format!(
            "Bottleneck(task_code={:?}, successor_count={})",
            self.task_code, self.successor_count
        )
    }
}

#[pyclass]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CriticalPathSummary {
    /// Critical task codes ordered by earliest start, then code.
    #[pyo3(get)]
    pub tasks: Vec<String>,
    #[pyo3(get)]
    pub total_duration: i64,
    #[pyo3(get)]
    pub bottlenecks: Vec<Bottleneck>,
}

#[pymethods]
impl CriticalPathSummary {
    fn __repr__(&self) -> String {
        format!(
            "CriticalPathSummary(tasks={:?}, total_duration={}, bottlenecks={})",
            self.tasks,
            self.total_duration,
            self.bottlenecks.len()
        )
    }
}

/// Tasks sharing an identical predecessor set, so they can run side by side.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct ParallelOpportunity {
    #[pyo3(get)]
    pub task_group: Vec<String>,
    #[pyo3(get)]
    pub can_start_after: Option<NaiveDate>,
    /// Longest duration in the group minus the group's mean duration.
    #[pyo3(get)]
    pub time_savings_days: f64,
}

#[pymethods]
impl ParallelOpportunity {
    fn __repr__(&self) -> String {
        format!(
            "ParallelOpportunity(task_group={:?}, can_start_after={:?}, time_savings_days={})",
            self.task_group, self.can_start_after, self.time_savings_days
        )
    }
}

#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct Issue {
    pub issue_type: IssueType,
    #[pyo3(get)]
    pub description: String,
    #[pyo3(get)]
    pub affected_tasks: Vec<String>,
    pub severity: Severity,
}

#[pymethods]
impl Issue {
    #[getter(issue_type)]
    fn py_issue_type(&self) -> &'static str {
        self.issue_type.as_str()
    }

    #[getter(severity)]
    fn py_severity(&self) -> &'static str {
        self.severity.as_str()
    }

    fn __repr__(&self) -> String {
        format!(
            "Issue(issue_type={}, severity={}, affected_tasks={:?})",
            self.issue_type, self.severity, self.affected_tasks
        )
    }
}

/// Caller-owned identifiers echoed into the result untouched.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RequestIdentity {
    pub event_id: Option<String>,
    pub mapping_id: Option<String>,
    pub created_at: Option<NaiveDateTime>,
}

/// Complete result of one dependency mapping request.
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct DependencyMapping {
    #[pyo3(get)]
    pub mapping_id: Option<String>,
    #[pyo3(get)]
    pub event_id: Option<String>,
    /// Date that day offset 0 maps to.
    #[pyo3(get)]
    pub reference_date: NaiveDate,
    #[pyo3(get)]
    pub dependency_matrix: Vec<DependencyEntry>,
    #[pyo3(get)]
    pub critical_path: CriticalPathSummary,
    #[pyo3(get)]
    pub parallel_opportunities: Vec<ParallelOpportunity>,
    #[pyo3(get)]
    pub issues_detected: Vec<Issue>,
    #[pyo3(get)]
    pub recommendations: Vec<String>,
    #[pyo3(get)]
    pub created_at: Option<NaiveDateTime>,
}

impl DependencyMapping {
    /// Matrix row for a task code.
    pub fn entry(&self, code: &str) -> Option<&DependencyEntry> {
        self.dependency_matrix.iter().find(|e| e.task_code == code)
    }

    pub fn issues_of(&self, issue_type: IssueType) -> impl Iterator<Item = &Issue> {
        self.issues_detected
            .iter()
            .filter(move |i| i.issue_type == issue_type)
    }
}

#[pymethods]
impl DependencyMapping {
    fn __repr__(&self) -> String {
        format!(
            "DependencyMapping(tasks={}, total_duration={}, critical={}, issues={})",
            self.dependency_matrix.len(),
            self.critical_path.total_duration,
            self.critical_path.tasks.len(),
            self.issues_detected.len()
        )
    }
}
