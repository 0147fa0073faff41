//! Task dependency mapping with the Critical Path Method.
//!
//! Builds a dependency graph from a flat task list, runs the CPM forward and
//! backward passes, and reports float, the critical path, bottlenecks,
//! parallel execution opportunities and structural issues (orphans, missing
//! predecessors, cycles).

// Allow clippy warning triggered by PyO3 macro expansion
#![allow(clippy::useless_conversion)]

use chrono::{NaiveDate, NaiveDateTime, Utc};
use pyo3::prelude::*;

mod config;
pub mod cpm;
pub mod graph;
mod interner;
pub mod logging;
mod mapping;
mod models;
mod validation;

pub use config::{MappingConfig, DEFAULT_BOTTLENECK_THRESHOLD};
pub use graph::TaskGraph;
pub use interner::{TaskCodeInterner, TaskId};
pub use mapping::{map_dependencies, map_dependencies_with_identity};
pub use models::{
    Bottleneck, CriticalPathSummary, DependencyEntry, DependencyMapping, DependencyType, Issue,
    IssueType, ParallelOpportunity, PredecessorLink, RequestIdentity, Severity, Task,
};
pub use validation::{validate_tasks, MappingError};

/// Map task dependencies and compute the critical path.
///
/// # Arguments
/// * `tasks` - Tasks in presentation order
/// * `reference_date` - Date that day 0 of the schedule maps to
/// * `config` - Mapping options (defaults when omitted)
/// * `event_id` - Echoed into the result
/// * `mapping_id` - Echoed into the result
/// * `created_at` - Echoed into the result; the current UTC time when omitted
///
/// # Returns
/// * DependencyMapping with the dependency matrix, critical path, parallel
///   opportunities, detected issues and recommendations
///
/// # Raises
/// * ValueError for an empty task list, duplicate or empty codes, negative
///   or overflowing durations
#[pyfunction]
#[pyo3(
    name = "map_dependencies",
    signature = (
        tasks,
        reference_date,
        config=None,
        event_id=None,
        mapping_id=None,
        created_at=None
    )
)]
fn py_map_dependencies(
    tasks: Vec<Task>,
    reference_date: NaiveDate,
    config: Option<MappingConfig>,
    event_id: Option<String>,
    mapping_id: Option<String>,
    created_at: Option<NaiveDateTime>,
) -> PyResult<DependencyMapping> {
    let config = config.unwrap_or_default();
    let identity = RequestIdentity {
        event_id,
        mapping_id,
        created_at: Some(created_at.unwrap_or_else(|| Utc::now().naive_utc())),
    };
    map_dependencies_with_identity(&tasks, reference_date, identity, &config)
        .map_err(|e| pyo3::exceptions::PyValueError::new_err(e.to_string()))
}

/// The depmap.rust Python module.
#[pymodule]
fn rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Request types
    m.add_class::<Task>()?;
    m.add_class::<MappingConfig>()?;

    // Result types
    m.add_class::<PredecessorLink>()?;
    m.add_class::<DependencyEntry>()?;
    m.add_class::<Bottleneck>()?;
    m.add_class::<CriticalPathSummary>()?;
    m.add_class::<ParallelOpportunity>()?;
    m.add_class::<Issue>()?;
    m.add_class::<DependencyMapping>()?;

    m.add_function(wrap_pyfunction!(py_map_dependencies, m)?)?;

    Ok(())
}
