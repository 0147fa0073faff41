//! Input contract checks run before the graph is built.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::interner::TaskId;
use crate::models::Task;

/// Errors that reject a mapping request outright.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MappingError {
    #[error("Task list is empty")]
    EmptyTaskList,
    #[error("Task at position {index} has an empty code")]
    EmptyTaskCode { index: usize },
    #[error("Duplicate task code: {0}")]
    DuplicateTaskCode(String),
    #[error("Task {code} has negative duration: {duration}")]
    NegativeDuration { code: String, duration: i64 },
    #[error("Total task duration overflows at task {code}")]
    DurationOverflow { code: String },
    #[error("Too many tasks: {count} (at most {max})", max = TaskId::MAX)]
    TooManyTasks { count: usize },
    #[error("Day offset {offset} for task {code} is outside the supported date range")]
    DateOutOfRange { code: String, offset: i64 },
}

/// Check the invariants the engine relies on: non-empty list, unique non-empty
/// codes, non-negative durations whose total fits in an `i64`.
///
/// Structural problems (unknown predecessors, cycles) are not errors here;
/// they are reported as issues by the engine.
pub fn validate_tasks(tasks: &[Task]) -> Result<(), MappingError> {
    if tasks.is_empty() {
        return Err(MappingError::EmptyTaskList);
    }
    check_task_count(tasks.len())?;

    let mut seen: FxHashSet<&str> =
        FxHashSet::with_capacity_and_hasher(tasks.len(), Default::default());
    for (index, task) in tasks.iter().enumerate() {
        if task.code.is_empty() {
            return Err(MappingError::EmptyTaskCode { index });
        }
        if !seen.insert(task.code.as_str()) {
            return Err(MappingError::DuplicateTaskCode(task.code.clone()));
        }
    }

    check_durations(tasks).map(|_| ())
}

/// Every task must be addressable by a `TaskId`.
pub fn check_task_count(count: usize) -> Result<(), MappingError> {
    if count > TaskId::MAX as usize {
        return Err(MappingError::TooManyTasks { count });
    }
    Ok(())
}

/// Reject negative durations and return the sum of all durations.
///
/// No path or group can exceed this sum, so once it fits in an `i64` the
/// passes cannot overflow.
pub fn check_durations(tasks: &[Task]) -> Result<i64, MappingError> {
    let mut total: i64 = 0;
    for task in tasks {
        if task.duration_days < 0 {
            return Err(MappingError::NegativeDuration {
                code: task.code.clone(),
                duration: task.duration_days,
            });
        }
        total = total
            .checked_add(task.duration_days)
            .ok_or_else(|| MappingError::DurationOverflow {
                code: task.code.clone(),
            })?;
    }
    Ok(total)
}
