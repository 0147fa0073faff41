//! Dependency graph built from the caller's flat task list.

use crate::interner::{TaskCodeInterner, TaskId};
use crate::models::Task;
use crate::validation::{check_durations, check_task_count, MappingError};

/// Task lookup plus resolved predecessor/successor adjacency.
///
/// Ids follow presentation order, so `task(id)` is `tasks[id]`. Predecessor
/// codes that name no supplied task are kept aside in `missing_predecessors`
/// and never enter the adjacency.
#[derive(Debug, Clone)]
pub struct TaskGraph<'a> {
    tasks: &'a [Task],
    index: TaskCodeInterner,
    predecessors: Vec<Vec<TaskId>>,
    successors: Vec<Vec<TaskId>>,
    missing: Vec<Vec<&'a str>>,
}

impl<'a> TaskGraph<'a> {
    /// Build the graph. Fails on duplicate task codes, on more tasks than
    /// `TaskId` can address, and on durations the passes cannot add up.
    pub fn build(tasks: &'a [Task]) -> Result<Self, MappingError> {
        let n = tasks.len();
        check_task_count(n)?;
        check_durations(tasks)?;
        let mut index = TaskCodeInterner::with_capacity(n);
        for task in tasks {
            if index.insert_new(&task.code).is_err() {
                return Err(MappingError::DuplicateTaskCode(task.code.clone()));
            }
        }

        let mut predecessors: Vec<Vec<TaskId>> = vec![Vec::new(); n];
        let mut successors: Vec<Vec<TaskId>> = vec![Vec::new(); n];
        let mut missing: Vec<Vec<&'a str>> = vec![Vec::new(); n];

        // Walking tasks in order keeps every successor list in presentation order
        for (idx, task) in tasks.iter().enumerate() {
            let id = idx as TaskId;
            for pred_code in &task.predecessors {
                match index.get(pred_code) {
                    Some(pred_id) => {
                        if !predecessors[idx].contains(&pred_id) {
                            predecessors[idx].push(pred_id);
                            successors[pred_id as usize].push(id);
                        }
                    }
                    None => {
                        if !missing[idx].contains(&pred_code.as_str()) {
                            missing[idx].push(pred_code.as_str());
                        }
                    }
                }
            }
        }

        Ok(Self {
            tasks,
            index,
            predecessors,
            successors,
            missing,
        })
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All task ids in presentation order.
    pub fn ids(&self) -> impl Iterator<Item = TaskId> + '_ {
        debug_assert!(self.tasks.len() <= TaskId::MAX as usize);
        (0..self.tasks.len()).map(|i| i as TaskId)
    }

    #[inline]
    pub fn id_of(&self, code: &str) -> Option<TaskId> {
        self.index.get(code)
    }

    #[inline]
    pub fn task(&self, id: TaskId) -> &'a Task {
        &self.tasks[id as usize]
    }

    #[inline]
    pub fn code(&self, id: TaskId) -> &str {
        self.index.code(id)
    }

    #[inline]
    pub fn duration(&self, id: TaskId) -> i64 {
        self.tasks[id as usize].duration_days
    }

    /// Resolved, deduplicated predecessors in declaration order.
    #[inline]
    pub fn predecessors(&self, id: TaskId) -> &[TaskId] {
        &self.predecessors[id as usize]
    }

    /// Tasks that list `id` as a predecessor, in presentation order.
    #[inline]
    pub fn successors(&self, id: TaskId) -> &[TaskId] {
        &self.successors[id as usize]
    }

    /// Declared predecessor codes that match no supplied task.
    #[inline]
    pub fn missing_predecessors(&self, id: TaskId) -> &[&'a str] {
        &self.missing[id as usize]
    }

    pub fn successor_codes(&self, id: TaskId) -> Vec<String> {
        self.successors(id)
            .iter()
            .map(|&s| self.code(s).to_string())
            .collect()
    }
}
