//! Task code interning.
//!
//! Maps task codes to dense integer ids so every per-task value in the graph
//! and the passes can live in a `Vec` indexed by id.

use rustc_hash::FxHashMap;

/// Interned task code (index into the graph's per-task vectors).
pub type TaskId = u32;

/// Bidirectional task code <-> id mapping. Ids are assigned in insertion order.
#[derive(Debug, Clone, Default)]
pub struct TaskCodeInterner {
    to_id: FxHashMap<String, TaskId>,
    codes: Vec<String>,
}

impl TaskCodeInterner {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            to_id: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            codes: Vec::with_capacity(capacity),
        }
    }

    /// Intern a code that must not have been seen before.
    ///
    /// Returns `Err(existing_id)` if the code is already interned.
    pub fn insert_new(&mut self, code: &str) -> Result<TaskId, TaskId> {
        if let Some(&id) = self.to_id.get(code) {
            return Err(id);
        }
        debug_assert!(self.codes.len() <= TaskId::MAX as usize);
        let id = self.codes.len() as TaskId;
        self.codes.push(code.to_string());
        self.to_id.insert(code.to_string(), id);
        Ok(id)
    }

    #[inline]
    pub fn get(&self, code: &str) -> Option<TaskId> {
        self.to_id.get(code).copied()
    }

    /// Code for an id. Panics on ids this interner did not hand out.
    #[inline]
    pub fn code(&self, id: TaskId) -> &str {
        &self.codes[id as usize]
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }
}
