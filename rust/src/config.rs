//! Configuration for dependency mapping.

use pyo3::prelude::*;

/// Successor count a critical task must exceed to be reported as a bottleneck.
pub const DEFAULT_BOTTLENECK_THRESHOLD: usize = 2;

/// Per-request options for [`crate::map_dependencies`].
#[pyclass]
#[derive(Clone, Debug, PartialEq)]
pub struct MappingConfig {
    /// Run the forward/backward passes. When false only the dependency
    /// matrix, parallel groups and issues are produced.
    #[pyo3(get, set)]
    pub analyze_critical_path: bool,
    /// Critical tasks with strictly more successors than this are bottlenecks.
    #[pyo3(get, set)]
    pub bottleneck_threshold: usize,
    /// Verbosity level: 0=silent, 1=summary, 2=passes, 3=trace.
    #[pyo3(get, set)]
    pub verbosity: u8,
}

impl Default for MappingConfig {
    fn default() -> Self {
        Self {
            analyze_critical_path: true,
            bottleneck_threshold: DEFAULT_BOTTLENECK_THRESHOLD,
            verbosity: 0,
        }
    }
}

#[pymethods]
impl MappingConfig {
    #[new]
    #[pyo3(signature = (analyze_critical_path=None, bottleneck_threshold=None, verbosity=None))]
    fn new(
        analyze_critical_path: Option<bool>,
        bottleneck_threshold: Option<usize>,
        verbosity: Option<u8>,
    ) -> Self {
        let defaults = Self::default();
        Self {
            analyze_critical_path: analyze_critical_path
                .unwrap_or(defaults.analyze_critical_path),
            bottleneck_threshold: bottleneck_threshold.unwrap_or(defaults.bottleneck_threshold),
            verbosity: verbosity.unwrap_or(defaults.verbosity),
        }
    }

    fn __repr__(&self) -> String {
        format!(
            "MappingConfig(analyze_critical_path={}, bottleneck_threshold={}, verbosity={})",
            self.analyze_critical_path, self.bottleneck_threshold, self.verbosity
        )
    }
}
