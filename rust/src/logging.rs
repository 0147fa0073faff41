//! Verbosity-gated logging for the dependency mapper.
//!
//! Nothing is formatted when verbosity is 0. Levels:
//! - 0: SILENT
//! - 1: SUMMARY (one line per request: task count, duration, issue count)
//! - 2: PASSES (topological order, per-pass results, detected defects)
//! - 3: TRACE (per-task timing as it is computed)

pub const VERBOSITY_SILENT: u8 = 0;
pub const VERBOSITY_SUMMARY: u8 = 1;
pub const VERBOSITY_PASSES: u8 = 2;
pub const VERBOSITY_TRACE: u8 = 3;

/// Log at SUMMARY level (verbosity >= 1).
#[macro_export]
macro_rules! log_summary {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_SUMMARY {
            eprintln!("[depmap] {}", format_args!($($arg)*));
        }
    };
}

/// Log at PASSES level (verbosity >= 2).
#[macro_export]
macro_rules! log_pass {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_PASSES {
            eprintln!("[depmap:pass] {}", format_args!($($arg)*));
        }
    };
}

/// Log at TRACE level (verbosity >= 3).
///
/// Emitted inside per-task loops, so keep the arguments cheap.
#[macro_export]
macro_rules! log_trace {
    ($verbosity:expr, $($arg:tt)*) => {
        if $verbosity >= $crate::logging::VERBOSITY_TRACE {
            eprintln!("[depmap:trace] {}", format_args!($($arg)*));
        }
    };
}
