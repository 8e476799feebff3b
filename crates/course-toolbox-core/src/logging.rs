//! Logging facilities for the course toolbox.
//!
//! The toolbox uses the `tracing` crate for instrumentation. To see logs,
//! install a subscriber in the host application:
//!
//! ```ignore
//! tracing_subscriber::fmt()
//!     .with_env_filter("course_toolbox=debug")
//!     .init();
//! ```

/// Span names used throughout the toolbox for tracing.
pub mod span_names {
    /// Action dispatch span.
    pub const DISPATCH: &str = "course_toolbox::dispatch";
}

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Signal/slot system target.
    pub const SIGNAL: &str = "course_toolbox_core::signal";
    /// Runtime and deferred task target.
    pub const RUNTIME: &str = "course_toolbox_core::runtime";
}

/// A guard that keeps a tracing span entered until dropped.
///
/// This is useful for tracking the duration of operations.
#[derive(Debug)]
pub struct PerfSpan {
    #[allow(dead_code)]
    span: tracing::span::EnteredSpan,
}

impl PerfSpan {
    /// Create a new performance span.
    ///
    /// The span will be active until the guard is dropped.
    pub fn new(name: &'static str) -> Self {
        let span = tracing::info_span!(target: "course_toolbox::perf", "perf", operation = name);
        Self {
            span: span.entered(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_perf_span() {
        // Just ensure it enters and drops without a subscriber installed.
        let _span = PerfSpan::new("test_operation");
    }
}
