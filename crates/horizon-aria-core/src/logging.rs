//! Logging facilities for Horizon Aria.
//!
//! Horizon Aria uses the `tracing` crate for instrumentation. To see logs,
//! install a tracing subscriber in your application:
//!
//! ```ignore
//! fn main() {
//!     tracing_subscriber::fmt()
//!         .with_env_filter("horizon_aria=trace,horizon_aria_core=debug")
//!         .init();
//! }
//! ```
//!
//! Contract violations that the value core reports as errors (mismatched
//! argument kinds, unknown tokens, references to destroyed objects) are also
//! logged at `error` level under [`targets::COLLECT`] or [`targets::VALUE`].

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Core framework target.
    pub const CORE: &str = "horizon_aria_core";
    /// Object model target.
    pub const OBJECT: &str = "horizon_aria_core::object";
    /// Accessible value lifecycle target.
    pub const VALUE: &str = "horizon_aria::value";
    /// Attribute decoding target.
    pub const COLLECT: &str = "horizon_aria::collect";
    /// Attribute set target.
    pub const ATTRIBUTES: &str = "horizon_aria::attributes";
}

/// Macros for common tracing patterns.
///
/// These are thin wrappers around the `tracing` crate macros with consistent
/// target naming.
#[macro_export]
macro_rules! aria_trace {
    ($($arg:tt)*) => {
        tracing::trace!(target: "horizon_aria_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! aria_debug {
    ($($arg:tt)*) => {
        tracing::debug!(target: "horizon_aria_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! aria_warn {
    ($($arg:tt)*) => {
        tracing::warn!(target: "horizon_aria_core", $($arg)*)
    };
}

#[macro_export]
macro_rules! aria_error {
    ($($arg:tt)*) => {
        tracing::error!(target: "horizon_aria_core", $($arg)*)
    };
}

#[cfg(test)]
mod tests {
    use super::targets;

    #[test]
    fn test_targets_are_namespaced() {
        for target in [targets::OBJECT, targets::VALUE, targets::COLLECT, targets::ATTRIBUTES] {
            assert!(target.starts_with("horizon_aria"));
            assert!(target.contains("::"));
        }
        assert_eq!(targets::CORE, "horizon_aria_core");
    }

    #[test]
    fn test_macros_expand() {
        aria_trace!(value = 1, "trace");
        aria_debug!("debug");
        aria_warn!("warn");
        aria_error!(reason = "test", "error");
    }
}
