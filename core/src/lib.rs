//! The lazylam engine: a lazily evaluated, untyped lambda calculus with
//! integers, strings and a small set of builtins.
//!
//! Most users want [`api::run`], which takes program text and returns the
//! text of the run. The stages behind it are public as well:
//! [`parser`] → [`injector`] → [`binder`] → [`compiler`] → [`evaluator`].

pub mod api;
pub mod binder;
pub mod builtins;
pub mod compiler;
pub mod diagnostics;
pub mod evaluator;
pub mod injector;
pub mod parser;
pub mod prelude;

/// Test utilities for enabling logging in tests
#[cfg(test)]
pub mod test_utils {
    /// Initialize tracing subscriber for tests with DEBUG level
    /// Call this at the start of tests where you want to see logging output
    ///
    /// # Example
    /// ```ignore
    /// #[test]
    /// fn test_deep_recursion() {
    ///     test_utils::init_test_logging();
    ///     // ... your test code
    /// }
    /// ```
    pub fn init_test_logging() {
        use tracing_subscriber::{fmt, EnvFilter};

        // Try to initialize, ignore error if already initialized
        let _ = fmt()
            .with_env_filter(
                EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug")),
            )
            .with_test_writer()
            .try_init();
    }
}
