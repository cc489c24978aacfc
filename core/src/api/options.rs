//! Configuration options for a run.

use std::time::Duration;

use crate::parser::DEFAULT_MAX_DEPTH;
use crate::prelude::Prelude;

/// Configuration options for compilation.
///
/// # Example
///
/// ```
/// use lazylam_core::api::CompilationOptions;
///
/// let options = CompilationOptions { max_depth: 200 };
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilationOptions {
    /// Maximum nesting depth of parenthesized expressions and lambda
    /// bodies accepted by the parser.
    ///
    /// Default: 1000
    pub max_depth: usize,
}

impl Default for CompilationOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Configuration options for evaluation.
///
/// These bound how long and how deep a single run may go. Untrusted code
/// should always run with both limits in place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Wall-clock budget, checked on every evaluation step.
    ///
    /// Default: 600 seconds
    pub time_limit: Duration,

    /// Maximum number of pending continuation frames (if Some).
    ///
    /// A frame is about a hundred bytes, and most frames keep a suspended
    /// argument and an environment node alive with them. A run that reaches
    /// the default cap can therefore hold several gigabytes; hosts running
    /// many programs side by side should set a lower cap.
    ///
    /// Set to `None` to let the continuation stack grow until memory runs
    /// out.
    ///
    /// Default: 10 000 000
    pub max_frames: Option<usize>,
}

pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(600);
pub const DEFAULT_MAX_FRAMES: usize = 10_000_000;

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self {
            time_limit: DEFAULT_TIME_LIMIT,
            max_frames: Some(DEFAULT_MAX_FRAMES),
        }
    }
}

/// Everything [`crate::api::run`] needs besides the program text.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use lazylam_core::api::RunOptions;
/// use lazylam_core::prelude::Prelude;
///
/// let options = RunOptions::default()
///     .with_prelude(Prelude::Standard)
///     .with_time_limit(Duration::from_secs(1))
///     .with_inject_body("sum 10");
/// assert_eq!(options.inject_body.as_deref(), Some("sum 10"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunOptions {
    /// Definitions wrapped around the program.
    pub predefined: Prelude,

    /// Expression spliced into the innermost body of the program's
    /// definition chain before it is checked.
    pub inject_body: Option<String>,

    pub compilation: CompilationOptions,

    pub execution: ExecutionOptions,
}

impl RunOptions {
    pub fn with_prelude(mut self, predefined: Prelude) -> Self {
        self.predefined = predefined;
        self
    }

    pub fn with_inject_body(mut self, body: impl Into<String>) -> Self {
        self.inject_body = Some(body.into());
        self
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.execution.time_limit = time_limit;
        self
    }

    pub fn with_max_frames(mut self, max_frames: Option<usize>) -> Self {
        self.execution.max_frames = max_frames;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.compilation.max_depth = max_depth;
        self
    }
}
