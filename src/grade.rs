//! Grading submissions against expected run output.
//!
//! A submission is a chain of definitions. Each problem injects a call such
//! as `sum 10` into the end of the chain, runs it with the standard prelude
//! and compares the run's text with what the problem expects.

use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use lazylam_core::api::{self, RunOptions};
use lazylam_core::prelude::Prelude;

/// Source name submissions are compiled under.
pub const SUBMIT_SOURCE: &str = "<SUBMIT>";

/// What a run's text has to look like to count as correct.
#[derive(Clone)]
pub enum Expected {
    Exact(String),
    Pattern {
        description: String,
        predicate: Arc<dyn Fn(&str) -> bool + Send + Sync>,
    },
}

impl Expected {
    pub fn exact(output: impl Into<String>) -> Self {
        Expected::Exact(output.into())
    }

    /// Accepts any output `predicate` returns true for. `description` is
    /// what reports show in place of an exact output.
    pub fn pattern(
        description: impl Into<String>,
        predicate: impl Fn(&str) -> bool + Send + Sync + 'static,
    ) -> Self {
        Expected::Pattern {
            description: description.into(),
            predicate: Arc::new(predicate),
        }
    }

    pub fn matches(&self, output: &str) -> bool {
        match self {
            Expected::Exact(expected) => expected == output,
            Expected::Pattern { predicate, .. } => predicate(output),
        }
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Exact(expected) => f.write_str(expected),
            Expected::Pattern { description, .. } => write!(f, "/{}/", description),
        }
    }
}

impl fmt::Debug for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expected::Exact(expected) => f.debug_tuple("Exact").field(expected).finish(),
            Expected::Pattern { description, .. } => {
                f.debug_tuple("Pattern").field(description).finish()
            }
        }
    }
}

/// The result of grading one problem.
#[derive(Debug, Clone)]
pub struct GradeResult {
    pub passed: bool,
    /// The fragment that was injected.
    pub injected: String,
    pub expected: String,
    /// The submission's run text.
    pub output: String,
    pub elapsed: Duration,
}

/// Run `src` with `inject_body` spliced into its definition chain and
/// compare the run's text with `expected`.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use lazylam::grade::{Expected, grade};
///
/// let src = "\\sum := Y (\\f.\\n. if (n == 0) 0 (n + f (n - 1))) ; sum";
/// let result = grade(src, "sum 10", &Expected::exact("=> 55"), Duration::from_secs(5));
/// assert!(result.passed);
/// ```
pub fn grade(src: &str, inject_body: &str, expected: &Expected, time_limit: Duration) -> GradeResult {
    let options = RunOptions::default()
        .with_prelude(Prelude::Standard)
        .with_time_limit(time_limit)
        .with_inject_body(inject_body);

    let started = Instant::now();
    let output = api::run(SUBMIT_SOURCE, src, &options);
    let elapsed = started.elapsed();

    let passed = expected.matches(&output);
    tracing::debug!(inject = inject_body, passed, ?elapsed, "Graded submission");

    GradeResult {
        passed,
        injected: inject_body.to_string(),
        expected: expected.to_string(),
        output,
        elapsed,
    }
}

/// One test case of a problem set.
#[derive(Debug, Clone)]
pub struct Problem {
    pub inject_body: String,
    pub expected: Expected,
    pub time_limit: Duration,
}

impl Problem {
    pub fn new(inject_body: impl Into<String>, expected: Expected, time_limit: Duration) -> Self {
        Self {
            inject_body: inject_body.into(),
            expected,
            time_limit,
        }
    }
}

/// Results of grading a submission against a whole problem set.
#[derive(Debug, Clone)]
pub struct GradeReport {
    pub results: Vec<GradeResult>,
    pub elapsed: Duration,
}

impl GradeReport {
    /// Number of problems passed.
    pub fn score(&self) -> usize {
        self.results.iter().filter(|result| result.passed).count()
    }
}

impl fmt::Display for GradeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, result) in self.results.iter().enumerate() {
            let verdict = if result.passed { "Correct" } else { "Wrong" };
            writeln!(f, "{}. {}", i + 1, verdict)?;
            writeln!(f, " - Input: {}", result.injected)?;
            writeln!(f, " - Your: {}", result.output)?;
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Grade `src` against every problem in order.
pub fn grade_all(src: &str, problems: &[Problem]) -> GradeReport {
    let started = Instant::now();
    let results: Vec<_> = problems
        .iter()
        .map(|problem| grade(src, &problem.inject_body, &problem.expected, problem.time_limit))
        .collect();
    let report = GradeReport {
        results,
        elapsed: started.elapsed(),
    };
    tracing::debug!(
        score = report.score(),
        total = problems.len(),
        elapsed = ?report.elapsed,
        "Graded problem set"
    );
    report
}
