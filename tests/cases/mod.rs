//! Shared helpers for the end-to-end tests.
//!
//! `test_case!` runs a program through [`lazylam::run`] and compares the
//! whole run text.
#![allow(dead_code)]

use std::time::Duration;

use lazylam::{Prelude, RunOptions};

/// Limit used by every case that is expected to finish.
pub const TIME_LIMIT: Duration = Duration::from_secs(10);

pub fn options() -> RunOptions {
    RunOptions::default()
        .with_prelude(Prelude::Standard)
        .with_time_limit(TIME_LIMIT)
}

pub fn run(input: &str) -> String {
    lazylam::run("<TEST>", input, &options())
}

pub fn run_bare(input: &str) -> String {
    lazylam::run("<TEST>", input, &RunOptions::default().with_time_limit(TIME_LIMIT))
}

pub fn run_injected(input: &str, inject: &str) -> String {
    lazylam::run("<TEST>", input, &options().with_inject_body(inject))
}

macro_rules! test_case {
    ($name:ident, input: $input:expr, output: $output:expr $(,)?) => {
        #[test]
        fn $name() {
            pretty_assertions::assert_eq!(cases::run($input), $output);
        }
    };
    ($name:ident, input: $input:expr, inject: $inject:expr, output: $output:expr $(,)?) => {
        #[test]
        fn $name() {
            pretty_assertions::assert_eq!(cases::run_injected($input, $inject), $output);
        }
    };
    ($name:ident, bare: $input:expr, output: $output:expr $(,)?) => {
        #[test]
        fn $name() {
            pretty_assertions::assert_eq!(cases::run_bare($input), $output);
        }
    };
}
