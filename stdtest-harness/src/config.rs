//! Configuration types for the test runner.

use crate::execution::TargetProgram;
use std::time::Duration;

/// Selects which test cases run, by name.
#[derive(Clone, Debug, Default)]
pub struct CaseFilter {
    /// Patterns for tests to be included; when empty, all tests are included.
    pub include: Vec<String>,
    /// Patterns for tests to be excluded.
    pub exclude: Vec<String>,
    /// Whether patterns must match a name exactly rather than as a substring.
    pub exact: bool,
}

impl CaseFilter {
    /// Returns whether a test with the given name should run.
    pub fn should_run(&self, name: &str) -> bool {
        if self.include.is_empty() && self.exclude.is_empty() {
            return true;
        }

        // If any include filters were given, then we are in opt-in mode.
        if !self.include.is_empty() && !self.matches_any(name, &self.include) {
            return false;
        }

        // In all cases, exclude filters may be used to exclude tests.
        !self.matches_any(name, &self.exclude)
    }

    fn matches_any(&self, name: &str, patterns: &[String]) -> bool {
        if self.exact {
            patterns.iter().any(|p| p == name)
        } else {
            patterns.iter().any(|p| name.contains(p.as_str()))
        }
    }
}

/// Configuration for the test runner.
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// How to launch the program under test.
    pub target: TargetProgram,
    /// Timeout applied to cases that don't declare their own.
    pub default_timeout: Option<Duration>,
    /// Which cases to run.
    pub filter: CaseFilter,
}

impl RunnerConfig {
    /// Creates a new runner config with default values: no timeout, no filters.
    pub fn new(target: TargetProgram) -> Self {
        Self {
            target,
            default_timeout: None,
            filter: CaseFilter::default(),
        }
    }

    /// Sets the timeout used for cases without their own.
    #[must_use]
    pub const fn with_default_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Sets the name filter.
    #[must_use]
    pub fn with_filter(mut self, filter: CaseFilter) -> Self {
        self.filter = filter;
        self
    }
}
