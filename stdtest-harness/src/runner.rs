//! Test runner implementation.

use crate::config::RunnerConfig;
use crate::error::{CaseFailure, Error};
use crate::execution::ProcessRunner;
use crate::matching::match_output;
use crate::testcase::{TestCase, TestSuite};
use std::time::Duration;
use tracing::Instrument;

/// Outcome of a single test case that did not abort the run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CaseOutcome {
    /// The case ran and all its fragments matched.
    Passed {
        /// How long the target took to run.
        duration: Duration,
    },
    /// The case was skipped or filtered out.
    Skipped,
}

/// Result of a single test case that did not abort the run.
#[derive(Clone, Debug)]
pub struct TestCaseResult {
    /// Name of the test case.
    pub name: String,
    /// What happened.
    pub outcome: CaseOutcome,
}

/// Results of a suite that ran to completion.
#[derive(Clone, Debug, Default)]
pub struct RunSummary {
    /// Per-case results, in declaration order.
    pub results: Vec<TestCaseResult>,
    /// Total duration of the run.
    pub duration: Duration,
}

impl RunSummary {
    /// Number of cases that ran and passed.
    pub fn passed_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| matches!(r.outcome, CaseOutcome::Passed { .. }))
            .count()
    }

    /// Number of cases that were not run.
    pub fn skipped_count(&self) -> usize {
        self.results
            .iter()
            .filter(|r| r.outcome == CaseOutcome::Skipped)
            .count()
    }
}

/// The main test runner.
///
/// Cases run one at a time in declaration order; the first failing case
/// aborts the run.
pub struct TestRunner {
    config: RunnerConfig,
    process: ProcessRunner,
}

impl TestRunner {
    /// Creates a new test runner with the given configuration.
    pub fn new(config: RunnerConfig) -> Self {
        let process = ProcessRunner::new(config.target.clone());
        Self { config, process }
    }

    /// Returns the runner's configuration.
    pub const fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Returns the cases in `suite` that would run, without running them.
    pub fn selected_cases<'a>(&self, suite: &'a TestSuite) -> Vec<&'a TestCase> {
        suite.iter().filter(|c| !self.should_skip_test(c)).collect()
    }

    /// Runs every selected case in `suite`, stopping at the first failure.
    pub async fn run(&self, suite: &TestSuite) -> Result<RunSummary, Error> {
        let start_time = std::time::Instant::now();
        let mut results = Vec::with_capacity(suite.len());

        tracing::debug!(target: "runner", "running {} test case(s)", suite.len());

        for (index, test_case) in suite.iter().enumerate() {
            if self.should_skip_test(test_case) {
                tracing::debug!(target: "runner", "[{}] skipped", test_case.name);
                results.push(TestCaseResult {
                    name: test_case.name.clone(),
                    outcome: CaseOutcome::Skipped,
                });
                continue;
            }

            let span =
                tracing::debug_span!(target: "runner", "case", index, name = %test_case.name);

            match self.run_single_test(test_case).instrument(span).await {
                Ok(duration) => {
                    tracing::debug!(target: "runner", "[{}] ok ({duration:?})", test_case.name);
                    results.push(TestCaseResult {
                        name: test_case.name.clone(),
                        outcome: CaseOutcome::Passed { duration },
                    });
                }
                Err(failure) => {
                    tracing::debug!(target: "runner", "[{}] failed: {failure}", test_case.name);
                    return Err(Error::CaseFailed {
                        name: test_case.name.clone(),
                        index,
                        failure,
                    });
                }
            }
        }

        Ok(RunSummary {
            results,
            duration: start_time.elapsed(),
        })
    }

    async fn run_single_test(&self, test_case: &TestCase) -> Result<Duration, CaseFailure> {
        let timeout = test_case
            .timeout_in_seconds
            .map(Duration::from_secs)
            .or(self.config.default_timeout);

        let result = self
            .process
            .run(&test_case.input, &test_case.args, timeout)
            .await?;

        match_output(
            &result.output,
            &test_case.expected_fragments,
            test_case.ordered,
        )?;

        Ok(result.duration)
    }

    fn should_skip_test(&self, test_case: &TestCase) -> bool {
        test_case.skip || !self.config.filter.should_run(&test_case.name)
    }
}
