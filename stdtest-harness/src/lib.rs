//! Black-box test harness for programs that read stdin and write stdout.
//!
//! A [`TestSuite`] is a list of named cases, each pairing an input with
//! fragments expected in the program's output. The [`TestRunner`] starts the
//! target once per case, feeds it the input, captures its combined stdout and
//! stderr, and checks the fragments are present:
//!
//! - **Unordered** (default): each fragment must appear anywhere in the output.
//! - **Ordered**: fragments must appear in list order, each at or after the
//!   end of the previous match.
//!
//! Runs are fail-fast: the first case that can't be run or doesn't match
//! aborts the run with an [`Error`] naming it.

mod config;
mod error;
mod execution;
mod matching;
pub mod reporting;
mod runner;
mod testcase;

pub use config::{CaseFilter, RunnerConfig};
pub use error::{CaseFailure, ConfigLoadError, Error, FragmentNotFound, ProcessError};
pub use execution::{ProcessRunner, RunResult, TargetProgram};
pub use matching::{match_ordered, match_output, match_unordered};
pub use runner::{CaseOutcome, RunSummary, TestCaseResult, TestRunner};
pub use testcase::{ConfigFormat, TestCase, TestSuite};
