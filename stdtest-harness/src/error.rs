//! Error types for the test harness.

use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;

/// Failure to load a test suite from its configuration source.
#[derive(thiserror::Error, Debug)]
pub enum ConfigLoadError {
    /// The configuration file could not be opened or read.
    #[error("failed to read test config {}: {source}", .path.display())]
    Read {
        /// Path to the configuration file.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration was not valid JSON for a test suite.
    #[error("failed to parse test config as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration was not valid YAML for a test suite.
    #[error("failed to parse test config as YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

/// Failure to execute the target program for a single test case.
#[derive(thiserror::Error, Debug)]
pub enum ProcessError {
    /// The target program could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        /// Program that was being started.
        program: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Writing the test input to the target's stdin failed.
    #[error("failed to write input to target: {0}")]
    WriteInput(#[source] std::io::Error),

    /// Reading the target's combined output failed.
    #[error("failed to capture target output: {0}")]
    CaptureOutput(#[source] std::io::Error),

    /// Waiting on the target failed.
    #[error("failed to wait for target: {0}")]
    Wait(#[source] std::io::Error),

    /// A helper task driving the target panicked or was cancelled.
    #[error("target i/o task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// The target ran to completion but reported failure.
    #[error("target exited unsuccessfully ({status})")]
    ExitStatus {
        /// Exit status reported by the target.
        status: ExitStatus,
        /// Combined output captured before the target exited; diagnostics only.
        output: String,
    },

    /// The target did not exit within the allotted time and was killed.
    #[error("target timed out after {0:?}")]
    Timeout(Duration),
}

/// An expected fragment was absent from a target's output.
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
#[error("{fragment:?} not found in output {output:?}")]
pub struct FragmentNotFound {
    /// The fragment that could not be matched.
    pub fragment: String,
    /// Full output the fragment was searched in.
    pub output: String,
    /// Whether the search was constrained to fragment order.
    pub ordered: bool,
}

/// Why a single test case failed.
#[derive(thiserror::Error, Debug)]
pub enum CaseFailure {
    /// The target could not be run to a successful exit.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// The target's output did not satisfy the case's expectations.
    #[error(transparent)]
    Match(#[from] FragmentNotFound),
}

/// Monolithic error type for a harness run.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The test suite could not be loaded; no case was executed.
    #[error(transparent)]
    ConfigLoad(#[from] ConfigLoadError),

    /// A test case failed, aborting the run.
    #[error("test case '{name}' failed: {failure}")]
    CaseFailed {
        /// Name of the failing test case.
        name: String,
        /// Zero-based position of the case within its suite.
        index: usize,
        /// What went wrong.
        failure: CaseFailure,
    },
}

impl Error {
    /// Returns the name of the failing test case, if a case failed.
    pub const fn case_name(&self) -> Option<&str> {
        match self {
            Self::ConfigLoad(_) => None,
            Self::CaseFailed { name, .. } => Some(name.as_str()),
        }
    }
}
