//! Command-line arguments for the `stdtest` harness.

use clap::{Parser, builder::styling};
use std::path::PathBuf;

use crate::{events, productinfo};

const SHORT_DESCRIPTION: &str = "Runs a program against stdin/output test cases";

const LONG_DESCRIPTION: &str = r"
stdtest runs a program once per test case from a JSON or YAML config file, feeds it the
case's input on stdin, and checks that every expected fragment shows up in its combined
stdout and stderr. The first failing case stops the run.
";

/// Parsed command-line arguments for the harness.
#[derive(Parser, Debug)]
#[clap(name = productinfo::PRODUCT_NAME,
       version = productinfo::PRODUCT_VERSION,
       about = SHORT_DESCRIPTION,
       long_about = LONG_DESCRIPTION,
       styles = help_styles())]
pub struct CommandLineArgs {
    /// Path to the source of the program to test.
    #[clap(long = "source-path", alias = "go_source_path", value_name = "PATH")]
    pub source_path: PathBuf,

    /// Path to the test config (JSON, or YAML with a .yaml/.yml extension).
    #[clap(long = "tests-config", alias = "tests_config", value_name = "PATH")]
    pub tests_config: PathBuf,

    /// Command used to run the source; the source path is appended. Empty runs it directly.
    #[clap(long = "launcher", default_value = "go run", env = "STDTEST_LAUNCHER")]
    pub launcher: String,

    /// Default per-case timeout in seconds; unbounded if not given.
    #[clap(long = "timeout", value_name = "SECONDS", env = "STDTEST_TIMEOUT")]
    pub timeout_in_seconds: Option<u64>,

    /// Display details regarding successful test cases.
    #[clap(short = 'v', long = "verbose", env = "STDTEST_VERBOSE")]
    pub verbose: bool,

    /// List selected tests without running them.
    #[clap(long = "list")]
    pub list_tests_only: bool,

    /// Exactly match filters (not just substring match).
    #[clap(long = "exact")]
    pub exact_match: bool,

    /// Patterns for tests to be excluded.
    #[clap(long = "skip", value_name = "PATTERN")]
    pub exclude_filters: Vec<String>,

    /// Enable debug logging for classes of tracing events.
    #[clap(long = "debug", alias = "log-enable", value_name = "EVENT")]
    pub enabled_debug_events: Vec<events::TraceEvent>,

    /// Patterns for tests to be included.
    pub include_filters: Vec<String>,
}

impl CommandLineArgs {
    /// Splits the launcher into its words.
    pub fn launcher_words(&self) -> Vec<&str> {
        self.launcher.split_whitespace().collect()
    }
}

fn help_styles() -> clap::builder::Styles {
    styling::Styles::styled()
        .header(
            styling::AnsiColor::Yellow.on_default()
                | styling::Effects::BOLD
                | styling::Effects::UNDERLINE,
        )
        .usage(styling::AnsiColor::Green.on_default() | styling::Effects::BOLD)
        .literal(styling::AnsiColor::Magenta.on_default() | styling::Effects::BOLD)
        .placeholder(styling::AnsiColor::Cyan.on_default())
}
