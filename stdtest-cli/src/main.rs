//! Implements the command-line interface for `stdtest`.

/// Main entry point for the `stdtest` harness.
fn main() {
    stdtest_cli::entry::run();
}
