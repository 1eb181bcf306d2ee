//! Implements the command-line interface for `stdtest`.

use crate::args::CommandLineArgs;
use crate::events;
use crate::productinfo;
use anyhow::Context;
use clap::Parser;
use std::time::Duration;
use stdtest_harness::{
    CaseFilter, Error, RunnerConfig, TargetProgram, TestRunner, TestSuite, reporting,
};

/// Main entry point for the `stdtest` harness.
pub fn run() {
    //
    // Set up panic handler. On release builds, it will capture panic details to a
    // temporary .toml file and report a human-readable message to the screen.
    //
    human_panic::setup_panic!(
        human_panic::Metadata::new(productinfo::PRODUCT_NAME, productinfo::PRODUCT_VERSION)
            .support(productinfo::get_support_str())
    );

    //
    // Parse args. Missing required arguments print usage and exit non-zero.
    //
    let args = CommandLineArgs::parse();

    //
    // Run.
    //
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("error: failed to start async runtime: {err}");
            std::process::exit(1);
        }
    };

    let result = runtime.block_on(run_async(args));

    // Don't wait on output readers left behind by a killed target.
    runtime.shutdown_background();

    let exit_code = match result {
        Ok(code) => code,
        Err(err) => {
            tracing::error!("error: {err:#}");
            1
        }
    };

    std::process::exit(i32::from(exit_code));
}

/// Runs the harness as configured by `args`. Returns the exit code.
async fn run_async(args: CommandLineArgs) -> anyhow::Result<u8> {
    // Initializing tracing.
    let event_config = events::TraceEventConfig::init(&args.enabled_debug_events);
    tracing::debug!(
        "enabled trace events: {:?}",
        event_config.get_enabled_events()
    );

    let config = build_runner_config(&args);
    let runner = TestRunner::new(config);

    let suite = match TestSuite::load(&args.tests_config) {
        Ok(suite) => suite,
        Err(err) => {
            reporting::write_failure(std::io::stderr(), &Error::from(err))
                .context("failed to write report")?;
            return Ok(1);
        }
    };

    if args.list_tests_only {
        reporting::write_case_list(std::io::stdout(), runner.selected_cases(&suite))
            .context("failed to write test list")?;
        return Ok(0);
    }

    match runner.run(&suite).await {
        Ok(summary) => {
            if args.verbose {
                reporting::write_summary(std::io::stderr(), &summary, true)
                    .context("failed to write report")?;
            }
            Ok(0)
        }
        Err(err) => {
            reporting::write_failure(std::io::stderr(), &err).context("failed to write report")?;
            Ok(1)
        }
    }
}

fn build_runner_config(args: &CommandLineArgs) -> RunnerConfig {
    let target = TargetProgram::launched(args.launcher_words(), args.source_path.clone());

    let filter = CaseFilter {
        include: args.include_filters.clone(),
        exclude: args.exclude_filters.clone(),
        exact: args.exact_match,
    };

    RunnerConfig::new(target)
        .with_default_timeout(args.timeout_in_seconds.map(Duration::from_secs))
        .with_filter(filter)
}
