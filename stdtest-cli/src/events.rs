//! Tracing setup for the command-line harness.

use std::{collections::HashSet, fmt::Display};
use tracing_subscriber::{Layer, layer::SubscriberExt, util::SubscriberInitExt};

/// Type of event to trace.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, clap::ValueEnum)]
pub enum TraceEvent {
    /// Traces loading the suite and running each test case.
    #[clap(name = "runner")]
    Runner,
    /// Traces spawning, feeding and reaping the target program.
    #[clap(name = "process")]
    Process,
    /// Traces fragment matching.
    #[clap(name = "matching")]
    Matching,
}

impl TraceEvent {
    const fn target(self) -> &'static str {
        match self {
            Self::Runner => "runner",
            Self::Process => "process",
            Self::Matching => "matching",
        }
    }
}

impl Display for TraceEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.target())
    }
}

/// Tracing configuration in effect for the process.
#[derive(Default)]
pub struct TraceEventConfig {
    enabled_trace_events: HashSet<TraceEvent>,
}

impl TraceEventConfig {
    /// Installs a stderr subscriber with the given event classes raised to debug level.
    pub fn init(enabled_debug_events: &[TraceEvent]) -> Self {
        let config = Self {
            enabled_trace_events: enabled_debug_events.iter().copied().collect(),
        };

        let layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
            .with_filter(config.compose_filter());

        if tracing_subscriber::registry().with(layer).try_init().is_err() {
            // Something went wrong; proceed on anyway but complain audibly.
            eprintln!("warning: failed to initialize tracing.");
        }

        config
    }

    fn compose_filter(&self) -> tracing_subscriber::filter::Targets {
        tracing_subscriber::filter::Targets::new()
            .with_default(tracing_subscriber::filter::LevelFilter::INFO)
            .with_targets(
                self.enabled_trace_events
                    .iter()
                    .map(|event| (event.target(), tracing::Level::DEBUG)),
            )
    }

    /// Returns the event classes enabled at debug level.
    pub const fn get_enabled_events(&self) -> &HashSet<TraceEvent> {
        &self.enabled_trace_events
    }
}
