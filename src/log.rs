//! Logging setup for the `crewplan` binary.
//!
//! Library code only emits `tracing` events; installing a subscriber is left
//! to the binary. Levels follow the usual convention:
//! - INFO: one line per finished plan
//! - DEBUG: per-stage summaries (counts, config path)
//! - TRACE: per-task decisions (assignee choice, scheduling)
//!
//! The filter is read from `CREWPLAN_LOG` (e.g. `crewplan=trace`) and
//! defaults to `info`, or `debug` with `--debug`.

use tracing_subscriber::EnvFilter;

/// Environment variable holding the filter directive.
pub const LOG_ENV: &str = "CREWPLAN_LOG";

/// Default directive when `CREWPLAN_LOG` is unset or invalid.
pub fn default_directive(debug: bool) -> &'static str {
    if debug {
        "debug"
    } else {
        "info"
    }
}

fn filter(debug: bool) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_directive(debug)))
}

/// Install a stderr subscriber. Calling this twice is harmless.
pub fn init(debug: bool) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter(debug))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
