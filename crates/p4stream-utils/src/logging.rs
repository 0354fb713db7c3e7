//! Logging infrastructure for p4stream
//!
//! Structured logging through `tracing`. The CLI installs the subscriber
//! once; library code only emits spans and events.

use std::io::IsTerminal;
use tracing::{Level, info, span, warn};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

/// Check if colored output should be used.
///
/// Returns true only if stderr is a terminal and NO_COLOR is unset.
fn use_color() -> bool {
    std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none()
}

/// Default filter directive when `RUST_LOG` is not set.
#[must_use]
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "p4stream=debug,p4stream_engine=debug,p4stream_runner=debug,info"
    } else {
        "p4stream=info,p4stream_engine=info,warn"
    }
}

/// Initialize the tracing subscriber.
///
/// `RUST_LOG` wins over the built-in filter. Verbose mode adds targets and
/// span close timings. Output goes to stderr so stdout stays parseable.
pub fn init_tracing(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter(verbose)))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    if verbose {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(use_color())
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE)
                    .compact(),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_ansi(use_color())
                    .with_target(false)
                    .without_time()
                    .compact(),
            )
            .try_init()?;
    }

    Ok(())
}

/// Span wrapping one lifecycle operation against a stream.
pub fn lifecycle_span(operation: &str, location: &str) -> tracing::Span {
    span!(
        Level::INFO,
        "stream_lifecycle",
        operation = %operation,
        location = %location,
    )
}

/// Log a completed lifecycle operation with the server's confirmation.
pub fn log_lifecycle_complete(operation: &str, location: &str, message: &str) {
    info!(
        operation = %operation,
        location = %location,
        confirmation = %message,
        "Stream operation completed"
    );
}

/// Log a lifecycle failure. Remote side effects already applied stay applied.
pub fn log_lifecycle_error(operation: &str, location: &str, error: &dyn std::error::Error) {
    warn!(
        operation = %operation,
        location = %location,
        error = %error,
        "Stream operation aborted"
    );
}
