use std::io::{self, IsTerminal};
use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::error::LogSetupError;

static LOGGING_INITIALISED: OnceLock<Result<(), LogSetupError>> = OnceLock::new();

/// Initialises structured logging: pretty formatting on an interactive
/// terminal, JSON lines otherwise. Safe to call more than once.
pub(crate) fn initialise_logging(
    level_override: Option<LevelFilter>,
) -> Result<(), &'static LogSetupError> {
    LOGGING_INITIALISED
        .get_or_init(|| initialise_logging_once(level_override))
        .as_ref()
        .copied()
}

fn initialise_logging_once(level_override: Option<LevelFilter>) -> Result<(), LogSetupError> {
    let log_filter = match level_override {
        Some(level) => EnvFilter::default().add_directive(level.into()),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };

    if io::stderr().is_terminal() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_filter(log_filter),
            )
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .json()
                    .with_target(false)
                    .with_writer(io::stderr)
                    .with_filter(log_filter),
            )
            .try_init()?;
    }

    Ok(())
}
