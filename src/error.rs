use thiserror::Error;

use crate::link::LinkError;
use crate::power::{I2cError, MonitorError};
use crate::render::{CanvasError, TextError};
use crate::sim::SimError;

/// Errors returned by logging initialisation.
#[derive(Debug, Error)]
pub(crate) enum LogSetupError {
    #[error("failed to install tracing subscriber")]
    Subscriber(#[from] tracing_subscriber::util::TryInitError),
}

/// Top-level errors wrapping module-specific error types.
#[derive(Debug, Error)]
pub enum DashError {
    #[error(transparent)]
    Link(#[from] LinkError),
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    #[error(transparent)]
    Text(#[from] TextError),
    #[error(transparent)]
    I2c(#[from] I2cError),
    #[error(transparent)]
    Monitor(#[from] MonitorError),
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error("could not resolve device address `{host}`")]
    HostResolution { host: String },
    #[error("memory test found {mismatches} mismatched words, first at {first_address:#010x}")]
    MemtestFailed {
        mismatches: usize,
        first_address: u32,
    },
    #[error("failed to write command output")]
    Output(#[source] std::io::Error),
    #[error("failed to resolve device address")]
    Lookup(#[source] std::io::Error),
    #[error("failed to install tracing subscriber")]
    LogSetup,
}

impl From<&'static LogSetupError> for DashError {
    fn from(_error: &'static LogSetupError) -> Self {
        Self::LogSetup
    }
}
