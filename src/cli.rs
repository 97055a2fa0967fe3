use std::time::Duration;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::filter::LevelFilter;

use crate::link::LengthFieldWidth;

/// Command-line options for the dashboard panel driver.
#[derive(Debug, Parser)]
#[command(name = "pitdash", about = "Drive a UDP-attached racing dashboard panel.")]
pub struct Args {
    /// Device host name or address.
    #[arg(long, global = true, default_value = "192.168.0.100")]
    host: String,
    /// Device UDP port.
    #[arg(long, global = true, default_value_t = 4660)]
    port: u16,
    /// Log-level override (otherwise RUST_LOG, defaulting to info).
    #[arg(long, global = true, value_enum)]
    log_level: Option<LogLevel>,
    /// Width of the request length field, per device firmware revision.
    #[arg(long, global = true, value_enum, default_value = "double")]
    length_field: LengthFieldWidth,
    /// Response timeout per request (e.g. `500ms`, `2s`).
    #[arg(long, global = true, value_parser = parse_duration, default_value = "500ms")]
    recv_timeout: Duration,
    /// Uses an in-memory device instead of the UDP link.
    #[arg(long, global = true)]
    fake_link: bool,
    #[command(subcommand)]
    command: Command,
}

impl Args {
    /// Creates argument values directly without CLI parsing.
    #[must_use]
    pub fn new(command: Command) -> Self {
        Self {
            host: "192.168.0.100".to_owned(),
            port: 4660,
            log_level: None,
            length_field: LengthFieldWidth::Double,
            recv_timeout: Duration::from_millis(500),
            fake_link: false,
            command,
        }
    }

    /// Switches the run to the in-memory device.
    #[must_use]
    pub fn with_fake_link(mut self) -> Self {
        self.fake_link = true;
        self
    }

    /// Returns the device endpoint as `host:port`.
    #[must_use]
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the log-level override.
    #[must_use]
    pub fn log_level(&self) -> Option<LogLevel> {
        self.log_level
    }

    /// Returns the configured length-field width.
    #[must_use]
    pub fn length_field(&self) -> LengthFieldWidth {
        self.length_field
    }

    /// Returns the per-request response timeout.
    #[must_use]
    pub fn recv_timeout(&self) -> Duration {
        self.recv_timeout
    }

    /// Returns whether the in-memory device is requested.
    #[must_use]
    pub fn fake_link(&self) -> bool {
        self.fake_link
    }

    /// Consumes the arguments, yielding the subcommand.
    #[must_use]
    pub fn into_command(self) -> Command {
        self.command
    }

    /// Returns the subcommand.
    #[must_use]
    pub fn command(&self) -> &Command {
        &self.command
    }
}

/// Supported CLI commands.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Drive the panel: splash until telemetry appears, then the live dashboard.
    Run(RunArgs),
    /// Read one 32-bit word from the device.
    Peek(PeekArgs),
    /// Write one 32-bit word to the device.
    Poke(PokeArgs),
    /// Write-then-verify sweep over the framebuffer memory.
    Memtest(MemtestArgs),
}

/// Options for the `run` subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct RunArgs {
    /// Drives the panel rotated 180 degrees.
    #[arg(long)]
    flip: bool,
    /// Ticks an indicator flash lingers after its flag clears.
    #[arg(long, default_value_t = 30)]
    hold_ticks: u32,
    /// Tick period (e.g. `16666us` for ~60 Hz).
    #[arg(long, value_parser = parse_duration, default_value = "16666us")]
    refresh: Duration,
    /// Car-specific brake-bias display correction in percent.
    #[arg(long, default_value_t = 14, allow_hyphen_values = true)]
    bias_offset: i32,
    /// Generates sweeping demo telemetry instead of waiting for the simulator.
    #[arg(long)]
    fake_telemetry: bool,
}

impl RunArgs {
    /// Creates run arguments with the CLI defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flip: false,
            hold_ticks: 30,
            refresh: Duration::from_micros(16_666),
            bias_offset: 14,
            fake_telemetry: false,
        }
    }

    /// Switches the run to generated demo telemetry.
    #[must_use]
    pub fn with_fake_telemetry(mut self) -> Self {
        self.fake_telemetry = true;
        self
    }

    #[must_use]
    pub fn flip(&self) -> bool {
        self.flip
    }

    #[must_use]
    pub fn hold_ticks(&self) -> u32 {
        self.hold_ticks
    }

    #[must_use]
    pub fn refresh(&self) -> Duration {
        self.refresh
    }

    #[must_use]
    pub fn bias_offset(&self) -> i32 {
        self.bias_offset
    }

    #[must_use]
    pub fn fake_telemetry(&self) -> bool {
        self.fake_telemetry
    }
}

impl Default for RunArgs {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for the `peek` subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct PeekArgs {
    /// Word address, decimal or `0x` hexadecimal.
    #[arg(value_parser = parse_word)]
    address: u32,
}

impl PeekArgs {
    /// Creates peek arguments for one word address.
    #[must_use]
    pub fn new(address: u32) -> Self {
        Self { address }
    }

    #[must_use]
    pub fn address(&self) -> u32 {
        self.address
    }
}

/// Options for the `poke` subcommand.
#[derive(Debug, Clone, clap::Args)]
pub struct PokeArgs {
    /// Word address, decimal or `0x` hexadecimal.
    #[arg(value_parser = parse_word)]
    address: u32,
    /// Value to write, decimal or `0x` hexadecimal.
    #[arg(value_parser = parse_word)]
    value: u32,
}

impl PokeArgs {
    /// Creates poke arguments for one word write.
    #[must_use]
    pub fn new(address: u32, value: u32) -> Self {
        Self { address, value }
    }

    #[must_use]
    pub fn address(&self) -> u32 {
        self.address
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.value
    }
}

/// Options for the `memtest` subcommand.
#[derive(Debug, Clone, Copy, clap::Args)]
pub struct MemtestArgs {
    /// Size of the sweep in mebibytes.
    #[arg(long, default_value_t = 8)]
    size_mb: u32,
    /// Uses a pseudo-random pattern instead of the address ramp.
    #[arg(long)]
    random: bool,
}

impl MemtestArgs {
    /// Creates memtest arguments for a sweep of `size_mb` mebibytes.
    #[must_use]
    pub fn new(size_mb: u32, random: bool) -> Self {
        Self { size_mb, random }
    }

    #[must_use]
    pub fn size_bytes(&self) -> u32 {
        self.size_mb * 1024 * 1024
    }

    #[must_use]
    pub fn random(&self) -> bool {
        self.random
    }
}

/// Logging verbosity levels selectable from the CLI.
#[derive(Debug, Clone, Copy, Eq, PartialEq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub(crate) fn as_level_filter(self) -> LevelFilter {
        match self {
            Self::Trace => LevelFilter::TRACE,
            Self::Debug => LevelFilter::DEBUG,
            Self::Info => LevelFilter::INFO,
            Self::Warn => LevelFilter::WARN,
            Self::Error => LevelFilter::ERROR,
        }
    }
}

fn parse_duration(value: &str) -> Result<Duration, String> {
    humantime::parse_duration(value).map_err(|error| error.to_string())
}

fn parse_word(value: &str) -> Result<u32, String> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    parsed.map_err(|error| error.to_string())
}
