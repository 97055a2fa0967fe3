use std::io;
use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

use crate::cli::{Args, Command, LogLevel, MemtestArgs, RunArgs};
use crate::controller::{DisplayConfig, DisplayController};
use crate::error::DashError;
use crate::link::{
    DEVICE_ID_ADDRESS, DEVICE_ID_WORD, FRAMEBUFFER_BASE, LinkConfig, LoopbackDevice, MemoryBus,
    UdpMemoryLink,
};
use crate::logging;
use crate::sim::{SyntheticTelemetry, TelemetrySource, UnavailableTelemetry};

/// The video pipeline starts scanning out once this register is set.
const VIDEO_CONTROL_ADDRESS: u32 = 0x0000_0004;
const VIDEO_CONTROL_ENABLE: u32 = 0x0000_0007;

const MEMTEST_PACKET_BYTES: u32 = 1024;
const MEMTEST_PACKET_WORDS: u32 = MEMTEST_PACKET_BYTES / 4;
const MEMTEST_PACING_STRIDE: u32 = 4096;
const MEMTEST_PROBE_STRIDE: u32 = 10_000;

/// Runs the parsed CLI command against the device the arguments select.
///
/// # Errors
///
/// Returns an error if logging initialisation, the link, or the command
/// itself fails.
#[instrument(skip(args, out, cancel), level = "info", fields(command = command_name(args.command())))]
pub async fn run<W>(args: Args, out: &mut W, cancel: CancellationToken) -> Result<(), DashError>
where
    W: io::Write,
{
    logging::initialise_logging(args.log_level().map(LogLevel::as_level_filter))?;

    let bus = build_bus(&args).await?;
    match args.into_command() {
        Command::Run(run_args) => {
            let telemetry: Box<dyn TelemetrySource> = if run_args.fake_telemetry() {
                Box::new(SyntheticTelemetry::new())
            } else {
                Box::new(UnavailableTelemetry)
            };
            run_display(bus, telemetry, &display_config(&run_args), cancel).await
        }
        Command::Peek(peek) => {
            let word = bus.read_word(peek.address()).await?;
            writeln!(out, "{:#010x}: {word:#010x}", peek.address()).map_err(DashError::Output)
        }
        Command::Poke(poke) => {
            bus.write_word(poke.address(), poke.value()).await?;
            writeln!(out, "{:#010x} <- {:#010x}", poke.address(), poke.value())
                .map_err(DashError::Output)
        }
        Command::Memtest(memtest_args) => memtest(bus.as_ref(), &memtest_args, out).await,
    }
}

/// Drives the panel with an injected telemetry source until cancelled.
///
/// This is the seam for wiring a real simulator reader in place of the
/// bundled sources.
///
/// # Errors
///
/// Returns an error when the video pipeline cannot be enabled.
pub async fn run_display(
    bus: Arc<dyn MemoryBus>,
    telemetry: Box<dyn TelemetrySource>,
    config: &DisplayConfig,
    cancel: CancellationToken,
) -> Result<(), DashError> {
    bus.write_word(VIDEO_CONTROL_ADDRESS, VIDEO_CONTROL_ENABLE)
        .await?;
    let controller = Arc::new(DisplayController::new(bus, telemetry, config));
    controller.run(cancel).await;
    Ok(())
}

async fn build_bus(args: &Args) -> Result<Arc<dyn MemoryBus>, DashError> {
    if args.fake_link() {
        info!("using in-memory device");
        return Ok(Arc::new(LoopbackDevice::new()));
    }
    let endpoint = args.endpoint();
    let remote = tokio::net::lookup_host(endpoint.clone())
        .await
        .map_err(DashError::Lookup)?
        .next()
        .ok_or(DashError::HostResolution { host: endpoint })?;
    let config = LinkConfig::builder()
        .length_field(args.length_field())
        .recv_timeout(args.recv_timeout())
        .build();
    info!(%remote, "connecting UDP link");
    Ok(Arc::new(UdpMemoryLink::connect(remote, config).await?))
}

fn display_config(run_args: &RunArgs) -> DisplayConfig {
    DisplayConfig::builder()
        .refresh_period(run_args.refresh())
        .hold_ticks(run_args.hold_ticks())
        .flip(run_args.flip())
        .brake_bias_offset(run_args.bias_offset())
        .build()
}

/// Write-then-verify sweep over the framebuffer memory region.
async fn memtest<W>(bus: &dyn MemoryBus, args: &MemtestArgs, out: &mut W) -> Result<(), DashError>
where
    W: io::Write,
{
    let size = args.size_bytes();
    let mut unprobed = 0;

    for offset in (0..size).step_by(MEMTEST_PACKET_BYTES as usize) {
        let words: Vec<u32> = (0..MEMTEST_PACKET_WORDS)
            .map(|index| pattern_word(offset + index * 4, args.random()))
            .collect();
        bus.write_block(FRAMEBUFFER_BASE + offset, &words).await?;

        // Pace the stream so the device-side FIFO keeps up, and probe the
        // identity register to confirm it is still answering.
        if offset % MEMTEST_PACING_STRIDE == 0 {
            tokio::time::sleep(std::time::Duration::from_millis(1)).await;
        }
        unprobed += MEMTEST_PACKET_BYTES;
        if unprobed >= MEMTEST_PROBE_STRIDE {
            unprobed = 0;
            if bus.read_word(DEVICE_ID_ADDRESS).await? != DEVICE_ID_WORD {
                warn!(offset, "identity probe returned wrong word during sweep");
            }
        }
    }
    writeln!(out, "wrote {size} bytes").map_err(DashError::Output)?;

    let mut mismatches = 0usize;
    let mut first_address = None;
    for offset in (0..size).step_by(MEMTEST_PACKET_BYTES as usize) {
        let words = bus
            .read_block(FRAMEBUFFER_BASE + offset, MEMTEST_PACKET_BYTES as u16)
            .await?;
        for (index, word) in words.iter().enumerate() {
            let address = offset + index as u32 * 4;
            let expected = pattern_word(address, args.random());
            if *word != expected {
                mismatches += 1;
                if first_address.is_none() {
                    warn!(
                        address = format_args!("{address:#010x}"),
                        diff = format_args!("{:#010x}", word ^ expected),
                        "memtest mismatch"
                    );
                    first_address = Some(address);
                }
            }
        }
    }

    match first_address {
        None => writeln!(out, "verified {size} bytes, no mismatches").map_err(DashError::Output),
        Some(first_address) => {
            writeln!(out, "{mismatches} mismatched words, first at {first_address:#010x}")
                .map_err(DashError::Output)?;
            Err(DashError::MemtestFailed {
                mismatches,
                first_address,
            })
        }
    }
}

/// Test pattern for one word: the address ramp, or a multiplicative hash of
/// it when a pseudo-random pattern is requested.
fn pattern_word(address: u32, random: bool) -> u32 {
    if random {
        let mixed = address.wrapping_mul(0x9E37_79B1);
        mixed ^ (mixed >> 15)
    } else {
        address
    }
}

fn command_name(command: &Command) -> &'static str {
    match command {
        Command::Run(_args) => "run",
        Command::Peek(_args) => "peek",
        Command::Poke(_args) => "poke",
        Command::Memtest(_args) => "memtest",
    }
}
