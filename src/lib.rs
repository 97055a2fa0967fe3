mod app;
mod cli;
mod controller;
mod error;
mod link;
mod logging;
mod power;
mod render;
mod sim;
mod units;

pub use app::{run, run_display};
pub use cli::{Args, Command, LogLevel, MemtestArgs, PeekArgs, PokeArgs, RunArgs};
pub use controller::{DashScreen, DisplayConfig, DisplayController, SplashScreen, TickOutcome};
pub use error::DashError;
pub use link::{
    DEVICE_ID_ADDRESS, DEVICE_ID_WORD, FRAMEBUFFER_BASE, LengthFieldWidth, LinkConfig, LinkError,
    LoopbackDevice, MemoryBus, Opcode, PacketId, UdpMemoryLink, WireCodec, WireError,
};
pub use power::{ChannelSample, I2cBridge, I2cError, MonitorError, PowerMonitor, PowerStatus};
pub use render::{
    BAR_HEIGHT, BAR_MAX, CHUNK_BYTES, CHUNK_WORDS, CanvasError, ColorIndex, FRAME_BYTES,
    FRAME_CHUNKS, FrameStats, GRID_HEIGHT, GRID_WIDTH, PROBE_INTERVAL_BYTES, PixelCanvas, Rgb12,
    TextError,
};
pub use sim::{
    GraphicsSnapshot, PhysicsSnapshot, ScriptedTelemetry, SimError, SyntheticTelemetry,
    TelemetrySource, UnavailableTelemetry,
};
pub use units::psi_to_bar;
