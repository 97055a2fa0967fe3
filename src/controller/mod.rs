pub(crate) mod dash;
pub(crate) mod driver;
pub(crate) mod splash;

pub use self::dash::DashScreen;
pub use self::driver::{DisplayConfig, DisplayController, TickOutcome};
pub use self::splash::SplashScreen;
