//! FFmpeg initialization and console verbosity.
//!
//! FFmpeg logs to stderr on its own, independently of the Rust
//! [`log`](https://crates.io/crates/log) facade. [`set_ffmpeg_log_level`]
//! maps a familiar [`log::LevelFilter`] onto FFmpeg's levels so a service can
//! keep both in step.
//!
//! ```no_run
//! // Only let FFmpeg print errors.
//! framex::set_ffmpeg_log_level(log::LevelFilter::Error);
//! ```

use std::sync::Once;

use ffmpeg_next::util::log::Level;

use crate::error::FramexError;

static QUIET_BY_DEFAULT: Once = Once::new();

/// Initialize FFmpeg. Safe to call repeatedly.
///
/// The first call also lowers FFmpeg's own console output to errors only.
pub(crate) fn init() -> Result<(), FramexError> {
    ffmpeg_next::init()?;
    QUIET_BY_DEFAULT.call_once(|| ffmpeg_next::util::log::set_level(Level::Error));
    Ok(())
}

/// Map a Rust log filter onto FFmpeg's closest verbosity level.
pub fn ffmpeg_level_for(filter: log::LevelFilter) -> Level {
    match filter {
        log::LevelFilter::Off => Level::Quiet,
        log::LevelFilter::Error => Level::Error,
        log::LevelFilter::Warn => Level::Warning,
        log::LevelFilter::Info => Level::Info,
        log::LevelFilter::Debug => Level::Verbose,
        log::LevelFilter::Trace => Level::Debug,
    }
}

/// Set FFmpeg's console verbosity from a Rust log filter.
pub fn set_ffmpeg_log_level(filter: log::LevelFilter) {
    QUIET_BY_DEFAULT.call_once(|| {});
    ffmpeg_next::util::log::set_level(ffmpeg_level_for(filter));
}
