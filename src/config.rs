//! Extraction configuration.
//!
//! [`SampleRequest`] is the immutable description of one extraction: how many
//! frames at most, how far apart, and in which image format.
//! [`ExtractOptions`] carries the operational settings (progress callback,
//! cancellation, reporting cadence) that do not change which frames are
//! selected.
//!
//! # Example
//!
//! ```
//! use framex::SampleRequest;
//!
//! let request = SampleRequest::new()
//!     .with_max_frames(20)
//!     .with_interval_seconds(2)
//!     .with_format("jpg");
//!
//! // 25 fps sampled every 2 seconds keeps every 50th frame.
//! assert_eq!(request.stride(Some(25.0)), 50);
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use crate::progress::{CancellationToken, NoOpProgress, ProgressCallback};
use crate::sampler;

/// Default frame cap.
pub const DEFAULT_MAX_FRAMES: u32 = 100;

/// Default sampling interval in seconds.
pub const DEFAULT_INTERVAL_SECONDS: u32 = 5;

/// Default image format, used both as encode target and file extension.
pub const DEFAULT_FORMAT: &str = "png";

/// Parameters for one frame extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleRequest {
    /// Maximum number of frames kept. Zero selects nothing.
    pub max_frames: u32,
    /// Wall-clock gap between kept frames, in seconds.
    pub interval_seconds: u32,
    /// Image format identifier, e.g. `"png"` or `"jpg"`.
    pub format: String,
}

impl Default for SampleRequest {
    fn default() -> Self {
        Self {
            max_frames: DEFAULT_MAX_FRAMES,
            interval_seconds: DEFAULT_INTERVAL_SECONDS,
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

impl SampleRequest {
    /// A request with the documented defaults: 100 frames, 5 seconds, PNG.
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_max_frames(mut self, max_frames: u32) -> Self {
        self.max_frames = max_frames;
        self
    }

    #[must_use]
    pub fn with_interval_seconds(mut self, interval_seconds: u32) -> Self {
        self.interval_seconds = interval_seconds;
        self
    }

    #[must_use]
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = format.into();
        self
    }

    /// Frame-index stride for a source reporting `frame_rate`.
    ///
    /// Missing or non-positive rates fall back to
    /// [`DEFAULT_FRAME_RATE`](crate::sampler::DEFAULT_FRAME_RATE).
    pub fn stride(&self, frame_rate: Option<f64>) -> u64 {
        sampler::stride(
            sampler::effective_frame_rate(frame_rate),
            self.interval_seconds,
        )
    }
}

/// Operational settings for an extraction.
///
/// A default-constructed value reports nothing and is never cancelled.
#[derive(Clone)]
pub struct ExtractOptions {
    pub(crate) progress: Arc<dyn ProgressCallback>,
    pub(crate) cancellation: Option<CancellationToken>,
    /// Fire the progress callback every N selected frames.
    pub(crate) batch_size: u64,
}

impl Debug for ExtractOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("ExtractOptions")
            .field("has_cancellation", &self.cancellation.is_some())
            .field("batch_size", &self.batch_size)
            .finish_non_exhaustive()
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl ExtractOptions {
    /// Defaults: no-op progress, no cancellation, batch size 1.
    pub fn new() -> Self {
        Self {
            progress: Arc::new(NoOpProgress),
            cancellation: None,
            batch_size: 1,
        }
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Attach a cancellation token.
    ///
    /// Once cancelled, sampling stops before the next decoded frame and the
    /// extraction returns [`FramexError::Cancelled`](crate::FramexError::Cancelled).
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Report every `size` selected frames. Clamped to a minimum of 1.
    #[must_use]
    pub fn with_batch_size(mut self, size: u64) -> Self {
        self.batch_size = size.max(1);
        self
    }

    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(|token| token.is_cancelled())
    }
}
