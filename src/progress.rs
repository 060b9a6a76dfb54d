//! Progress reporting and cancellation support.
//!
//! [`ProgressCallback`] observes an extraction as it runs and
//! [`CancellationToken`] lets another thread stop it cooperatively.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use framex::{ExtractOptions, FrameExtractor, ProgressCallback, ProgressInfo, SampleRequest};
//!
//! struct PrintProgress;
//!
//! impl ProgressCallback for PrintProgress {
//!     fn on_progress(&self, info: &ProgressInfo) {
//!         println!("[{:?}] {} selected", info.operation, info.current);
//!     }
//! }
//!
//! let options = ExtractOptions::new().with_progress(Arc::new(PrintProgress));
//! let archive = FrameExtractor::new(options)
//!     .extract_path("input.mp4", &SampleRequest::default())?;
//! # Ok::<(), framex::FramexError>(())
//! ```

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use std::time::{Duration, Instant};

/// The stage of an extraction currently reporting progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OperationType {
    /// Staging the input as a local file.
    Acquisition,
    /// Decoding, selecting and encoding frames.
    FrameSampling,
    /// Assembling the selected frames into the archive.
    Archiving,
}

/// A snapshot of extraction progress.
#[derive(Debug, Clone)]
pub struct ProgressInfo {
    /// Which stage is reporting.
    pub operation: OperationType,
    /// Items completed so far (selected frames while sampling).
    pub current: u64,
    /// Upper bound on items, if known. While sampling this is the frame cap.
    pub total: Option<u64>,
    /// Completion percentage (0.0 – 100.0), if `total` is known and non-zero.
    pub percentage: Option<f32>,
    /// Wall-clock time since the stage started.
    pub elapsed: Duration,
    /// Decode-order index of the frame just selected, if any.
    pub current_frame: Option<u64>,
}

/// Receives progress updates during extraction.
///
/// Callbacks observe but cannot halt the operation; use
/// [`CancellationToken`] for that.
pub trait ProgressCallback: Send + Sync {
    /// Called as work completes, at the cadence set by
    /// [`ExtractOptions::with_batch_size`](crate::ExtractOptions::with_batch_size).
    fn on_progress(&self, info: &ProgressInfo);
}

/// Discards all progress notifications. The default callback.
pub(crate) struct NoOpProgress;

impl ProgressCallback for NoOpProgress {
    fn on_progress(&self, _info: &ProgressInfo) {}
}

/// Cooperative cancellation token backed by an [`AtomicBool`].
///
/// Clones share state; the sampling loop checks the token before each
/// decoded frame.
///
/// ```
/// use framex::CancellationToken;
///
/// let token = CancellationToken::new();
/// let handle = token.clone();
/// handle.cancel();
/// assert!(token.is_cancelled());
/// ```
#[derive(Debug, Clone)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a new, non-cancelled token.
    pub fn new() -> Self {
        Self {
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Request cancellation. All clones observe it.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

/// Tracks timing for one stage and fires the callback every `batch_size` items.
pub(crate) struct ProgressTracker {
    callback: Arc<dyn ProgressCallback>,
    operation: OperationType,
    total: Option<u64>,
    current: u64,
    batch_size: u64,
    start_time: Instant,
    items_since_last_report: u64,
}

impl ProgressTracker {
    pub(crate) fn new(
        callback: Arc<dyn ProgressCallback>,
        operation: OperationType,
        total: Option<u64>,
        batch_size: u64,
    ) -> Self {
        Self {
            callback,
            operation,
            total,
            current: 0,
            batch_size: batch_size.max(1),
            start_time: Instant::now(),
            items_since_last_report: 0,
        }
    }

    /// Record one completed item.
    pub(crate) fn advance(&mut self, frame_index: Option<u64>) {
        self.current += 1;
        self.items_since_last_report += 1;

        if self.items_since_last_report >= self.batch_size {
            self.report(frame_index);
            self.items_since_last_report = 0;
        }
    }

    /// Mark `count` items done at once and report.
    pub(crate) fn complete(&mut self, count: u64) {
        self.current = count;
        self.items_since_last_report = 0;
        self.report(None);
    }

    /// Unconditionally emit a final report.
    pub(crate) fn finish(&mut self) {
        self.report(None);
    }

    fn report(&self, frame_index: Option<u64>) {
        let percentage = self
            .total
            .filter(|&total| total > 0)
            .map(|total| (self.current as f32 / total as f32) * 100.0);

        let info = ProgressInfo {
            operation: self.operation,
            current: self.current,
            total: self.total,
            percentage,
            elapsed: self.start_time.elapsed(),
            current_frame: frame_index,
        };

        self.callback.on_progress(&info);
    }
}
