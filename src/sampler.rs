//! Interval-based frame selection.
//!
//! [`FrameSampler`] walks a [`FrameDecoder`] once, in decode order, keeping
//! every frame whose index is a multiple of the stride and encoding it on the
//! spot. It stops reading as soon as the frame cap is met, so a long video
//! sampled for a handful of frames is never decoded to the end.
//!
//! # Example
//!
//! ```no_run
//! use framex::{FfmpegDecoder, FrameSampler, ImageEncoder, SampleRequest};
//!
//! let request = SampleRequest::new().with_max_frames(3);
//! let decoder = FfmpegDecoder::open("input.mp4")?;
//!
//! for selected in FrameSampler::new(decoder, ImageEncoder::new(), &request) {
//!     let selected = selected?;
//!     println!("frame {} -> {} bytes", selected.index, selected.bytes.len());
//! }
//! # Ok::<(), framex::FramexError>(())
//! ```

use crate::config::{ExtractOptions, SampleRequest};
use crate::error::FramexError;
use crate::progress::{OperationType, ProgressTracker};
use crate::source::{FrameDecoder, FrameEncoder};

/// Frame rate assumed when a source reports none.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// Substitute [`DEFAULT_FRAME_RATE`] for missing, zero, negative or
/// non-finite rates.
pub fn effective_frame_rate(reported: Option<f64>) -> f64 {
    match reported {
        Some(rate) if rate.is_finite() && rate > 0.0 => rate,
        _ => DEFAULT_FRAME_RATE,
    }
}

/// `max(1, floor(frame_rate * interval_seconds))`.
pub fn stride(frame_rate: f64, interval_seconds: u32) -> u64 {
    let frames = (frame_rate * f64::from(interval_seconds)).floor();
    if frames.is_finite() && frames >= 1.0 {
        frames as u64
    } else {
        1
    }
}

/// One retained frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFrame {
    /// 0-based position in decode order.
    pub index: u64,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

/// Lazy, single-pass iterator of [`SelectedFrame`]s.
///
/// The decoder is closed exactly once: when the stream ends, when the cap is
/// reached, or when the sampler is dropped early.
pub struct FrameSampler<D: FrameDecoder, E> {
    decoder: D,
    encoder: E,
    format: String,
    max_frames: u64,
    stride: u64,
    frame_index: u64,
    selected_count: u64,
    options: Option<ExtractOptions>,
    tracker: Option<ProgressTracker>,
    closed: bool,
}

impl<D, E> FrameSampler<D, E>
where
    D: FrameDecoder,
    E: FrameEncoder<D::Frame>,
{
    /// Sample `decoder` according to `request`.
    pub fn new(decoder: D, encoder: E, request: &SampleRequest) -> Self {
        let stride = request.stride(decoder.frame_rate());
        log::debug!(
            "Sampling every {stride} frame(s), at most {} as {}",
            request.max_frames,
            request.format,
        );

        let mut sampler = Self {
            decoder,
            encoder,
            format: request.format.clone(),
            max_frames: u64::from(request.max_frames),
            stride,
            frame_index: 0,
            selected_count: 0,
            options: None,
            tracker: None,
            closed: false,
        };
        if sampler.max_frames == 0 {
            sampler.close();
        }
        sampler
    }

    /// Attach progress reporting and cancellation.
    #[must_use]
    pub fn with_options(mut self, options: &ExtractOptions) -> Self {
        self.tracker = Some(ProgressTracker::new(
            options.progress.clone(),
            OperationType::FrameSampling,
            Some(self.max_frames),
            options.batch_size,
        ));
        self.options = Some(options.clone());
        self
    }

    /// The stride in effect for this run.
    pub fn stride(&self) -> u64 {
        self.stride
    }

    /// Number of frames decoded so far.
    pub fn frames_decoded(&self) -> u64 {
        self.frame_index
    }

    /// Number of frames selected so far.
    pub fn frames_selected(&self) -> u64 {
        self.selected_count
    }

    fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.decoder.close();
        if let Some(tracker) = self.tracker.as_mut() {
            tracker.finish();
        }
        log::debug!(
            "Sampler closed after {} decoded frame(s), {} selected",
            self.frame_index,
            self.selected_count,
        );
    }
}

impl<D, E> Iterator for FrameSampler<D, E>
where
    D: FrameDecoder,
    E: FrameEncoder<D::Frame>,
{
    type Item = Result<SelectedFrame, FramexError>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.closed {
            if self
                .options
                .as_ref()
                .is_some_and(ExtractOptions::is_cancelled)
            {
                self.close();
                return Some(Err(FramexError::Cancelled));
            }

            let Some(frame) = self.decoder.read_next_frame() else {
                self.close();
                return None;
            };

            let index = self.frame_index;
            self.frame_index += 1;

            if index % self.stride != 0 {
                continue;
            }

            let Some(bytes) = self.encoder.encode(&frame, &self.format) else {
                log::warn!("Skipping frame {index}: could not encode as {}", self.format);
                continue;
            };

            self.selected_count += 1;
            if let Some(tracker) = self.tracker.as_mut() {
                tracker.advance(Some(index));
            }
            if self.selected_count >= self.max_frames {
                self.close();
            }
            return Some(Ok(SelectedFrame { index, bytes }));
        }

        None
    }
}

impl<D: FrameDecoder, E> Drop for FrameSampler<D, E> {
    fn drop(&mut self) {
        if !self.closed {
            self.closed = true;
            self.decoder.close();
        }
    }
}
