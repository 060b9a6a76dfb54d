//! End-to-end extraction: stage the input, sample it, archive the frames.
//!
//! [`FrameExtractor`] ties the pieces together for one request. Each call
//! owns its own staged file, decoder and archive; nothing is shared between
//! calls, so one extractor may serve many requests from many threads.
//!
//! # Example
//!
//! ```no_run
//! use framex::{ExtractOptions, FrameExtractor, SampleRequest, VideoInput};
//!
//! let request = SampleRequest::new().with_interval_seconds(10);
//! let archive = FrameExtractor::new(ExtractOptions::new())
//!     .extract(VideoInput::from_arg("https://example.com/clip.mp4"), &request)?;
//! std::fs::write("frames.zip", archive.to_zip()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::path::Path;

use crate::acquisition::{Acquirer, AcquisitionAdapter, VideoInput};
use crate::archive::{self, Archive};
use crate::config::{ExtractOptions, SampleRequest};
use crate::decoder::FfmpegDecoder;
use crate::encoder::ImageEncoder;
use crate::error::FramexError;
use crate::progress::{OperationType, ProgressTracker};
use crate::sampler::FrameSampler;
use crate::source::{FrameDecoder, FrameEncoder};

/// Runs the acquisition → sampling → archiving pipeline.
#[derive(Debug, Clone, Default)]
pub struct FrameExtractor<A = Acquirer> {
    acquirer: A,
    options: ExtractOptions,
}

impl FrameExtractor<Acquirer> {
    /// An extractor using the default [`Acquirer`].
    pub fn new(options: ExtractOptions) -> Self {
        Self {
            acquirer: Acquirer::new(),
            options,
        }
    }
}

impl<A: AcquisitionAdapter> FrameExtractor<A> {
    /// An extractor using a custom acquisition adapter.
    pub fn with_acquirer(acquirer: A, options: ExtractOptions) -> Self {
        Self { acquirer, options }
    }

    /// Stage `input`, then extract frames from it.
    ///
    /// The staged copy (if any) is removed before this returns, whatever the
    /// outcome.
    ///
    /// # Errors
    ///
    /// [`FramexError::AcquisitionFailed`] if the input cannot be staged,
    /// [`FramexError::SourceUnavailable`] if it cannot be decoded, and
    /// [`FramexError::EmptyResult`] if no frame was selected.
    pub fn extract(&self, input: VideoInput, request: &SampleRequest) -> Result<Archive, FramexError> {
        let mut tracker = ProgressTracker::new(
            self.options.progress.clone(),
            OperationType::Acquisition,
            Some(1),
            1,
        );
        let staged = self.acquirer.resolve(input)?;
        tracker.advance(None);

        self.extract_path(staged.path(), request)
    }

    /// Extract frames from a video already on local disk.
    pub fn extract_path<P: AsRef<Path>>(
        &self,
        path: P,
        request: &SampleRequest,
    ) -> Result<Archive, FramexError> {
        let decoder = FfmpegDecoder::open(path.as_ref())?;
        self.extract_with(decoder, ImageEncoder::new(), request)
    }

    /// Extract frames from an already-opened decoder.
    pub fn extract_with<D, E>(
        &self,
        decoder: D,
        encoder: E,
        request: &SampleRequest,
    ) -> Result<Archive, FramexError>
    where
        D: FrameDecoder,
        E: FrameEncoder<D::Frame>,
    {
        let sampler = FrameSampler::new(decoder, encoder, request).with_options(&self.options);
        let archive = archive::build(sampler, &request.format)?;

        let mut tracker = ProgressTracker::new(
            self.options.progress.clone(),
            OperationType::Archiving,
            Some(archive.len() as u64),
            1,
        );
        tracker.complete(archive.len() as u64);

        if archive.is_empty() {
            log::warn!("Extraction selected no frames");
            return Err(FramexError::EmptyResult);
        }

        log::info!(
            "Extracted {} frame(s) as {}",
            archive.len(),
            archive.format()
        );
        Ok(archive)
    }
}
