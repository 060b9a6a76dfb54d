//! Error types for the `framex` crate.
//!
//! [`FramexError`] is the single error type returned by every fallible
//! operation. Per-frame encode failures have no variant: the sampler
//! skips those frames and logs a warning instead of failing the run.

use std::{io::Error as IoError, path::PathBuf};

use ffmpeg_next::Error as FfmpegError;
use thiserror::Error;
use zip::result::ZipError;

/// The unified error type for all `framex` operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FramexError {
    /// The video could not be opened for decoding. Raised before any frame
    /// is read, so no partial output exists.
    #[error("Video source unavailable at {path}: {reason}")]
    SourceUnavailable {
        /// Path handed to the decoder.
        path: PathBuf,
        /// Underlying reason the open failed.
        reason: String,
    },

    /// Sampling finished but no frame was selected.
    #[error("No frames were extracted (the source may be unreadable or empty)")]
    EmptyResult,

    /// The input could not be staged as a local video file.
    #[error("Acquisition failed: {0}")]
    AcquisitionFailed(String),

    /// A request parameter was rejected at the transport boundary.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// The archive container could not be written.
    #[error("Archive error: {0}")]
    ArchiveError(String),

    /// An error originating from the FFmpeg libraries.
    #[error("FFmpeg error: {0}")]
    FfmpegError(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// The operation was cancelled via a [`CancellationToken`](crate::CancellationToken).
    #[error("Operation cancelled")]
    Cancelled,
}

impl FramexError {
    /// Whether the failure is attributable to the request or its input
    /// rather than to the service itself.
    ///
    /// Source, acquisition, empty-result and parameter failures are client
    /// errors; everything else is an internal fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            FramexError::SourceUnavailable { .. }
                | FramexError::EmptyResult
                | FramexError::AcquisitionFailed(_)
                | FramexError::InvalidRequest(_)
        )
    }

    /// HTTP status code a transport layer should answer with.
    pub fn status_code(&self) -> u16 {
        if self.is_client_error() { 400 } else { 500 }
    }
}

impl From<FfmpegError> for FramexError {
    fn from(error: FfmpegError) -> Self {
        FramexError::FfmpegError(error.to_string())
    }
}

impl From<ZipError> for FramexError {
    fn from(error: ZipError) -> Self {
        FramexError::ArchiveError(error.to_string())
    }
}
