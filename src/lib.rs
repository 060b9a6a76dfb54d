//! # framex
//!
//! Sample still frames from a video at a fixed wall-clock interval and
//! package them into a single ZIP archive.
//!
//! A request names a frame cap, an interval in seconds and an image format.
//! The video's frame rate turns the interval into a frame stride; frames are
//! decoded once, in order, and every stride-th frame is encoded and kept until
//! the cap is reached. The kept frames become `frame_0001.<fmt>`,
//! `frame_0002.<fmt>`, … inside the archive.
//!
//! ## Quick Start
//!
//! ```no_run
//! use framex::{ExtractOptions, FrameExtractor, SampleRequest, VideoInput};
//!
//! let request = SampleRequest::new()
//!     .with_max_frames(50)
//!     .with_interval_seconds(5)
//!     .with_format("jpg");
//!
//! let archive = FrameExtractor::new(ExtractOptions::new())
//!     .extract(VideoInput::from_arg("input.mp4"), &request)?;
//!
//! std::fs::write(framex::ARCHIVE_FILE_NAME, archive.to_zip()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Building blocks
//!
//! - [`FrameSampler`]: the lazy stride-based selection over any
//!   [`FrameDecoder`] / [`FrameEncoder`] pair
//! - [`archive::build`]: deterministic naming and ordering into an
//!   [`Archive`]
//! - [`Acquirer`]: stages local paths, uploads and HTTP(S) downloads in a
//!   per-request temporary directory
//! - [`RequestParameters`]: validates loosely-typed form fields into a
//!   [`SampleRequest`]
//! - [`FramexError::status_code`]: maps failures onto HTTP client/server
//!   error classes
//!
//! ## Requirements
//!
//! FFmpeg development libraries must be installed to build the
//! [`FfmpegDecoder`].

pub mod acquisition;
pub mod archive;
pub mod config;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod ffmpeg;
pub mod parameters;
pub mod pipeline;
pub mod progress;
pub mod sampler;
pub mod source;
mod utilities;

pub use acquisition::{Acquirer, AcquisitionAdapter, StagedVideo, VideoInput};
pub use archive::{ARCHIVE_CONTENT_TYPE, ARCHIVE_FILE_NAME, Archive, ArchiveEntry};
pub use config::{ExtractOptions, SampleRequest};
pub use decoder::FfmpegDecoder;
pub use encoder::ImageEncoder;
pub use error::FramexError;
pub use ffmpeg::set_ffmpeg_log_level;
pub use parameters::RequestParameters;
pub use pipeline::FrameExtractor;
pub use progress::{CancellationToken, OperationType, ProgressCallback, ProgressInfo};
pub use sampler::{DEFAULT_FRAME_RATE, FrameSampler, SelectedFrame};
pub use source::{FrameDecoder, FrameEncoder};
