//! FFmpeg-backed [`FrameDecoder`].
//!
//! [`FfmpegDecoder`] opens a container, picks its best video stream and hands
//! out frames strictly in decode order as RGB [`DynamicImage`]s. It never
//! seeks: the sampler depends on every decoded frame advancing its index by
//! exactly one.
//!
//! End of file, a packet the codec rejects, or repeated demux errors all end
//! the stream the same way: EOF is sent and frames the codec already holds
//! are drained before [`FrameDecoder::read_next_frame`] returns `None`.

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::path::{Path, PathBuf};

use ffmpeg_next::{
    Error as FfmpegError, Packet,
    codec::context::Context as CodecContext,
    decoder::Video as VideoDecoder,
    format::{Pixel, context::Input},
    frame::Video as VideoFrame,
    media::Type,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::{DynamicImage, RgbImage};

use crate::error::FramexError;
use crate::source::FrameDecoder;

/// Demux errors tolerated in a row before the stream counts as exhausted.
const MAX_CONSECUTIVE_READ_ERRORS: u32 = 32;

/// Sequential decoder over the best video stream of a media file.
pub struct FfmpegDecoder {
    input_context: Input,
    decoder: VideoDecoder,
    scaler: ScalingContext,
    video_stream_index: usize,
    frame_rate: Option<f64>,
    width: u32,
    height: u32,
    decoded_frame: VideoFrame,
    rgb_frame: VideoFrame,
    eof_sent: bool,
    read_errors: u32,
    done: bool,
    path: PathBuf,
}

impl Debug for FfmpegDecoder {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("FfmpegDecoder")
            .field("path", &self.path)
            .field("video_stream_index", &self.video_stream_index)
            .field("frame_rate", &self.frame_rate)
            .field("width", &self.width)
            .field("height", &self.height)
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl FfmpegDecoder {
    /// Open `path` for decoding.
    ///
    /// # Errors
    ///
    /// Returns [`FramexError::SourceUnavailable`] if the file cannot be
    /// opened, has no video stream, or its codec cannot be set up. No frame
    /// has been read when this fails.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, FramexError> {
        let path = path.as_ref().to_path_buf();
        let unavailable = |reason: String| FramexError::SourceUnavailable {
            path: path.clone(),
            reason,
        };

        log::debug!("Opening video source: {}", path.display());

        crate::ffmpeg::init().map_err(|error| unavailable(error.to_string()))?;

        let input_context =
            ffmpeg_next::format::input(&path).map_err(|error| unavailable(error.to_string()))?;

        let stream = input_context
            .streams()
            .best(Type::Video)
            .ok_or_else(|| unavailable("no video stream found".to_string()))?;
        let video_stream_index = stream.index();
        let frame_rate = stream_frame_rate(&stream);

        let decoder_context = CodecContext::from_parameters(stream.parameters())
            .map_err(|error| unavailable(format!("unreadable codec parameters: {error}")))?;
        let decoder = decoder_context
            .decoder()
            .video()
            .map_err(|error| unavailable(format!("cannot create video decoder: {error}")))?;

        let width = decoder.width();
        let height = decoder.height();
        let scaler = ScalingContext::get(
            decoder.format(),
            width,
            height,
            Pixel::RGB24,
            width,
            height,
            ScalingFlags::BILINEAR,
        )
        .map_err(|error| unavailable(format!("cannot convert pixel format: {error}")))?;

        log::debug!(
            "Video stream {video_stream_index}: {width}x{height}, frame rate {frame_rate:?}"
        );

        Ok(Self {
            input_context,
            decoder,
            scaler,
            video_stream_index,
            frame_rate,
            width,
            height,
            decoded_frame: VideoFrame::empty(),
            rgb_frame: VideoFrame::empty(),
            eof_sent: false,
            read_errors: 0,
            done: false,
            path,
        })
    }

    /// Frame dimensions as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Stop feeding packets; frames already buffered are still drained.
    fn finish_stream(&mut self) {
        if self.decoder.send_eof().is_err() {
            self.done = true;
        }
        self.eof_sent = true;
    }

    fn convert_current_frame(&mut self) -> Result<DynamicImage, FramexError> {
        self.scaler.run(&self.decoded_frame, &mut self.rgb_frame)?;
        let buffer = crate::utilities::packed_rgb_buffer(&self.rgb_frame, self.width, self.height);
        let image = RgbImage::from_raw(self.width, self.height, buffer).ok_or_else(|| {
            FramexError::FfmpegError("decoded frame has an unexpected buffer size".to_string())
        })?;
        Ok(DynamicImage::ImageRgb8(image))
    }
}

/// Average frame rate, falling back to the stream's base rate.
fn stream_frame_rate(stream: &ffmpeg_next::Stream<'_>) -> Option<f64> {
    [stream.avg_frame_rate(), stream.rate()]
        .into_iter()
        .filter(|rate| rate.numerator() > 0 && rate.denominator() > 0)
        .map(|rate| f64::from(rate.numerator()) / f64::from(rate.denominator()))
        .next()
}

impl FrameDecoder for FfmpegDecoder {
    type Frame = DynamicImage;

    fn frame_rate(&self) -> Option<f64> {
        self.frame_rate
    }

    fn read_next_frame(&mut self) -> Option<DynamicImage> {
        while !self.done {
            if self.decoder.receive_frame(&mut self.decoded_frame).is_ok() {
                match self.convert_current_frame() {
                    Ok(image) => return Some(image),
                    Err(error) => {
                        log::warn!("Stopping at unconvertible frame: {error}");
                        self.done = true;
                        return None;
                    }
                }
            }

            if self.eof_sent {
                self.done = true;
                return None;
            }

            let mut packet = Packet::empty();
            match packet.read(&mut self.input_context) {
                Ok(()) => {
                    self.read_errors = 0;
                    if packet.stream() == self.video_stream_index {
                        if let Err(error) = self.decoder.send_packet(&packet) {
                            log::warn!("Stopping at undecodable packet: {error}");
                            self.finish_stream();
                        }
                    }
                }
                Err(FfmpegError::Eof) => self.finish_stream(),
                Err(error) => {
                    self.read_errors += 1;
                    if self.read_errors >= MAX_CONSECUTIVE_READ_ERRORS {
                        log::warn!("Giving up after repeated demux errors: {error}");
                        self.finish_stream();
                    }
                }
            }
        }

        None
    }

    fn close(&mut self) {
        if !self.done {
            self.done = true;
            self.decoder.flush();
        }
        log::debug!("Closed video source: {}", self.path.display());
    }
}
