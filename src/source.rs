//! Capability traits the sampler is written against.
//!
//! Decoding and encoding are opaque to the sampling algorithm: a
//! [`FrameDecoder`] yields frames in decode order and a [`FrameEncoder`]
//! turns one frame into image bytes. [`FfmpegDecoder`](crate::FfmpegDecoder)
//! and [`ImageEncoder`](crate::ImageEncoder) are the production
//! implementations; tests substitute in-memory ones.

/// An opened video stream producing frames sequentially.
pub trait FrameDecoder {
    /// The decoded frame type.
    type Frame;

    /// Nominal frames per second, if the container reports one.
    fn frame_rate(&self) -> Option<f64>;

    /// Decode the next frame in decode order.
    ///
    /// `None` means no further frame is available, whether because the
    /// stream ended or because it could not be decoded further.
    fn read_next_frame(&mut self) -> Option<Self::Frame>;

    /// Release the underlying handle. Called exactly once by the sampler.
    fn close(&mut self) {}
}

/// Converts a decoded frame into bytes of a named image format.
///
/// Failure is reported as `None` and concerns that frame only.
pub trait FrameEncoder<F> {
    fn encode(&self, frame: &F, format: &str) -> Option<Vec<u8>>;
}

impl<F, T> FrameEncoder<F> for T
where
    T: Fn(&F, &str) -> Option<Vec<u8>>,
{
    fn encode(&self, frame: &F, format: &str) -> Option<Vec<u8>> {
        self(frame, format)
    }
}
