//! Internal helpers shared by the decoder.

use ffmpeg_next::frame::Video as VideoFrame;

/// Copy plane 0 of a packed RGB24 frame into a tightly-packed buffer.
///
/// FFmpeg rows frequently carry padding (line size > width × 3); the result
/// drops it so it can go straight into [`image::RgbImage::from_raw`].
pub(crate) fn packed_rgb_buffer(video_frame: &VideoFrame, width: u32, height: u32) -> Vec<u8> {
    let line_size = video_frame.stride(0);
    let row_bytes = (width as usize) * 3;
    let rows = height as usize;
    let data = video_frame.data(0);

    if line_size == row_bytes {
        return data[..row_bytes * rows].to_vec();
    }

    let mut buffer = Vec::with_capacity(row_bytes * rows);
    for row in data.chunks(line_size).take(rows) {
        buffer.extend_from_slice(&row[..row_bytes]);
    }
    buffer
}
