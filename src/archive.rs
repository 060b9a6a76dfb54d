//! Ordered frame archives.
//!
//! [`build`] drains a sequence of [`SelectedFrame`]s into an [`Archive`] whose
//! entries are named `frame_0001.<fmt>`, `frame_0002.<fmt>`, … in the order the
//! frames arrive. The archive is fully materialized in memory before it is
//! returned; [`Archive::to_zip`] and [`Archive::write_zip`] serialize it into
//! the single downloadable file handed back to callers.
//!
//! # Example
//!
//! ```
//! use framex::{SelectedFrame, archive};
//!
//! let frames = vec![
//!     Ok(SelectedFrame { index: 0, bytes: vec![1] }),
//!     Ok(SelectedFrame { index: 150, bytes: vec![2] }),
//! ];
//! let built = archive::build(frames, "png")?;
//!
//! let names: Vec<&str> = built.entries().iter().map(|entry| entry.name.as_str()).collect();
//! assert_eq!(names, ["frame_0001.png", "frame_0002.png"]);
//! # Ok::<(), framex::FramexError>(())
//! ```

use std::io::{Cursor, Seek, Write};

use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

use crate::error::FramexError;
use crate::sampler::SelectedFrame;

/// Suggested file name for a serialized archive.
pub const ARCHIVE_FILE_NAME: &str = "frames.zip";

/// MIME type of a serialized archive.
pub const ARCHIVE_CONTENT_TYPE: &str = "application/zip";

/// Entry name for the `sequence`-th frame (1-based).
///
/// Sequences above 9999 keep all their digits; the padding only guarantees a
/// minimum width.
pub fn entry_name(sequence: usize, format: &str) -> String {
    format!("frame_{sequence:04}.{format}")
}

/// One named payload inside an [`Archive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveEntry {
    /// Entry name, e.g. `frame_0001.png`.
    pub name: String,
    /// Decode-order index of the source frame.
    pub frame_index: u64,
    /// Encoded image bytes.
    pub bytes: Vec<u8>,
}

/// An ordered collection of named frame images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Archive {
    format: String,
    entries: Vec<ArchiveEntry>,
}

impl Archive {
    /// Image format shared by every entry.
    pub fn format(&self) -> &str {
        &self.format
    }

    /// Entries in selection order.
    pub fn entries(&self) -> &[ArchiveEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Visit each entry's name and bytes in order.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(&str, &[u8]),
    {
        for entry in &self.entries {
            visit(&entry.name, &entry.bytes);
        }
    }

    /// Serialize into a ZIP container written to `writer`.
    ///
    /// Returns the writer once the central directory has been written.
    pub fn write_zip<W: Write + Seek>(&self, writer: W) -> Result<W, FramexError> {
        let mut zip = ZipWriter::new(writer);
        let options = SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(6));

        for entry in &self.entries {
            zip.start_file(entry.name.as_str(), options)?;
            zip.write_all(&entry.bytes)?;
        }

        Ok(zip.finish()?)
    }

    /// Serialize into an in-memory ZIP file.
    pub fn to_zip(&self) -> Result<Vec<u8>, FramexError> {
        let cursor = self.write_zip(Cursor::new(Vec::new()))?;
        Ok(cursor.into_inner())
    }
}

/// Assemble `frames` into an [`Archive`], numbering them from 1 in
/// consumption order.
///
/// The first error in the sequence aborts the build; nothing partial is
/// returned.
pub fn build<I>(frames: I, format: &str) -> Result<Archive, FramexError>
where
    I: IntoIterator<Item = Result<SelectedFrame, FramexError>>,
{
    let mut entries = Vec::new();
    for frame in frames {
        let frame = frame?;
        entries.push(ArchiveEntry {
            name: entry_name(entries.len() + 1, format),
            frame_index: frame.index,
            bytes: frame.bytes,
        });
    }

    log::debug!("Archive built with {} {format} entries", entries.len());

    Ok(Archive {
        format: format.to_string(),
        entries,
    })
}
