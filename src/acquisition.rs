//! Staging inputs as local video files.
//!
//! The sampler needs a seekable file on disk. [`VideoInput`] names where the
//! video comes from and an [`AcquisitionAdapter`] turns it into a
//! [`StagedVideo`]. Uploaded and downloaded videos live in a fresh temporary
//! directory owned by the `StagedVideo`; dropping it removes the directory,
//! so each request's staging area disappears on every exit path.
//!
//! # Example
//!
//! ```no_run
//! use framex::{Acquirer, AcquisitionAdapter, VideoInput};
//!
//! let staged = Acquirer::new().resolve(VideoInput::Upload {
//!     bytes: std::fs::read("clip.mov")?,
//!     file_name: Some("clip.mov".to_string()),
//! })?;
//! println!("staged at {}", staged.path().display());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use crate::error::FramexError;

/// Prefix of every per-request staging directory.
pub const STAGING_PREFIX: &str = "framex-";

const DEFAULT_EXTENSION: &str = "mp4";

/// Where a video comes from.
#[derive(Debug, Clone)]
pub enum VideoInput {
    /// A file already on local disk. Used in place and never deleted.
    Path(PathBuf),
    /// Raw uploaded bytes, with the client's file name if it sent one.
    Upload {
        bytes: Vec<u8>,
        file_name: Option<String>,
    },
    /// An `http` or `https` URL pointing directly at a video file.
    Remote(String),
}

impl VideoInput {
    /// Interpret a command-line style argument: URLs become
    /// [`VideoInput::Remote`], anything else a local path.
    pub fn from_arg(arg: &str) -> Self {
        if arg.contains("://") {
            VideoInput::Remote(arg.to_string())
        } else {
            VideoInput::Path(PathBuf::from(arg))
        }
    }
}

/// A local video file valid for the lifetime of this value.
#[derive(Debug)]
pub struct StagedVideo {
    path: PathBuf,
    staging: Option<TempDir>,
}

impl Drop for StagedVideo {
    fn drop(&mut self) {
        let Some(staging) = self.staging.take() else {
            return;
        };
        let directory = staging.path().to_path_buf();
        if let Err(error) = staging.close() {
            log::warn!(
                "Failed to remove staging directory {}: {error}",
                directory.display()
            );
        }
    }
}

impl StagedVideo {
    /// Path to hand to the decoder.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The owned staging directory, if the input had to be copied locally.
    pub fn staging_dir(&self) -> Option<&Path> {
        self.staging.as_ref().map(TempDir::path)
    }
}

/// Resolves a [`VideoInput`] to a local file.
///
/// Implement this to plug in other sources; the pipeline only depends on the
/// returned [`StagedVideo`].
pub trait AcquisitionAdapter {
    /// # Errors
    ///
    /// Every failure is reported as [`FramexError::AcquisitionFailed`].
    fn resolve(&self, input: VideoInput) -> Result<StagedVideo, FramexError>;
}

/// The default adapter: local paths, uploads, and direct HTTP(S) downloads.
#[derive(Debug, Clone, Default)]
pub struct Acquirer {
    staging_root: Option<PathBuf>,
}

impl Acquirer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create staging directories under `root` instead of the system
    /// temporary directory.
    #[must_use]
    pub fn with_staging_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.staging_root = Some(root.into());
        self
    }

    fn staging_dir(&self) -> Result<TempDir, FramexError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(STAGING_PREFIX);
        let created = match &self.staging_root {
            Some(root) => builder.tempdir_in(root),
            None => builder.tempdir(),
        };
        created.map_err(|error| {
            FramexError::AcquisitionFailed(format!("cannot create staging directory: {error}"))
        })
    }

    fn stage_local(&self, path: PathBuf) -> Result<StagedVideo, FramexError> {
        if !path.is_file() {
            return Err(FramexError::AcquisitionFailed(format!(
                "no such file: {}",
                path.display()
            )));
        }
        Ok(StagedVideo {
            path,
            staging: None,
        })
    }

    fn stage_upload(
        &self,
        bytes: Vec<u8>,
        file_name: Option<String>,
    ) -> Result<StagedVideo, FramexError> {
        if bytes.is_empty() {
            return Err(FramexError::AcquisitionFailed(
                "uploaded file is empty".to_string(),
            ));
        }

        let staging = self.staging_dir()?;
        let extension = upload_extension(file_name.as_deref());
        let path = staging.path().join(format!("video.{extension}"));

        fs::write(&path, &bytes).map_err(|error| {
            FramexError::AcquisitionFailed(format!("cannot store upload: {error}"))
        })?;
        log::debug!("Staged {} uploaded bytes at {}", bytes.len(), path.display());

        Ok(StagedVideo {
            path,
            staging: Some(staging),
        })
    }

    fn stage_remote(&self, url: &str) -> Result<StagedVideo, FramexError> {
        let scheme = url.split_once("://").map(|(scheme, _)| scheme);
        if !matches!(scheme, Some("http") | Some("https")) {
            return Err(FramexError::AcquisitionFailed(format!(
                "unsupported URL scheme: {url}"
            )));
        }

        let failed = |reason: String| FramexError::AcquisitionFailed(format!("{url}: {reason}"));

        let mut response = reqwest::blocking::get(url)
            .and_then(|response| response.error_for_status())
            .map_err(|error| failed(error.to_string()))?;

        let staging = self.staging_dir()?;
        let path = staging.path().join(format!("video.{DEFAULT_EXTENSION}"));
        let file = File::create(&path).map_err(|error| failed(error.to_string()))?;
        let mut writer = BufWriter::new(file);

        let downloaded = response
            .copy_to(&mut writer)
            .map_err(|error| failed(error.to_string()))?;
        writer.flush().map_err(|error| failed(error.to_string()))?;

        if downloaded == 0 {
            return Err(failed("download was empty".to_string()));
        }
        log::debug!("Downloaded {downloaded} bytes to {}", path.display());

        Ok(StagedVideo {
            path,
            staging: Some(staging),
        })
    }
}

/// Lower-cased ASCII alphanumeric extension of `file_name`, or `mp4`.
fn upload_extension(file_name: Option<&str>) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|extension| extension.to_str())
        .map(|extension| {
            extension
                .chars()
                .filter(char::is_ascii_alphanumeric)
                .map(|c| c.to_ascii_lowercase())
                .collect::<String>()
        })
        .filter(|extension| !extension.is_empty())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

impl AcquisitionAdapter for Acquirer {
    fn resolve(&self, input: VideoInput) -> Result<StagedVideo, FramexError> {
        match input {
            VideoInput::Path(path) => self.stage_local(path),
            VideoInput::Upload { bytes, file_name } => self.stage_upload(bytes, file_name),
            VideoInput::Remote(url) => self.stage_remote(&url),
        }
    }
}
