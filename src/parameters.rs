//! Request parameter parsing for transport layers.
//!
//! Form submissions arrive as loosely-typed text fields under a few
//! different spellings. [`RequestParameters`] collects them and
//! [`RequestParameters::to_sample_request`] validates them once, producing a
//! [`SampleRequest`] the core can trust.
//!
//! | Field | Aliases | Default |
//! |-------|---------|---------|
//! | frame cap | `maxFrames`, `max_frames` | 100 |
//! | interval (s) | `interval`, `intervalSeconds` | 5 |
//! | image format | `fmt`, `format` | `png` |
//!
//! ```
//! use framex::RequestParameters;
//!
//! let request = RequestParameters::new()
//!     .with("max_frames", "12")
//!     .with("fmt", ".JPG")
//!     .to_sample_request()?;
//!
//! assert_eq!(request.max_frames, 12);
//! assert_eq!(request.interval_seconds, 5);
//! assert_eq!(request.format, "jpg");
//! # Ok::<(), framex::FramexError>(())
//! ```

use crate::config::{
    DEFAULT_FORMAT, DEFAULT_INTERVAL_SECONDS, DEFAULT_MAX_FRAMES, SampleRequest,
};
use crate::error::FramexError;

const MAX_FRAMES_KEYS: &[&str] = &["maxFrames", "max_frames"];
const INTERVAL_KEYS: &[&str] = &["interval", "intervalSeconds"];
const FORMAT_KEYS: &[&str] = &["fmt", "format"];

/// Raw `(name, value)` fields as received from a form or query string.
#[derive(Debug, Clone, Default)]
pub struct RequestParameters {
    fields: Vec<(String, String)>,
}

impl RequestParameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field. Later duplicates do not override earlier ones.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    /// First non-blank value stored under any of `names`.
    fn lookup(&self, names: &[&str]) -> Option<&str> {
        self.fields
            .iter()
            .filter(|(name, _)| names.contains(&name.as_str()))
            .map(|(_, value)| value.trim())
            .find(|value| !value.is_empty())
    }

    /// Validate the fields into a [`SampleRequest`].
    ///
    /// # Errors
    ///
    /// Returns [`FramexError::InvalidRequest`] for non-numeric or negative
    /// numbers and for a zero interval. A zero frame cap is accepted; the
    /// extraction then reports [`FramexError::EmptyResult`].
    pub fn to_sample_request(&self) -> Result<SampleRequest, FramexError> {
        let max_frames = match self.lookup(MAX_FRAMES_KEYS) {
            Some(value) => parse_count("maxFrames", value)?,
            None => DEFAULT_MAX_FRAMES,
        };

        let interval_seconds = match self.lookup(INTERVAL_KEYS) {
            Some(value) => parse_count("interval", value)?,
            None => DEFAULT_INTERVAL_SECONDS,
        };
        if interval_seconds == 0 {
            return Err(FramexError::InvalidRequest(
                "interval must be greater than zero".to_string(),
            ));
        }

        let format = self
            .lookup(FORMAT_KEYS)
            .map(sanitize_format)
            .unwrap_or_else(|| DEFAULT_FORMAT.to_string());

        Ok(SampleRequest {
            max_frames,
            interval_seconds,
            format,
        })
    }
}

impl<K, V> FromIterator<(K, V)> for RequestParameters
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        }
    }
}

fn parse_count(name: &str, value: &str) -> Result<u32, FramexError> {
    value.parse::<u32>().map_err(|_| {
        FramexError::InvalidRequest(format!(
            "{name} must be a non-negative whole number, got {value:?}"
        ))
    })
}

/// Keep ASCII alphanumerics only, lower-cased; empty results become `png`.
///
/// The result is safe to use as a file extension inside the archive.
pub fn sanitize_format(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect();

    if cleaned.is_empty() {
        DEFAULT_FORMAT.to_string()
    } else {
        cleaned
    }
}
