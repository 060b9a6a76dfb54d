//! Error classification and message tests.

use std::path::Path;

use framex::{FfmpegDecoder, FramexError};

#[test]
fn client_errors_map_to_400() {
    let errors = [
        FramexError::SourceUnavailable {
            path: "clip.mp4".into(),
            reason: "Invalid data found when processing input".to_string(),
        },
        FramexError::EmptyResult,
        FramexError::AcquisitionFailed("uploaded file is empty".to_string()),
        FramexError::InvalidRequest("interval must be greater than zero".to_string()),
    ];

    for error in errors {
        assert!(error.is_client_error(), "{error:?}");
        assert_eq!(error.status_code(), 400, "{error:?}");
    }
}

#[test]
fn internal_errors_map_to_500() {
    let errors = [
        FramexError::ArchiveError("disk full".to_string()),
        FramexError::FfmpegError("scaler".to_string()),
        FramexError::IoError(std::io::Error::other("broken pipe")),
        FramexError::Cancelled,
    ];

    for error in errors {
        assert!(!error.is_client_error(), "{error:?}");
        assert_eq!(error.status_code(), 500, "{error:?}");
    }
}

#[test]
fn messages_name_the_failure() {
    let unavailable = FramexError::SourceUnavailable {
        path: "clip.mp4".into(),
        reason: "no video stream".to_string(),
    };
    assert_eq!(
        unavailable.to_string(),
        "Video source unavailable at clip.mp4: no video stream"
    );

    assert!(FramexError::EmptyResult.to_string().contains("No frames were extracted"));
    assert_eq!(FramexError::Cancelled.to_string(), "Operation cancelled");
}

#[test]
fn io_errors_convert() {
    let error: FramexError = std::io::Error::other("boom").into();
    assert!(matches!(error, FramexError::IoError(_)));
}

#[test]
fn zip_errors_become_archive_errors() {
    let error: FramexError = zip::result::ZipError::FileNotFound.into();
    assert!(matches!(error, FramexError::ArchiveError(_)));
    assert_eq!(error.status_code(), 500);
}

#[test]
fn open_nonexistent_file() {
    let result = FfmpegDecoder::open("this_file_does_not_exist.mp4");

    let error = result.unwrap_err();
    assert!(matches!(error, FramexError::SourceUnavailable { .. }));
    assert!(
        error.to_string().contains("this_file_does_not_exist.mp4"),
        "Error message should name the path: {error}",
    );
}

#[test]
fn open_invalid_file() {
    let temporary_directory = tempfile::tempdir().expect("Failed to create temp dir");
    let invalid_file_path = temporary_directory.path().join("invalid.mp4");
    std::fs::write(&invalid_file_path, b"this is not a media file")
        .expect("Failed to write invalid file");

    let result = FfmpegDecoder::open(&invalid_file_path);
    assert!(matches!(result, Err(FramexError::SourceUnavailable { .. })));
}

#[test]
fn open_audio_only_file_has_no_video_stream() {
    let path = "tests/fixtures/sample_audio.wav";
    if !Path::new(path).exists() {
        return;
    }

    let result = FfmpegDecoder::open(path);
    assert!(matches!(result, Err(FramexError::SourceUnavailable { .. })));
}
