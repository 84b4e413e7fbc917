//! Local validation errors raised at the capture site

use thiserror::Error;

use crate::capture::CaptureSource;

/// Error type for capture and normalization failures.
///
/// These are user-input validation errors: they are surfaced inline where
/// the capture happened and never transition the session state machine.
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("payload of {size} bytes exceeds the {limit} byte limit")]
    PayloadTooLarge { size: usize, limit: usize },

    #[error("captured payload is empty")]
    EmptyPayload,

    #[error("{captured_from} does not accept {mime_type}")]
    UnsupportedMedia {
        captured_from: CaptureSource,
        mime_type: String,
    },

    #[error("no file selected")]
    NoFileSelected,

    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("image encoding failed: {0}")]
    ImageEncoding(String),

    #[error("camera unavailable: {0}")]
    CameraUnavailable(String),
}
