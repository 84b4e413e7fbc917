//! media_capture - Normalizes user submissions into transport-ready payloads
//!
//! Accepts a file-picker selection, a drag-and-drop, a clipboard paste
//! (image only), or a live camera snapshot, validates it, and produces a
//! [`repair_core::MediaReference`] carrying the base64 payload and a
//! locally displayable preview. Validation failures stay local to the
//! capture site; they never reach the session state machine.

pub mod camera;
pub mod capture;
pub mod error;

// Re-export commonly used types
pub use camera::{CameraDevice, CameraSession};
pub use capture::{capture_bytes, paste_image, pick_file, CaptureSource, MAX_PAYLOAD_BYTES};
pub use error::CaptureError;
