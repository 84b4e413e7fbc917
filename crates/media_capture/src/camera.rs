//! Camera capture behind an RAII device guard

use repair_core::MediaReference;

use crate::capture::{capture_bytes, CaptureSource};
use crate::error::CaptureError;

/// A camera the platform layer hands us. Frames arrive already encoded
/// (JPEG unless the device says otherwise).
pub trait CameraDevice: Send {
    fn grab_frame(&mut self) -> Result<Vec<u8>, CaptureError>;

    fn mime_type(&self) -> &str {
        "image/jpeg"
    }

    /// Release the underlying capture device. Must be safe to call once.
    fn release(&mut self);
}

/// An open camera view.
///
/// The device is released on every exit path - explicit close, successful
/// snapshot followed by teardown, or an early drop - so a camera is never
/// left held after the view goes away.
pub struct CameraSession<D: CameraDevice> {
    device: D,
    released: bool,
}

impl<D: CameraDevice> CameraSession<D> {
    pub fn open(device: D) -> Self {
        Self {
            device,
            released: false,
        }
    }

    /// Grab one frame and normalize it like any other capture.
    pub fn snapshot(&mut self) -> Result<MediaReference, CaptureError> {
        let frame = self.device.grab_frame()?;
        let mime_type = self.device.mime_type().to_string();
        capture_bytes(&frame, &mime_type, CaptureSource::CameraSnapshot)
    }

    /// Close the view without taking a snapshot.
    pub fn close(mut self) {
        self.release_device();
    }

    fn release_device(&mut self) {
        if !self.released {
            self.device.release();
            self.released = true;
            log::debug!("camera device released");
        }
    }
}

impl<D: CameraDevice> Drop for CameraSession<D> {
    fn drop(&mut self) {
        self.release_device();
    }
}
