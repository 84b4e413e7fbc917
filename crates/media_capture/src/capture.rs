//! Payload normalization and the non-camera capture sources

use std::fmt;
use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};

use repair_core::MediaReference;

use crate::error::CaptureError;

/// Maximum accepted payload size: 20 MB.
pub const MAX_PAYLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Where a submission came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureSource {
    FilePicker,
    DragAndDrop,
    ClipboardPaste,
    CameraSnapshot,
}

impl fmt::Display for CaptureSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FilePicker => "file picker",
            Self::DragAndDrop => "drag and drop",
            Self::ClipboardPaste => "clipboard paste",
            Self::CameraSnapshot => "camera snapshot",
        };
        f.write_str(name)
    }
}

/// Normalize raw bytes into a transport-ready [`MediaReference`].
///
/// Enforces the size limit, rejects empty payloads, restricts clipboard
/// pastes to images, classifies the media kind by MIME prefix, and
/// base64-encodes the content.
pub fn capture_bytes(
    bytes: &[u8],
    mime_type: &str,
    source: CaptureSource,
) -> Result<MediaReference, CaptureError> {
    if bytes.is_empty() {
        return Err(CaptureError::EmptyPayload);
    }
    if bytes.len() > MAX_PAYLOAD_BYTES {
        return Err(CaptureError::PayloadTooLarge {
            size: bytes.len(),
            limit: MAX_PAYLOAD_BYTES,
        });
    }
    if source == CaptureSource::ClipboardPaste && !mime_type.starts_with("image/") {
        return Err(CaptureError::UnsupportedMedia {
            captured_from: source,
            mime_type: mime_type.to_string(),
        });
    }

    let payload = general_purpose::STANDARD.encode(bytes);
    log::debug!(
        "normalized {} bytes of {} from {}",
        bytes.len(),
        mime_type,
        source
    );
    Ok(MediaReference::new(payload, mime_type, bytes.len()))
}

/// MIME type for a file extension, lowercased. Unknown extensions fall
/// back to a generic binary type, which classifies as an image downstream.
pub fn mime_for_extension(extension: &str) -> &'static str {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "bmp" => "image/bmp",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        _ => "application/octet-stream",
    }
}

/// Open the system file dialog and normalize the selected file.
pub async fn pick_file() -> Result<MediaReference, CaptureError> {
    let file = rfd::AsyncFileDialog::new()
        .add_filter(
            "photos and videos",
            &["jpg", "jpeg", "png", "gif", "bmp", "webp", "heic", "mp4", "mov", "webm", "avi"],
        )
        .pick_file()
        .await
        .ok_or(CaptureError::NoFileSelected)?;

    let extension = file
        .file_name()
        .rsplit('.')
        .next()
        .map(str::to_string)
        .unwrap_or_default();
    let bytes = file.read().await;

    capture_bytes(&bytes, mime_for_extension(&extension), CaptureSource::FilePicker)
}

/// Normalize an image from the system clipboard. The RGBA frame arboard
/// hands back is re-encoded as PNG before transport.
pub fn paste_image() -> Result<MediaReference, CaptureError> {
    let mut clipboard =
        arboard::Clipboard::new().map_err(|e| CaptureError::Clipboard(e.to_string()))?;
    let image = clipboard
        .get_image()
        .map_err(|e| CaptureError::Clipboard(e.to_string()))?;

    let frame = image::RgbaImage::from_raw(
        image.width as u32,
        image.height as u32,
        image.bytes.into_owned(),
    )
    .ok_or_else(|| {
        CaptureError::ImageEncoding("clipboard frame size does not match its data".to_string())
    })?;

    let mut encoded = Cursor::new(Vec::new());
    frame
        .write_to(&mut encoded, image::ImageFormat::Png)
        .map_err(|e| CaptureError::ImageEncoding(e.to_string()))?;

    capture_bytes(encoded.get_ref(), "image/png", CaptureSource::ClipboardPaste)
}
