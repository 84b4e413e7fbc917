//! Captured media - transport-ready payloads and their classification

use serde::{Deserialize, Serialize};

/// Broad classification of a captured payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

impl MediaKind {
    /// Classify a payload by its declared MIME type prefix.
    ///
    /// `video/*` is video; everything else is treated as an image.
    pub fn from_mime(mime_type: &str) -> Self {
        if mime_type.starts_with("video/") {
            Self::Video
        } else {
            Self::Image
        }
    }
}

/// A user submission normalized for transport to the model service.
///
/// Immutable once created. The payload is already base64-encoded; the
/// preview is a data URL suitable for local display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaReference {
    mime_type: String,
    kind: MediaKind,
    payload: String,
    preview: String,
    byte_len: usize,
}

impl MediaReference {
    /// Create a reference from an already base64-encoded payload.
    ///
    /// `byte_len` is the decoded payload length, used for emptiness and
    /// size reporting without re-decoding.
    pub fn new(payload: impl Into<String>, mime_type: impl Into<String>, byte_len: usize) -> Self {
        let mime_type = mime_type.into();
        let payload = payload.into();
        let preview = format!("data:{};base64,{}", mime_type, payload);
        Self {
            kind: MediaKind::from_mime(&mime_type),
            mime_type,
            payload,
            preview,
            byte_len,
        }
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    /// Base64-encoded payload ready for an inline-data request part.
    pub fn payload(&self) -> &str {
        &self.payload
    }

    /// Data-URL preview for local display.
    pub fn preview(&self) -> &str {
        &self.preview
    }

    /// Decoded payload length in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    pub fn is_empty(&self) -> bool {
        self.byte_len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_mime_prefix() {
        assert_eq!(MediaKind::from_mime("image/jpeg"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime("image/png"), MediaKind::Image);
        assert_eq!(MediaKind::from_mime("video/mp4"), MediaKind::Video);
        assert_eq!(MediaKind::from_mime("video/quicktime"), MediaKind::Video);
        // Unknown types fall back to image
        assert_eq!(MediaKind::from_mime("application/octet-stream"), MediaKind::Image);
    }

    #[test]
    fn test_reference_builds_preview() {
        let media = MediaReference::new("aGVsbG8=", "image/png", 5);
        assert_eq!(media.preview(), "data:image/png;base64,aGVsbG8=");
        assert_eq!(media.kind(), MediaKind::Image);
        assert_eq!(media.byte_len(), 5);
        assert!(!media.is_empty());
    }

    #[test]
    fn test_empty_reference() {
        let media = MediaReference::new("", "image/jpeg", 0);
        assert!(media.is_empty());
    }
}
