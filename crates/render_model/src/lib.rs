//! render_model - Pure projection of diagnosis results for display
//!
//! Converts grid-normalized annotations into viewport overlay rectangles
//! and tokenizes the free-text visual guide into emphasis spans. No
//! network, no decisions, no failure modes: malformed input renders as
//! literal text or a clamped box.

pub mod markup;
pub mod model;
pub mod overlay;

// Re-export commonly used types
pub use markup::{tokenize, GuideSpan, SpanKind};
pub use model::RenderModel;
pub use overlay::{project_annotation, OverlayBox, Viewport};
