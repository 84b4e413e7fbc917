//! Projection of grid-normalized bounding boxes onto a rendered viewport

use serde::{Deserialize, Serialize};

use repair_core::{Annotation, GRID_SIZE};

/// Rendered dimensions of the displayed image, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

/// One overlay rectangle in viewport pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayBox {
    pub label: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// Project one annotation onto the viewport.
///
/// The source does not guarantee ordered or in-range coordinates, so each
/// value is clamped onto the grid and inverted min/max pairs are reordered
/// before scaling. The output always lies within the viewport.
pub fn project_annotation(annotation: &Annotation, viewport: Viewport) -> OverlayBox {
    let clamp = |value: i64| value.clamp(0, GRID_SIZE) as f32;

    let (y0, y1) = ordered(clamp(annotation.bounds.y_min), clamp(annotation.bounds.y_max));
    let (x0, x1) = ordered(clamp(annotation.bounds.x_min), clamp(annotation.bounds.x_max));

    let scale_x = viewport.width / GRID_SIZE as f32;
    let scale_y = viewport.height / GRID_SIZE as f32;

    OverlayBox {
        label: annotation.label.clone(),
        x: x0 * scale_x,
        y: y0 * scale_y,
        width: (x1 - x0) * scale_x,
        height: (y1 - y0) * scale_y,
    }
}

fn ordered(a: f32, b: f32) -> (f32, f32) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repair_core::BoundingBox;

    fn annotation(y_min: i64, x_min: i64, y_max: i64, x_max: i64) -> Annotation {
        Annotation {
            label: "defect".to_string(),
            bounds: BoundingBox {
                y_min,
                x_min,
                y_max,
                x_max,
            },
        }
    }

    const VIEWPORT: Viewport = Viewport {
        width: 800.0,
        height: 600.0,
    };

    fn assert_within_viewport(overlay: &OverlayBox) {
        assert!(overlay.x >= 0.0);
        assert!(overlay.y >= 0.0);
        assert!(overlay.x + overlay.width <= VIEWPORT.width + f32::EPSILON);
        assert!(overlay.y + overlay.height <= VIEWPORT.height + f32::EPSILON);
    }

    #[test]
    fn test_scaling_to_viewport() {
        let overlay = project_annotation(&annotation(250, 500, 750, 1000), VIEWPORT);
        assert_eq!(overlay.x, 400.0);
        assert_eq!(overlay.y, 150.0);
        assert_eq!(overlay.width, 400.0);
        assert_eq!(overlay.height, 300.0);
        assert_within_viewport(&overlay);
    }

    #[test]
    fn test_full_grid_covers_viewport() {
        let overlay = project_annotation(&annotation(0, 0, 1000, 1000), VIEWPORT);
        assert_eq!(overlay.width, VIEWPORT.width);
        assert_eq!(overlay.height, VIEWPORT.height);
    }

    #[test]
    fn test_out_of_range_values_are_clamped() {
        let overlay = project_annotation(&annotation(-200, -50, 1500, 2000), VIEWPORT);
        assert_within_viewport(&overlay);
        assert_eq!(overlay.width, VIEWPORT.width);
        assert_eq!(overlay.height, VIEWPORT.height);
    }

    #[test]
    fn test_inverted_pairs_are_reordered() {
        let overlay = project_annotation(&annotation(750, 1000, 250, 500), VIEWPORT);
        assert_eq!(overlay.x, 400.0);
        assert_eq!(overlay.y, 150.0);
        assert_eq!(overlay.width, 400.0);
        assert_eq!(overlay.height, 300.0);
    }

    #[test]
    fn test_any_valid_box_stays_in_bounds() {
        for bounds in [
            (0, 0, 0, 0),
            (1000, 1000, 1000, 1000),
            (1, 999, 2, 1000),
            (333, 12, 334, 13),
        ] {
            let overlay =
                project_annotation(&annotation(bounds.0, bounds.1, bounds.2, bounds.3), VIEWPORT);
            assert_within_viewport(&overlay);
        }
    }
}
