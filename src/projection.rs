//! Native-to-display coordinate mathematics.
//!
//! Detections come in the native pixel space of the captured image, while the
//! overlay is painted over the image element as laid out on screen. The
//! functions here are pure so they can be tested without any image loading.

use serde::Serialize;

/// Width and height in pixels.
///
/// Used both for the native size of an image resource and for the size of
/// the displayed image element.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Dimensions {
    pub width: f32,
    pub height: f32,
}

impl Dimensions {
    /// Create dimensions from width and height.
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Dimensions of an image that has not loaded yet.
    pub fn unknown() -> Self {
        Self::default()
    }

    /// Whether both axes are strictly positive.
    ///
    /// NaN fails the comparison, so it counts as unknown too.
    pub fn is_known(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

impl From<(u32, u32)> for Dimensions {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width as f32, height as f32)
    }
}

/// Axis-aligned box in native image pixels (top-left origin).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// A bounding box expressed in on-screen pixels of the displayed image.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectedAnnotation {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

/// Per-axis scale from native to display pixels.
///
/// Returns `None` while the native size is unknown. Axes are scaled
/// independently: the image element may itself be stretched by layout.
pub fn scale_factors(native: Dimensions, display: Dimensions) -> Option<(f32, f32)> {
    if !native.is_known() {
        return None;
    }
    Some((
        display.width / native.width,
        display.height / native.height,
    ))
}

/// Project one native-space box into display space with the given scale.
pub fn project_box(bbox: &BoundingBox, scale_x: f32, scale_y: f32) -> ProjectedAnnotation {
    ProjectedAnnotation {
        left: bbox.x * scale_x,
        top: bbox.y * scale_y,
        width: bbox.width * scale_x,
        height: bbox.height * scale_y,
    }
}

/// Project a batch of boxes from native to display space.
///
/// Output order matches input order. When the native dimensions are unknown
/// the result is empty; this is the "nothing to draw yet" state, not an error.
pub fn project<'a, I>(
    boxes: I,
    native: Dimensions,
    display: Dimensions,
) -> Vec<ProjectedAnnotation>
where
    I: IntoIterator<Item = &'a BoundingBox>,
{
    let Some((scale_x, scale_y)) = scale_factors(native, display) else {
        return Vec::new();
    };
    boxes
        .into_iter()
        .map(|b| project_box(b, scale_x, scale_y))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 0.0001;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    fn sample_boxes() -> Vec<BoundingBox> {
        vec![
            BoundingBox::new(50.0, 100.0, 150.0, 100.0),
            BoundingBox::new(200.0, 250.0, 120.0, 80.0),
            BoundingBox::new(450.0, 50.0, 90.0, 70.0),
            BoundingBox::new(0.0, 0.0, 0.0, 0.0),
        ]
    }

    #[test]
    fn test_identity_scale_returns_input() {
        let dims = Dimensions::new(800.0, 600.0);
        let boxes = sample_boxes();
        let projected = project(&boxes, dims, dims);

        assert_eq!(projected.len(), boxes.len());
        for (p, b) in projected.iter().zip(&boxes) {
            assert_eq!(p.left, b.x);
            assert_eq!(p.top, b.y);
            assert_eq!(p.width, b.width);
            assert_eq!(p.height, b.height);
        }
    }

    #[test]
    fn test_half_scale_example() {
        let boxes = [BoundingBox::new(100.0, 200.0, 50.0, 40.0)];
        let projected = project(
            &boxes,
            Dimensions::new(1000.0, 800.0),
            Dimensions::new(500.0, 400.0),
        );

        assert_eq!(
            projected,
            vec![ProjectedAnnotation {
                left: 50.0,
                top: 100.0,
                width: 25.0,
                height: 20.0,
            }]
        );
    }

    #[test]
    fn test_unknown_native_yields_empty() {
        let boxes = sample_boxes();
        let display = Dimensions::new(500.0, 400.0);

        assert!(project(&boxes, Dimensions::unknown(), display).is_empty());
        assert!(project(&boxes, Dimensions::new(0.0, 600.0), display).is_empty());
        assert!(project(&boxes, Dimensions::new(800.0, 0.0), display).is_empty());
        assert!(project(&boxes, Dimensions::new(f32::NAN, 600.0), display).is_empty());
    }

    #[test]
    fn test_doubling_display_width_doubles_x_axis() {
        let boxes = sample_boxes();
        let native = Dimensions::new(800.0, 600.0);
        let base = project(&boxes, native, Dimensions::new(400.0, 300.0));
        let wide = project(&boxes, native, Dimensions::new(800.0, 300.0));

        for (b, w) in base.iter().zip(&wide) {
            assert!(approx_eq(w.left, b.left * 2.0));
            assert!(approx_eq(w.width, b.width * 2.0));
            assert!(approx_eq(w.top, b.top));
            assert!(approx_eq(w.height, b.height));
        }
    }

    #[test]
    fn test_linear_in_scale_ratio() {
        let boxes = sample_boxes();
        let display = Dimensions::new(640.0, 480.0);
        let base = project(&boxes, Dimensions::new(800.0, 600.0), display);
        // Halving the native size doubles both scales
        let halved = project(&boxes, Dimensions::new(400.0, 300.0), display);

        for (b, h) in base.iter().zip(&halved) {
            assert!(approx_eq(h.left, b.left * 2.0));
            assert!(approx_eq(h.top, b.top * 2.0));
            assert!(approx_eq(h.width, b.width * 2.0));
            assert!(approx_eq(h.height, b.height * 2.0));
        }
    }

    #[test]
    fn test_independent_axes() {
        let (sx, sy) = scale_factors(
            Dimensions::new(800.0, 600.0),
            Dimensions::new(400.0, 600.0),
        )
        .unwrap();
        assert!(approx_eq(sx, 0.5));
        assert!(approx_eq(sy, 1.0));
    }

    #[test]
    fn test_project_is_idempotent() {
        let boxes = sample_boxes();
        let native = Dimensions::new(1024.0, 768.0);
        let display = Dimensions::new(333.0, 250.0);
        assert_eq!(
            project(&boxes, native, display),
            project(&boxes, native, display)
        );
    }

    #[test]
    fn test_dimensions_from_pixel_size() {
        assert_eq!(Dimensions::from((1000, 800)), Dimensions::new(1000.0, 800.0));
        assert!(!Dimensions::from((0, 800)).is_known());
    }

    #[test]
    fn test_order_preserved() {
        let boxes = sample_boxes();
        let dims = Dimensions::new(800.0, 600.0);
        let projected = project(&boxes, dims, dims);
        let lefts: Vec<f32> = projected.iter().map(|p| p.left).collect();
        assert_eq!(lefts, vec![50.0, 200.0, 450.0, 0.0]);
    }
}
