//! Detection overlay: an ellipse per face with L-shaped corner accents and a
//! center dot. Geometry is computed here; the surface only draws primitives.

use crate::features::face::types::DetectionBox;

pub const OVERLAY_COLOR: &str = "#00ff00";
pub const OVERLAY_LINE_WIDTH: f64 = 3.0;
pub const CORNER_ARM: f64 = 10.0;
pub const CENTER_DOT_RADIUS: f64 = 4.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Three points: the arm end, the corner, the other arm end.
pub type CornerMark = [Point; 3];

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayShape {
    pub center: Point,
    pub radius_x: f64,
    pub radius_y: f64,
    pub corners: [CornerMark; 4],
}

impl OverlayShape {
    pub fn from_detection(detection: &DetectionBox, scale_x: f64, scale_y: f64) -> Self {
        let scaled = detection.scaled(scale_x, scale_y);
        let radius_x = scaled.width / 2.0;
        let radius_y = scaled.height / 2.0;
        let center = Point::new(scaled.x + radius_x, scaled.y + radius_y);

        let left = center.x - radius_x;
        let right = center.x + radius_x;
        let top = center.y - radius_y;
        let bottom = center.y + radius_y;

        let corners = [
            [
                Point::new(left, top + CORNER_ARM),
                Point::new(left, top),
                Point::new(left + CORNER_ARM, top),
            ],
            [
                Point::new(right - CORNER_ARM, top),
                Point::new(right, top),
                Point::new(right, top + CORNER_ARM),
            ],
            [
                Point::new(left, bottom - CORNER_ARM),
                Point::new(left, bottom),
                Point::new(left + CORNER_ARM, bottom),
            ],
            [
                Point::new(right - CORNER_ARM, bottom),
                Point::new(right, bottom),
                Point::new(right, bottom - CORNER_ARM),
            ],
        ];

        Self {
            center,
            radius_x,
            radius_y,
            corners,
        }
    }
}

/// 2D drawing primitives used by the overlay.
pub trait DrawSurface {
    fn clear(&mut self);
    fn stroke_ellipse(&mut self, center: Point, radius_x: f64, radius_y: f64);
    fn stroke_polylines(&mut self, lines: &[CornerMark]);
    fn fill_circle(&mut self, center: Point, radius: f64);
}

/// Clears the surface, then draws one shape per detection. A missing surface
/// draws nothing.
pub fn draw_detections<S: DrawSurface + ?Sized>(
    surface: Option<&mut S>,
    detections: &[DetectionBox],
    scale_x: f64,
    scale_y: f64,
) {
    let Some(surface) = surface else {
        return;
    };
    surface.clear();

    for detection in detections {
        let shape = OverlayShape::from_detection(detection, scale_x, scale_y);
        surface.stroke_ellipse(shape.center, shape.radius_x, shape.radius_y);
        surface.stroke_polylines(&shape.corners);
        surface.fill_circle(shape.center, CENTER_DOT_RADIUS);
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::CanvasSurface;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::{CornerMark, DrawSurface, OVERLAY_COLOR, OVERLAY_LINE_WIDTH, Point};
    use std::f64::consts::TAU;
    use wasm_bindgen::JsCast;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

    pub struct CanvasSurface {
        canvas: HtmlCanvasElement,
        context: CanvasRenderingContext2d,
    }

    impl CanvasSurface {
        /// Returns `None` when the canvas has no 2D context.
        pub fn new(canvas: HtmlCanvasElement) -> Option<Self> {
            let context = canvas
                .get_context("2d")
                .ok()
                .flatten()?
                .dyn_into::<CanvasRenderingContext2d>()
                .ok()?;
            Some(Self { canvas, context })
        }

        fn styled(&self, draw: impl FnOnce(&CanvasRenderingContext2d)) {
            self.context.save();
            self.context.set_stroke_style_str(OVERLAY_COLOR);
            self.context.set_fill_style_str(OVERLAY_COLOR);
            self.context.set_line_width(OVERLAY_LINE_WIDTH);
            self.context.begin_path();
            draw(&self.context);
            self.context.restore();
        }
    }

    impl DrawSurface for CanvasSurface {
        fn clear(&mut self) {
            self.context.clear_rect(
                0.0,
                0.0,
                f64::from(self.canvas.width()),
                f64::from(self.canvas.height()),
            );
        }

        fn stroke_ellipse(&mut self, center: Point, radius_x: f64, radius_y: f64) {
            self.styled(|ctx| {
                if ctx
                    .ellipse(center.x, center.y, radius_x, radius_y, 0.0, 0.0, TAU)
                    .is_ok()
                {
                    ctx.stroke();
                }
            });
        }

        fn stroke_polylines(&mut self, lines: &[CornerMark]) {
            self.styled(|ctx| {
                for [start, corner, end] in lines {
                    ctx.move_to(start.x, start.y);
                    ctx.line_to(corner.x, corner.y);
                    ctx.line_to(end.x, end.y);
                }
                ctx.stroke();
            });
        }

        fn fill_circle(&mut self, center: Point, radius: f64) {
            self.styled(|ctx| {
                if ctx.arc(center.x, center.y, radius, 0.0, TAU).is_ok() {
                    ctx.fill();
                }
            });
        }
    }
}
