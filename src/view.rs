//! Pan/zoom mapping between the unbounded logical plane and the screen.

use std::ops::RangeInclusive;

use log::trace;

pub const MIN_SCALE: f64 = 20.0;
pub const MAX_SCALE: f64 = 300.0;
pub const DEFAULT_SCALE: f64 = 80.0;
pub const ZOOM_OUT_FACTOR: f64 = 0.9;
pub const ZOOM_IN_FACTOR: f64 = 1.1;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point,
    pub to: Point,
}

/// Visible region of the plane, in logical units. `top > bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Bounds {
    /// Integer x coordinates inside `[left, right]`.
    pub fn columns(&self) -> RangeInclusive<i64> {
        integer_span(self.left, self.right)
    }

    /// Integer y coordinates inside `[bottom, top]`.
    pub fn rows(&self) -> RangeInclusive<i64> {
        integer_span(self.bottom, self.top)
    }
}

/// Floors both ends. An origin panned to infinity or NaN yields an empty
/// range. Finite ends beyond `i64` saturate; bounds from a [`ViewTransform`]
/// are at most `viewport / MIN_SCALE` wide, so the range stays short.
fn integer_span(low: f64, high: f64) -> RangeInclusive<i64> {
    if low.is_finite() && high.is_finite() {
        low.floor() as i64..=high.floor() as i64
    } else {
        RangeInclusive::new(1, 0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// Screen position of logical (0, 0).
    pub origin: Point,
    pub scale: f64,
    pub drag_anchor: Option<Point>,
}

#[derive(Debug, Clone)]
pub struct ViewTransform {
    state: ViewState,
}

impl ViewTransform {
    pub fn new(origin: Point, scale: f64) -> Self {
        Self {
            state: ViewState {
                origin,
                scale: scale.clamp(MIN_SCALE, MAX_SCALE),
                drag_anchor: None,
            },
        }
    }

    /// Origin at the viewport center, default scale.
    pub fn centered(viewport_width: f64, viewport_height: f64) -> Self {
        Self::new(
            Point::new(viewport_width / 2.0, viewport_height / 2.0),
            DEFAULT_SCALE,
        )
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn scale(&self) -> f64 {
        self.state.scale
    }

    pub fn origin(&self) -> Point {
        self.state.origin
    }

    pub fn to_screen(&self, x: f64, y: f64) -> Point {
        Point::new(
            self.state.origin.x + x * self.state.scale,
            self.state.origin.y - y * self.state.scale,
        )
    }

    pub fn to_logical(&self, px: f64, py: f64) -> Point {
        Point::new(
            (px - self.state.origin.x) / self.state.scale,
            (self.state.origin.y - py) / self.state.scale,
        )
    }

    pub fn visible_bounds(&self, viewport_width: f64, viewport_height: f64) -> Bounds {
        let ViewState { origin, scale, .. } = self.state;
        Bounds {
            left: -origin.x / scale,
            right: (viewport_width - origin.x) / scale,
            top: origin.y / scale,
            bottom: (origin.y - viewport_height) / scale,
        }
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.state.origin.x += dx;
        self.state.origin.y += dy;
    }

    /// Positive deltas zoom out, anything else zooms in. Anchored at the origin.
    pub fn zoom_by(&mut self, wheel_delta: f64) {
        let factor = if wheel_delta > 0.0 {
            ZOOM_OUT_FACTOR
        } else {
            ZOOM_IN_FACTOR
        };
        let wanted = self.state.scale * factor;
        self.state.scale = wanted.clamp(MIN_SCALE, MAX_SCALE);
        if self.state.scale != wanted {
            trace!("zoom clamped to {}", self.state.scale);
        }
    }

    pub fn begin_drag(&mut self, at: Point) {
        self.state.drag_anchor = Some(at);
    }

    /// Pans by the motion since the last pointer position. Ignored when no drag is active.
    pub fn drag_to(&mut self, at: Point) {
        if let Some(anchor) = self.state.drag_anchor {
            self.pan(at.x - anchor.x, at.y - anchor.y);
            self.state.drag_anchor = Some(at);
        }
    }

    pub fn end_drag(&mut self) {
        self.state.drag_anchor = None;
    }

    pub fn is_dragging(&self) -> bool {
        self.state.drag_anchor.is_some()
    }

    // ------------------------------------------------------------------
    // Plane geometry
    // ------------------------------------------------------------------

    /// Full-height vertical and full-width horizontal lines at every visible integer.
    pub fn grid_lines(&self, viewport_width: f64, viewport_height: f64) -> Vec<Segment> {
        let bounds = self.visible_bounds(viewport_width, viewport_height);
        let vertical = bounds.columns().map(|x| {
            let px = self.to_screen(x as f64, 0.0).x;
            Segment {
                from: Point::new(px, 0.0),
                to: Point::new(px, viewport_height),
            }
        });
        let horizontal = bounds.rows().map(|y| {
            let py = self.to_screen(0.0, y as f64).y;
            Segment {
                from: Point::new(0.0, py),
                to: Point::new(viewport_width, py),
            }
        });
        vertical.chain(horizontal).collect()
    }

    /// The x axis then the y axis, spanning the viewport.
    pub fn axes(&self, viewport_width: f64, viewport_height: f64) -> [Segment; 2] {
        let origin = self.state.origin;
        [
            Segment {
                from: Point::new(0.0, origin.y),
                to: Point::new(viewport_width, origin.y),
            },
            Segment {
                from: Point::new(origin.x, 0.0),
                to: Point::new(origin.x, viewport_height),
            },
        ]
    }

    /// Integer tick labels along both axes for the visible range.
    pub fn axis_labels(&self, viewport_width: f64, viewport_height: f64) -> Vec<AxisLabel> {
        let bounds = self.visible_bounds(viewport_width, viewport_height);
        let origin = self.state.origin;
        let scale = self.state.scale;
        let along_x = bounds.columns().map(|x| AxisLabel {
            value: x,
            at: Point::new(origin.x + x as f64 * scale + 2.0, origin.y - 4.0),
        });
        let along_y = bounds.rows().map(|y| AxisLabel {
            value: y,
            at: Point::new(origin.x + 4.0, origin.y - y as f64 * scale - 2.0),
        });
        along_x.chain(along_y).collect()
    }

    /// Screen polyline of `y = slope * x + intercept` over the sampled x range.
    pub fn line_polyline(&self, slope: f64, intercept: f64) -> Vec<Point> {
        (0..=BOUNDARY_SAMPLES)
            .map(|i| {
                let x = BOUNDARY_X_MIN + i as f64 * BOUNDARY_STEP;
                self.to_screen(x, slope * x + intercept)
            })
            .collect()
    }
}

pub const BOUNDARY_X_MIN: f64 = -50.0;
pub const BOUNDARY_X_MAX: f64 = 50.0;
pub const BOUNDARY_STEP: f64 = 0.1;
const BOUNDARY_SAMPLES: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisLabel {
    pub value: i64,
    pub at: Point,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferencePoint {
    pub at: Point,
    pub label: &'static str,
}

pub const REFERENCE_POINTS: [ReferencePoint; 4] = [
    ReferencePoint {
        at: Point::new(0.0, 1.0),
        label: "(far, fast)",
    },
    ReferencePoint {
        at: Point::new(1.0, 1.0),
        label: "(near, fast)",
    },
    ReferencePoint {
        at: Point::new(0.0, 0.0),
        label: "(far, slow)",
    },
    ReferencePoint {
        at: Point::new(1.0, 0.0),
        label: "(near, slow)",
    },
];
