//! Geometric primitives.
//!
//! Points and rectangles are plain `f32` values in surface coordinates
//! (origin at top-left, y growing downward). The rotation helpers here are
//! shared by layout (rotation-aware bounding sizes), hit-testing (inverse
//! rotation about a pivot) and the damage engine (rotated envelopes).

/// A point in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (exclusive).
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (exclusive).
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.right() && y >= self.y && y <= self.bottom()
    }

    /// True when the rectangles share actual area. Touching edges do not
    /// count.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// True when the rectangles share area or touch along an edge.
    pub fn touches(&self, other: &Rect) -> bool {
        self.x <= other.right()
            && self.right() >= other.x
            && self.y <= other.bottom()
            && self.bottom() >= other.y
    }

    /// True when `other` lies entirely inside this rectangle.
    pub fn contains_rect(&self, other: &Rect) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }

    /// The smallest rectangle covering both inputs.
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        Rect {
            x,
            y,
            width: self.right().max(other.right()) - x,
            height: self.bottom().max(other.bottom()) - y,
        }
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }
}

/// Corner radii for rounded-rect fills and clips, clockwise from top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadius {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_right: f32,
    pub bottom_left: f32,
}

impl CornerRadius {
    pub fn all(radius: f32) -> Self {
        Self {
            top_left: radius,
            top_right: radius,
            bottom_right: radius,
            bottom_left: radius,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.top_left == 0.0
            && self.top_right == 0.0
            && self.bottom_right == 0.0
            && self.bottom_left == 0.0
    }
}

impl From<f32> for CornerRadius {
    fn from(radius: f32) -> Self {
        Self::all(radius)
    }
}

/// `[top-left, top-right, bottom-right, bottom-left]`
impl From<[f32; 4]> for CornerRadius {
    fn from(radii: [f32; 4]) -> Self {
        Self {
            top_left: radii[0],
            top_right: radii[1],
            bottom_right: radii[2],
            bottom_left: radii[3],
        }
    }
}

/// Rotate `point` about `pivot` by `degrees`.
pub fn rotate_about(point: Point, pivot: Point, degrees: f32) -> Point {
    let radians = degrees.to_radians();
    let (sin, cos) = radians.sin_cos();
    let dx = point.x - pivot.x;
    let dy = point.y - pivot.y;
    Point {
        x: pivot.x + dx * cos - dy * sin,
        y: pivot.y + dx * sin + dy * cos,
    }
}

/// The four corners of `rect` after rotating it about `pivot`.
pub fn rotated_corners(rect: Rect, pivot: Point, degrees: f32) -> [Point; 4] {
    [
        rotate_about(Point::new(rect.x, rect.y), pivot, degrees),
        rotate_about(Point::new(rect.right(), rect.y), pivot, degrees),
        rotate_about(Point::new(rect.right(), rect.bottom()), pivot, degrees),
        rotate_about(Point::new(rect.x, rect.bottom()), pivot, degrees),
    ]
}

/// Axis-aligned envelope of `rect` rotated about `pivot`.
pub fn rotated_envelope(rect: Rect, pivot: Point, degrees: f32) -> Rect {
    let corners = rotated_corners(rect, pivot, degrees);
    let mut min_x = f32::INFINITY;
    let mut min_y = f32::INFINITY;
    let mut max_x = f32::NEG_INFINITY;
    let mut max_y = f32::NEG_INFINITY;
    for corner in corners {
        min_x = min_x.min(corner.x);
        min_y = min_y.min(corner.y);
        max_x = max_x.max(corner.x);
        max_y = max_y.max(corner.y);
    }
    Rect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Width/height of a `width`×`height` box after in-place rotation.
///
/// Rotation about the box center leaves the envelope centered, so only the
/// extents matter: |w·cos| + |h·sin| by |w·sin| + |h·cos|.
pub fn rotated_extent(width: f32, height: f32, degrees: f32) -> (f32, f32) {
    if degrees == 0.0 {
        return (width, height);
    }
    let radians = degrees.to_radians();
    let (sin, cos) = (radians.sin().abs(), radians.cos().abs());
    (width * cos + height * sin, width * sin + height * cos)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_intersects_excludes_touching_edges() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(10.0, 0.0, 10.0, 10.0);
        assert!(!a.intersects(&b));
        assert!(a.touches(&b));

        let c = Rect::new(5.0, 5.0, 10.0, 10.0);
        assert!(a.intersects(&c));
    }

    #[test]
    fn rect_union_covers_both() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(5.0, 5.0, 10.0, 10.0);
        let u = a.union(&b);
        assert!(u.contains_rect(&a));
        assert!(u.contains_rect(&b));
        assert_eq!(u, Rect::new(0.0, 0.0, 15.0, 15.0));
    }

    #[test]
    fn rotated_extent_quarter_turn_swaps_sides() {
        let (w, h) = rotated_extent(100.0, 50.0, 90.0);
        assert!((w - 50.0).abs() < 1e-3);
        assert!((h - 100.0).abs() < 1e-3);
    }

    #[test]
    fn rotate_about_pivot_is_fixed_point() {
        let pivot = Point::new(3.0, 4.0);
        for degrees in [0.0, 37.0, 90.0, 180.0, 270.0, 359.0] {
            let rotated = rotate_about(pivot, pivot, degrees);
            assert!((rotated.x - pivot.x).abs() < 1e-5);
            assert!((rotated.y - pivot.y).abs() < 1e-5);
        }
    }

    #[test]
    fn rotated_envelope_contains_all_corners() {
        let rect = Rect::new(10.0, 20.0, 30.0, 40.0);
        let pivot = rect.center();
        let envelope = rotated_envelope(rect, pivot, 33.0);
        for corner in rotated_corners(rect, pivot, 33.0) {
            assert!(envelope.contains(corner.x, corner.y));
        }
    }
}
