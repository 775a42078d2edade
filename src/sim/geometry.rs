//! Axis-aligned rectangles and segment intersection
//!
//! Everything here is pure: no state, no allocation beyond return values.
//! Rectangles follow screen conventions: `(x, y)` is the top-left corner and
//! the box spans `[x, x + width) x [y, y + height)`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (walls, craft boxes, bullet boxes, coins)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Square box of the given half-size centered on `center`
    pub fn centered(center: Vec2, half_size: f32) -> Self {
        Self::new(
            center.x - half_size,
            center.y - half_size,
            half_size * 2.0,
            half_size * 2.0,
        )
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Strict overlap test; rectangles that only share an edge do not overlap
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Grow the rectangle by `dw, dh` in total, keeping its center
    pub fn inflate(&self, dw: f32, dh: f32) -> Self {
        Self::new(
            self.x - dw / 2.0,
            self.y - dh / 2.0,
            self.width + dw,
            self.height + dh,
        )
    }

    /// The four edges in order: top, right, bottom, left
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let tl = Vec2::new(self.x, self.y);
        let tr = Vec2::new(self.right(), self.y);
        let br = Vec2::new(self.right(), self.bottom());
        let bl = Vec2::new(self.x, self.bottom());
        [(tl, tr), (tr, br), (br, bl), (bl, tl)]
    }
}

/// Counter-clockwise orientation test for the triangle (a, b, c)
#[inline]
fn ccw(a: Vec2, b: Vec2, c: Vec2) -> bool {
    (c.y - a.y) * (b.x - a.x) > (b.y - a.y) * (c.x - a.x)
}

/// Whether segment `a-b` crosses segment `c-d`
///
/// Orientation-sign test: the endpoints of each segment must lie on opposite
/// sides of the other. Collinear and parallel configurations report no
/// intersection.
pub fn segments_intersect(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> bool {
    ccw(a, c, d) != ccw(b, c, d) && ccw(a, b, c) != ccw(a, b, d)
}

/// Whether segment `a-b` crosses any edge of `rect`
pub fn segment_intersects_rect(a: Vec2, b: Vec2, rect: &Rect) -> bool {
    rect.edges()
        .iter()
        .any(|&(c, d)| segments_intersect(a, b, c, d))
}

/// Parametric intersection of segment `a-b` with segment `c-d`
///
/// Solves `a + t(b - a) = c + u(d - c)` and returns the point when both
/// `t` and `u` lie in [0, 1]. A zero denominator (parallel or coincident
/// segments) yields `None`.
pub fn segment_intersection_point(a: Vec2, b: Vec2, c: Vec2, d: Vec2) -> Option<Vec2> {
    let denom = (a.x - b.x) * (c.y - d.y) - (a.y - b.y) * (c.x - d.x);
    if denom == 0.0 {
        return None;
    }
    let t = ((a.x - c.x) * (c.y - d.y) - (a.y - c.y) * (c.x - d.x)) / denom;
    let u = -((a.x - b.x) * (a.y - c.y) - (a.y - b.y) * (a.x - c.x)) / denom;
    if (0.0..=1.0).contains(&t) && (0.0..=1.0).contains(&u) {
        Some(a + t * (b - a))
    } else {
        None
    }
}

/// Point where segment `a-b` first meets `rect`, testing edges in order
///
/// The first edge (top, right, bottom, left) with a valid solution wins,
/// which is not necessarily the edge closest to `a`.
pub fn rect_intersection_point(a: Vec2, b: Vec2, rect: &Rect) -> Option<Vec2> {
    rect.edges()
        .iter()
        .find_map(|&(c, d)| segment_intersection_point(a, b, c, d))
}

/// Euclidean distance between two points
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    (b - a).length()
}
