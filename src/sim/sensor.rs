//! Ray-based line-of-sight sensing
//!
//! The laser is a straight segment from the craft's nose direction. It is cut
//! short at the first wall in arena order that it crosses, which is not
//! necessarily the nearest one.

use glam::Vec2;

use super::geometry::{Rect, distance, rect_intersection_point, segment_intersects_rect};
use crate::heading_vector;

/// Endpoint of the laser after truncation against the walls
pub fn laser_end(origin: Vec2, heading: f32, walls: &[Rect], max_range: f32) -> Vec2 {
    let end = origin + heading_vector(heading) * max_range;
    match walls.iter().find(|w| segment_intersects_rect(origin, end, w)) {
        // Orientation and parametric tests can disagree on grazing rays
        Some(wall) => rect_intersection_point(origin, end, wall).unwrap_or(end),
        None => end,
    }
}

/// Whether `target` is visible along the laser
///
/// Only range is compared: the target counts as seen when it is no farther
/// from the origin than the (possibly truncated) beam end, whatever its
/// bearing.
pub fn scan(origin: Vec2, heading: f32, target: Vec2, walls: &[Rect], max_range: f32) -> bool {
    let end = laser_end(origin, heading, walls, max_range);
    distance(origin, target) <= distance(origin, end)
}

/// Whether a short probe along the heading crosses any wall
pub fn is_obstacle_ahead(origin: Vec2, heading: f32, walls: &[Rect], probe_range: f32) -> bool {
    let end = origin + heading_vector(heading) * probe_range;
    walls.iter().any(|w| segment_intersects_rect(origin, end, w))
}

/// Stepped line-of-sight check between two points
///
/// Probe boxes of half-size `probe_half` are placed every `step` units from
/// `from` toward `to` (the far endpoint itself is not probed). Any overlap
/// with a wall blocks the view. Points closer than one step always see each
/// other.
pub fn clear_path(from: Vec2, to: Vec2, walls: &[Rect], step: f32, probe_half: f32) -> bool {
    let delta = to - from;
    let steps = (delta.length() / step) as u32;
    (0..steps).all(|i| {
        let probe = Rect::centered(from + delta * (i as f32 / steps as f32), probe_half);
        walls.iter().all(|w| !probe.overlaps(w))
    })
}
