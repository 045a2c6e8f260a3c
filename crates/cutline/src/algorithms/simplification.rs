use geo_types::{Coord, LineString};
use goods_kit_common::Point;

/// Tolerance used for traced outlines, in pixels
pub const DEFAULT_TOLERANCE: f64 = 0.8;

/// Ramer-Douglas-Peucker through geo's implementation, always keeping both
/// endpoints.
///
/// Distances are measured to the chord segment, so a traced ring that ends
/// next to its start keeps its far side. A point is kept only when it lies
/// strictly farther than `tolerance`, which makes a second pass a no-op.
pub fn simplify_points(points: &[Point], tolerance: f64) -> Vec<Point> {
    use geo::Simplify;

    if points.len() < 3 {
        return points.to_vec();
    }
    let line: LineString<f64> = points
        .iter()
        .map(|p| Coord { x: p.x, y: p.y })
        .collect();
    line.simplify(&tolerance)
        .coords()
        .map(|c| Point::new(c.x, c.y))
        .collect()
}
