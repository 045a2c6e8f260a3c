//! Small geometric helpers shared by hole snapping and image placement.

use goods_kit_common::Point;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use ts_rs::TS;

/// Closest point to `point` on an open polyline.
///
/// Each segment contributes its clamped orthogonal projection and the one
/// with the smallest squared distance wins (earliest segment on ties). With
/// fewer than two vertices the query point comes back unchanged.
pub fn nearest_on_polyline(point: Point, polyline: &[Point]) -> Point {
    if polyline.len() < 2 {
        return point;
    }
    let mut best = point;
    let mut best_dist = f64::INFINITY;
    for seg in polyline.windows(2) {
        let candidate = project_onto_segment(point, seg[0], seg[1]);
        let d = candidate.distance_squared_to(point);
        if d < best_dist {
            best_dist = d;
            best = candidate;
        }
    }
    best
}

/// Closest point on a closed ring (the closing segment is included)
pub fn nearest_on_path(point: Point, ring: &[Point]) -> Point {
    match (ring.first(), ring.last()) {
        (Some(&first), Some(&last)) if ring.len() > 2 && first != last => {
            let mut closed = ring.to_vec();
            closed.push(first);
            nearest_on_polyline(point, &closed)
        }
        _ => nearest_on_polyline(point, ring),
    }
}

fn project_onto_segment(p: Point, a: Point, b: Point) -> Point {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len_sq = dx * dx + dy * dy;
    if len_sq == 0.0 {
        return a;
    }
    let t = (((p.x - a.x) * dx + (p.y - a.y) * dy) / len_sq).clamp(0.0, 1.0);
    Point::new(a.x + t * dx, a.y + t * dy)
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, TS, Display,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum FitMode {
    /// Whole image visible, letterboxed
    #[default]
    Fit,
    /// Box fully covered, image cropped
    Cover,
}

/// Where a scaled image lands inside its box
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema, TS)]
pub struct Placement {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    pub scale: f64,
}

/// Scale an `img_w` x `img_h` image into a box, centred.
///
/// Degenerate image sizes give a zero-sized placement at the box centre.
pub fn fit_contain(img_w: f64, img_h: f64, box_w: f64, box_h: f64, mode: FitMode) -> Placement {
    if img_w <= 0.0 || img_h <= 0.0 {
        return Placement { x: box_w / 2.0, y: box_h / 2.0, ..Default::default() };
    }
    let rx = box_w / img_w;
    let ry = box_h / img_h;
    let scale = match mode {
        FitMode::Fit => rx.min(ry),
        FitMode::Cover => rx.max(ry),
    };
    let w = img_w * scale;
    let h = img_h * scale;
    Placement {
        x: (box_w - w) / 2.0,
        y: (box_h - h) / 2.0,
        w,
        h,
        scale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pts(raw: &[(f64, f64)]) -> Vec<Point> {
        raw.iter().map(|&(x, y)| Point::new(x, y)).collect()
    }

    #[test]
    fn test_projection_lands_inside_segment() {
        let line = pts(&[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(nearest_on_polyline(Point::new(4.0, 3.0), &line), Point::new(4.0, 0.0));
    }

    #[test]
    fn test_projection_clamps_to_endpoints() {
        let line = pts(&[(0.0, 0.0), (10.0, 0.0)]);
        assert_eq!(nearest_on_polyline(Point::new(-5.0, 2.0), &line), Point::new(0.0, 0.0));
        assert_eq!(nearest_on_polyline(Point::new(15.0, -2.0), &line), Point::new(10.0, 0.0));
    }

    #[test]
    fn test_short_polylines_return_query() {
        let q = Point::new(3.0, 4.0);
        assert_eq!(nearest_on_polyline(q, &[]), q);
        assert_eq!(nearest_on_polyline(q, &pts(&[(0.0, 0.0)])), q);
    }

    #[test]
    fn test_closed_ring_uses_closing_segment() {
        let square = pts(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let q = Point::new(-3.0, 5.0);
        // open polyline misses the left edge
        assert_eq!(nearest_on_polyline(q, &square), Point::new(0.0, 0.0));
        assert_eq!(nearest_on_path(q, &square), Point::new(0.0, 5.0));
    }

    #[test]
    fn test_point_on_polyline_is_fixed() {
        let zigzag = pts(&[(0.0, 0.0), (5.0, 5.0), (10.0, 0.0)]);
        let on = Point::new(2.5, 2.5);
        assert_eq!(nearest_on_polyline(on, &zigzag), on);
    }

    #[test]
    fn test_fit_letterboxes_wide_image() {
        let p = fit_contain(200.0, 100.0, 100.0, 100.0, FitMode::Fit);
        assert_eq!(p, Placement { x: 0.0, y: 25.0, w: 100.0, h: 50.0, scale: 0.5 });
    }

    #[test]
    fn test_cover_crops_wide_image() {
        let p = fit_contain(200.0, 100.0, 100.0, 100.0, FitMode::Cover);
        assert_eq!(p, Placement { x: -50.0, y: 0.0, w: 200.0, h: 100.0, scale: 1.0 });
    }

    #[test]
    fn test_zero_sized_image() {
        let p = fit_contain(0.0, 10.0, 100.0, 80.0, FitMode::Fit);
        assert_eq!((p.x, p.y, p.w, p.h), (50.0, 40.0, 0.0, 0.0));
    }
}
