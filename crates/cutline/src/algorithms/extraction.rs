use goods_kit_common::Point;
use imageproc::contours::BorderType;
use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use tracing::{debug, warn};
use crate::{
    algorithms::simplification::{simplify_points, DEFAULT_TOLERANCE},
    traits::ContourTracer,
    types::{Mask, Path},
};

/// Moore neighborhood, clockwise from east (y grows downward)
const DIRECTIONS: [(i64, i64); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Safety bound on the walk, as a multiple of the pixel count
const STEP_CAP_FACTOR: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TraceOptions {
    /// Steps the walk must take before arriving back at the start ends it
    pub min_closing_steps: usize,
    /// RDP tolerance in pixels
    pub tolerance: f64,
}

impl Default for TraceOptions {
    fn default() -> Self {
        Self {
            min_closing_steps: 10,
            tolerance: DEFAULT_TOLERANCE,
        }
    }
}

/// Moore-neighbor boundary follower around the first foreground pixel
#[derive(Debug, Clone, Default)]
pub struct MooreTracer {
    pub options: TraceOptions,
}

impl MooreTracer {
    pub fn new(options: TraceOptions) -> Self {
        Self { options }
    }

    /// Raw boundary walk, one point per visited pixel
    pub fn walk(&self, mask: &Mask) -> Vec<Point> {
        let Some((sx, sy)) = first_foreground(mask) else {
            return Vec::new();
        };
        let cap = mask.width() as usize * mask.height() as usize * STEP_CAP_FACTOR;

        let mut path = vec![Point::new(sx as f64, sy as f64)];
        let (mut x, mut y) = (sx, sy);
        // the row-major scan guarantees west, north-west, north and north-east are clear
        let mut dir = 0usize;
        let mut steps = 0usize;

        loop {
            let search_start = if dir % 2 == 0 { (dir + 7) % 8 } else { (dir + 6) % 8 };
            let next = (0..8).map(|k| (search_start + k) % 8).find(|&d| {
                let (dx, dy) = DIRECTIONS[d];
                mask.is_solid_at(x + dx, y + dy)
            });
            let Some(d) = next else {
                break;
            };

            let (dx, dy) = DIRECTIONS[d];
            x += dx;
            y += dy;
            dir = d;
            steps += 1;

            if x == sx && y == sy && steps >= self.options.min_closing_steps {
                break;
            }
            path.push(Point::new(x as f64, y as f64));

            if steps >= cap {
                warn!(steps, cap, "boundary walk hit its step cap; keeping partial outline");
                break;
            }
        }
        path
    }
}

impl ContourTracer for MooreTracer {
    fn trace(&self, mask: &Mask) -> Path {
        let raw = self.walk(mask);
        if raw.len() < 2 {
            // nothing, or a lone pixel with no outline to speak of
            return Path::default();
        }
        let simplified = simplify_points(&raw, self.options.tolerance);
        debug!(raw = raw.len(), simplified = simplified.len(), "traced outline");
        Path::new(simplified)
    }
}

fn first_foreground(mask: &Mask) -> Option<(i64, i64)> {
    mask.as_gray()
        .enumerate_pixels()
        .find(|(_, _, p)| p[0] != Mask::CLEAR)
        .map(|(x, y, _)| (i64::from(x), i64::from(y)))
}

/// Imageproc-based tracer keeping the longest outer border
#[derive(Debug, Clone, Default)]
pub struct ImageprocContourTracer {
    pub tolerance: f64,
}

impl ContourTracer for ImageprocContourTracer {
    fn trace(&self, mask: &Mask) -> Path {
        let contours = imageproc::contours::find_contours::<i32>(mask.as_gray());

        let Some(outer) = contours
            .into_iter()
            .filter(|c| c.border_type == BorderType::Outer)
            .max_by_key(|c| c.points.len())
        else {
            return Path::default();
        };

        let raw: Vec<Point> = outer
            .points
            .iter()
            .map(|p| Point::new(f64::from(p.x), f64::from(p.y)))
            .collect();
        if raw.len() < 2 {
            return Path::default();
        }
        Path::new(simplify_points(&raw, self.tolerance))
    }
}

/// Trace with the default Moore tracer and 0.8px simplification
pub fn trace(mask: &Mask) -> Path {
    MooreTracer::default().trace(mask)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> Mask {
        Mask::from_fn(width, height, |x, y| (x0..=x1).contains(&x) && (y0..=y1).contains(&y))
    }

    #[test]
    fn test_empty_mask_traces_nothing() {
        assert!(trace(&Mask::new(40, 40)).is_empty());
        assert!(ImageprocContourTracer::default().trace(&Mask::new(40, 40)).is_empty());
    }

    #[test]
    fn test_lone_pixel_traces_nothing() {
        let mut mask = Mask::new(10, 10);
        mask.set(4, 4, true);
        assert!(trace(&mask).is_empty());
    }

    #[test]
    fn test_walk_starts_at_first_row_major_pixel() {
        let mask = rect(30, 30, 5, 8, 20, 18);
        let walk = MooreTracer::default().walk(&mask);
        assert_eq!(walk[0], Point::new(5.0, 8.0));
        // clockwise on screen: heads east along the top edge first
        assert_eq!(walk[1], Point::new(6.0, 8.0));
    }

    #[test]
    fn test_walk_closes_on_the_start() {
        let mask = rect(30, 30, 5, 5, 14, 14);
        let walk = MooreTracer::default().walk(&mask);
        // a 10x10 block has 36 border pixels, each visited once
        assert_eq!(walk.len(), 36);
        let last = walk[walk.len() - 1];
        assert!(last.distance_to(walk[0]) <= 1.5);
    }

    #[test]
    fn test_rectangle_simplifies_to_corners() {
        let mask = rect(30, 30, 5, 5, 14, 14);
        let path = trace(&mask);
        for corner in [(5.0, 5.0), (14.0, 5.0), (14.0, 14.0), (5.0, 14.0)] {
            assert!(path.points().contains(&Point::new(corner.0, corner.1)), "missing {corner:?}");
        }
        assert!(path.len() <= 6);
    }

    #[test]
    fn test_traced_points_lie_on_foreground() {
        let mask = Mask::from_fn(80, 80, |x, y| {
            let dx = f64::from(x) - 40.0;
            let dy = f64::from(y) - 40.0;
            dx * dx + dy * dy <= 30.0 * 30.0
        });
        let walk = MooreTracer::default().walk(&mask);
        assert!(walk.iter().all(|p| mask.is_solid(p.x as u32, p.y as u32)));

        let path = trace(&mask);
        assert!(path.len() >= 8 && path.len() < 100, "{} points", path.len());
        let area = path.area();
        let expected = std::f64::consts::PI * 30.0 * 30.0;
        assert!((area - expected).abs() / expected < 0.1, "area {area}");
    }

    #[test]
    fn test_thin_line_terminates() {
        let mask = rect(40, 10, 5, 4, 30, 4);
        let path = trace(&mask);
        assert!(path.len() >= 2);
        let bbox = path.bounding_box().unwrap();
        assert_eq!((bbox.min_x, bbox.max_x), (5.0, 30.0));
    }

    #[test]
    fn test_imageproc_tracer_matches_extent() {
        let mask = rect(30, 30, 5, 5, 14, 14);
        let path = ImageprocContourTracer { tolerance: DEFAULT_TOLERANCE }.trace(&mask);
        let bbox = path.bounding_box().unwrap();
        assert_eq!((bbox.min_x, bbox.min_y, bbox.max_x, bbox.max_y), (5.0, 5.0, 14.0, 14.0));
    }
}
