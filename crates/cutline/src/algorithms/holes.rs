use goods_kit_common::Point;
use imageproc::drawing::draw_filled_circle_mut;
use image::Luma;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use tracing::debug;
use ts_rs::TS;
use crate::types::Mask;

/// How hole centers are chosen
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, TS, Display,
    EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HoleMode {
    /// Anchored on the foreground bounding box
    #[default]
    Auto,
    /// Caller-supplied positions
    Manual,
}

/// Edge of the silhouette the auto placer anchors to
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, TS, Display,
    EnumString, EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HoleSide {
    #[default]
    Top,
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase", default)]
pub struct HoleOptions {
    pub mode: HoleMode,
    pub side: HoleSide,
    /// 1 or 2; anything else is clamped into that range
    pub count: u8,
    pub hole_radius_px: f64,
    pub ear_radius_px: f64,
    /// Inset from the bounding box edge
    pub safe_pad_px: f64,
    /// Used as-is in manual mode
    pub manual_positions: Vec<Point>,
}

impl Default for HoleOptions {
    fn default() -> Self {
        // 3mm hole in a 6mm ear, 4mm from the edge, at 300 dpi
        Self {
            mode: HoleMode::Auto,
            side: HoleSide::Top,
            count: 1,
            hole_radius_px: 17.7,
            ear_radius_px: 35.4,
            safe_pad_px: 47.2,
            manual_positions: Vec::new(),
        }
    }
}

impl HoleOptions {
    pub fn clamped_count(&self) -> u8 {
        self.count.clamp(1, 2)
    }

    /// Ear radius, forced strictly larger than the hole
    pub fn effective_ear_radius(&self) -> f64 {
        self.ear_radius_px.max(self.hole_radius_px + 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
pub struct PlacedHole {
    pub cx: f64,
    pub cy: f64,
    pub r: f64,
}

impl PlacedHole {
    pub fn center(&self) -> Point {
        Point::new(self.cx, self.cy)
    }
}

#[derive(Debug, Clone)]
pub struct HolePlacement {
    pub mask: Mask,
    pub holes: Vec<PlacedHole>,
}

/// Centers the placer would drill for `mask`, without touching it.
///
/// Auto mode on a blank mask yields no centers.
pub fn hole_centers(mask: &Mask, opts: &HoleOptions) -> Vec<Point> {
    if opts.mode == HoleMode::Manual {
        return opts.manual_positions.clone();
    }
    let Some(bbox) = mask.bounding_box() else {
        return Vec::new();
    };
    let pad = opts.safe_pad_px.max(0.0);
    let mid = bbox.center();

    let anchor = match opts.side {
        HoleSide::Top => Point::new(mid.x, bbox.min_y + pad),
        HoleSide::Left => Point::new(bbox.min_x + pad, mid.y),
        HoleSide::Right => Point::new(bbox.max_x - pad, mid.y),
    };

    let centers = if opts.clamped_count() == 1 {
        vec![anchor]
    } else {
        let spread = 1.5 * pad;
        match opts.side {
            HoleSide::Top => vec![anchor.translate(-spread, 0.0), anchor.translate(spread, 0.0)],
            HoleSide::Left | HoleSide::Right => {
                vec![anchor.translate(0.0, -spread), anchor.translate(0.0, spread)]
            }
        }
    };

    centers.into_iter().map(|c| bbox.clamp_inset(c, pad)).collect()
}

/// Paint an ear around every center, then drill every hole.
///
/// All ears go down before any hole so overlapping ears never refill a
/// neighbouring hole.
pub fn drill(mask: &Mask, centers: &[Point], opts: &HoleOptions) -> HolePlacement {
    let hole_r = opts.hole_radius_px.max(0.0);
    let ear_r = opts.effective_ear_radius();
    let mut out = mask.clone();

    for c in centers {
        draw_filled_circle_mut(out.as_gray_mut(), pixel(*c), ear_r.round() as i32, Luma([Mask::SOLID]));
    }
    for c in centers {
        draw_filled_circle_mut(out.as_gray_mut(), pixel(*c), hole_r.round() as i32, Luma([Mask::CLEAR]));
    }

    let holes: Vec<PlacedHole> = centers
        .iter()
        .map(|c| PlacedHole { cx: c.x, cy: c.y, r: hole_r })
        .collect();
    debug!(count = holes.len(), hole_r, ear_r, "drilled holes");
    HolePlacement { mask: out, holes }
}

/// Compute centers for `base` and drill them into a copy of it
pub fn place_holes_and_drill(base: &Mask, opts: &HoleOptions) -> HolePlacement {
    let centers = hole_centers(base, opts);
    drill(base, &centers, opts)
}

fn pixel(p: Point) -> (i32, i32) {
    (p.x.round() as i32, p.y.round() as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(size: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> Mask {
        Mask::from_fn(size, size, |x, y| (x0..=x1).contains(&x) && (y0..=y1).contains(&y))
    }

    fn opts(side: HoleSide, count: u8) -> HoleOptions {
        HoleOptions {
            side,
            count,
            hole_radius_px: 4.0,
            ear_radius_px: 8.0,
            safe_pad_px: 10.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_top_anchor_is_inset_from_the_top_edge() {
        let mask = block(120, 20, 30, 100, 110);
        let centers = hole_centers(&mask, &opts(HoleSide::Top, 1));
        assert_eq!(centers, vec![Point::new(60.0, 40.0)]);
    }

    #[test]
    fn test_side_anchors() {
        let mask = block(120, 20, 30, 100, 110);
        assert_eq!(hole_centers(&mask, &opts(HoleSide::Left, 1)), vec![Point::new(30.0, 70.0)]);
        assert_eq!(hole_centers(&mask, &opts(HoleSide::Right, 1)), vec![Point::new(90.0, 70.0)]);
    }

    #[test]
    fn test_two_holes_spread_across_the_edge() {
        let mask = block(120, 20, 30, 100, 110);
        let top = hole_centers(&mask, &opts(HoleSide::Top, 2));
        assert_eq!(top, vec![Point::new(45.0, 40.0), Point::new(75.0, 40.0)]);
        let left = hole_centers(&mask, &opts(HoleSide::Left, 2));
        assert_eq!(left, vec![Point::new(30.0, 55.0), Point::new(30.0, 85.0)]);
    }

    #[test]
    fn test_spread_is_clamped_inside_narrow_shapes() {
        let mask = block(120, 50, 10, 80, 110);
        let centers = hole_centers(&mask, &opts(HoleSide::Top, 2));
        for c in &centers {
            assert!(c.x >= 60.0 && c.x <= 70.0, "{c:?}");
        }
    }

    #[test]
    fn test_count_is_clamped() {
        let mask = block(120, 20, 30, 100, 110);
        assert_eq!(hole_centers(&mask, &opts(HoleSide::Top, 0)).len(), 1);
        assert_eq!(hole_centers(&mask, &opts(HoleSide::Top, 7)).len(), 2);
    }

    #[test]
    fn test_manual_positions_pass_through() {
        let mask = block(120, 20, 30, 100, 110);
        let manual = HoleOptions {
            mode: HoleMode::Manual,
            manual_positions: vec![Point::new(5.0, 5.0)],
            ..opts(HoleSide::Top, 1)
        };
        let placed = place_holes_and_drill(&mask, &manual);
        assert_eq!(placed.holes.len(), 1);
        assert_eq!(placed.holes[0].center(), Point::new(5.0, 5.0));
        // ear reaches outside the silhouette
        assert!(placed.mask.is_solid(5, 12));
        assert!(!placed.mask.is_solid(5, 5));
    }

    #[test]
    fn test_drilled_hole_is_clear_and_ear_is_solid() {
        let mask = block(120, 20, 30, 100, 110);
        let placed = place_holes_and_drill(&mask, &opts(HoleSide::Top, 1));
        let hole = placed.holes[0];
        assert_eq!(hole.r, 4.0);
        assert!(!placed.mask.is_solid(60, 40));
        assert!(!placed.mask.is_solid(63, 40));
        assert!(placed.mask.is_solid(66, 40));
        assert!(mask.is_solid(60, 40), "input is untouched");
    }

    #[test]
    fn test_ear_is_forced_larger_than_hole() {
        let o = HoleOptions { hole_radius_px: 10.0, ear_radius_px: 3.0, ..Default::default() };
        assert_eq!(o.effective_ear_radius(), 11.0);
    }

    #[test]
    fn test_blank_mask_places_nothing() {
        let placed = place_holes_and_drill(&Mask::new(50, 50), &HoleOptions::default());
        assert!(placed.holes.is_empty());
        assert!(placed.mask.is_blank());
    }

    #[test]
    fn test_enum_names() {
        assert_eq!(HoleSide::Right.to_string(), "right");
        assert_eq!("manual".parse::<HoleMode>().unwrap(), HoleMode::Manual);
        assert_eq!(serde_json::to_string(&HoleSide::Left).unwrap(), "\"left\"");
    }
}
