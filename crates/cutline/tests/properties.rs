use cutline::algorithms::{DistanceOffsetter, HoleOptions, HoleSide};
use cutline::{
    nearest_on_polyline, offset_mask, place_holes_and_drill, remove_by_color, simplify_points,
    trace, Mask, MaskOffsetter,
};
use goods_kit_common::{Point, Rgb};
use image::{Rgba, RgbaImage};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = Point> {
    (-50.0f64..50.0, -50.0f64..50.0).prop_map(|(x, y)| Point::new(x, y))
}

/// A few random rectangles on a small canvas
fn blocky_mask() -> impl Strategy<Value = Mask> {
    prop::collection::vec((0u32..28, 0u32..28, 1u32..10, 1u32..10), 0..4).prop_map(|rects| {
        Mask::from_fn(32, 32, |x, y| {
            rects
                .iter()
                .any(|&(rx, ry, w, h)| x >= rx && x < rx + w && y >= ry && y < ry + h)
        })
    })
}

/// Hairlines: 1px wide strokes, horizontal or vertical
fn hairline_mask() -> impl Strategy<Value = Mask> {
    (4u32..28, 4u32..28, 2u32..20, any::<bool>()).prop_map(|(x0, y0, len, vertical)| {
        Mask::from_fn(32, 32, |x, y| {
            if vertical {
                x == x0 && y >= y0 && y < y0 + len
            } else {
                y == y0 && x >= x0 && x < x0 + len
            }
        })
    })
}

proptest! {
    #[test]
    fn simplification_is_idempotent(
        points in prop::collection::vec(point(), 0..60),
        tolerance in 0.1f64..5.0,
    ) {
        let once = simplify_points(&points, tolerance);
        let twice = simplify_points(&once, tolerance);
        prop_assert_eq!(&once, &twice);
        if !points.is_empty() {
            prop_assert_eq!(once.first(), points.first());
            prop_assert_eq!(once.last(), points.last());
        }
    }

    #[test]
    fn default_dilation_is_monotone(
        mask in prop_oneof![blocky_mask(), hairline_mask()],
        r1 in 0.5f64..6.0,
        extra in 0.0f64..6.0,
    ) {
        let small = offset_mask(&mask, r1);
        let large = offset_mask(&mask, r1 + extra);
        prop_assert!(mask.is_subset_of(&small));
        prop_assert!(small.is_subset_of(&large));
    }

    #[test]
    fn distance_dilation_is_monotone(
        mask in blocky_mask(),
        r1 in 0.5f64..4.0,
        extra in 0.0f64..4.0,
    ) {
        let small = DistanceOffsetter.offset(&mask, r1);
        let large = DistanceOffsetter.offset(&mask, r1 + extra);
        prop_assert!(mask.is_subset_of(&small));
        prop_assert!(small.is_subset_of(&large));
    }

    #[test]
    fn nearest_point_is_a_fixed_point(
        polyline in prop::collection::vec(point(), 2..10),
        query in point(),
    ) {
        let nearest = nearest_on_polyline(query, &polyline);
        let again = nearest_on_polyline(nearest, &polyline);
        prop_assert!(nearest.distance_to(again) < 1e-6);
        for v in &polyline {
            prop_assert!(query.distance_to(nearest) <= query.distance_to(*v) + 1e-9);
        }
    }

    #[test]
    fn auto_holes_stay_inside_the_silhouette_box(
        x0 in 0u32..20,
        y0 in 0u32..20,
        w in 30u32..60,
        h in 30u32..60,
        side in prop_oneof![Just(HoleSide::Top), Just(HoleSide::Left), Just(HoleSide::Right)],
        count in 1u8..=2,
    ) {
        let mask = Mask::from_fn(90, 90, |x, y| x >= x0 && x < x0 + w && y >= y0 && y < y0 + h);
        let opts = HoleOptions {
            side,
            count,
            hole_radius_px: 2.0,
            ear_radius_px: 4.0,
            safe_pad_px: 6.0,
            ..Default::default()
        };
        let bbox = mask.bounding_box().unwrap();
        let placed = place_holes_and_drill(&mask, &opts);
        prop_assert_eq!(placed.holes.len(), usize::from(count));
        for hole in &placed.holes {
            let c = hole.center();
            prop_assert!(c.x >= bbox.min_x + 6.0 && c.x <= bbox.max_x - 6.0);
            prop_assert!(c.y >= bbox.min_y + 6.0 && c.y <= bbox.max_y - 6.0);
            prop_assert!(!placed.mask.is_solid(c.x.round() as u32, c.y.round() as u32));
        }
    }

    #[test]
    fn blank_masks_are_safe(w in 1u32..40, h in 1u32..40, delta in -8.0f64..8.0) {
        let mask = Mask::new(w, h);
        prop_assert!(trace(&mask).is_empty());
        prop_assert!(offset_mask(&mask, delta).is_blank());
        prop_assert!(place_holes_and_drill(&mask, &HoleOptions::default()).holes.is_empty());
    }

    #[test]
    fn matching_solid_image_is_fully_removed(
        r in any::<u8>(),
        g in any::<u8>(),
        b in any::<u8>(),
        threshold in 0.01f64..500.0,
    ) {
        let img = RgbaImage::from_pixel(16, 16, Rgba([r, g, b, 255]));
        prop_assert!(remove_by_color(&img, Rgb::new(r, g, b), threshold).is_blank());
    }
}
