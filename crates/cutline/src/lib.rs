//! # Cutline - Board and Cut Outline Engine
//!
//! Turns uploaded artwork into the geometry a print-on-demand product needs:
//! a background-free silhouette, a "board" outline grown around it, a
//! cutline grown around the board, and a mounting hole with a reinforcing
//! ear.
//!
//! ## Core Features
//!
//! - **Background removal**: corner-sampled color distance, white threshold or alpha
//! - **Offsetting**: exact distance-transform dilation/erosion, smoothed by default
//! - **Tracing**: Moore-neighbor boundary walk with RDP simplification
//! - **Holes**: auto/manual placement, ear painting and drilling
//! - **Editor store**: explicit session object with phases and JSON commands
//! - **Export**: JSON design document, PNG data URLs and an SVG cut file
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cutline::{BoardPipeline, DesignParams};
//!
//! let image = image::open("artwork.png")?.to_rgba8();
//! let params = DesignParams::default();
//!
//! let pipeline = BoardPipeline::builder().for_design(&params, &image).build();
//! let output = pipeline.process(&image)?;
//! println!("cutline has {} points", output.cutline_path.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Editor Session
//!
//! ```rust,no_run
//! use cutline::{EditorStore, DesignParams};
//!
//! let mut store = EditorStore::new(DesignParams::default());
//! store.add_image_from_file("artwork.png")?;
//! store.build_board()?;
//! let export = store.export(true)?;
//! std::fs::write("design.json", export.to_json_pretty()?)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod types;
pub mod traits;
pub mod algorithms;
pub mod geometry;
pub mod params;
pub mod pipeline;
pub mod editor;
pub mod io;
pub mod worker;

// Re-exports for convenience
pub use error::{CutlineError, Result};
pub use types::{Mask, Path};
pub use traits::{BackgroundRemover, ContourTracer, MaskOffsetter};
pub use algorithms::{
    estimate_background_color, offset_mask, place_holes_and_drill, remove_by_color,
    remove_by_white_threshold, simplify_points, trace, HoleMode, HoleOptions, HolePlacement,
    HoleSide, PlacedHole,
};
pub use geometry::{fit_contain, nearest_on_path, nearest_on_polyline, FitMode, Placement};
pub use params::{DesignParams, HolePlacementParams, HoleSpec};
pub use pipeline::{builder::BoardPipelineBuilder, BoardOutput, BoardPipeline, PipelineSettings};
pub use editor::{EditorCommand, EditorError, EditorPhase, EditorSnapshot, EditorStore};
pub use io::{cut_svg, decode_png_data_url, encode_png_data_url, DesignExport};
pub use worker::{BuildWorker, CancelToken};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::DistanceOffsetter;
    use goods_kit_common::{Point, Rgb};
    use image::{Rgba, RgbaImage};

    fn red_circle() -> RgbaImage {
        RgbaImage::from_fn(200, 200, |x, y| {
            let dx = f64::from(x) - 100.0;
            let dy = f64::from(y) - 100.0;
            if dx * dx + dy * dy <= 80.0 * 80.0 {
                Rgba([255, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        })
    }

    fn mean_radius(path: &Path, center: Point) -> f64 {
        path.points().iter().map(|p| p.distance_to(center)).sum::<f64>() / path.len() as f64
    }

    #[test]
    fn test_red_circle_end_to_end() {
        let image = red_circle();
        let sample = estimate_background_color(&image);
        assert_eq!(sample, Rgb::WHITE);

        let mask = remove_by_color(&image, sample, 28.0);
        assert!(mask.is_solid(100, 100));
        assert!(!mask.is_solid(5, 5));

        let board = DistanceOffsetter.offset(&mask, 10.0);
        let path = trace(&board);
        assert!(path.len() < 100, "{} points", path.len());
        let r = mean_radius(&path, Point::new(100.0, 100.0));
        assert!((87.0..=91.0).contains(&r), "mean radius {r}");

        let placed = place_holes_and_drill(
            &board,
            &HoleOptions {
                hole_radius_px: 3.0,
                ear_radius_px: 4.0,
                safe_pad_px: 5.0,
                ..Default::default()
            },
        );
        assert_eq!(placed.holes.len(), 1);
        let hole = placed.holes[0].center();
        assert!(hole.distance_to(Point::new(100.0, 15.0)) <= 2.0, "{hole:?}");
    }

    #[test]
    fn test_default_offset_lands_near_the_requested_radius() {
        let mask = remove_by_color(&red_circle(), Rgb::WHITE, 28.0);
        let path = trace(&offset_mask(&mask, 10.0));
        let r = mean_radius(&path, Point::new(100.0, 100.0));
        assert!((87.0..=93.0).contains(&r), "mean radius {r}");
        assert!(path.len() < 100);
    }

    #[test]
    fn test_blank_image_is_safe_everywhere() {
        let white = RgbaImage::from_pixel(64, 64, Rgba([255, 255, 255, 255]));
        let mask = remove_by_color(&white, estimate_background_color(&white), 28.0);
        assert!(mask.is_blank());
        assert!(trace(&offset_mask(&mask, 10.0)).is_empty());
        assert!(place_holes_and_drill(&mask, &HoleOptions::default()).holes.is_empty());
    }
}
