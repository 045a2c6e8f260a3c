pub mod builder;

use goods_kit_common::Point;
use image::RgbaImage;
use tracing::{debug, info};
use crate::{
    algorithms::{drill, hole_centers, HoleMode, HoleOptions, PlacedHole},
    error::Result,
    geometry::nearest_on_path,
    traits::{BackgroundRemover, ContourTracer, MaskOffsetter},
    types::{Mask, Path},
    worker::CancelToken,
};

/// Distances and hole layout for one board build, all in pixels
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineSettings {
    pub border_px: f64,
    pub cut_offset_px: f64,
    /// Extra transparent canvas beyond the two offsets
    pub margin_px: u32,
    pub holes: HoleOptions,
    /// Project manual hole positions onto the board outline
    pub snap_to_perimeter: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            border_px: 23.6,
            cut_offset_px: 11.8,
            margin_px: 4,
            holes: HoleOptions::default(),
            snap_to_perimeter: false,
        }
    }
}

impl PipelineSettings {
    /// Canvas padding needed so neither offset is clipped at the image edge
    pub fn padding_px(&self) -> u32 {
        (self.border_px.max(0.0) + self.cut_offset_px.max(0.0)).ceil() as u32 + self.margin_px
    }
}

/// Everything one build produces.
///
/// Masks live on the padded canvas; `origin` is the image-space position of
/// their pixel (0,0). Paths and holes are already in image space.
#[derive(Debug, Clone)]
pub struct BoardOutput {
    /// Artwork silhouette before any offset
    pub artwork_mask: Mask,
    /// Board silhouette with ears painted and holes drilled
    pub board_mask: Mask,
    pub cut_mask: Mask,
    pub origin: Point,
    pub board_path: Path,
    pub cutline_path: Path,
    pub white_path: Path,
    pub holes: Vec<PlacedHole>,
}

impl BoardOutput {
    /// First hole, if any was placed
    pub fn primary_hole(&self) -> Option<&PlacedHole> {
        self.holes.first()
    }
}

/// Remove background, offset twice, trace, then place holes.
pub struct BoardPipeline {
    remover: Box<dyn BackgroundRemover>,
    offsetter: Box<dyn MaskOffsetter>,
    tracer: Box<dyn ContourTracer>,
    settings: PipelineSettings,
}

impl BoardPipeline {
    pub fn builder() -> builder::BoardPipelineBuilder {
        builder::BoardPipelineBuilder::new()
    }

    pub fn new(
        remover: Box<dyn BackgroundRemover>,
        offsetter: Box<dyn MaskOffsetter>,
        tracer: Box<dyn ContourTracer>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            remover,
            offsetter,
            tracer,
            settings,
        }
    }

    pub fn settings(&self) -> &PipelineSettings {
        &self.settings
    }

    /// Only the first stage, on the unpadded image
    pub fn remove_background(&self, image: &RgbaImage) -> Mask {
        self.remover.remove_background(image)
    }

    /// Run every stage to completion
    pub fn process(&self, image: &RgbaImage) -> Result<BoardOutput> {
        self.process_with_cancel(image, &CancelToken::never())
    }

    /// Run every stage, giving up between stages once `cancel` is superseded
    pub fn process_with_cancel(&self, image: &RgbaImage, cancel: &CancelToken) -> Result<BoardOutput> {
        let s = &self.settings;
        cancel.check()?;

        // Step 1: foreground/background split, padded so offsets have room
        let pad = s.padding_px();
        let artwork_mask = self.remover.remove_background(image).padded(pad);
        let origin = Point::new(-f64::from(pad), -f64::from(pad));
        debug!(pad, foreground = artwork_mask.foreground_count(), "background removed");
        cancel.check()?;

        // Step 2: board before cutline, the cutline grows from the board
        let board = self.offsetter.offset(&artwork_mask, s.border_px);
        let board_path = self.tracer.trace(&board);
        cancel.check()?;

        let cut_mask = self.offsetter.offset(&board, s.cut_offset_px);
        let cutline_path = self.tracer.trace(&cut_mask);
        cancel.check()?;

        let white_path = self.tracer.trace(&artwork_mask);
        cancel.check()?;

        // Step 3: holes anchor on the board, or the cut mask when the board is empty
        let mut centers = match s.holes.mode {
            HoleMode::Manual => s
                .holes
                .manual_positions
                .iter()
                .map(|p| p.translate(-origin.x, -origin.y))
                .collect(),
            HoleMode::Auto if board.is_blank() => hole_centers(&cut_mask, &s.holes),
            HoleMode::Auto => hole_centers(&board, &s.holes),
        };
        if s.snap_to_perimeter && s.holes.mode == HoleMode::Manual && !board_path.is_empty() {
            for c in &mut centers {
                *c = nearest_on_path(*c, board_path.points());
            }
        }
        let placement = drill(&board, &centers, &s.holes);

        let holes: Vec<PlacedHole> = placement
            .holes
            .into_iter()
            .map(|h| PlacedHole { cx: h.cx + origin.x, cy: h.cy + origin.y, ..h })
            .collect();

        info!(
            board_points = board_path.len(),
            cutline_points = cutline_path.len(),
            white_points = white_path.len(),
            holes = holes.len(),
            "board built"
        );

        Ok(BoardOutput {
            artwork_mask,
            board_mask: placement.mask,
            cut_mask,
            origin,
            board_path: board_path.translated(origin.x, origin.y),
            cutline_path: cutline_path.translated(origin.x, origin.y),
            white_path: white_path.translated(origin.x, origin.y),
            holes,
        })
    }

    /// Get information about the pipeline configuration
    pub fn info(&self) -> String {
        format!(
            "BoardPipeline: border {:.1}px, cut offset {:.1}px, padding {}px, {} hole(s) {}",
            self.settings.border_px,
            self.settings.cut_offset_px,
            self.settings.padding_px(),
            self.settings.holes.clamped_count(),
            self.settings.holes.mode,
        )
    }
}
