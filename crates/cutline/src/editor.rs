//! Editor session state and the actions that mutate it.
//!
//! A store is created by its host and owned by one writer. Parameter setters
//! only record values; outlines are recomputed when the host asks for
//! `build_mask` or `build_board`.

use std::sync::Arc;

use goods_kit_common::{utils, GoodsKitError, Offsets, Point, Rgb};
use image::RgbaImage;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr, VariantNames};
use thiserror::Error;
use tracing::{debug, info, warn};
use ts_rs::TS;
use crate::{
    error::CutlineError,
    geometry::{fit_contain, nearest_on_path, FitMode, Placement},
    io::export::{cutout_preview, encode_png_data_url, DesignExport, ExportPaths},
    params::{DesignParams, HolePlacementParams},
    pipeline::{builder::BoardPipelineBuilder, BoardOutput, BoardPipeline},
    algorithms::{HoleMode, PlacedHole},
    types::{Mask, Path},
};

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("보드를 생성할 이미지 노드를 선택하세요")]
    NoImageSelected,

    #[error("No image node with id {id}")]
    UnknownNode { id: u32 },

    #[error(transparent)]
    Engine(#[from] CutlineError),

    #[error(transparent)]
    InvalidParams(#[from] GoodsKitError),
}

pub type Result<T> = std::result::Result<T, EditorError>;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, TS, Display,
)]
#[serde(rename_all = "camelCase")]
#[strum(serialize_all = "camelCase")]
pub enum EditorPhase {
    #[default]
    Idle,
    ImageLoaded,
    MaskBuilt,
    PathsBuilt,
}

/// Placement of the selected artwork on the artboard
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
pub struct Transform {
    pub x: f64,
    pub y: f64,
    pub scale: f64,
    /// Degrees, clockwise
    pub rotation: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, scale: 1.0, rotation: 0.0 }
    }
}

impl From<Placement> for Transform {
    fn from(p: Placement) -> Self {
        Self { x: p.x, y: p.y, scale: p.scale, rotation: 0.0 }
    }
}

/// Annotation drawn over the artwork; never part of the cut
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ShapeKind {
    Rect { width: f64, height: f64 },
    Circle { radius: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
pub struct ShapeOverlay {
    pub id: u32,
    pub x: f64,
    pub y: f64,
    pub shape: ShapeKind,
}

#[derive(Debug, Clone)]
pub struct ImageNode {
    pub id: u32,
    pub image: Arc<RgbaImage>,
    pub placement: Placement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
pub struct NodeSummary {
    pub id: u32,
    pub width: u32,
    pub height: u32,
    pub placement: Placement,
}

/// Serializable view of the store, embedded in exports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct EditorSnapshot {
    pub phase: EditorPhase,
    pub selected_node: Option<u32>,
    pub nodes: Vec<NodeSummary>,
    pub transform: Transform,
    pub snap_to_perimeter: bool,
    pub hole_placement: Option<HolePlacementParams>,
    pub threshold: f64,
    pub assume_transparent: bool,
    pub sample_color: Option<Rgb>,
    pub board_path: Path,
    pub cutline_path: Path,
    pub white_path: Path,
    /// Every hole of the last build, in image pixels
    pub holes: Vec<PlacedHole>,
    pub shapes: Vec<ShapeOverlay>,
}

/// Every store action, for hosts that talk to the store in JSON
#[derive(
    Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Display, VariantNames,
    IntoStaticStr,
)]
#[serde(tag = "type", content = "params", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EditorCommand {
    /// Load an image file and select it
    AddImageFromFile { path: String },
    /// Load a PNG data URL and select it
    AddImageFromSrc { src: String },
    /// Remove the background of the selected image
    BuildMask,
    /// Build board, cutline and hole for the selected image
    BuildBoard,
    SetOffsets { offsets: Offsets },
    SetHoleDiaMm {
        #[schemars(range(min = 0.0, max = 20.0))]
        diameter_mm: f64,
    },
    SetSnapToPerimeter { snap: bool },
    SetHoleOptions { placement: Option<HolePlacementParams> },
    SetThreshold {
        #[schemars(range(min = 0.0, max = 442.0))]
        threshold: f64,
    },
    SetAssumeTransparent { assume_transparent: bool },
    SetSampleColor { color: Option<Rgb> },
    SetTransform { transform: Transform },
    SelectNode { id: u32 },
    AddShape { x: f64, y: f64, shape: ShapeKind },
    RemoveShape { id: u32 },
    /// Move the hole, snapping onto the board outline when enabled
    HoleDrag { x: f64, y: f64 },
}

impl EditorCommand {
    /// Get the JSON schema for all commands
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(EditorCommand)
    }

    /// Get a list of all available command names
    pub fn command_names() -> &'static [&'static str] {
        <Self as VariantNames>::VARIANTS
    }
}

/// One editing session.
#[derive(Debug, Clone, Default)]
pub struct EditorStore {
    params: DesignParams,
    nodes: Vec<ImageNode>,
    selected: Option<u32>,
    next_id: u32,
    transform: Transform,
    shapes: Vec<ShapeOverlay>,
    next_shape_id: u32,
    mask: Option<Mask>,
    output: Option<BoardOutput>,
    board_path: Path,
    cutline_path: Path,
    white_path: Path,
    phase: EditorPhase,
}

impl EditorStore {
    pub fn new(params: DesignParams) -> Self {
        Self { params, ..Default::default() }
    }

    pub fn params(&self) -> &DesignParams {
        &self.params
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn hole_position(&self) -> Point {
        Point::new(self.params.hole.x, self.params.hole.y)
    }

    pub fn board_path(&self) -> &Path {
        &self.board_path
    }

    pub fn cutline_path(&self) -> &Path {
        &self.cutline_path
    }

    pub fn white_path(&self) -> &Path {
        &self.white_path
    }

    /// Artwork mask from the last build. After `build_board` it sits on the
    /// padded canvas described by [`BoardOutput::origin`].
    pub fn mask(&self) -> Option<&Mask> {
        self.mask.as_ref()
    }

    /// Full result of the last `build_board`
    pub fn board_output(&self) -> Option<&BoardOutput> {
        self.output.as_ref()
    }

    pub fn shapes(&self) -> &[ShapeOverlay] {
        &self.shapes
    }

    pub fn selected_node(&self) -> Option<&ImageNode> {
        let id = self.selected?;
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Add a decoded image, select it and fit it into the artboard
    pub fn add_image(&mut self, image: RgbaImage) -> u32 {
        let (box_w, box_h) = self.params.size.artboard_px();
        let placement = fit_contain(
            f64::from(image.width()),
            f64::from(image.height()),
            box_w,
            box_h,
            FitMode::Fit,
        );
        let id = self.next_id;
        self.next_id += 1;
        info!(id, width = image.width(), height = image.height(), scale = placement.scale, "image added");

        self.nodes.push(ImageNode { id, image: Arc::new(image), placement });
        self.selected = Some(id);
        self.transform = placement.into();
        self.clear_outputs();
        self.phase = EditorPhase::ImageLoaded;
        id
    }

    pub fn add_image_from_file<P: AsRef<std::path::Path>>(&mut self, path: P) -> Result<u32> {
        let path = path.as_ref();
        if !utils::is_image_file(&path.to_string_lossy()) {
            warn!(path = %path.display(), "extension is not png/jpeg; decoding anyway");
        }
        let image = image::open(path).map_err(CutlineError::from)?;
        Ok(self.add_image(image.to_rgba8()))
    }

    /// Add an image from a `data:image/png;base64,` URL
    pub fn add_image_from_src(&mut self, src: &str) -> Result<u32> {
        let image = crate::io::export::decode_png_data_url(src)?;
        Ok(self.add_image(image))
    }

    /// Remove the background of the selected image
    pub fn build_mask(&mut self) -> Result<&Mask> {
        let Some(image) = self.selected_image() else {
            warn!("build_mask without a selected image");
            return Err(EditorError::NoImageSelected);
        };
        self.params.validate()?;
        let mask = BoardPipeline::builder()
            .for_design(&self.params, &image)
            .build()
            .remove_background(&image);
        debug!(foreground = mask.foreground_count(), "mask built");

        self.clear_outputs();
        self.phase = EditorPhase::MaskBuilt;
        Ok(self.mask.insert(mask))
    }

    /// Shared handle to the selected image, for hosts building off-thread
    pub fn selected_image(&self) -> Option<Arc<RgbaImage>> {
        self.selected_node().map(|n| Arc::clone(&n.image))
    }

    /// Pipeline configured from the current parameters and selected image.
    /// Callers may swap stages before building.
    pub fn pipeline_builder(&self) -> Result<BoardPipelineBuilder> {
        let Some(image) = self.selected_image() else {
            warn!("no image node selected for board build");
            return Err(EditorError::NoImageSelected);
        };
        self.params.validate()?;
        Ok(BoardPipeline::builder().for_design(&self.params, &image))
    }

    /// Run the full pipeline on the selected image.
    pub fn build_board(&mut self) -> Result<&BoardOutput> {
        let pipeline = self.pipeline_builder()?.build();
        let image = self.selected_image().ok_or(EditorError::NoImageSelected)?;
        let output = pipeline.process(&image)?;
        Ok(self.accept_board(output))
    }

    /// Install a board built elsewhere (e.g. by a `BuildWorker`).
    ///
    /// The hole moves to the first placed hole; when no hole could be placed
    /// it stays where it was.
    pub fn accept_board(&mut self, output: BoardOutput) -> &BoardOutput {
        if let Some(hole) = output.primary_hole() {
            self.params.hole.x = hole.cx;
            self.params.hole.y = hole.cy;
        }
        self.board_path = output.board_path.clone();
        self.cutline_path = output.cutline_path.clone();
        self.white_path = output.white_path.clone();
        self.mask = Some(output.artwork_mask.clone());
        self.phase = EditorPhase::PathsBuilt;
        info!(
            board = self.board_path.len(),
            cutline = self.cutline_path.len(),
            hole_x = self.params.hole.x,
            hole_y = self.params.hole.y,
            "board ready"
        );
        self.output.insert(output)
    }

    pub fn set_offsets(&mut self, offsets: Offsets) {
        self.params.offsets = offsets;
    }

    pub fn set_hole_dia_mm(&mut self, diameter_mm: f64) {
        self.params.hole.diameter_mm = diameter_mm;
    }

    pub fn set_snap_to_perimeter(&mut self, snap: bool) {
        self.params.snap_to_perimeter = snap;
    }

    pub fn set_hole_options(&mut self, placement: Option<HolePlacementParams>) {
        self.params.hole_placement = placement;
    }

    pub fn set_threshold(&mut self, threshold: f64) {
        self.params.threshold = threshold;
    }

    pub fn set_assume_transparent(&mut self, assume_transparent: bool) {
        self.params.assume_transparent = assume_transparent;
    }

    pub fn set_sample_color(&mut self, color: Option<Rgb>) {
        self.params.sample_color = color;
    }

    pub fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    pub fn select_node(&mut self, id: u32) -> Result<()> {
        let node = self
            .nodes
            .iter()
            .find(|n| n.id == id)
            .ok_or(EditorError::UnknownNode { id })?;
        self.transform = node.placement.into();
        self.selected = Some(id);
        Ok(())
    }

    pub fn add_shape(&mut self, x: f64, y: f64, shape: ShapeKind) -> u32 {
        let id = self.next_shape_id;
        self.next_shape_id += 1;
        self.shapes.push(ShapeOverlay { id, x, y, shape });
        id
    }

    /// `false` when no shape has that id
    pub fn remove_shape(&mut self, id: u32) -> bool {
        let before = self.shapes.len();
        self.shapes.retain(|s| s.id != id);
        self.shapes.len() != before
    }

    /// Move the hole to `point`, projected onto the board outline when
    /// snapping is on and an outline exists. In manual hole mode the new
    /// position is also what the next build drills.
    pub fn on_hole_drag(&mut self, point: Point) -> Point {
        let target = if self.params.snap_to_perimeter && !self.board_path.is_empty() {
            nearest_on_path(point, self.board_path.points())
        } else {
            point
        };
        self.params.hole.x = target.x;
        self.params.hole.y = target.y;

        if let Some(placement) = self.params.hole_placement.as_mut() {
            if placement.mode == HoleMode::Manual {
                match placement.manual_positions.first_mut() {
                    Some(first) => *first = target,
                    None => placement.manual_positions.push(target),
                }
            }
        }
        debug!(x = target.x, y = target.y, "hole moved");
        target
    }

    /// Dispatch a command
    pub fn execute(&mut self, command: EditorCommand) -> Result<()> {
        debug!(command = %command, "executing");
        match command {
            EditorCommand::AddImageFromFile { path } => {
                self.add_image_from_file(path)?;
            }
            EditorCommand::AddImageFromSrc { src } => {
                self.add_image_from_src(&src)?;
            }
            EditorCommand::BuildMask => {
                self.build_mask()?;
            }
            EditorCommand::BuildBoard => {
                self.build_board()?;
            }
            EditorCommand::SetOffsets { offsets } => self.set_offsets(offsets),
            EditorCommand::SetHoleDiaMm { diameter_mm } => self.set_hole_dia_mm(diameter_mm),
            EditorCommand::SetSnapToPerimeter { snap } => self.set_snap_to_perimeter(snap),
            EditorCommand::SetHoleOptions { placement } => self.set_hole_options(placement),
            EditorCommand::SetThreshold { threshold } => self.set_threshold(threshold),
            EditorCommand::SetAssumeTransparent { assume_transparent } => {
                self.set_assume_transparent(assume_transparent)
            }
            EditorCommand::SetSampleColor { color } => self.set_sample_color(color),
            EditorCommand::SetTransform { transform } => self.set_transform(transform),
            EditorCommand::SelectNode { id } => self.select_node(id)?,
            EditorCommand::AddShape { x, y, shape } => {
                self.add_shape(x, y, shape);
            }
            EditorCommand::RemoveShape { id } => {
                self.remove_shape(id);
            }
            EditorCommand::HoleDrag { x, y } => {
                self.on_hole_drag(Point::new(x, y));
            }
        }
        Ok(())
    }

    pub fn snapshot(&self) -> EditorSnapshot {
        EditorSnapshot {
            phase: self.phase,
            selected_node: self.selected,
            nodes: self
                .nodes
                .iter()
                .map(|n| NodeSummary {
                    id: n.id,
                    width: n.image.width(),
                    height: n.image.height(),
                    placement: n.placement,
                })
                .collect(),
            transform: self.transform,
            snap_to_perimeter: self.params.snap_to_perimeter,
            hole_placement: self.params.hole_placement.clone(),
            threshold: self.params.threshold,
            assume_transparent: self.params.assume_transparent,
            sample_color: self.params.sample_color,
            board_path: self.board_path.clone(),
            cutline_path: self.cutline_path.clone(),
            white_path: self.white_path.clone(),
            holes: self
                .output
                .as_ref()
                .map(|o| o.holes.clone())
                .unwrap_or_default(),
            shapes: self.shapes.clone(),
        }
    }

    /// Export document; the preview is the cut-out artwork, when one exists
    pub fn export(&self, with_preview: bool) -> Result<DesignExport> {
        let preview_data_url = match (with_preview, self.selected_node(), &self.output) {
            (true, Some(node), Some(output)) => Some(encode_png_data_url(&cutout_preview(
                &node.image,
                &output.artwork_mask,
                output.origin,
            ))?),
            (true, Some(node), None) => match &self.mask {
                Some(mask) => Some(encode_png_data_url(&cutout_preview(
                    &node.image,
                    mask,
                    Point::default(),
                ))?),
                None => None,
            },
            _ => None,
        };

        Ok(DesignExport {
            mode: self.params.mode.clone(),
            template_shape: self.params.template_shape.clone(),
            size: self.params.size,
            offsets: self.params.offsets,
            hole: self.params.hole,
            paths: ExportPaths::new(&self.board_path, &self.cutline_path),
            state: self.snapshot(),
            preview_data_url,
        })
    }

    fn clear_outputs(&mut self) {
        self.mask = None;
        self.output = None;
        self.board_path = Path::default();
        self.cutline_path = Path::default();
        self.white_path = Path::default();
    }
}
