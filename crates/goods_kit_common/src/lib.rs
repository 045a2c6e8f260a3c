//! # Goods Kit Common - Shared Types and Utilities
//!
//! Value types shared by the design-editor crates: pixel-space points,
//! print sizes in millimetres, offsets, colors and the mm/px conversion used
//! everywhere a physical measurement meets a raster.
//!
//! ## Example
//!
//! ```rust
//! use goods_kit_common::{units, Offsets, SizeSpec};
//!
//! let size = SizeSpec::default();
//! let offsets = Offsets { border_mm: 2.0, cut_offset_mm: 1.0 };
//! let border_px = units::mm_to_px(offsets.border_mm, size.dpi);
//! assert!((border_px - 23.622).abs() < 0.001);
//! ```

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

/// Result type for goods kit operations
pub type Result<T> = std::result::Result<T, GoodsKitError>;

/// Standard error type for goods kit operations
#[derive(Error, Debug)]
pub enum GoodsKitError {
    #[error("Configuration validation failed: {details}")]
    ValidationFailed { details: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Millimetre/pixel conversion at a fixed DPI.
pub mod units {
    pub const MM_PER_INCH: f64 = 25.4;
    pub const DEFAULT_DPI: f64 = 300.0;

    /// `px = mm / 25.4 * dpi`
    pub fn mm_to_px(mm: f64, dpi: f64) -> f64 {
        mm / MM_PER_INCH * dpi
    }

    pub fn px_to_mm(px: f64, dpi: f64) -> f64 {
        px * MM_PER_INCH / dpi
    }
}

/// 2D point in image pixel space
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, JsonSchema, TS)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Translate this point by the given offsets
    pub fn translate(self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    pub fn distance_squared_to(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Calculate distance to another point
    pub fn distance_to(self, other: Self) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// An opaque RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, TS)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Euclidean distance in RGB space
    pub fn distance_to(self, r: u8, g: u8, b: u8) -> f64 {
        let dr = f64::from(self.r) - f64::from(r);
        let dg = f64::from(self.g) - f64::from(g);
        let db = f64::from(self.b) - f64::from(b);
        (dr * dr + dg * dg + db * db).sqrt()
    }
}

/// Physical product size as entered by the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
pub struct SizeSpec {
    #[serde(rename = "widthMM")]
    pub width_mm: f64,
    #[serde(rename = "heightMM")]
    pub height_mm: f64,
    pub dpi: f64,
    #[serde(rename = "bleedMM")]
    pub bleed_mm: f64,
    #[serde(rename = "safeMM")]
    pub safe_mm: f64,
}

impl Default for SizeSpec {
    fn default() -> Self {
        Self {
            width_mm: 50.0,
            height_mm: 50.0,
            dpi: units::DEFAULT_DPI,
            bleed_mm: 1.0,
            safe_mm: 2.0,
        }
    }
}

impl SizeSpec {
    pub fn validate(&self) -> Result<()> {
        if !(self.dpi.is_finite() && self.dpi > 0.0) {
            return Err(GoodsKitError::ValidationFailed {
                details: format!("dpi must be positive, got {}", self.dpi),
            });
        }
        for (name, value) in [
            ("widthMM", self.width_mm),
            ("heightMM", self.height_mm),
            ("bleedMM", self.bleed_mm),
            ("safeMM", self.safe_mm),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GoodsKitError::ValidationFailed {
                    details: format!("{name} must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }

    pub fn mm_to_px(&self, mm: f64) -> f64 {
        units::mm_to_px(mm, self.dpi)
    }

    /// Artboard size in pixels, bleed included on every side
    pub fn artboard_px(&self) -> (f64, f64) {
        (
            self.mm_to_px(self.width_mm + 2.0 * self.bleed_mm),
            self.mm_to_px(self.height_mm + 2.0 * self.bleed_mm),
        )
    }
}

/// Outward distances of the board and cutline, in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
pub struct Offsets {
    #[serde(rename = "borderMM")]
    pub border_mm: f64,
    #[serde(rename = "cutOffsetMM")]
    pub cut_offset_mm: f64,
}

impl Default for Offsets {
    fn default() -> Self {
        Self {
            border_mm: 2.0,
            cut_offset_mm: 1.0,
        }
    }
}

/// Axis-aligned box over pixel coordinates, inclusive on both ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl BoundingBox {
    /// Smallest box holding every point, `None` for an empty slice
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let first = points.first()?;
        let mut bbox = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };
        for p in &points[1..] {
            bbox.min_x = bbox.min_x.min(p.x);
            bbox.min_y = bbox.min_y.min(p.y);
            bbox.max_x = bbox.max_x.max(p.x);
            bbox.max_y = bbox.max_y.max(p.y);
        }
        Some(bbox)
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min_x + self.max_x) / 2.0,
            (self.min_y + self.max_y) / 2.0,
        )
    }

    /// Check if a point is inside this box (edges count as inside)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min_x
            && point.x <= self.max_x
            && point.y >= self.min_y
            && point.y <= self.max_y
    }

    /// Clamp a point into the box shrunk by `margin` on every side.
    ///
    /// When the margin swallows an axis the point collapses onto that axis'
    /// midpoint.
    pub fn clamp_inset(&self, point: Point, margin: f64) -> Point {
        fn clamp_axis(v: f64, lo: f64, hi: f64) -> f64 {
            if lo > hi { (lo + hi) / 2.0 } else { v.clamp(lo, hi) }
        }
        Point::new(
            clamp_axis(point.x, self.min_x + margin, self.max_x - margin),
            clamp_axis(point.y, self.min_y + margin, self.max_y - margin),
        )
    }
}

/// Utility functions for file handling
pub mod utils {
    use super::*;

    /// Check if a file extension indicates a raster the decoder accepts
    pub fn is_image_file(filename: &str) -> bool {
        matches!(
            get_file_extension(filename).as_deref(),
            Some("png" | "jpg" | "jpeg")
        )
    }

    /// Get file extension from filename
    pub fn get_file_extension(filename: &str) -> Option<String> {
        std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
    }

    /// Ensure output directory exists
    pub fn ensure_output_dir(path: &str) -> Result<()> {
        std::fs::create_dir_all(path)?;
        Ok(())
    }
}
