use std::io::Cursor;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use goods_kit_common::{Offsets, Point, SizeSpec};
use image::{ImageFormat, RgbaImage};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use crate::{
    editor::EditorSnapshot,
    error::{CutlineError, Result},
    params::HoleSpec,
    types::{Mask, Path},
};

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encode an image as a `data:image/png;base64,` URL
pub fn encode_png_data_url(image: &RgbaImage) -> Result<String> {
    let mut bytes = Cursor::new(Vec::new());
    image.write_to(&mut bytes, ImageFormat::Png)?;
    Ok(format!("{PNG_DATA_URL_PREFIX}{}", STANDARD.encode(bytes.into_inner())))
}

/// Decode a PNG data URL; anything without the PNG prefix is rejected
pub fn decode_png_data_url(url: &str) -> Result<RgbaImage> {
    let payload = url
        .trim()
        .strip_prefix(PNG_DATA_URL_PREFIX)
        .ok_or(CutlineError::DataUrl { expected: PNG_DATA_URL_PREFIX })?;
    let bytes = STANDARD.decode(payload)?;
    Ok(image::load_from_memory_with_format(&bytes, ImageFormat::Png)?.to_rgba8())
}

/// The artwork with its removed background made transparent.
///
/// `mask` may be larger than the image; `origin` is the image-space position
/// of its pixel (0,0).
pub fn cutout_preview(image: &RgbaImage, mask: &Mask, origin: Point) -> RgbaImage {
    let (ox, oy) = (-origin.x.round() as i64, -origin.y.round() as i64);
    let mut out = image.clone();
    for (x, y, px) in out.enumerate_pixels_mut() {
        if !mask.is_solid_at(i64::from(x) + ox, i64::from(y) + oy) {
            px[3] = 0;
        }
    }
    out
}

/// Outline polygons of an export; empty paths are left out entirely
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
pub struct ExportPaths {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub board_path: Option<Vec<Point>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub cutline_path: Option<Vec<Point>>,
}

impl ExportPaths {
    pub fn new(board: &Path, cutline: &Path) -> Self {
        fn non_empty(path: &Path) -> Option<Vec<Point>> {
            (!path.is_empty()).then(|| path.points().to_vec())
        }
        Self {
            board_path: non_empty(board),
            cutline_path: non_empty(cutline),
        }
    }
}

/// Document handed to the order system for cutting and printing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DesignExport {
    pub mode: String,
    pub template_shape: Option<String>,
    pub size: SizeSpec,
    pub offsets: Offsets,
    pub hole: HoleSpec,
    pub paths: ExportPaths,
    pub state: EditorSnapshot,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub preview_data_url: Option<String>,
}

impl DesignExport {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    /// Decoded preview, if one was attached
    pub fn preview(&self) -> Result<Option<RgbaImage>> {
        self.preview_data_url
            .as_deref()
            .map(decode_png_data_url)
            .transpose()
    }
}
