//! User-facing design parameters, as the editor host sends them.

use goods_kit_common::{GoodsKitError, Offsets, Point, Rgb, SizeSpec};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use crate::algorithms::{
    DEFAULT_COLOR_THRESHOLD, HoleMode, HoleOptions, HoleSide,
};

/// Mounting hole as shown to the user
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
pub struct HoleSpec {
    pub x: f64,
    pub y: f64,
    #[serde(rename = "diameterMM")]
    pub diameter_mm: f64,
}

impl Default for HoleSpec {
    fn default() -> Self {
        Self { x: 0.0, y: 0.0, diameter_mm: 3.0 }
    }
}

/// How holes are placed when a board is built, in millimetres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct HolePlacementParams {
    pub mode: HoleMode,
    pub side: HoleSide,
    pub count: u8,
    /// Ring of material left around the hole
    #[serde(rename = "earMarginMM")]
    pub ear_margin_mm: f64,
    /// Inset from the silhouette edge; defaults to the size's safe area
    #[serde(rename = "safePadMM")]
    pub safe_pad_mm: Option<f64>,
    pub manual_positions: Vec<Point>,
}

impl Default for HolePlacementParams {
    fn default() -> Self {
        Self {
            mode: HoleMode::Auto,
            side: HoleSide::Top,
            count: 1,
            ear_margin_mm: 1.5,
            safe_pad_mm: None,
            manual_positions: Vec::new(),
        }
    }
}

/// Everything the host needs to rebuild a design
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, TS)]
#[serde(rename_all = "camelCase", default)]
pub struct DesignParams {
    /// Product kind, e.g. "keyring" or "stand"
    pub mode: String,
    pub template_shape: Option<String>,
    pub size: SizeSpec,
    pub offsets: Offsets,
    pub hole: HoleSpec,
    /// Snap dragged and manually placed holes onto the board outline
    pub snap_to_perimeter: bool,
    /// RGB distance below which a pixel counts as background
    pub threshold: f64,
    /// Trust the image's alpha instead of sampling a background colour
    pub assume_transparent: bool,
    pub sample_color: Option<Rgb>,
    pub hole_placement: Option<HolePlacementParams>,
}

impl Default for DesignParams {
    fn default() -> Self {
        Self {
            mode: "keyring".to_string(),
            template_shape: None,
            size: SizeSpec::default(),
            offsets: Offsets::default(),
            hole: HoleSpec::default(),
            snap_to_perimeter: true,
            threshold: DEFAULT_COLOR_THRESHOLD,
            assume_transparent: false,
            sample_color: None,
            hole_placement: None,
        }
    }
}

impl DesignParams {
    pub fn validate(&self) -> Result<(), GoodsKitError> {
        self.size.validate()?;
        for (name, value) in [
            ("offsets.borderMM", self.offsets.border_mm),
            ("offsets.cutOffsetMM", self.offsets.cut_offset_mm),
            ("hole.diameterMM", self.hole.diameter_mm),
            ("threshold", self.threshold),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(GoodsKitError::ValidationFailed {
                    details: format!("{name} must be a non-negative number, got {value}"),
                });
            }
        }
        Ok(())
    }

    pub fn border_px(&self) -> f64 {
        self.size.mm_to_px(self.offsets.border_mm)
    }

    pub fn cut_offset_px(&self) -> f64 {
        self.size.mm_to_px(self.offsets.cut_offset_mm)
    }

    /// Pixel-space hole options for the placer.
    ///
    /// Manual mode without explicit positions drills at `hole`.
    pub fn hole_options(&self) -> HoleOptions {
        let mut placement = self.hole_placement.clone().unwrap_or_default();
        if placement.mode == HoleMode::Manual && placement.manual_positions.is_empty() {
            placement.manual_positions = vec![Point::new(self.hole.x, self.hole.y)];
        }
        let hole_radius_px = self.size.mm_to_px(self.hole.diameter_mm) / 2.0;
        let safe_pad_mm = placement.safe_pad_mm.unwrap_or(self.size.safe_mm);
        HoleOptions {
            mode: placement.mode,
            side: placement.side,
            count: placement.count,
            hole_radius_px,
            ear_radius_px: hole_radius_px + self.size.mm_to_px(placement.ear_margin_mm),
            safe_pad_px: self.size.mm_to_px(safe_pad_mm),
            manual_positions: placement.manual_positions,
        }
    }

    /// JSON schema for hosts that validate before sending
    pub fn schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(DesignParams)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_camel_case_wire_format() {
        let json = r#"{
            "mode": "stand",
            "size": {"widthMM": 60, "heightMM": 80, "dpi": 300, "bleedMM": 1, "safeMM": 2},
            "offsets": {"borderMM": 3, "cutOffsetMM": 1.5},
            "hole": {"x": 10, "y": 20, "diameterMM": 4},
            "threshold": 30,
            "assumeTransparent": true,
            "sampleColor": {"r": 1, "g": 2, "b": 3}
        }"#;
        let params: DesignParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.mode, "stand");
        assert_eq!(params.offsets.cut_offset_mm, 1.5);
        assert_eq!(params.hole.diameter_mm, 4.0);
        assert!(params.assume_transparent);
        assert!(params.snap_to_perimeter, "missing fields take defaults");
        assert_eq!(params.sample_color, Some(Rgb::new(1, 2, 3)));
        assert!(params.template_shape.is_none());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_mm_to_px_conversions() {
        let params = DesignParams::default();
        assert!((params.border_px() - 23.622).abs() < 1e-3);
        assert!((params.cut_offset_px() - 11.811).abs() < 1e-3);

        let opts = params.hole_options();
        assert!((opts.hole_radius_px - 17.717).abs() < 1e-3);
        assert!(opts.ear_radius_px > opts.hole_radius_px);
        assert!((opts.safe_pad_px - 23.622).abs() < 1e-3);
    }

    #[test]
    fn test_manual_mode_falls_back_to_hole_position() {
        let params = DesignParams {
            hole: HoleSpec { x: 60.0, y: 30.0, diameter_mm: 3.0 },
            hole_placement: Some(HolePlacementParams {
                mode: HoleMode::Manual,
                ..Default::default()
            }),
            ..Default::default()
        };
        assert_eq!(params.hole_options().manual_positions, vec![Point::new(60.0, 30.0)]);

        let explicit = DesignParams {
            hole_placement: Some(HolePlacementParams {
                mode: HoleMode::Manual,
                manual_positions: vec![Point::new(1.0, 2.0)],
                ..Default::default()
            }),
            ..params
        };
        assert_eq!(explicit.hole_options().manual_positions, vec![Point::new(1.0, 2.0)]);
    }

    #[test]
    fn test_negative_offset_is_rejected() {
        let mut params = DesignParams::default();
        params.offsets.border_mm = -1.0;
        assert!(params.validate().is_err());
    }

    #[test]
    fn test_schema_names_wire_fields() {
        let schema = serde_json::to_string(&DesignParams::schema()).unwrap();
        assert!(schema.contains("assumeTransparent"));
        assert!(schema.contains("diameterMM"));
    }
}
