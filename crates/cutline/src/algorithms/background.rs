use goods_kit_common::Rgb;
use image::RgbaImage;
use serde::{Deserialize, Serialize};
use schemars::JsonSchema;
use crate::{algorithms::sampling::estimate_background_color, traits::BackgroundRemover, types::Mask};

pub const DEFAULT_COLOR_THRESHOLD: f64 = 28.0;
pub const DEFAULT_WHITE_THRESHOLD: u8 = 240;

/// Blur-then-rebinarize pass run after classification to drop speckles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DenoiseOptions {
    /// Gaussian sigma in pixels; zero or less skips the pass
    pub radius: f32,
    /// Blurred alpha strictly above this stays foreground
    pub cutoff: u8,
}

impl Default for DenoiseOptions {
    fn default() -> Self {
        Self { radius: 1.0, cutoff: 16 }
    }
}

impl DenoiseOptions {
    pub fn apply(&self, mask: Mask) -> Mask {
        if self.radius <= 0.0 {
            return mask;
        }
        let blurred = imageproc::filter::gaussian_blur_f32(mask.as_gray(), self.radius);
        Mask::binarize(&blurred, self.cutoff)
    }
}

/// Removes pixels close to a sampled background color
#[derive(Debug, Clone)]
pub struct ColorDistanceRemover {
    pub sample: Rgb,
    /// Pixels strictly closer than this (RGB Euclidean) become background
    pub threshold: f64,
    pub denoise: DenoiseOptions,
}

impl ColorDistanceRemover {
    pub fn new(sample: Rgb, threshold: f64) -> Self {
        Self {
            sample,
            threshold,
            denoise: DenoiseOptions::default(),
        }
    }
}

impl BackgroundRemover for ColorDistanceRemover {
    fn remove_background(&self, image: &RgbaImage) -> Mask {
        let classified = Mask::from_fn(image.width(), image.height(), |x, y| {
            let [r, g, b, a] = image.get_pixel(x, y).0;
            a != 0 && self.sample.distance_to(r, g, b) >= self.threshold
        });
        self.denoise.apply(classified)
    }
}

/// Color-distance removal against the color sampled from the image's own corners
#[derive(Debug, Clone)]
pub struct SampledColorRemover {
    pub threshold: f64,
    pub denoise: DenoiseOptions,
}

impl Default for SampledColorRemover {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_COLOR_THRESHOLD,
            denoise: DenoiseOptions::default(),
        }
    }
}

impl BackgroundRemover for SampledColorRemover {
    fn remove_background(&self, image: &RgbaImage) -> Mask {
        ColorDistanceRemover {
            sample: estimate_background_color(image),
            threshold: self.threshold,
            denoise: self.denoise,
        }
        .remove_background(image)
    }
}

/// Treats near-white pixels (every channel at or above the threshold) as background
#[derive(Debug, Clone)]
pub struct WhiteThresholdRemover {
    pub threshold: u8,
    pub denoise: DenoiseOptions,
}

impl Default for WhiteThresholdRemover {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_WHITE_THRESHOLD,
            denoise: DenoiseOptions::default(),
        }
    }
}

impl BackgroundRemover for WhiteThresholdRemover {
    fn remove_background(&self, image: &RgbaImage) -> Mask {
        let t = self.threshold;
        let classified = Mask::from_fn(image.width(), image.height(), |x, y| {
            let [r, g, b, a] = image.get_pixel(x, y).0;
            a != 0 && !(r >= t && g >= t && b >= t)
        });
        self.denoise.apply(classified)
    }
}

/// Trusts the artwork's own alpha channel (pre-segmented uploads)
#[derive(Debug, Clone, Default)]
pub struct AlphaRemover {
    /// Alpha strictly above this is foreground
    pub cutoff: u8,
}

impl BackgroundRemover for AlphaRemover {
    fn remove_background(&self, image: &RgbaImage) -> Mask {
        Mask::from_fn(image.width(), image.height(), |x, y| {
            image.get_pixel(x, y)[3] > self.cutoff
        })
    }
}

/// Color-distance removal with the default denoise pass
pub fn remove_by_color(image: &RgbaImage, sample: Rgb, threshold: f64) -> Mask {
    ColorDistanceRemover::new(sample, threshold).remove_background(image)
}

/// White-threshold removal with the default denoise pass
pub fn remove_by_white_threshold(image: &RgbaImage, threshold: u8) -> Mask {
    WhiteThresholdRemover {
        threshold,
        ..Default::default()
    }
    .remove_background(image)
}
