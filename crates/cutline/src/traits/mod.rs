use image::RgbaImage;
use crate::types::{Mask, Path};

/// Trait for turning artwork into a foreground/background mask
pub trait BackgroundRemover: Send + Sync {
    /// Classify every pixel of the image
    fn remove_background(&self, image: &RgbaImage) -> Mask;
}

/// Trait for growing or shrinking a mask by a pixel radius
pub trait MaskOffsetter: Send + Sync {
    /// Positive `delta_px` dilates, negative erodes, zero copies
    fn offset(&self, mask: &Mask, delta_px: f64) -> Mask;
}

/// Trait for extracting a single ordered outline from a mask
pub trait ContourTracer: Send + Sync {
    /// Empty path when the mask has no usable foreground
    fn trace(&self, mask: &Mask) -> Path;
}
