use goods_kit_common::Rgb;
use image::RgbaImage;

/// Corners are sampled this far from the edge to skip edge artifacts.
pub const CORNER_INSET: u32 = 2;

/// Estimate the flat background color from the four corners of the image.
///
/// Each corner is inset by [`CORNER_INSET`] pixels (clamped into the image
/// for tiny rasters) and the channel means are rounded to nearest. An empty
/// image yields white.
pub fn estimate_background_color(image: &RgbaImage) -> Rgb {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Rgb::WHITE;
    }

    let left = CORNER_INSET.min(width - 1);
    let right = width.saturating_sub(1 + CORNER_INSET);
    let top = CORNER_INSET.min(height - 1);
    let bottom = height.saturating_sub(1 + CORNER_INSET);

    let corners = [(left, top), (right, top), (left, bottom), (right, bottom)];
    let mut sum = [0u32; 3];
    for (x, y) in corners {
        let p = image.get_pixel(x, y);
        for (total, channel) in sum.iter_mut().zip(p.0) {
            *total += u32::from(channel);
        }
    }

    let mean = |total: u32| (f64::from(total) / corners.len() as f64).round() as u8;
    let color = Rgb::new(mean(sum[0]), mean(sum[1]), mean(sum[2]));
    tracing::debug!(?color, "estimated background color from corners");
    color
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_solid_image_returns_its_color() {
        let image = RgbaImage::from_pixel(40, 30, Rgba([12, 200, 99, 255]));
        assert_eq!(estimate_background_color(&image), Rgb::new(12, 200, 99));
    }

    #[test]
    fn test_corner_mean_is_rounded() {
        let mut image = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        // only the inset top-left corner is bright: 255 / 4 = 63.75
        image.put_pixel(2, 2, Rgba([255, 255, 255, 255]));
        assert_eq!(estimate_background_color(&image), Rgb::new(64, 64, 64));
    }

    #[test]
    fn test_center_content_is_ignored() {
        let mut image = RgbaImage::from_pixel(50, 50, Rgba([250, 250, 250, 255]));
        for y in 10..40 {
            for x in 10..40 {
                image.put_pixel(x, y, Rgba([255, 0, 0, 255]));
            }
        }
        assert_eq!(estimate_background_color(&image), Rgb::new(250, 250, 250));
    }

    #[test]
    fn test_tiny_images_stay_in_bounds() {
        let image = RgbaImage::from_pixel(1, 1, Rgba([7, 8, 9, 255]));
        assert_eq!(estimate_background_color(&image), Rgb::new(7, 8, 9));

        let image = RgbaImage::from_pixel(3, 2, Rgba([1, 2, 3, 255]));
        assert_eq!(estimate_background_color(&image), Rgb::new(1, 2, 3));

        assert_eq!(estimate_background_color(&RgbaImage::new(0, 0)), Rgb::WHITE);
    }
}
