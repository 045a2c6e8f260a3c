use geo_types::{Coord, LineString, Polygon};
use goods_kit_common::{BoundingBox, Point};
use image::{GrayImage, Luma, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Binary alpha raster: every value is either [`Mask::CLEAR`] or [`Mask::SOLID`].
///
/// Operations hand back new masks; the only in-place writes are the ear and
/// hole disks the hole placer paints into its own output.
#[derive(Debug, Clone, PartialEq)]
pub struct Mask(GrayImage);

impl Mask {
    pub const CLEAR: u8 = 0;
    pub const SOLID: u8 = 255;

    /// Fully transparent mask
    pub fn new(width: u32, height: u32) -> Self {
        Self(GrayImage::new(width, height))
    }

    /// Fully opaque mask
    pub fn filled(width: u32, height: u32) -> Self {
        Self(GrayImage::from_pixel(width, height, Luma([Self::SOLID])))
    }

    pub fn from_fn(width: u32, height: u32, mut solid: impl FnMut(u32, u32) -> bool) -> Self {
        Self(GrayImage::from_fn(width, height, |x, y| {
            Luma([if solid(x, y) { Self::SOLID } else { Self::CLEAR }])
        }))
    }

    /// Hard threshold: values strictly above `cutoff` become foreground
    pub fn binarize(gray: &GrayImage, cutoff: u8) -> Self {
        Self::from_fn(gray.width(), gray.height(), |x, y| gray.get_pixel(x, y)[0] > cutoff)
    }

    pub fn width(&self) -> u32 {
        self.0.width()
    }

    pub fn height(&self) -> u32 {
        self.0.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    pub fn is_solid(&self, x: u32, y: u32) -> bool {
        self.0.get_pixel(x, y)[0] != Self::CLEAR
    }

    /// Out-of-bounds coordinates read as background
    pub fn is_solid_at(&self, x: i64, y: i64) -> bool {
        x >= 0
            && y >= 0
            && x < i64::from(self.width())
            && y < i64::from(self.height())
            && self.is_solid(x as u32, y as u32)
    }

    pub fn set(&mut self, x: u32, y: u32, solid: bool) {
        self.0
            .put_pixel(x, y, Luma([if solid { Self::SOLID } else { Self::CLEAR }]));
    }

    pub fn as_gray(&self) -> &GrayImage {
        &self.0
    }

    pub(crate) fn as_gray_mut(&mut self) -> &mut GrayImage {
        &mut self.0
    }

    pub fn foreground_count(&self) -> usize {
        self.0.pixels().filter(|p| p[0] != Self::CLEAR).count()
    }

    /// True when no pixel is foreground
    pub fn is_blank(&self) -> bool {
        self.0.pixels().all(|p| p[0] == Self::CLEAR)
    }

    /// Inclusive pixel bounds of the foreground
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        let mut bbox: Option<BoundingBox> = None;
        for (x, y, p) in self.0.enumerate_pixels() {
            if p[0] == Self::CLEAR {
                continue;
            }
            let (x, y) = (f64::from(x), f64::from(y));
            let b = bbox.get_or_insert(BoundingBox { min_x: x, min_y: y, max_x: x, max_y: y });
            b.min_x = b.min_x.min(x);
            b.min_y = b.min_y.min(y);
            b.max_x = b.max_x.max(x);
            b.max_y = b.max_y.max(y);
        }
        bbox
    }

    /// Copy into a larger transparent canvas with `pad` pixels on every side
    pub fn padded(&self, pad: u32) -> Self {
        let mut out = Self::new(self.width() + 2 * pad, self.height() + 2 * pad);
        image::imageops::replace(&mut out.0, &self.0, i64::from(pad), i64::from(pad));
        out
    }

    /// Every foreground pixel of `self` is also foreground in `other`
    pub fn is_subset_of(&self, other: &Mask) -> bool {
        self.dimensions() == other.dimensions()
            && self
                .0
                .pixels()
                .zip(other.0.pixels())
                .all(|(a, b)| a[0] == Self::CLEAR || b[0] != Self::CLEAR)
    }

    /// White RGB carrying the mask as alpha, ready for PNG export
    pub fn to_rgba(&self) -> RgbaImage {
        RgbaImage::from_fn(self.width(), self.height(), |x, y| {
            Rgba([255, 255, 255, self.0.get_pixel(x, y)[0]])
        })
    }
}

/// Ordered polygon in pixel space; the last point implicitly joins the first.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
pub struct Path(pub Vec<Point>);

impl Path {
    pub fn new(points: Vec<Point>) -> Self {
        Self(points)
    }

    pub fn points(&self) -> &[Point] {
        &self.0
    }

    pub fn into_points(self) -> Vec<Point> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::from_points(&self.0)
    }

    /// Explicitly closed copy: appends the first point unless already there
    pub fn closed(&self) -> Vec<Point> {
        let mut points = self.0.clone();
        if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
            if first != last {
                points.push(first);
            }
        }
        points
    }

    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self(self.0.iter().map(|p| p.translate(dx, dy)).collect())
    }

    /// Convert to geo-types Polygon for geometric operations
    pub fn to_geo_polygon(&self) -> Polygon<f64> {
        let coords: Vec<Coord<f64>> = self.0.iter().map(|p| Coord { x: p.x, y: p.y }).collect();
        Polygon::new(LineString::new(coords), vec![])
    }

    /// Enclosed area in square pixels
    pub fn area(&self) -> f64 {
        use geo::Area;
        self.to_geo_polygon().unsigned_area()
    }

    /// Length of the closed ring
    pub fn perimeter(&self) -> f64 {
        self.closed()
            .windows(2)
            .map(|w| w[0].distance_to(w[1]))
            .sum()
    }

    /// Whether the point lies inside the closed ring
    pub fn contains(&self, point: Point) -> bool {
        use geo::Contains;
        self.to_geo_polygon()
            .contains(&geo_types::Point::new(point.x, point.y))
    }
}

impl From<Vec<Point>> for Path {
    fn from(points: Vec<Point>) -> Self {
        Self(points)
    }
}
