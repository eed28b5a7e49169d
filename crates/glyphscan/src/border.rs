//! Border marker sampling.

use image::{DynamicImage, ImageBuffer, Pixel, RgbImage, RgbaImage};

/// Channel-sum threshold below which a border cell reads as marked.
///
/// Empirical constant matched to the reference encoder's rendering: a
/// near-black fill against a near-white background at its output resolution.
/// It has no derivation from pixel count or channel depth and must stay fixed
/// for existing codes to decode.
pub const BORDER_MARK_THRESHOLD: u64 = 250_000;

/// Sum of every raw channel value (alpha included) over the region.
pub fn channel_sum<P>(region: &ImageBuffer<P, Vec<u8>>) -> u64
where
    P: Pixel<Subpixel = u8>,
{
    region.as_raw().iter().map(|&v| u64::from(v)).sum()
}

/// True when the region is dark enough to count as a present marker.
///
/// An empty region sums to zero and therefore reads as marked.
pub fn is_marked<P>(region: &ImageBuffer<P, Vec<u8>>) -> bool
where
    P: Pixel<Subpixel = u8>,
{
    channel_sum(region) < BORDER_MARK_THRESHOLD
}

/// Opaque RGBA view of an RGB crop, the form border cells are read back in.
pub fn to_opaque_rgba(cell: RgbImage) -> RgbaImage {
    DynamicImage::ImageRgb8(cell).to_rgba8()
}
