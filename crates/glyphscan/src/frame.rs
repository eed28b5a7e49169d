//! Square input frame and reference cell cropping.

use std::path::Path;

use image::{DynamicImage, Rgb, RgbImage};

use crate::error::GeometryError;
use crate::geometry::{Rect, MIN_FRAME_SIZE};

/// Immutable square RGB frame holding one glyph code.
#[derive(Debug, Clone)]
pub struct ImageFrame {
    image: RgbImage,
}

impl ImageFrame {
    /// Wrap an RGB image; fails unless it is square and at least
    /// [`MIN_FRAME_SIZE`] pixels wide.
    pub fn new(image: RgbImage) -> Result<Self, GeometryError> {
        let (width, height) = image.dimensions();
        if width != height {
            return Err(GeometryError::NonSquare { width, height });
        }
        if width == 0 {
            return Err(GeometryError::ZeroSize);
        }
        if width < MIN_FRAME_SIZE {
            return Err(GeometryError::TooSmall {
                size: width,
                min: MIN_FRAME_SIZE,
            });
        }
        Ok(Self { image })
    }

    /// Convert any decoded image to 8-bit RGB and wrap it.
    pub fn from_dynamic(image: DynamicImage) -> Result<Self, GeometryError> {
        Self::new(image.to_rgb8())
    }

    /// Load and decode an image file.
    pub fn open(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let img = image::ImageReader::open(path)?.decode()?;
        Ok(Self::from_dynamic(img)?)
    }

    /// Frame side `S` in pixels.
    pub fn size(&self) -> u32 {
        self.image.width()
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }
}

/// Crop `rect` out of `frame` and resample it to `floor(w) x floor(h)` pixels.
///
/// Matches crop-and-resize semantics: the box is normalized by the frame
/// size, sample positions span the box corners inclusively, values are
/// interpolated bilinearly and positions outside the frame read as 0.
pub fn sample_pixels(frame: &ImageFrame, rect: &Rect) -> Result<RgbImage, GeometryError> {
    let size = frame.size();
    if !rect.is_within(size as f64) {
        return Err(GeometryError::RectOutOfBounds { rect: *rect, size });
    }
    let (out_w, out_h) = rect.pixel_dims();
    if out_w == 0 || out_h == 0 {
        return Err(GeometryError::EmptyCell {
            width: out_w,
            height: out_h,
        });
    }

    let s = size as f64;
    let (y1, x1) = (rect.y / s, rect.x / s);
    let (y2, x2) = ((rect.y + rect.h) / s, (rect.x + rect.w) / s);
    let ys = axis_samples(y1, y2, out_h, frame.image.height());
    let xs = axis_samples(x1, x2, out_w, frame.image.width());

    let mut out = RgbImage::new(out_w, out_h);
    for (oy, &in_y) in ys.iter().enumerate() {
        for (ox, &in_x) in xs.iter().enumerate() {
            let px = bilinear_rgb(&frame.image, in_x, in_y);
            out.put_pixel(ox as u32, oy as u32, px);
        }
    }
    Ok(out)
}

/// Source coordinates for one output axis.
fn axis_samples(lo: f64, hi: f64, out_len: u32, in_len: u32) -> Vec<f64> {
    let span = (in_len - 1) as f64;
    if out_len == 1 {
        return vec![0.5 * (lo + hi) * span];
    }
    let scale = (hi - lo) * span / (out_len - 1) as f64;
    (0..out_len).map(|i| lo * span + i as f64 * scale).collect()
}

fn bilinear_rgb(img: &RgbImage, x: f64, y: f64) -> Rgb<u8> {
    let (w, h) = img.dimensions();
    let max_x = (w - 1) as f64;
    let max_y = (h - 1) as f64;
    if !(0.0..=max_x).contains(&x) || !(0.0..=max_y).contains(&y) {
        return Rgb([0, 0, 0]);
    }

    let x0 = x.floor() as u32;
    let x1 = x.ceil() as u32;
    let y0 = y.floor() as u32;
    let y1 = y.ceil() as u32;
    let fx = x - x0 as f64;
    let fy = y - y0 as f64;

    let p00 = img.get_pixel(x0, y0);
    let p10 = img.get_pixel(x1, y0);
    let p01 = img.get_pixel(x0, y1);
    let p11 = img.get_pixel(x1, y1);

    let mut out = [0u8; 3];
    for (c, slot) in out.iter_mut().enumerate() {
        let top = p00[c] as f64 + (p10[c] as f64 - p00[c] as f64) * fx;
        let bottom = p01[c] as f64 + (p11[c] as f64 - p01[c] as f64) * fx;
        let v = top + (bottom - top) * fy;
        *slot = v.round().clamp(0.0, 255.0) as u8;
    }
    Rgb(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_frame(size: u32) -> ImageFrame {
        let img = RgbImage::from_fn(size, size, |x, y| Rgb([x as u8, y as u8, 7]));
        ImageFrame::new(img).expect("square frame")
    }

    #[test]
    fn frame_requires_square_input() {
        let err = ImageFrame::new(RgbImage::new(40, 41)).expect_err("non-square");
        assert_eq!(
            err,
            GeometryError::NonSquare {
                width: 40,
                height: 41
            }
        );
        let err = ImageFrame::new(RgbImage::new(20, 20)).expect_err("too small");
        assert_eq!(err, GeometryError::TooSmall { size: 20, min: 34 });
        assert!(ImageFrame::new(RgbImage::new(0, 0)).is_err());
    }

    #[test]
    fn crop_has_truncated_rect_dims() {
        let frame = gradient_frame(100);
        let rect = Rect {
            x: 10.0,
            y: 20.0,
            w: 14.7,
            h: 5.2,
        };
        let crop = sample_pixels(&frame, &rect).expect("in bounds");
        assert_eq!(crop.dimensions(), (14, 5));
    }

    #[test]
    fn crop_spans_box_corners() {
        let frame = gradient_frame(100);
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            w: 100.0,
            h: 100.0,
        };
        let crop = sample_pixels(&frame, &rect).expect("in bounds");
        // Full-frame crop at native size reproduces the input.
        assert_eq!(crop.get_pixel(0, 0), &Rgb([0, 0, 7]));
        assert_eq!(crop.get_pixel(99, 0), &Rgb([99, 0, 7]));
        assert_eq!(crop.get_pixel(42, 17), &Rgb([42, 17, 7]));
    }

    #[test]
    fn crop_interpolates_between_pixels() {
        let frame = gradient_frame(101);
        // Box [0, 0.5] of a 101px frame maps output 0..=1 to source x 0 and 50.
        let rect = Rect {
            x: 0.0,
            y: 0.0,
            w: 50.5,
            h: 2.0,
        };
        let crop = sample_pixels(&frame, &rect).expect("in bounds");
        assert_eq!(crop.width(), 50);
        assert_eq!(crop.get_pixel(0, 0)[0], 0);
        // Last column sits on x = 0.5 * 100 = 50.
        assert_eq!(crop.get_pixel(49, 0)[0], 50);
    }

    #[test]
    fn single_pixel_crop_reads_box_center() {
        let frame = gradient_frame(101);
        let rect = Rect {
            x: 20.0,
            y: 40.0,
            w: 1.0,
            h: 1.0,
        };
        let crop = sample_pixels(&frame, &rect).expect("in bounds");
        // Center of [20, 21] / 101 scaled by 100.
        let expected_x = (0.5 * (20.0 + 21.0) / 101.0 * 100.0_f64).round() as u8;
        assert_eq!(crop.get_pixel(0, 0)[0], expected_x);
    }

    #[test]
    fn open_decodes_image_files() {
        let path =
            std::env::temp_dir().join(format!("glyphscan-frame-{}.png", std::process::id()));
        gradient_frame(40).image().save(&path).expect("write png");
        let frame = ImageFrame::open(&path).expect("loads");
        std::fs::remove_file(&path).ok();

        assert_eq!(frame.size(), 40);
        assert_eq!(frame.image().get_pixel(12, 30), &Rgb([12, 30, 7]));
    }

    #[test]
    fn out_of_bounds_rect_is_rejected() {
        let frame = gradient_frame(50);
        let rect = Rect {
            x: 45.0,
            y: 0.0,
            w: 10.0,
            h: 10.0,
        };
        assert!(matches!(
            sample_pixels(&frame, &rect),
            Err(GeometryError::RectOutOfBounds { size: 50, .. })
        ));
    }
}
