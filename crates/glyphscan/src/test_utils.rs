//! Shared test utilities for image-based unit tests.

use image::{Rgb, RgbImage};

use crate::geometry::{CodeLayout, Rect, N_BLOCKS, N_BORDER};

const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const ORIENTATION_DOT: Rgb<u8> = Rgb([0, 255, 0]);
const MARK: Rgb<u8> = Rgb([0, 0, 0]);
/// Extra pixels painted around border marks, like ink bleed on a print.
const MARK_BLEED_PX: f64 = 2.0;

/// Content of a synthetic code.
#[derive(Debug, Clone, Default)]
pub(crate) struct SyntheticCode {
    /// Symbol value per block and quadrant (0..=31).
    pub values: [[u8; 4]; N_BLOCKS],
    /// Rotation flag per block, carried by quadrant 0.
    pub rotated: [bool; N_BLOCKS],
    /// Border marks.
    pub border: [bool; N_BORDER],
}

/// Render a synthetic code of side `size`.
///
/// Each quadrant is filled with `Rgb([value * 8, 0, b])`, where `b` is 255
/// for a rotated quadrant 0 and 0 otherwise. An orientation dot marks the
/// quadrant's outer corner, so upright cells carry it top-left.
pub(crate) fn render_code(size: u32, code: &SyntheticCode) -> RgbImage {
    let layout = CodeLayout::new(size).expect("valid test size");
    let mut img = RgbImage::from_pixel(size, size, BACKGROUND);

    for (b, rects) in layout.quadrants.iter().enumerate() {
        for (q, rect) in rects.iter().enumerate() {
            let blue = if q == 0 && code.rotated[b] { 255 } else { 0 };
            let fill = Rgb([code.values[b][q] * 8, 0, blue]);
            fill_rect(&mut img, rect, fill);

            let dot = rect.w / 6.0;
            let dot_x = if q % 2 == 1 { rect.x + rect.w - dot } else { rect.x };
            let dot_y = if q >= 2 { rect.y + rect.h - dot } else { rect.y };
            fill_rect(
                &mut img,
                &Rect {
                    x: dot_x,
                    y: dot_y,
                    w: dot,
                    h: dot,
                },
                ORIENTATION_DOT,
            );
        }
    }

    for (rect, &marked) in layout.border.iter().zip(code.border.iter()) {
        if marked {
            let bled = Rect {
                x: rect.x - MARK_BLEED_PX,
                y: rect.y - MARK_BLEED_PX,
                w: rect.w + 2.0 * MARK_BLEED_PX,
                h: rect.h + 2.0 * MARK_BLEED_PX,
            };
            fill_rect(&mut img, &bled, MARK);
        }
    }
    img
}

/// Fill every pixel touched by `rect`.
fn fill_rect(img: &mut RgbImage, rect: &Rect, color: Rgb<u8>) {
    let (w, h) = img.dimensions();
    let x0 = rect.x.max(0.0).floor() as u32;
    let y0 = rect.y.max(0.0).floor() as u32;
    let x1 = ((rect.x + rect.w).ceil() as u32).min(w);
    let y1 = ((rect.y + rect.h).ceil() as u32).min(h);
    for y in y0..y1 {
        for x in x0..x1 {
            img.put_pixel(x, y, color);
        }
    }
}
