//! Card fonts.

use std::{fs, path::Path};

use ab_glyph::{FontVec, PxScale};
use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use imageproc::{
    drawing::{draw_filled_rect_mut, draw_text_mut, text_size},
    rect::Rect,
};
use tracing::warn;

const GLYPH_CELLS: u32 = 8;

/// Face used to draw card text.
pub(crate) enum CardFont {
    TrueType(FontVec),

    /// Built-in 8×8 bitmap glyphs, scaled by whole pixels.
    Bitmap,
}

impl std::fmt::Debug for CardFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TrueType(_) => f.write_str("CardFont::TrueType"),
            Self::Bitmap => f.write_str("CardFont::Bitmap"),
        }
    }
}

impl CardFont {
    /// Load a TrueType/OpenType face, falling back to the bitmap font when the
    /// file is missing or unreadable.
    pub(crate) fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::Bitmap;
        };

        let loaded = fs::read(path)
            .map_err(|error| error.to_string())
            .and_then(|bytes| FontVec::try_from_vec(bytes).map_err(|error| error.to_string()));

        match loaded {
            Ok(font) => Self::TrueType(font),
            Err(reason) => {
                warn!(path = %path.display(), "card font unavailable, using bitmap font: {reason}");

                Self::Bitmap
            }
        }
    }

    /// Rendered width of `text` at a pixel height of `size`.
    pub(crate) fn measure(&self, text: &str, size: u16) -> u32 {
        match self {
            Self::TrueType(font) => text_size(scale(size), font, text).0,
            Self::Bitmap => {
                let glyphs = u32::try_from(text.chars().count()).unwrap_or(u32::MAX);

                glyphs.saturating_mul(GLYPH_CELLS * cell_px(size))
            }
        }
    }

    pub(crate) fn draw(
        &self,
        canvas: &mut RgbImage,
        color: Rgb<u8>,
        (x, y): (i32, i32),
        size: u16,
        text: &str,
    ) {
        match self {
            Self::TrueType(font) => draw_text_mut(canvas, color, x, y, scale(size), font, text),
            Self::Bitmap => draw_bitmap_text(canvas, color, (x, y), size, text),
        }
    }
}

fn scale(size: u16) -> PxScale {
    PxScale::from(f32::from(size))
}

fn cell_px(size: u16) -> u32 {
    (u32::from(size) / GLYPH_CELLS).max(1)
}

fn glyph(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS.get(ch).or_else(|| LATIN_FONTS.get(ch))
}

fn draw_bitmap_text(canvas: &mut RgbImage, color: Rgb<u8>, (x, y): (i32, i32), size: u16, text: &str) {
    let px = cell_px(size);
    let Ok(step) = i32::try_from(px) else {
        return;
    };

    let mut pen_x = x;

    for ch in text.chars() {
        let rows = glyph(ch).or_else(|| glyph('?')).unwrap_or_default();

        for (row, bits) in (0_i32..).zip(rows) {
            for column in 0..8_i32 {
                if bits & (1 << column) == 0 {
                    continue;
                }

                draw_filled_rect_mut(
                    canvas,
                    Rect::at(pen_x + column * step, y + row * step).of_size(px, px),
                    color,
                );
            }
        }

        pen_x += 8 * step;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_font_file_falls_back_to_bitmap() {
        let font = CardFont::load(Some(Path::new("/nonexistent/card-font.ttf")));

        assert!(matches!(font, CardFont::Bitmap));
    }

    #[test]
    fn bitmap_width_scales_with_size() {
        let font = CardFont::Bitmap;

        assert_eq!(font.measure("abc", 16), 3 * 8 * 2);
        assert_eq!(font.measure("", 16), 0);
    }

    #[test]
    fn bitmap_text_marks_pixels() {
        let mut canvas = RgbImage::from_pixel(100, 40, Rgb([255, 255, 255]));

        CardFont::Bitmap.draw(&mut canvas, Rgb([0, 0, 0]), (2, 2), 16, "Válido");

        assert!(canvas.pixels().any(|pixel| *pixel == Rgb([0, 0, 0])));
    }
}
