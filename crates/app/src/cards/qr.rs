//! QR encoding and decoding of coupon payloads.

use image::{GrayImage, Luma, Rgb, RgbImage};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};
use qrcode::{Color, EcLevel, QrCode};

use crate::cards::CardError;

/// Light modules kept around the symbol so scanners can find it.
const QUIET_ZONE: u32 = 4;

const DARK: Rgb<u8> = Rgb([0, 0, 0]);
const LIGHT: Rgb<u8> = Rgb([255, 255, 255]);

/// Encode `payload` as plain text with medium error correction, drawn into a
/// `size`×`size` square.
///
/// Modules are whole pixels, so the symbol is centered with any remainder
/// left as extra quiet zone.
pub fn encode(payload: &str, size: u32) -> Result<RgbImage, CardError> {
    let code = QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
        .map_err(|error| CardError::Encode(error.to_string()))?;
    let width = u32::try_from(code.width()).map_err(|error| CardError::Encode(error.to_string()))?;

    let modules = width + QUIET_ZONE * 2;
    let module_px = (size / modules).max(1);
    let offset = size.saturating_sub(module_px * modules) / 2 + QUIET_ZONE * module_px;

    let mut image = RgbImage::from_pixel(size, size, LIGHT);

    for (index, color) in (0_u32..).zip(code.to_colors()) {
        if color != Color::Dark {
            continue;
        }

        let x = offset + (index % width) * module_px;
        let y = offset + (index / width) * module_px;

        if let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) {
            draw_filled_rect_mut(&mut image, Rect::at(x, y).of_size(module_px, module_px), DARK);
        }
    }

    Ok(image)
}

/// Decode the first QR code found in an encoded image (PNG or JPEG).
pub fn decode(bytes: &[u8]) -> Result<String, CardError> {
    let image = image::load_from_memory(bytes)?.to_luma8();

    decode_luma(&image)
}

/// Decode the first QR code found in a greyscale image.
pub fn decode_luma(image: &GrayImage) -> Result<String, CardError> {
    let width = usize::try_from(image.width()).map_err(|error| CardError::Decode(error.to_string()))?;
    let height =
        usize::try_from(image.height()).map_err(|error| CardError::Decode(error.to_string()))?;

    let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(width, height, |x, y| {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return u8::MAX;
        };

        image
            .get_pixel_checked(x, y)
            .map_or(u8::MAX, |&Luma([value])| value)
    });

    let grids = prepared.detect_grids();
    let grid = grids.first().ok_or(CardError::NoCode)?;

    let (_, content) = grid
        .decode()
        .map_err(|error| CardError::Decode(error.to_string()))?;

    Ok(content)
}

#[cfg(test)]
mod tests {
    use image::{DynamicImage, ImageFormat};
    use std::io::Cursor;
    use testresult::TestResult;

    use super::*;

    const PAYLOAD: &str = "0190f7a4-7c1e-7b8a-9d8e-2f4c5a6b7c8d";

    #[test]
    fn encoded_symbol_fills_requested_square() -> TestResult {
        let image = encode(PAYLOAD, 400)?;

        assert_eq!(image.dimensions(), (400, 400));
        assert_eq!(image.get_pixel(0, 0), &LIGHT, "corner must be quiet zone");

        Ok(())
    }

    #[test]
    fn encoded_payload_decodes_back() -> TestResult {
        let image = encode(PAYLOAD, 400)?;
        let grey = DynamicImage::ImageRgb8(image).to_luma8();

        assert_eq!(decode_luma(&grey)?, PAYLOAD);

        Ok(())
    }

    #[test]
    fn png_bytes_decode_back() -> TestResult {
        let image = encode(PAYLOAD, 300)?;
        let mut bytes = Vec::new();

        DynamicImage::ImageRgb8(image).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

        assert_eq!(decode(&bytes)?, PAYLOAD);

        Ok(())
    }

    #[test]
    fn blank_image_has_no_code() {
        let blank = GrayImage::from_pixel(200, 200, Luma([255]));

        assert!(matches!(decode_luma(&blank), Err(CardError::NoCode)));
    }

    #[test]
    fn garbage_bytes_are_an_image_error() {
        assert!(matches!(decode(b"not an image"), Err(CardError::Image(_))));
    }
}
