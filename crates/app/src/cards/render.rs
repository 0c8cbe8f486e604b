//! Card raster rendering.

use std::{io::Cursor, path::PathBuf};

use image::{
    DynamicImage, ImageFormat, Rgb, RgbImage, codecs::jpeg::JpegEncoder, imageops,
};
use imageproc::{drawing::draw_filled_rect_mut, rect::Rect};

use crate::cards::{CardContent, CardError, PrintDocument, fonts::CardFont, qr};

pub const CARD_WIDTH: u32 = 875;
pub const CARD_HEIGHT: u32 = 500;

const HEADER_HEIGHT: u32 = 80;
const HEADER_COLOR: Rgb<u8> = Rgb([191, 2, 2]);
const BACKGROUND: Rgb<u8> = Rgb([255, 255, 255]);
const TEXT_COLOR: Rgb<u8> = Rgb([0, 0, 0]);
const EXPIRATION_COLOR: Rgb<u8> = Rgb([100, 100, 100]);
const TITLE_COLOR: Rgb<u8> = Rgb([255, 255, 255]);

const QR_SIZE: u32 = 400;
const QR_MARGIN: u32 = 50;
const QR_X: u32 = CARD_WIDTH - QR_SIZE - QR_MARGIN;
const QR_Y: u32 = 100;

const TEXT_X: i32 = 50;
const TEXT_GAP: u32 = 15;
const TEXT_MAX_WIDTH: u32 = QR_X - 50 - TEXT_GAP;

const DESCRIPTION_Y: i32 = 150;
const EXPIRATION_Y: i32 = 220;
const SEQUENCE_Y: i32 = 290;

const TITLE_SIZE: u16 = 48;
const BODY_SIZE: u16 = 36;
const MIN_TEXT_SIZE: u16 = 16;

const JPEG_QUALITY: u8 = 90;
const ELLIPSIS: &str = "...";

/// Card appearance settings.
#[derive(Debug, Clone)]
pub struct CardConfig {
    /// Printed in the header band.
    pub title: String,

    /// Body text font; the built-in bitmap font is used when unset or unreadable.
    pub font_path: Option<PathBuf>,

    /// Header font; defaults to the body font.
    pub title_font_path: Option<PathBuf>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            title: "Certificado de Regalo".to_string(),
            font_path: None,
            title_font_path: None,
        }
    }
}

/// Draws coupon cards with fonts loaded once at startup.
#[derive(Debug)]
pub struct CardRenderer {
    title: String,
    body_font: CardFont,
    title_font: CardFont,
}

impl CardRenderer {
    #[must_use]
    pub fn new(config: &CardConfig) -> Self {
        let title_path = config
            .title_font_path
            .as_deref()
            .or(config.font_path.as_deref());

        Self {
            title: config.title.clone(),
            body_font: CardFont::load(config.font_path.as_deref()),
            title_font: CardFont::load(title_path),
        }
    }

    /// Draw one card.
    pub fn render(&self, content: &CardContent) -> Result<RgbImage, CardError> {
        let mut canvas = RgbImage::from_pixel(CARD_WIDTH, CARD_HEIGHT, BACKGROUND);

        draw_filled_rect_mut(
            &mut canvas,
            Rect::at(0, 0).of_size(CARD_WIDTH, HEADER_HEIGHT),
            HEADER_COLOR,
        );

        self.draw_title(&mut canvas);

        let code = qr::encode(&content.payload, QR_SIZE)?;

        imageops::replace(&mut canvas, &code, i64::from(QR_X), i64::from(QR_Y));

        let expiration = format!("Válido hasta: {}", content.expiration);

        for (text, y, color) in [
            (content.description.as_str(), DESCRIPTION_Y, TEXT_COLOR),
            (expiration.as_str(), EXPIRATION_Y, EXPIRATION_COLOR),
            (content.sequence.as_str(), SEQUENCE_Y, TEXT_COLOR),
        ] {
            let (fitted, size) = fit_text(&self.body_font, text, BODY_SIZE, TEXT_MAX_WIDTH);

            self.body_font
                .draw(&mut canvas, color, (TEXT_X, y), size, &fitted);
        }

        Ok(canvas)
    }

    /// One card as PNG bytes.
    pub fn render_png(&self, content: &CardContent) -> Result<Vec<u8>, CardError> {
        let card = self.render(content)?;
        let mut bytes = Vec::new();

        DynamicImage::ImageRgb8(card).write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

        Ok(bytes)
    }

    /// One card as JPEG bytes, the form embedded in print documents.
    pub fn render_jpeg(&self, content: &CardContent) -> Result<Vec<u8>, CardError> {
        let card = self.render(content)?;
        let mut bytes = Vec::new();

        JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY).encode_image(&card)?;

        Ok(bytes)
    }

    /// A print-ready PDF with one card per page.
    pub fn render_print_document(&self, contents: &[CardContent]) -> Result<Vec<u8>, CardError> {
        let mut document = PrintDocument::new();

        for content in contents {
            document.add_card(self.render_jpeg(content)?, CARD_WIDTH, CARD_HEIGHT)?;
        }

        document.finish()
    }

    fn draw_title(&self, canvas: &mut RgbImage) {
        let max_width = CARD_WIDTH - 2 * QR_MARGIN;
        let (title, size) = fit_text(&self.title_font, &self.title, TITLE_SIZE, max_width);

        let width = self.title_font.measure(&title, size);
        let x = (CARD_WIDTH.saturating_sub(width)) / 2;
        let y = (HEADER_HEIGHT.saturating_sub(u32::from(size))) / 2;

        let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
            return;
        };

        self.title_font
            .draw(canvas, TITLE_COLOR, (x, y), size, &title);
    }
}

/// Shrink `text` until it fits `max_width`, truncating with an ellipsis once
/// the smallest size is reached.
fn fit_text(font: &CardFont, text: &str, size: u16, max_width: u32) -> (String, u16) {
    let mut size = size;

    while size > MIN_TEXT_SIZE && font.measure(text, size) > max_width {
        size -= 2;
    }

    if font.measure(text, size) <= max_width {
        return (text.to_string(), size);
    }

    let mut kept: Vec<char> = text.chars().collect();

    while !kept.is_empty() {
        kept.pop();

        let candidate = format!("{}{ELLIPSIS}", kept.iter().collect::<String>().trim_end());

        if font.measure(&candidate, size) <= max_width {
            return (candidate, size);
        }
    }

    (String::new(), size)
}
