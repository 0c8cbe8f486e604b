//! Coupon cards
//!
//! Each coupon prints as an 875×500 card: a red header band with a title,
//! the promotion, expiration and sequence number on the left, and the QR
//! code carrying the coupon id on the right. Cards are assembled into a PDF
//! with one CR80-sized page per card.

mod content;
mod errors;
mod fonts;
mod pdf;
pub mod qr;
mod render;

pub use content::CardContent;
pub use errors::CardError;
pub use pdf::{PAGE_HEIGHT_PT, PAGE_WIDTH_PT, PrintDocument};
pub use render::{CARD_HEIGHT, CARD_WIDTH, CardConfig, CardRenderer};
