//! Coupon Config

use clap::Args;

/// Coupon calendar and card printing settings.
#[derive(Debug, Args)]
pub struct CardSettings {
    /// IANA zone whose calendar days decide expiration and report ranges
    #[arg(long, env = "COUPONS_TIME_ZONE", default_value = "America/Panama")]
    pub time_zone: String,

    /// Title printed in the card header
    #[arg(long, env = "CARD_TITLE", default_value = "Certificado de Regalo")]
    pub card_title: String,

    /// TrueType font for card body text
    #[arg(long, env = "CARD_FONT_PATH")]
    pub card_font_path: Option<String>,

    /// TrueType font for the card title
    #[arg(long, env = "CARD_TITLE_FONT_PATH")]
    pub card_title_font_path: Option<String>,
}
