//! What gets printed on a card.

use serde::Serialize;

use crate::domain::{coupons::models::Coupon, master_data::models::Promo};

/// Text and payload for one coupon card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardContent {
    /// Encoded in the QR code; the coupon id.
    pub payload: String,

    pub description: String,

    /// Last valid day, `dd/mm/yyyy`.
    pub expiration: String,

    /// e.g. `No. 000042`
    pub sequence: String,
}

impl CardContent {
    #[must_use]
    pub fn for_coupon(coupon: &Coupon, promo: &Promo) -> Self {
        Self {
            payload: coupon.id.to_string(),
            description: promo.card_description(),
            expiration: coupon.expires_on.strftime("%d/%m/%Y").to_string(),
            sequence: coupon.sequence_label().to_string(),
        }
    }
}
