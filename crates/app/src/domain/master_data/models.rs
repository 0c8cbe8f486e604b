//! Master Data Models

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use crate::{
    auth::{Role, UnknownRole},
    ids::TypedId,
};

/// Branch ID
pub type BranchId = TypedId<Branch>;

/// Promotion type ID
pub type PromoId = TypedId<Promo>;

/// Issuer ID
pub type IssuerId = TypedId<Issuer>;

/// Role ID
pub type RoleId = TypedId<RoleRecord>;

/// Restaurant branch
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Branch {
    pub id: BranchId,
    pub name: String,
    pub address: Option<String>,
}

/// What a promotion's value means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PromoKind {
    /// `value` is a percentage off the bill.
    Percentage,

    /// `value` is a fixed amount.
    CashValue,

    /// `value` is the worth of a free product.
    Product,
}

impl PromoKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Percentage => "percentage",
            Self::CashValue => "cash_value",
            Self::Product => "product",
        }
    }
}

impl fmt::Display for PromoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown promotion kind: {0}")]
pub struct UnknownPromoKind(pub String);

impl FromStr for PromoKind {
    type Err = UnknownPromoKind;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "percentage" => Ok(Self::Percentage),
            "cash_value" | "cash" => Ok(Self::CashValue),
            "product" => Ok(Self::Product),
            _ => Err(UnknownPromoKind(value.to_string())),
        }
    }
}

/// Promotion type
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "PromoRecord")]
pub struct Promo {
    pub id: PromoId,
    pub name: String,
    pub kind: PromoKind,
    pub value: Decimal,
    pub description: Option<String>,
}

/// Promotion row as stored, with the kind spread over three flags.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct PromoRecord {
    id: i64,
    type_name: String,
    is_percentage: bool,
    is_cash_value: bool,
    is_product: bool,
    value: Decimal,
    description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("promotion {0} must have exactly one kind flag set")]
pub struct AmbiguousPromoKind(i64);

impl TryFrom<PromoRecord> for Promo {
    type Error = AmbiguousPromoKind;

    fn try_from(record: PromoRecord) -> Result<Self, Self::Error> {
        let kind = match (record.is_percentage, record.is_cash_value, record.is_product) {
            (true, false, false) => PromoKind::Percentage,
            (false, true, false) => PromoKind::CashValue,
            (false, false, true) => PromoKind::Product,
            _ => return Err(AmbiguousPromoKind(record.id)),
        };

        Ok(Self {
            id: PromoId::from_i64(record.id),
            name: record.type_name,
            kind,
            value: record.value,
            description: record.description,
        })
    }
}

impl Promo {
    /// Text printed on a coupon card for this promotion.
    #[must_use]
    pub fn card_description(&self) -> String {
        if let Some(description) = self
            .description
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
        {
            return description.to_string();
        }

        match self.kind {
            PromoKind::Percentage => format!("{}% de descuento", self.value.normalize()),
            PromoKind::CashValue => format!("${:.2} de consumo", self.value),
            PromoKind::Product => self.name.clone(),
        }
    }
}

/// Campaign or department a batch is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Issuer {
    pub id: IssuerId,

    #[serde(rename = "issuer_name")]
    pub name: String,
}

/// Role row
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RoleRecord {
    pub id: RoleId,

    #[serde(rename = "role_name")]
    pub name: String,
}

impl RoleRecord {
    /// The access level this row grants.
    pub fn role(&self) -> Result<Role, UnknownRole> {
        self.name.parse()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn promo_kind_comes_from_the_single_set_flag() -> TestResult {
        let promo: Promo = serde_json::from_value(json!({
            "id": 7,
            "type_name": "Descuento 10%",
            "is_percentage": true,
            "is_cash_value": false,
            "is_product": false,
            "value": 10,
            "description": null,
        }))?;

        assert_eq!(promo.id, PromoId::from_i64(7));
        assert_eq!(promo.kind, PromoKind::Percentage);
        assert_eq!(promo.value, Decimal::from(10));

        Ok(())
    }

    #[test]
    fn promo_with_two_kind_flags_is_rejected() {
        let result: Result<Promo, _> = serde_json::from_value(json!({
            "id": 8,
            "type_name": "Roto",
            "is_percentage": true,
            "is_cash_value": true,
            "is_product": false,
            "value": 5,
            "description": null,
        }));

        assert!(result.is_err(), "expected ambiguous promo to be rejected");
    }

    #[test]
    fn card_description_prefers_explicit_text() {
        let promo = Promo {
            id: PromoId::from_i64(1),
            name: "Parrillada".to_string(),
            kind: PromoKind::Product,
            value: Decimal::from(45),
            description: Some("Parrillada para dos".to_string()),
        };

        assert_eq!(promo.card_description(), "Parrillada para dos");
    }

    #[test]
    fn card_description_falls_back_to_kind() {
        let percentage = Promo {
            id: PromoId::from_i64(1),
            name: "Descuento".to_string(),
            kind: PromoKind::Percentage,
            value: Decimal::new(1500, 2),
            description: None,
        };

        let cash = Promo {
            kind: PromoKind::CashValue,
            value: Decimal::from(25),
            description: Some("  ".to_string()),
            ..percentage.clone()
        };

        assert_eq!(percentage.card_description(), "15% de descuento");
        assert_eq!(cash.card_description(), "$25.00 de consumo");
    }

    #[test]
    fn issuer_and_role_use_stored_column_names() -> TestResult {
        let issuer: Issuer = serde_json::from_value(json!({ "id": 1, "issuer_name": "Mercadeo" }))?;
        let role: RoleRecord = serde_json::from_value(json!({ "id": 2, "role_name": "Creator" }))?;

        assert_eq!(issuer.name, "Mercadeo");
        assert_eq!(role.role()?, Role::Creator);

        Ok(())
    }
}
