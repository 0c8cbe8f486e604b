//! Master Data Inputs

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::master_data::{errors::MasterDataServiceError, models::PromoKind};

const PERCENTAGE_CEILING: Decimal = Decimal::ONE_HUNDRED;

/// Branch create/update data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchDetails {
    pub name: String,
    pub address: Option<String>,
}

/// Promotion type create/update data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromoDetails {
    pub name: String,
    pub kind: PromoKind,
    pub value: Decimal,
    pub description: Option<String>,
}

/// Issuer create/update data
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerDetails {
    pub name: String,
}

fn required(value: &str, field: &'static str) -> Result<String, MasterDataServiceError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(MasterDataServiceError::MissingRequiredData(field));
    }

    Ok(trimmed.to_string())
}

fn optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(ToString::to_string)
}

impl BranchDetails {
    pub(crate) fn validated(&self) -> Result<Self, MasterDataServiceError> {
        Ok(Self {
            name: required(&self.name, "name")?,
            address: optional(self.address.as_deref()),
        })
    }
}

impl PromoDetails {
    pub(crate) fn validated(&self) -> Result<Self, MasterDataServiceError> {
        if self.value.is_sign_negative() {
            return Err(MasterDataServiceError::InvalidData(
                "promotion value cannot be negative".to_string(),
            ));
        }

        if self.kind == PromoKind::Percentage
            && (self.value.is_zero() || self.value > PERCENTAGE_CEILING)
        {
            return Err(MasterDataServiceError::InvalidData(
                "percentage must be greater than 0 and at most 100".to_string(),
            ));
        }

        Ok(Self {
            name: required(&self.name, "name")?,
            kind: self.kind,
            value: self.value,
            description: optional(self.description.as_deref()),
        })
    }
}

impl IssuerDetails {
    pub(crate) fn validated(&self) -> Result<Self, MasterDataServiceError> {
        Ok(Self {
            name: required(&self.name, "name")?,
        })
    }
}

/// Branch row written to the backend.
#[derive(Debug, Serialize)]
pub(crate) struct BranchRow<'a> {
    pub name: &'a str,
    pub address: Option<&'a str>,
}

impl<'a> From<&'a BranchDetails> for BranchRow<'a> {
    fn from(details: &'a BranchDetails) -> Self {
        Self {
            name: &details.name,
            address: details.address.as_deref(),
        }
    }
}

/// Promotion row written to the backend.
#[derive(Debug, Serialize)]
pub(crate) struct PromoRow<'a> {
    pub type_name: &'a str,
    pub is_percentage: bool,
    pub is_cash_value: bool,
    pub is_product: bool,
    pub value: Decimal,
    pub description: Option<&'a str>,
}

impl<'a> From<&'a PromoDetails> for PromoRow<'a> {
    fn from(details: &'a PromoDetails) -> Self {
        Self {
            type_name: &details.name,
            is_percentage: details.kind == PromoKind::Percentage,
            is_cash_value: details.kind == PromoKind::CashValue,
            is_product: details.kind == PromoKind::Product,
            value: details.value,
            description: details.description.as_deref(),
        }
    }
}

/// Issuer row written to the backend.
#[derive(Debug, Serialize)]
pub(crate) struct IssuerRow<'a> {
    pub issuer_name: &'a str,
}

impl<'a> From<&'a IssuerDetails> for IssuerRow<'a> {
    fn from(details: &'a IssuerDetails) -> Self {
        Self {
            issuer_name: &details.name,
        }
    }
}
