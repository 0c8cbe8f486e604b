//! Report Models

use std::{fmt, str::FromStr};

use jiff::civil::Date;
use thiserror::Error;

use crate::domain::coupons::models::Coupon;

/// Which coupons a report includes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Redeemed,
    Unredeemed,
}

impl StatusFilter {
    /// Required `redeemed` value, if any.
    #[must_use]
    pub const fn redeemed(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Redeemed => Some(true),
            Self::Unredeemed => Some(false),
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::All => "all",
            Self::Redeemed => "redeemed",
            Self::Unredeemed => "unredeemed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown status filter: {0}")]
pub struct UnknownStatusFilter(pub String);

impl FromStr for StatusFilter {
    type Err = UnknownStatusFilter;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "" | "all" => Ok(Self::All),
            "redeemed" => Ok(Self::Redeemed),
            "unredeemed" | "pending" => Ok(Self::Unredeemed),
            _ => Err(UnknownStatusFilter(value.to_string())),
        }
    }
}

/// Report parameters. Dates are inclusive calendar days.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportFilter {
    pub status: StatusFilter,
    pub created_from: Option<Date>,
    pub created_to: Option<Date>,
}

/// Coupon counts for a report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportTotals {
    pub total: usize,
    pub redeemed: usize,
    pub pending: usize,
}

impl ReportTotals {
    #[must_use]
    pub fn count(coupons: &[Coupon]) -> Self {
        let redeemed = coupons.iter().filter(|coupon| coupon.is_redeemed()).count();

        Self {
            total: coupons.len(),
            redeemed,
            pending: coupons.len() - redeemed,
        }
    }
}

/// Matching coupons, newest consecutive first, with their totals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouponReport {
    pub coupons: Vec<Coupon>,
    pub totals: ReportTotals,
}
