//! Edition-aware pricing
//!
//! Maps the account edition to an estimated USD rate per credit. Rates are
//! list-price estimates; actual contract pricing may differ, which is why
//! every derived figure is labeled "estimated" downstream.

use std::collections::HashMap;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Account edition tier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Edition {
    Standard,
    Enterprise,
    BusinessCritical,
    Vps,
}

impl Edition {
    /// Parse the edition tag reported by the account usage views
    ///
    /// Accepts the organization-usage spellings case-insensitively; anything
    /// else is unrecognized and the caller degrades to credit-only mode.
    pub fn parse(tag: &str) -> Option<Edition> {
        let normalized = tag.trim().to_uppercase().replace(' ', "_");
        match normalized.as_str() {
            "STANDARD" => Some(Edition::Standard),
            "ENTERPRISE" => Some(Edition::Enterprise),
            "BUSINESS_CRITICAL" => Some(Edition::BusinessCritical),
            "VIRTUAL_PRIVATE_SNOWFLAKE" | "VPS" => Some(Edition::Vps),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Edition::Standard => "Standard",
            Edition::Enterprise => "Enterprise",
            Edition::BusinessCritical => "Business Critical",
            Edition::Vps => "Virtual Private Snowflake",
        }
    }
}

lazy_static! {
    /// Estimated USD per credit by edition
    static ref RATE_PER_CREDIT: HashMap<Edition, f64> = {
        let mut rates = HashMap::new();
        rates.insert(Edition::Standard, 2.60);
        rates.insert(Edition::Enterprise, 3.90);
        rates.insert(Edition::BusinessCritical, 5.20);
        rates.insert(Edition::Vps, 6.50);
        rates
    };
}

/// Credit-to-currency conversion for one edition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditionPricing {
    pub edition: Edition,
    pub rate_per_credit: f64,
}

impl EditionPricing {
    /// Pricing at the catalog rate for an edition
    pub fn for_edition(edition: Edition) -> Self {
        Self {
            edition,
            rate_per_credit: RATE_PER_CREDIT[&edition],
        }
    }

    /// A usable rate is finite and strictly positive
    pub fn is_valid(&self) -> bool {
        self.rate_per_credit.is_finite() && self.rate_per_credit > 0.0
    }

    /// Estimated USD for a credit total
    pub fn estimate(&self, credits: f64) -> f64 {
        credits * self.rate_per_credit
    }
}

/// Whether a report can convert credits to currency
///
/// Auto-detection failures become an explicit `Unknown` value here instead
/// of an implicit default edition, so the degraded path is visible in the
/// type rather than scattered through rendering conditionals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "pricing", rename_all = "snake_case")]
pub enum PricingMode {
    Known(EditionPricing),
    Unknown,
}

impl PricingMode {
    /// Build from the edition tag returned by the account query, if any
    pub fn from_edition_tag(tag: Option<&str>) -> PricingMode {
        match tag.and_then(Edition::parse) {
            Some(edition) => PricingMode::Known(EditionPricing::for_edition(edition)),
            None => PricingMode::Unknown,
        }
    }

    /// The conversion rate, when one is known and valid
    pub fn rate(&self) -> Option<f64> {
        match self {
            PricingMode::Known(pricing) if pricing.is_valid() => Some(pricing.rate_per_credit),
            _ => None,
        }
    }
}
