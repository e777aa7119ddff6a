//! Texas residence homestead property tax.
//!
//! Exemptions stack in a fixed order (homestead, over-65/disabled, disabled
//! veteran, local optional, agricultural, custom) and are clamped to the
//! assessed value. A 100% disabled-veteran rating exempts the whole value.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::HomeplanError;
use crate::types::{pct_of, with_metadata, ComputationOutput, Money, Percent};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const HOMESTEAD_EXEMPTION: Money = dec!(100000);
const OVER_65_OR_DISABLED_EXEMPTION: Money = dec!(10000);
const LOCAL_OPTIONAL_MINIMUM: Money = dec!(5000);
const AGRICULTURAL_SHARE: Decimal = dec!(0.5);

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Disabled-veteran rating bands recognised by the exemption schedule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum VeteranDisability {
    #[default]
    None,
    Rated10,
    Rated30,
    Rated50,
    Rated70,
    Rated100,
}

impl VeteranDisability {
    pub fn rating(self) -> u8 {
        match self {
            VeteranDisability::None => 0,
            VeteranDisability::Rated10 => 10,
            VeteranDisability::Rated30 => 30,
            VeteranDisability::Rated50 => 50,
            VeteranDisability::Rated70 => 70,
            VeteranDisability::Rated100 => 100,
        }
    }

    /// Flat exemption for partial ratings. `Rated100` is a full exemption and
    /// has no flat amount.
    fn flat_exemption(self) -> Option<Money> {
        match self {
            VeteranDisability::None | VeteranDisability::Rated100 => None,
            VeteranDisability::Rated10 => Some(dec!(5000)),
            VeteranDisability::Rated30 => Some(dec!(7500)),
            VeteranDisability::Rated50 => Some(dec!(10000)),
            VeteranDisability::Rated70 => Some(dec!(12000)),
        }
    }
}

impl TryFrom<u8> for VeteranDisability {
    type Error = HomeplanError;

    fn try_from(rating: u8) -> Result<Self, Self::Error> {
        match rating {
            0 => Ok(VeteranDisability::None),
            10 => Ok(VeteranDisability::Rated10),
            30 => Ok(VeteranDisability::Rated30),
            50 => Ok(VeteranDisability::Rated50),
            70 => Ok(VeteranDisability::Rated70),
            100 => Ok(VeteranDisability::Rated100),
            other => Err(HomeplanError::InvalidInput {
                field: "veteran_disability".into(),
                reason: format!("rating {other} is not one of 0, 10, 30, 50, 70, 100"),
            }),
        }
    }
}

impl From<VeteranDisability> for u8 {
    fn from(v: VeteranDisability) -> Self {
        v.rating()
    }
}

/// Independently toggleable exemptions. Every field defaults to off/zero.
///
/// `over_65` and `disabled` are mutually exclusive on the application form,
/// but both may arrive set; the shared $10,000 exemption is applied once.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxExemptions {
    pub homestead: bool,
    pub over_65: bool,
    pub disabled: bool,
    pub veteran_disability: VeteranDisability,
    /// Local-option percentage exemption (percentage points).
    pub local_optional_pct: Percent,
    pub agricultural: bool,
    pub custom_amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyTaxInput {
    pub home_price: Money,
    /// Combined local tax rate in percentage points (2.1 = 2.1%).
    pub tax_rate_pct: Percent,
    #[serde(default)]
    pub exemptions: TaxExemptions,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxResult {
    pub assessed_value: Money,
    /// Never more than `assessed_value`.
    pub total_exemptions: Money,
    pub taxable_value: Money,
    pub annual_tax: Money,
    pub monthly_tax: Money,
    /// Annual tax as a percentage of the home price.
    pub effective_rate: Percent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExemptionKind {
    Homestead,
    Over65OrDisabled,
    DisabledVeteran,
    LocalOptional,
    Agricultural,
    Custom,
}

/// One applied exemption, before the total is clamped to the home price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExemptionLine {
    pub kind: ExemptionKind,
    pub amount: Money,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyTaxReport {
    #[serde(flatten)]
    pub tax: TaxResult,
    pub exemption_lines: Vec<ExemptionLine>,
}

// ---------------------------------------------------------------------------
// Core calculations
// ---------------------------------------------------------------------------

/// Exemptions in stacking order. A 100% veteran rating yields a single line
/// for the full home price and nothing else.
pub fn exemption_breakdown(home_price: Money, exemptions: &TaxExemptions) -> Vec<ExemptionLine> {
    if exemptions.veteran_disability == VeteranDisability::Rated100 {
        return vec![ExemptionLine {
            kind: ExemptionKind::DisabledVeteran,
            amount: home_price,
        }];
    }

    let mut lines = Vec::new();
    let mut push = |kind, amount| lines.push(ExemptionLine { kind, amount });

    if exemptions.homestead {
        push(ExemptionKind::Homestead, HOMESTEAD_EXEMPTION);
    }
    if exemptions.over_65 || exemptions.disabled {
        push(ExemptionKind::Over65OrDisabled, OVER_65_OR_DISABLED_EXEMPTION);
    }
    if let Some(amount) = exemptions.veteran_disability.flat_exemption() {
        push(ExemptionKind::DisabledVeteran, amount);
    }
    if exemptions.local_optional_pct > Decimal::ZERO {
        let pct_amount = home_price * exemptions.local_optional_pct / Decimal::ONE_HUNDRED;
        push(ExemptionKind::LocalOptional, pct_amount.max(LOCAL_OPTIONAL_MINIMUM));
    }
    if exemptions.agricultural {
        push(ExemptionKind::Agricultural, home_price * AGRICULTURAL_SHARE);
    }
    if !exemptions.custom_amount.is_zero() {
        push(ExemptionKind::Custom, exemptions.custom_amount);
    }

    lines
}

/// Annual and monthly property tax after Texas exemptions.
pub fn texas_property_tax(
    home_price: Money,
    tax_rate_pct: Percent,
    exemptions: &TaxExemptions,
) -> TaxResult {
    if exemptions.veteran_disability == VeteranDisability::Rated100 {
        return TaxResult {
            assessed_value: home_price,
            total_exemptions: home_price,
            taxable_value: Decimal::ZERO,
            annual_tax: Decimal::ZERO,
            monthly_tax: Decimal::ZERO,
            effective_rate: Decimal::ZERO,
        };
    }

    let stacked: Money = exemption_breakdown(home_price, exemptions)
        .iter()
        .map(|line| line.amount)
        .sum();
    let total_exemptions = stacked.min(home_price);
    let taxable_value = (home_price - total_exemptions).max(Decimal::ZERO);
    let annual_tax = taxable_value * tax_rate_pct / Decimal::ONE_HUNDRED;

    TaxResult {
        assessed_value: home_price,
        total_exemptions,
        taxable_value,
        annual_tax,
        monthly_tax: annual_tax / dec!(12),
        effective_rate: pct_of(annual_tax, home_price),
    }
}

/// Property tax with exemption lines, wrapped with methodology and warnings.
pub fn calculate_property_tax(input: &PropertyTaxInput) -> ComputationOutput<PropertyTaxReport> {
    let start = Instant::now();
    let mut warnings = Vec::new();
    let ex = &input.exemptions;

    if ex.over_65 && ex.disabled {
        warnings.push("Over-65 and disabled both set; the $10,000 exemption is applied once".into());
    }
    if ex.veteran_disability == VeteranDisability::Rated100 {
        warnings.push("100% disabled veteran: residence fully exempt, other exemptions ignored".into());
    }

    let tax = texas_property_tax(input.home_price, input.tax_rate_pct, ex);
    let exemption_lines = exemption_breakdown(input.home_price, ex);

    let stacked: Money = exemption_lines.iter().map(|l| l.amount).sum();
    if stacked > tax.total_exemptions {
        warnings.push(format!(
            "Stacked exemptions of {} exceed the home price; capped at {}",
            stacked, tax.total_exemptions
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    with_metadata(
        "Texas Property Tax with Exemption Stacking",
        input,
        warnings,
        elapsed,
        PropertyTaxReport {
            tax,
            exemption_lines,
        },
    )
}
