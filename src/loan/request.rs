//! Commercial loan request: property price, down payment, and housing
//! bonuses, mapped down to the engine's `LoanTerms`

use super::{GraceKind, InsurancePolicy, LoanTerms, RateKind};
use serde::{Deserialize, Serialize};

fn default_compounding() -> u32 {
    12
}

/// Currency the figures are expressed in (display only; the engine is
/// currency-agnostic)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Currency {
    PEN,
    USD,
}

impl Default for Currency {
    fn default() -> Self {
        Currency::PEN
    }
}

/// A housing bonus/subsidy applied against the price (BTP, BBP, Bono Verde...)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bonus {
    pub name: String,
    pub amount: f64,
}

/// Input collected from the borrower before any lender terms are applied
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanRequest {
    #[serde(default)]
    pub currency: Currency,

    /// Sale price of the property
    pub property_price: f64,

    /// Down payment paid by the borrower
    pub down_payment: f64,

    /// Bonuses/subsidies deducted from the financed amount
    #[serde(default)]
    pub bonuses: Vec<Bonus>,

    pub rate_kind: RateKind,
    pub rate_value: f64,
    #[serde(default = "default_compounding")]
    pub compounding_per_year: u32,

    pub term_months: u32,
    #[serde(default)]
    pub grace_kind: GraceKind,
    #[serde(default)]
    pub grace_months: u32,

    /// ITF per-installment tax rate
    #[serde(default)]
    pub tax_rate: f64,

    // Itemized one-time costs
    #[serde(default)]
    pub notary_fees: f64,
    #[serde(default)]
    pub registry_fees: f64,
    #[serde(default)]
    pub appraisal_fee: f64,

    #[serde(default)]
    pub finance_upfront_costs: bool,

    #[serde(default)]
    pub insurance: InsurancePolicy,

    #[serde(default)]
    pub collect_insurance_in_full_deferral: bool,
}

impl LoanRequest {
    /// Total bonus amount deducted from the price
    pub fn total_bonuses(&self) -> f64 {
        self.bonuses.iter().map(|b| b.amount).sum()
    }

    /// Amount the lender actually finances: price minus down payment and
    /// bonuses, floored at zero (validation downstream rejects a zero
    /// principal with a descriptive error).
    pub fn financed_amount(&self) -> f64 {
        (self.property_price - self.down_payment - self.total_bonuses()).max(0.0)
    }

    /// Consolidated one-time costs
    pub fn upfront_costs(&self) -> f64 {
        self.notary_fees + self.registry_fees + self.appraisal_fee
    }

    /// Collapse the request into the engine's parameter set
    pub fn to_terms(&self) -> LoanTerms {
        LoanTerms {
            principal: self.financed_amount(),
            term_months: self.term_months,
            rate_kind: self.rate_kind,
            rate_value: self.rate_value,
            compounding_per_year: self.compounding_per_year,
            grace_months: self.grace_months,
            grace_kind: self.grace_kind,
            upfront_costs: self.upfront_costs(),
            finance_upfront_costs: self.finance_upfront_costs,
            tax_rate: self.tax_rate,
            insurance: self.insurance.clone(),
            collect_insurance_in_full_deferral: self.collect_insurance_in_full_deferral,
        }
    }
}
