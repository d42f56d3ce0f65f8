//! Lender commercial profiles
//!
//! Each financial entity quotes its own rate, fees, ITF treatment, and
//! desgravamen policy. Applying a profile to a borrower's request yields the
//! concrete `LoanTerms` that lender would put on the table, which is what the
//! comparison tooling simulates side by side.

use super::{InsurancePolicy, LoanRequest, LoanTerms, RateKind};
use serde::{Deserialize, Serialize};

/// Commercial terms of one financial entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LenderProfile {
    pub lender_id: u32,
    pub name: String,

    pub rate_kind: RateKind,
    pub rate_value: f64,
    pub compounding_per_year: u32,

    /// ITF per-installment tax rate this lender applies
    pub tax_rate: f64,

    pub notary_fees: f64,
    pub registry_fees: f64,
    pub appraisal_fee: f64,

    pub insurance: InsurancePolicy,
    pub collect_insurance_in_full_deferral: bool,

    /// Term range this lender will underwrite
    pub min_term_months: u32,
    pub max_term_months: u32,
}

impl LenderProfile {
    /// Whether this lender underwrites the requested term at all
    pub fn accepts_term(&self, term_months: u32) -> bool {
        term_months >= self.min_term_months && term_months <= self.max_term_months
    }

    /// One-time costs this lender charges at disbursement
    pub fn upfront_costs(&self) -> f64 {
        self.notary_fees + self.registry_fees + self.appraisal_fee
    }

    /// Combine the borrower's request with this lender's commercial terms.
    ///
    /// The amount, term, and grace choice come from the request; the rate, ITF,
    /// fees, and insurance policy come from the lender.
    pub fn terms_for(&self, request: &LoanRequest) -> LoanTerms {
        LoanTerms {
            principal: request.financed_amount(),
            term_months: request.term_months,
            rate_kind: self.rate_kind,
            rate_value: self.rate_value,
            compounding_per_year: self.compounding_per_year,
            grace_months: request.grace_months,
            grace_kind: request.grace_kind,
            upfront_costs: self.upfront_costs(),
            finance_upfront_costs: request.finance_upfront_costs,
            tax_rate: self.tax_rate,
            insurance: self.insurance.clone(),
            collect_insurance_in_full_deferral: self.collect_insurance_in_full_deferral,
        }
    }
}
