//! Loan parameter structures matching the simulation input format

use serde::{Deserialize, Serialize};
use thiserror::Error;

fn default_compounding() -> u32 {
    12
}

/// How the annual rate is quoted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateKind {
    /// Effective annual rate (TEA)
    EffectiveAnnual,
    /// Nominal annual rate (TNA), requires a compounding frequency
    NominalAnnual,
}

/// Grace period regime applied to the initial months of the loan
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GraceKind {
    /// No grace phase; amortization starts at month 1
    None,
    /// Interest (plus insurance and ITF) is paid, balance is unchanged
    InterestOnly,
    /// Nothing is paid; accrued interest capitalizes onto the balance
    FullDeferral,
}

/// Base on which a percentage desgravamen premium is computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsuranceBase {
    /// Balance at the start of the period
    PeriodStartBalance,
    /// Average of the start balance and an interest-only estimate of the
    /// period-end balance
    AverageBalance,
}

/// Desgravamen insurance policy for the life of the loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum InsurancePolicy {
    /// Constant monthly amount (0 = no insurance)
    Fixed { amount: f64 },
    /// Monthly rate applied to a declining balance
    Percentage {
        monthly_rate: f64,
        base: InsuranceBase,
    },
}

impl Default for InsurancePolicy {
    fn default() -> Self {
        InsurancePolicy::Fixed { amount: 0.0 }
    }
}

impl InsurancePolicy {
    /// No insurance at all
    pub fn none() -> Self {
        Self::default()
    }

    /// Monthly premium for a period that starts with the given balance.
    ///
    /// For the average-balance base the period-end balance is not known when
    /// the premium is charged, so it is approximated by the interest-only
    /// estimate `balance * (1 - i)`, floored at zero, and averaged with the
    /// start balance.
    pub fn monthly_premium(&self, period_start_balance: f64, periodic_rate: f64) -> f64 {
        match self {
            InsurancePolicy::Fixed { amount } => *amount,
            InsurancePolicy::Percentage { monthly_rate, base } => {
                let insured_base = match base {
                    InsuranceBase::PeriodStartBalance => period_start_balance,
                    InsuranceBase::AverageBalance => {
                        let projected_end =
                            (period_start_balance - period_start_balance * periodic_rate).max(0.0);
                        (period_start_balance + projected_end) / 2.0
                    }
                };
                insured_base * monthly_rate
            }
        }
    }

    fn validate(&self) -> Result<(), TermsError> {
        match self {
            InsurancePolicy::Fixed { amount } if *amount < 0.0 => {
                Err(TermsError::NegativeInsurance(*amount))
            }
            InsurancePolicy::Percentage { monthly_rate, .. } if *monthly_rate < 0.0 => {
                Err(TermsError::NegativeInsurance(*monthly_rate))
            }
            _ => Ok(()),
        }
    }
}

/// Configuration errors rejected before any schedule math runs
#[derive(Debug, Error, PartialEq)]
pub enum TermsError {
    #[error("principal must be positive and finite (got {0})")]
    InvalidPrincipal(f64),

    #[error("term must be at least one month")]
    InvalidTerm,

    #[error("rate must be non-negative and finite (got {0})")]
    InvalidRate(f64),

    #[error("compounding frequency must be at least 1 per year")]
    InvalidCompounding,

    #[error("grace period of {grace} months must be shorter than the {term}-month term")]
    GraceExceedsTerm { grace: u32, term: u32 },

    #[error("tax rate must be non-negative (got {0})")]
    NegativeTaxRate(f64),

    #[error("upfront costs must be non-negative (got {0})")]
    NegativeUpfrontCosts(f64),

    #[error("insurance amount/rate must be non-negative (got {0})")]
    NegativeInsurance(f64),
}

/// Complete parameter set for one simulation run
///
/// Immutable once constructed; the engine is a pure function of this value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanTerms {
    /// Financed amount, excluding upfront costs
    pub principal: f64,

    /// Total term in months
    pub term_months: u32,

    /// How `rate_value` is quoted (TEA or TNA)
    pub rate_kind: RateKind,

    /// Annual rate as a proportion (0.12 = 12%)
    pub rate_value: f64,

    /// Compounding periods per year; only consulted for TNA quotes
    #[serde(default = "default_compounding")]
    pub compounding_per_year: u32,

    /// Number of grace months at the start of the loan
    #[serde(default)]
    pub grace_months: u32,

    /// Grace regime applied during those months
    #[serde(default)]
    pub grace_kind: GraceKind,

    /// One-time fees (notary, registry, appraisal...), not part of `principal`
    #[serde(default)]
    pub upfront_costs: f64,

    /// If true, `upfront_costs` is added to the financed balance instead of
    /// being paid out of pocket at disbursement
    #[serde(default)]
    pub finance_upfront_costs: bool,

    /// ITF per-installment tax rate (0.00005 = 0.005%)
    #[serde(default)]
    pub tax_rate: f64,

    /// Desgravamen insurance policy
    #[serde(default)]
    pub insurance: InsurancePolicy,

    /// Whether the insurance premium is still collected during full-deferral
    /// grace months (lender-specific; most waive it)
    #[serde(default)]
    pub collect_insurance_in_full_deferral: bool,
}

impl Default for GraceKind {
    fn default() -> Self {
        GraceKind::None
    }
}

impl LoanTerms {
    /// Create terms with the required fields; everything else defaults to a
    /// plain loan (no grace, no insurance, no costs, no tax).
    pub fn new(principal: f64, term_months: u32, rate_kind: RateKind, rate_value: f64) -> Self {
        Self {
            principal,
            term_months,
            rate_kind,
            rate_value,
            compounding_per_year: 12,
            grace_months: 0,
            grace_kind: GraceKind::None,
            upfront_costs: 0.0,
            finance_upfront_costs: false,
            tax_rate: 0.0,
            insurance: InsurancePolicy::none(),
            collect_insurance_in_full_deferral: false,
        }
    }

    /// Fail fast on configurations that would produce a misleading schedule.
    pub fn validate(&self) -> Result<(), TermsError> {
        if !self.principal.is_finite() || self.principal <= 0.0 {
            return Err(TermsError::InvalidPrincipal(self.principal));
        }
        if self.term_months == 0 {
            return Err(TermsError::InvalidTerm);
        }
        if !self.rate_value.is_finite() || self.rate_value < 0.0 {
            return Err(TermsError::InvalidRate(self.rate_value));
        }
        if self.rate_kind == RateKind::NominalAnnual && self.compounding_per_year == 0 {
            return Err(TermsError::InvalidCompounding);
        }
        if self.effective_grace_months() >= self.term_months {
            return Err(TermsError::GraceExceedsTerm {
                grace: self.grace_months,
                term: self.term_months,
            });
        }
        if self.tax_rate < 0.0 {
            return Err(TermsError::NegativeTaxRate(self.tax_rate));
        }
        if self.upfront_costs < 0.0 {
            return Err(TermsError::NegativeUpfrontCosts(self.upfront_costs));
        }
        self.insurance.validate()
    }

    /// Effective monthly periodic rate for this quote
    pub fn monthly_rate(&self) -> f64 {
        crate::rates::monthly_rate(self.rate_kind, self.rate_value, self.compounding_per_year)
    }

    /// Grace months actually applied: with `GraceKind::None` there is no
    /// grace phase regardless of `grace_months`.
    pub fn effective_grace_months(&self) -> u32 {
        match self.grace_kind {
            GraceKind::None => 0,
            _ => self.grace_months,
        }
    }

    /// Balance the schedule starts from (principal plus financed costs)
    pub fn financed_principal(&self) -> f64 {
        if self.finance_upfront_costs {
            self.principal + self.upfront_costs
        } else {
            self.principal
        }
    }

    /// Net amount the borrower actually receives at disbursement
    pub fn net_disbursement(&self) -> f64 {
        if self.finance_upfront_costs {
            self.principal
        } else {
            self.principal - self.upfront_costs
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_premium() {
        let policy = InsurancePolicy::Fixed { amount: 35.0 };
        assert_eq!(policy.monthly_premium(100_000.0, 0.01), 35.0);
        assert_eq!(policy.monthly_premium(0.0, 0.01), 35.0);
    }

    #[test]
    fn test_balance_premium() {
        let policy = InsurancePolicy::Percentage {
            monthly_rate: 0.0005,
            base: InsuranceBase::PeriodStartBalance,
        };
        assert!((policy.monthly_premium(100_000.0, 0.01) - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_average_balance_premium() {
        let policy = InsurancePolicy::Percentage {
            monthly_rate: 0.0005,
            base: InsuranceBase::AverageBalance,
        };
        // base = (100000 + 100000*(1-0.01)) / 2 = 99500
        let premium = policy.monthly_premium(100_000.0, 0.01);
        assert!((premium - 49.75).abs() < 1e-10);
    }

    #[test]
    fn test_validation_rejects_bad_terms() {
        let base = LoanTerms::new(100_000.0, 120, RateKind::EffectiveAnnual, 0.10);
        assert!(base.validate().is_ok());

        let t = LoanTerms {
            principal: 0.0,
            ..base.clone()
        };
        assert_eq!(t.validate(), Err(TermsError::InvalidPrincipal(0.0)));

        let t = LoanTerms {
            term_months: 0,
            ..base.clone()
        };
        assert_eq!(t.validate(), Err(TermsError::InvalidTerm));

        let t = LoanTerms {
            rate_value: -0.05,
            ..base.clone()
        };
        assert_eq!(t.validate(), Err(TermsError::InvalidRate(-0.05)));

        let t = LoanTerms {
            grace_months: 120,
            grace_kind: GraceKind::InterestOnly,
            ..base.clone()
        };
        assert_eq!(
            t.validate(),
            Err(TermsError::GraceExceedsTerm {
                grace: 120,
                term: 120
            })
        );

        // grace months are ignored when the kind is None
        let t = LoanTerms {
            grace_months: 200,
            grace_kind: GraceKind::None,
            ..base
        };
        assert!(t.validate().is_ok());
    }

    #[test]
    fn test_financed_principal_and_disbursement() {
        let mut terms = LoanTerms::new(100_000.0, 120, RateKind::EffectiveAnnual, 0.10);
        terms.upfront_costs = 2_500.0;

        assert_eq!(terms.financed_principal(), 100_000.0);
        assert_eq!(terms.net_disbursement(), 97_500.0);

        terms.finance_upfront_costs = true;
        assert_eq!(terms.financed_principal(), 102_500.0);
        assert_eq!(terms.net_disbursement(), 100_000.0);
    }

    #[test]
    fn test_terms_json_round_trip() {
        let json = r#"{
            "principal": 250000.0,
            "term_months": 240,
            "rate_kind": "nominal_annual",
            "rate_value": 0.09,
            "compounding_per_year": 360,
            "grace_months": 6,
            "grace_kind": "full_deferral",
            "tax_rate": 0.00005,
            "insurance": { "mode": "percentage", "monthly_rate": 0.0005, "base": "average_balance" }
        }"#;

        let terms: LoanTerms = serde_json::from_str(json).expect("valid terms JSON");
        assert_eq!(terms.compounding_per_year, 360);
        assert_eq!(terms.grace_kind, GraceKind::FullDeferral);
        assert!(!terms.finance_upfront_costs);
        assert!(terms.validate().is_ok());
    }
}
