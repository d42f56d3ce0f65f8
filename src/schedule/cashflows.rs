//! Schedule output structures: the period table and the simulation result

use serde::{Deserialize, Serialize};

/// A single row of the payment schedule, one per month
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodRow {
    /// Month index, 1..term
    pub month: u32,

    /// Constant French installment (0 during grace months)
    pub base_installment: f64,

    /// Interest accrued on the period-start balance
    pub interest: f64,

    /// Principal repaid this period
    pub amortization: f64,

    /// Desgravamen premium charged this period
    pub insurance: f64,

    /// ITF charged on the installment
    pub tax: f64,

    /// base_installment + insurance + tax
    pub total_installment: f64,

    /// Outstanding balance after this period
    pub ending_balance: f64,
}

impl PeriodRow {
    /// Create a row with all amounts zeroed
    pub fn new(month: u32) -> Self {
        Self {
            month,
            base_installment: 0.0,
            interest: 0.0,
            amortization: 0.0,
            insurance: 0.0,
            tax: 0.0,
            total_installment: 0.0,
            ending_balance: 0.0,
        }
    }
}

/// Complete result of one simulation run
///
/// Computed once per parameter set and never mutated; a new parameter set
/// yields a wholly new result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Monthly schedule rows, 1..term
    pub rows: Vec<PeriodRow>,

    /// Client cash-flow vector: index 0 is the net disbursement (positive),
    /// indices 1..term are the negated total installments
    pub cashflows: Vec<f64>,

    /// Amount the borrower received at disbursement
    pub net_disbursement: f64,

    /// Balance the schedule started from (principal plus financed costs)
    pub financed_principal: f64,

    /// Constant post-grace installment
    pub constant_installment: f64,

    pub total_interest: f64,
    pub total_insurance: f64,
    pub total_tax: f64,

    /// Monthly IRR of the client flow; None when no solution exists
    pub monthly_irr: Option<f64>,

    /// Effective annual cost rate; None exactly when `monthly_irr` is None
    pub tcea: Option<f64>,

    /// NPV of the client flow discounted at the contract's monthly rate
    pub npv_at_contract_rate: f64,
}

impl SimulationResult {
    /// Total of everything the borrower pays over the life of the loan
    pub fn total_paid(&self) -> f64 {
        self.rows.iter().map(|r| r.total_installment).sum()
    }

    /// Get summary statistics
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            months: self.rows.len() as u32,
            net_disbursement: self.net_disbursement,
            constant_installment: self.constant_installment,
            total_interest: self.total_interest,
            total_insurance: self.total_insurance,
            total_tax: self.total_tax,
            total_paid: self.total_paid(),
            monthly_irr: self.monthly_irr,
            tcea: self.tcea,
        }
    }
}

/// Summary statistics for a simulation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub months: u32,
    pub net_disbursement: f64,
    pub constant_installment: f64,
    pub total_interest: f64,
    pub total_insurance: f64,
    pub total_tax: f64,
    pub total_paid: f64,
    pub monthly_irr: Option<f64>,
    pub tcea: Option<f64>,
}
