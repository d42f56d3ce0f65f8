//! Core schedule engine: walks the loan month by month through the grace and
//! amortizing phases, emitting the period table and the client cash-flow
//! vector, then solves for the monthly IRR and the TCEA.

use crate::loan::{LoanTerms, TermsError};
use crate::rates;

use super::cashflows::{PeriodRow, SimulationResult};
use super::irr::{self, DEFAULT_IRR_GUESS};
use super::state::{SchedulePhase, ScheduleState};

/// Constant French installment for a balance `principal` amortized over
/// `periods` months at monthly rate `i`: P·i·(1+i)^n / ((1+i)^n − 1),
/// or P/n when i = 0.
pub fn french_installment(principal: f64, i: f64, periods: u32) -> f64 {
    if periods == 0 {
        return 0.0;
    }
    if i <= 0.0 {
        return principal / periods as f64;
    }
    let factor = (1.0 + i).powi(periods as i32);
    principal * i * factor / (factor - 1.0)
}

/// Builds the payment schedule for one set of loan terms.
///
/// The builder holds no state between runs; `simulate` is a pure function of
/// its input, so concurrent callers need no coordination.
pub struct ScheduleBuilder<'a> {
    terms: &'a LoanTerms,
    periodic_rate: f64,
    state: ScheduleState,
    rows: Vec<PeriodRow>,
    cashflows: Vec<f64>,
}

impl<'a> ScheduleBuilder<'a> {
    /// Validate the terms and set up the walk
    pub fn new(terms: &'a LoanTerms) -> Result<Self, TermsError> {
        terms.validate()?;

        let periodic_rate = terms.monthly_rate();
        Ok(Self {
            terms,
            periodic_rate,
            state: ScheduleState::new(terms.financed_principal()),
            rows: Vec::with_capacity(terms.term_months as usize),
            cashflows: Vec::with_capacity(terms.term_months as usize + 1),
        })
    }

    /// Walk every period and assemble the result
    pub fn build(mut self) -> SimulationResult {
        // t0: what the borrower actually receives
        self.cashflows.push(self.terms.net_disbursement());

        for month in 1..=self.terms.term_months {
            self.state.month = month;
            match SchedulePhase::for_month(self.terms, month) {
                SchedulePhase::GraceInterestOnly => self.interest_only_month(),
                SchedulePhase::GraceFullDeferral => self.full_deferral_month(),
                SchedulePhase::Amortizing => self.amortizing_month(),
            }
        }

        self.finish()
    }

    /// Interest-only grace: interest + insurance are paid, nothing amortizes
    fn interest_only_month(&mut self) {
        let interest = self.state.balance * self.periodic_rate;
        let insurance = self
            .terms
            .insurance
            .monthly_premium(self.state.balance, self.periodic_rate);

        let cash_due = interest + insurance;
        let tax = cash_due * self.terms.tax_rate;

        let mut row = PeriodRow::new(self.state.month);
        row.interest = interest;
        row.insurance = insurance;
        row.tax = tax;
        row.total_installment = cash_due + tax;
        row.ending_balance = self.state.balance;

        self.cashflows.push(-row.total_installment);
        self.rows.push(row);
    }

    /// Full-deferral grace: accrued interest capitalizes onto the balance.
    /// No cash moves unless the lender collects insurance during deferral.
    fn full_deferral_month(&mut self) {
        let interest = self.state.balance * self.periodic_rate;
        let premium = self
            .terms
            .insurance
            .monthly_premium(self.state.balance, self.periodic_rate);

        let mut row = PeriodRow::new(self.state.month);
        row.interest = interest;

        if self.terms.collect_insurance_in_full_deferral && premium > 0.0 {
            let tax = premium * self.terms.tax_rate;
            row.insurance = premium;
            row.tax = tax;
            row.total_installment = premium + tax;
            self.cashflows.push(-row.total_installment);
        } else {
            self.cashflows.push(0.0);
        }

        self.state.balance += interest;
        row.ending_balance = self.state.balance;
        self.rows.push(row);
    }

    /// Amortizing phase: constant installment, declining balance
    fn amortizing_month(&mut self) {
        let installment = match self.state.installment {
            Some(c) => c,
            None => {
                // grace -> amortizing transition: fix the installment over
                // the remaining periods against the balance carried out of
                // the grace phase
                let remaining = self.terms.term_months - self.terms.effective_grace_months();
                let c = french_installment(self.state.balance, self.periodic_rate, remaining);
                log::debug!(
                    "amortizing {} periods from balance {:.2}, installment {:.2}",
                    remaining,
                    self.state.balance,
                    c
                );
                self.state.installment = Some(c);
                c
            }
        };

        let interest = self.state.balance * self.periodic_rate;

        // Clamp against pathological installments (smaller than interest)
        // and against final-period floating-point drift
        let amortization = (installment - interest).max(0.0).min(self.state.balance);

        // Premium is computed on the period-start balance, before this
        // month's amortization is applied
        let insurance = self
            .terms
            .insurance
            .monthly_premium(self.state.balance, self.periodic_rate);
        let tax = (installment + insurance) * self.terms.tax_rate;

        self.state.balance -= amortization;

        let mut row = PeriodRow::new(self.state.month);
        row.base_installment = installment;
        row.interest = interest;
        row.amortization = amortization;
        row.insurance = insurance;
        row.tax = tax;
        row.total_installment = installment + insurance + tax;
        row.ending_balance = self.state.balance;

        self.cashflows.push(-row.total_installment);
        self.rows.push(row);
    }

    fn finish(self) -> SimulationResult {
        let total_interest: f64 = self.rows.iter().map(|r| r.interest).sum();
        let total_insurance: f64 = self.rows.iter().map(|r| r.insurance).sum();
        let total_tax: f64 = self.rows.iter().map(|r| r.tax).sum();

        let monthly_irr = irr::internal_rate(&self.cashflows, DEFAULT_IRR_GUESS);
        let tcea = monthly_irr.map(rates::annualize);
        let npv_at_contract_rate = irr::present_value(self.periodic_rate, &self.cashflows);

        SimulationResult {
            rows: self.rows,
            net_disbursement: self.terms.net_disbursement(),
            financed_principal: self.terms.financed_principal(),
            constant_installment: self.state.installment.unwrap_or(0.0),
            total_interest,
            total_insurance,
            total_tax,
            cashflows: self.cashflows,
            monthly_irr,
            tcea,
            npv_at_contract_rate,
        }
    }
}

/// Run a full simulation for one set of loan terms
pub fn simulate(terms: &LoanTerms) -> Result<SimulationResult, TermsError> {
    Ok(ScheduleBuilder::new(terms)?.build())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{GraceKind, InsuranceBase, InsurancePolicy, RateKind};

    fn plain_terms() -> LoanTerms {
        // 100000 over 12 months at TEA 12%, no grace, no insurance, no tax
        LoanTerms::new(100_000.0, 12, RateKind::EffectiveAnnual, 0.12)
    }

    #[test]
    fn test_plain_loan_schedule() {
        let result = simulate(&plain_terms()).unwrap();

        assert_eq!(result.rows.len(), 12);
        assert_eq!(result.cashflows.len(), 13);

        // TEA 12% -> monthly 0.94888%, installment 8856.21
        assert!((result.constant_installment - 8856.21).abs() < 0.01);

        let last = result.rows.last().unwrap();
        assert!(last.ending_balance.abs() < 1e-6);

        let amortized: f64 = result.rows.iter().map(|r| r.amortization).sum();
        assert!((amortized - 100_000.0).abs() < 1e-6);
    }

    #[test]
    fn test_nominal_rate_schedule() {
        // TNA 12% compounded monthly is exactly 1% per month: the classic
        // 8884.88 installment
        let terms = LoanTerms::new(100_000.0, 12, RateKind::NominalAnnual, 0.12);
        let result = simulate(&terms).unwrap();

        assert!((result.constant_installment - 8884.88).abs() < 0.01);
        assert!(result.rows.last().unwrap().ending_balance.abs() < 1e-6);
    }

    #[test]
    fn test_zero_rate_splits_evenly() {
        let terms = LoanTerms::new(1_200.0, 12, RateKind::EffectiveAnnual, 0.0);
        let result = simulate(&terms).unwrap();

        assert!((result.constant_installment - 100.0).abs() < 1e-9);
        for row in &result.rows {
            assert_eq!(row.interest, 0.0);
            assert!((row.amortization - 100.0).abs() < 1e-9);
        }
        assert!(result.rows.last().unwrap().ending_balance.abs() < 1e-9);
    }

    #[test]
    fn test_irr_matches_contract_rate_for_clean_loan() {
        // With no insurance, tax, or costs the client flow is exactly the
        // annuity priced at the contract rate
        let terms = plain_terms();
        let i = terms.monthly_rate();
        let result = simulate(&terms).unwrap();

        let irr = result.monthly_irr.expect("IRR exists");
        assert!((irr - i).abs() < 1e-6);
        assert!((result.tcea.unwrap() - 0.12).abs() < 1e-6);
        assert!(result.npv_at_contract_rate.abs() < 1e-4);
    }

    #[test]
    fn test_upfront_costs_raise_tcea_above_tea() {
        let mut terms = plain_terms();
        terms.upfront_costs = 2_000.0;
        let result = simulate(&terms).unwrap();

        assert_eq!(result.net_disbursement, 98_000.0);
        assert_eq!(result.cashflows[0], 98_000.0);
        assert!(result.tcea.unwrap() > 0.12);
    }

    #[test]
    fn test_financed_upfront_costs_grow_the_balance() {
        let mut terms = plain_terms();
        terms.upfront_costs = 2_000.0;
        terms.finance_upfront_costs = true;
        let result = simulate(&terms).unwrap();

        assert_eq!(result.net_disbursement, 100_000.0);
        assert_eq!(result.financed_principal, 102_000.0);

        let amortized: f64 = result.rows.iter().map(|r| r.amortization).sum();
        assert!((amortized - 102_000.0).abs() < 1e-6);

        // Financing the costs still costs more than the bare rate
        assert!(result.tcea.unwrap() > 0.12);
    }

    #[test]
    fn test_interest_only_grace() {
        let terms = LoanTerms {
            grace_months: 3,
            grace_kind: GraceKind::InterestOnly,
            ..plain_terms()
        };
        let result = simulate(&terms).unwrap();

        assert_eq!(result.rows.len(), 12);
        for row in &result.rows[..3] {
            assert_eq!(row.amortization, 0.0);
            assert_eq!(row.base_installment, 0.0);
            assert!((row.interest - 948.88).abs() < 0.01);
            assert!((row.ending_balance - 100_000.0).abs() < 1e-9);
        }

        // Amortization restarts against the untouched balance over 9 months
        let i = terms.monthly_rate();
        let expected = french_installment(100_000.0, i, 9);
        assert!((result.constant_installment - expected).abs() < 1e-9);
        assert!(result.rows.last().unwrap().ending_balance.abs() < 1e-6);
    }

    #[test]
    fn test_full_deferral_capitalizes_interest() {
        let terms = LoanTerms {
            grace_months: 2,
            grace_kind: GraceKind::FullDeferral,
            ..plain_terms()
        };
        let result = simulate(&terms).unwrap();

        // No cash during deferral
        assert_eq!(result.cashflows[1], 0.0);
        assert_eq!(result.cashflows[2], 0.0);

        // Balance compounds at the monthly rate
        let i = terms.monthly_rate();
        let expected_balance = 100_000.0 * (1.0 + i).powi(2);
        assert!((result.rows[1].ending_balance - expected_balance).abs() < 0.01);
        assert!((expected_balance - 101_906.76).abs() < 0.01);

        // Balance is non-decreasing through deferral, then amortizes to zero
        assert!(result.rows[0].ending_balance >= 100_000.0);
        assert!(result.rows[1].ending_balance >= result.rows[0].ending_balance);
        assert!(result.rows.last().unwrap().ending_balance.abs() < 1e-6);

        let amortized: f64 = result.rows.iter().map(|r| r.amortization).sum();
        assert!((amortized - expected_balance).abs() < 1e-6);
    }

    #[test]
    fn test_insurance_collected_during_full_deferral() {
        let insured = InsurancePolicy::Fixed { amount: 40.0 };

        let waived = LoanTerms {
            grace_months: 2,
            grace_kind: GraceKind::FullDeferral,
            insurance: insured.clone(),
            tax_rate: 0.00005,
            ..plain_terms()
        };
        let collected = LoanTerms {
            collect_insurance_in_full_deferral: true,
            ..waived.clone()
        };

        let waived_result = simulate(&waived).unwrap();
        let collected_result = simulate(&collected).unwrap();

        assert_eq!(waived_result.cashflows[1], 0.0);
        assert_eq!(waived_result.rows[0].insurance, 0.0);

        let expected = 40.0 + 40.0 * 0.00005;
        assert!((collected_result.cashflows[1] + expected).abs() < 1e-9);
        assert_eq!(collected_result.rows[0].insurance, 40.0);

        // Capitalization itself is identical either way
        assert!(
            (waived_result.rows[1].ending_balance - collected_result.rows[1].ending_balance)
                .abs()
                < 1e-9
        );
    }

    #[test]
    fn test_insurance_and_tax_in_installment() {
        let terms = LoanTerms {
            insurance: InsurancePolicy::Percentage {
                monthly_rate: 0.0005,
                base: InsuranceBase::PeriodStartBalance,
            },
            tax_rate: 0.00005,
            ..plain_terms()
        };
        let result = simulate(&terms).unwrap();

        let first = &result.rows[0];
        assert!((first.insurance - 50.0).abs() < 1e-9);

        let expected_tax = (first.base_installment + first.insurance) * 0.00005;
        assert!((first.tax - expected_tax).abs() < 1e-12);
        assert!(
            (first.total_installment
                - (first.base_installment + first.insurance + first.tax))
                .abs()
                < 1e-12
        );

        // Premiums decline with the balance
        assert!(result.rows[11].insurance < result.rows[0].insurance);
        assert!(result.total_insurance > 0.0);
        assert!(result.total_tax > 0.0);
    }

    #[test]
    fn test_balance_is_monotone_while_amortizing() {
        let terms = LoanTerms {
            grace_months: 6,
            grace_kind: GraceKind::FullDeferral,
            ..LoanTerms::new(250_000.0, 240, RateKind::EffectiveAnnual, 0.095)
        };
        let result = simulate(&terms).unwrap();

        for pair in result.rows[6..].windows(2) {
            assert!(pair[1].ending_balance <= pair[0].ending_balance + 1e-9);
        }
    }

    #[test]
    fn test_balance_recursion_invariant() {
        let terms = LoanTerms {
            grace_months: 3,
            grace_kind: GraceKind::InterestOnly,
            insurance: InsurancePolicy::Percentage {
                monthly_rate: 0.00049,
                base: InsuranceBase::AverageBalance,
            },
            tax_rate: 0.00005,
            upfront_costs: 1_500.0,
            ..LoanTerms::new(180_000.0, 120, RateKind::EffectiveAnnual, 0.099)
        };
        let result = simulate(&terms).unwrap();

        let mut balance = terms.financed_principal();
        for row in &result.rows {
            balance -= row.amortization;
            if row.month <= 3 {
                // interest-only grace does not move the balance
                assert!((row.ending_balance - terms.financed_principal()).abs() < 1e-9);
            }
            assert!((row.ending_balance - balance).abs() < 1e-6);
        }
        assert!(balance.abs() < 1e-6);
    }

    #[test]
    fn test_grace_consuming_term_is_rejected() {
        let terms = LoanTerms {
            grace_months: 12,
            grace_kind: GraceKind::InterestOnly,
            ..plain_terms()
        };
        let err = simulate(&terms).unwrap_err();
        assert_eq!(
            err,
            TermsError::GraceExceedsTerm {
                grace: 12,
                term: 12
            }
        );
    }
}
