//! Phase and balance tracking for a single schedule walk

use crate::loan::{GraceKind, LoanTerms};

/// Phase of the schedule at a given month
///
/// The walk is strictly one-directional: zero or more grace months, then
/// amortization until the end of the term.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulePhase {
    /// Interest (plus insurance and ITF) is paid; the balance does not move
    GraceInterestOnly,
    /// Nothing is amortized; accrued interest capitalizes onto the balance
    GraceFullDeferral,
    /// French constant-installment amortization
    Amortizing,
}

impl SchedulePhase {
    /// Phase for a 1-indexed month of the given terms
    pub fn for_month(terms: &LoanTerms, month: u32) -> Self {
        if month <= terms.effective_grace_months() {
            match terms.grace_kind {
                GraceKind::InterestOnly => SchedulePhase::GraceInterestOnly,
                GraceKind::FullDeferral => SchedulePhase::GraceFullDeferral,
                // effective grace is 0 for GraceKind::None, so this arm can
                // only be reached with month == 0, which the walk never uses
                GraceKind::None => SchedulePhase::Amortizing,
            }
        } else {
            SchedulePhase::Amortizing
        }
    }
}

/// Mutable state carried across the period walk
#[derive(Debug, Clone)]
pub struct ScheduleState {
    /// Current month (1-indexed; 0 before the walk starts)
    pub month: u32,

    /// Outstanding balance at the start of the current period
    pub balance: f64,

    /// Constant French installment, set once on the grace -> amortizing
    /// transition
    pub installment: Option<f64>,
}

impl ScheduleState {
    /// Initialize state at the disbursement point
    pub fn new(opening_balance: f64) -> Self {
        Self {
            month: 0,
            balance: opening_balance,
            installment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::{LoanTerms, RateKind};

    #[test]
    fn test_phase_sequence() {
        let terms = LoanTerms {
            grace_months: 3,
            grace_kind: GraceKind::InterestOnly,
            ..LoanTerms::new(100_000.0, 12, RateKind::EffectiveAnnual, 0.12)
        };

        assert_eq!(
            SchedulePhase::for_month(&terms, 1),
            SchedulePhase::GraceInterestOnly
        );
        assert_eq!(
            SchedulePhase::for_month(&terms, 3),
            SchedulePhase::GraceInterestOnly
        );
        assert_eq!(SchedulePhase::for_month(&terms, 4), SchedulePhase::Amortizing);
        assert_eq!(SchedulePhase::for_month(&terms, 12), SchedulePhase::Amortizing);
    }

    #[test]
    fn test_no_grace_phase_when_kind_is_none() {
        // grace_months without a grace kind means no grace phase at all
        let terms = LoanTerms {
            grace_months: 6,
            grace_kind: GraceKind::None,
            ..LoanTerms::new(100_000.0, 12, RateKind::EffectiveAnnual, 0.12)
        };

        assert_eq!(SchedulePhase::for_month(&terms, 1), SchedulePhase::Amortizing);
        assert_eq!(SchedulePhase::for_month(&terms, 6), SchedulePhase::Amortizing);
    }
}
