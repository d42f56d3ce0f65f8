//! Mortgage System - French-amortization loan simulation engine
//!
//! This library provides:
//! - Rate conversions between TEA/TNA quotes and effective monthly rates
//! - Payment schedule construction with interest-only and full-deferral grace
//! - Declining-balance desgravamen insurance and per-installment ITF
//! - Monthly IRR and TCEA (effective annual cost rate) analytics
//! - Lender profile comparison across a borrower's request

pub mod loan;
pub mod rates;
pub mod scenario;
pub mod schedule;

// Re-export commonly used types
pub use loan::{GraceKind, InsurancePolicy, LenderProfile, LoanRequest, LoanTerms, RateKind};
pub use scenario::ScenarioRunner;
pub use schedule::{simulate, PeriodRow, ScheduleBuilder, SimulationResult};
