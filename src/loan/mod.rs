//! Loan input domain: terms, borrower requests, and lender profiles

mod data;
mod lender;
mod request;
pub mod loader;

pub use data::{
    GraceKind, InsuranceBase, InsurancePolicy, LoanTerms, RateKind, TermsError,
};
pub use lender::LenderProfile;
pub use loader::{load_default_lenders, load_lenders, load_lenders_from_reader};
pub use request::{Bonus, Currency, LoanRequest};
