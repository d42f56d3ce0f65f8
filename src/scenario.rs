//! Scenario runner for batch simulations
//!
//! Pre-loads lender profiles once, then evaluates a borrower's request
//! against every lender (or a list of term variants) without re-reading the
//! CSV between runs.

use crate::loan::{self, LenderProfile, LoanRequest, LoanTerms, TermsError};
use crate::schedule::{simulate, SimulationResult};

/// One lender's simulated offer for a request
#[derive(Debug, Clone)]
pub struct LenderQuote {
    pub lender_id: u32,
    pub lender_name: String,
    pub result: SimulationResult,
}

impl LenderQuote {
    /// TCEA of this offer, if one exists
    pub fn tcea(&self) -> Option<f64> {
        self.result.tcea
    }
}

/// Pre-loaded runner for comparing offers across lenders
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    lenders: Vec<LenderProfile>,
}

impl ScenarioRunner {
    /// Create a runner with no lenders (single-terms runs only)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner with pre-built lender profiles
    pub fn with_lenders(lenders: Vec<LenderProfile>) -> Self {
        Self { lenders }
    }

    /// Create a runner by loading lenders.csv from the default location
    pub fn from_csv() -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            lenders: loan::load_default_lenders()?,
        })
    }

    /// Create a runner from a specific lenders CSV file
    pub fn from_csv_path(path: &std::path::Path) -> Result<Self, Box<dyn std::error::Error>> {
        Ok(Self {
            lenders: loan::load_lenders(path)?,
        })
    }

    /// Get reference to the loaded lender profiles
    pub fn lenders(&self) -> &[LenderProfile] {
        &self.lenders
    }

    /// Run a single simulation for explicit terms
    pub fn run(&self, terms: &LoanTerms) -> Result<SimulationResult, TermsError> {
        simulate(terms)
    }

    /// Run simulations for several term sets with the same runner
    pub fn run_batch(&self, terms_list: &[LoanTerms]) -> Result<Vec<SimulationResult>, TermsError> {
        terms_list.iter().map(simulate).collect()
    }

    /// Simulate the request against every lender that underwrites the
    /// requested term, cheapest TCEA first (offers without a TCEA sort last).
    pub fn quote_all(&self, request: &LoanRequest) -> Result<Vec<LenderQuote>, TermsError> {
        let mut quotes = Vec::new();

        for lender in &self.lenders {
            if !lender.accepts_term(request.term_months) {
                log::debug!(
                    "lender {} skipped: term {} outside [{}, {}]",
                    lender.name,
                    request.term_months,
                    lender.min_term_months,
                    lender.max_term_months
                );
                continue;
            }

            let result = simulate(&lender.terms_for(request))?;
            quotes.push(LenderQuote {
                lender_id: lender.lender_id,
                lender_name: lender.name.clone(),
                result,
            });
        }

        quotes.sort_by(|a, b| match (a.tcea(), b.tcea()) {
            (Some(x), Some(y)) => x.total_cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        });

        Ok(quotes)
    }
}
