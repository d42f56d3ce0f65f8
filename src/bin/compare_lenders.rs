//! Compare one borrower's request across every lender profile
//!
//! Loads lenders.csv, simulates the request against each lender in parallel,
//! and ranks the offers by TCEA. Supports JSON output for API integration via
//! the --json flag. Accepts config via environment variables:
//!   LENDERS_CSV, PROPERTY_PRICE, DOWN_PAYMENT, TERM_MONTHS,
//!   GRACE_KIND (none|interest_only|full_deferral), GRACE_MONTHS,
//!   FINANCE_UPFRONT_COSTS

use mortgage_system::loan::{
    load_lenders, Currency, GraceKind, InsurancePolicy, LoanRequest, RateKind, TermsError,
};
use mortgage_system::schedule::simulate;
use rayon::prelude::*;
use serde::Serialize;
use std::env;
use std::time::Instant;

#[derive(Serialize)]
struct ComparisonResponse {
    generated_at: String,
    property_price: f64,
    down_payment: f64,
    term_months: u32,
    lender_count: usize,
    offers: Vec<Offer>,
    execution_time_ms: u64,
}

#[derive(Serialize, Clone)]
struct Offer {
    lender_id: u32,
    lender_name: String,
    tcea_pct: Option<f64>,
    monthly_irr_pct: Option<f64>,
    constant_installment: f64,
    net_disbursement: f64,
    total_interest: f64,
    total_insurance: f64,
    total_tax: f64,
    total_paid: f64,
}

fn env_f64(name: &str, default: f64) -> f64 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn grace_kind_from_env() -> GraceKind {
    match env::var("GRACE_KIND").unwrap_or_default().as_str() {
        "interest_only" => GraceKind::InterestOnly,
        "full_deferral" => GraceKind::FullDeferral,
        _ => GraceKind::None,
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let json_output = env::args().any(|arg| arg == "--json");
    let start = Instant::now();

    let lenders_csv = env::var("LENDERS_CSV").unwrap_or_else(|_| "lenders.csv".to_string());
    let lenders = load_lenders(&lenders_csv)
        .map_err(|e| anyhow::anyhow!("failed to load {}: {}", lenders_csv, e))?;

    let request = LoanRequest {
        currency: Currency::PEN,
        property_price: env_f64("PROPERTY_PRICE", 300_000.0),
        down_payment: env_f64("DOWN_PAYMENT", 60_000.0),
        bonuses: vec![],
        // Rate fields are placeholders; each lender quotes its own
        rate_kind: RateKind::EffectiveAnnual,
        rate_value: 0.0,
        compounding_per_year: 12,
        term_months: env_u32("TERM_MONTHS", 240),
        grace_kind: grace_kind_from_env(),
        grace_months: env_u32("GRACE_MONTHS", 0),
        tax_rate: 0.0,
        notary_fees: 0.0,
        registry_fees: 0.0,
        appraisal_fee: 0.0,
        finance_upfront_costs: env::var("FINANCE_UPFRONT_COSTS").is_ok(),
        insurance: InsurancePolicy::none(),
        collect_insurance_in_full_deferral: false,
    };

    let mut offers = lenders
        .par_iter()
        .filter(|lender| lender.accepts_term(request.term_months))
        .map(|lender| {
            let result = simulate(&lender.terms_for(&request))?;
            let summary = result.summary();
            Ok(Offer {
                lender_id: lender.lender_id,
                lender_name: lender.name.clone(),
                tcea_pct: summary.tcea.map(|r| r * 100.0),
                monthly_irr_pct: summary.monthly_irr.map(|r| r * 100.0),
                constant_installment: summary.constant_installment,
                net_disbursement: summary.net_disbursement,
                total_interest: summary.total_interest,
                total_insurance: summary.total_insurance,
                total_tax: summary.total_tax,
                total_paid: summary.total_paid,
            })
        })
        .collect::<Result<Vec<_>, TermsError>>()?;

    // Cheapest TCEA first; offers without one sort last
    offers.sort_by(|a, b| match (a.tcea_pct, b.tcea_pct) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });

    let execution_time_ms = start.elapsed().as_millis() as u64;

    if json_output {
        let response = ComparisonResponse {
            generated_at: chrono::Utc::now().to_rfc3339(),
            property_price: request.property_price,
            down_payment: request.down_payment,
            term_months: request.term_months,
            lender_count: lenders.len(),
            offers,
            execution_time_ms,
        };
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    println!("Lender Comparison");
    println!("=================\n");
    println!(
        "Price {:.2}, down payment {:.2}, {} months ({} lenders, {} offers)\n",
        request.property_price,
        request.down_payment,
        request.term_months,
        lenders.len(),
        offers.len()
    );

    println!(
        "{:>3} {:<24} {:>10} {:>14} {:>14} {:>14}",
        "#", "Lender", "TCEA", "Installment", "Interest", "Total Paid"
    );
    println!("{}", "-".repeat(84));

    for (rank, offer) in offers.iter().enumerate() {
        let tcea = match offer.tcea_pct {
            Some(pct) => format!("{:.4}%", pct),
            None => "—".to_string(),
        };
        println!(
            "{:>3} {:<24} {:>10} {:>14.2} {:>14.2} {:>14.2}",
            rank + 1,
            offer.lender_name,
            tcea,
            offer.constant_installment,
            offer.total_interest,
            offer.total_paid,
        );
    }

    println!("\nCompleted in {} ms", execution_time_ms);
    Ok(())
}
