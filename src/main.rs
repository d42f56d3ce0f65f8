//! Mortgage System CLI
//!
//! Command-line interface for simulating a single loan

use anyhow::Context;
use clap::{Parser, ValueEnum};
use mortgage_system::loan::{GraceKind, InsuranceBase, InsurancePolicy, LoanTerms, RateKind};
use mortgage_system::schedule::simulate;
use std::fs::File;
use std::io::Write;

#[derive(Debug, Clone, Copy, ValueEnum)]
enum RateArg {
    /// Effective annual rate
    Tea,
    /// Nominal annual rate
    Tna,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum GraceArg {
    None,
    InterestOnly,
    FullDeferral,
}

#[derive(Debug, Parser)]
#[command(name = "mortgage_system", version, about = "French-amortization loan simulator")]
struct Args {
    /// Financed amount
    #[arg(long, default_value_t = 100_000.0)]
    principal: f64,

    /// Term in months
    #[arg(long, default_value_t = 240)]
    term_months: u32,

    /// How the rate is quoted
    #[arg(long, value_enum, default_value_t = RateArg::Tea)]
    rate_kind: RateArg,

    /// Annual rate as a proportion (0.10 = 10%)
    #[arg(long, default_value_t = 0.10)]
    rate: f64,

    /// Compounding periods per year (TNA only)
    #[arg(long, default_value_t = 12)]
    compounding: u32,

    /// Grace regime
    #[arg(long, value_enum, default_value_t = GraceArg::None)]
    grace_kind: GraceArg,

    /// Grace months
    #[arg(long, default_value_t = 0)]
    grace_months: u32,

    /// ITF per-installment tax rate
    #[arg(long, default_value_t = 0.00005)]
    itf: f64,

    /// One-time costs paid at disbursement
    #[arg(long, default_value_t = 0.0)]
    upfront_costs: f64,

    /// Add the upfront costs to the financed balance
    #[arg(long)]
    finance_upfront_costs: bool,

    /// Monthly desgravamen rate on the balance (0 = no insurance)
    #[arg(long, default_value_t = 0.0)]
    insurance_rate: f64,

    /// Compute the premium on the average balance instead of the
    /// period-start balance
    #[arg(long)]
    average_balance_insurance: bool,

    /// Keep collecting the premium during full-deferral grace
    #[arg(long)]
    collect_insurance_in_full_deferral: bool,

    /// Output CSV path for the full schedule
    #[arg(long, default_value = "schedule_output.csv")]
    output: String,
}

impl Args {
    fn to_terms(&self) -> LoanTerms {
        let insurance = if self.insurance_rate > 0.0 {
            InsurancePolicy::Percentage {
                monthly_rate: self.insurance_rate,
                base: if self.average_balance_insurance {
                    InsuranceBase::AverageBalance
                } else {
                    InsuranceBase::PeriodStartBalance
                },
            }
        } else {
            InsurancePolicy::none()
        };

        LoanTerms {
            principal: self.principal,
            term_months: self.term_months,
            rate_kind: match self.rate_kind {
                RateArg::Tea => RateKind::EffectiveAnnual,
                RateArg::Tna => RateKind::NominalAnnual,
            },
            rate_value: self.rate,
            compounding_per_year: self.compounding,
            grace_months: self.grace_months,
            grace_kind: match self.grace_kind {
                GraceArg::None => GraceKind::None,
                GraceArg::InterestOnly => GraceKind::InterestOnly,
                GraceArg::FullDeferral => GraceKind::FullDeferral,
            },
            upfront_costs: self.upfront_costs,
            finance_upfront_costs: self.finance_upfront_costs,
            tax_rate: self.itf,
            insurance,
            collect_insurance_in_full_deferral: self.collect_insurance_in_full_deferral,
        }
    }
}

fn fmt_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.4}%", r * 100.0),
        None => "—".to_string(),
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let terms = args.to_terms();

    println!("Mortgage System v0.1.0");
    println!("======================\n");

    println!("Loan:");
    println!("  Principal: {:.2}", terms.principal);
    println!("  Term: {} months", terms.term_months);
    println!(
        "  Rate: {:.4}% ({:?}), monthly {:.6}%",
        terms.rate_value * 100.0,
        terms.rate_kind,
        terms.monthly_rate() * 100.0
    );
    println!(
        "  Grace: {:?} x {} months",
        terms.grace_kind, terms.grace_months
    );
    println!();

    let result = simulate(&terms).context("simulation failed")?;

    println!("Schedule ({} months):", result.rows.len());
    println!(
        "{:>5} {:>12} {:>12} {:>12} {:>10} {:>8} {:>12} {:>14}",
        "Month", "Installment", "Interest", "Amort", "Insurance", "ITF", "Total", "Balance"
    );
    println!("{}", "-".repeat(92));

    // Print first 24 months to console
    for row in result.rows.iter().take(24) {
        println!(
            "{:>5} {:>12.2} {:>12.2} {:>12.2} {:>10.2} {:>8.4} {:>12.2} {:>14.2}",
            row.month,
            row.base_installment,
            row.interest,
            row.amortization,
            row.insurance,
            row.tax,
            row.total_installment,
            row.ending_balance,
        );
    }

    if result.rows.len() > 24 {
        println!("... ({} more months)", result.rows.len() - 24);
    }

    // Write full schedule to CSV
    let mut file = File::create(&args.output)
        .with_context(|| format!("unable to create {}", args.output))?;

    writeln!(
        file,
        "Month,BaseInstallment,Interest,Amortization,Insurance,ITF,TotalInstallment,EndingBalance"
    )?;
    for row in &result.rows {
        writeln!(
            file,
            "{},{:.8},{:.8},{:.8},{:.8},{:.8},{:.8},{:.8}",
            row.month,
            row.base_installment,
            row.interest,
            row.amortization,
            row.insurance,
            row.tax,
            row.total_installment,
            row.ending_balance,
        )?;
    }

    println!("\nFull schedule written to: {}", args.output);

    let summary = result.summary();
    println!("\nSummary:");
    println!("  Net Disbursement: {:.2}", summary.net_disbursement);
    println!("  Constant Installment: {:.2}", summary.constant_installment);
    println!("  Total Interest: {:.2}", summary.total_interest);
    println!("  Total Insurance: {:.2}", summary.total_insurance);
    println!("  Total ITF: {:.2}", summary.total_tax);
    println!("  Total Paid: {:.2}", summary.total_paid);
    println!("  Monthly IRR: {}", fmt_rate(summary.monthly_irr));
    println!("  TCEA: {}", fmt_rate(summary.tcea));

    Ok(())
}
