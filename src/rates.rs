//! Interest rate conversions between annual quotes and the monthly periodic rate
//!
//! Lenders quote either an effective annual rate (TEA) or a nominal annual
//! rate (TNA) with a compounding frequency. The schedule engine works on an
//! effective monthly rate throughout, so every quoted rate is converted here
//! before any period math happens.

use crate::loan::RateKind;

/// Convert a nominal annual rate with `m` compounding periods per year into
/// the equivalent effective annual rate: (1 + v/m)^m - 1.
pub fn effective_annual_from_nominal(nominal: f64, compounding_per_year: u32) -> f64 {
    let m = compounding_per_year as f64;
    (1.0 + nominal / m).powf(m) - 1.0
}

/// Convert an effective annual rate into the effective monthly rate:
/// (1 + ea)^(1/12) - 1.
pub fn monthly_from_effective_annual(effective_annual: f64) -> f64 {
    (1.0 + effective_annual).powf(1.0 / 12.0) - 1.0
}

/// Convert a quoted rate (TEA or TNA) into the effective monthly rate used by
/// the schedule engine.
///
/// `compounding_per_year` is only consulted for nominal quotes.
pub fn monthly_rate(kind: RateKind, value: f64, compounding_per_year: u32) -> f64 {
    match kind {
        RateKind::EffectiveAnnual => monthly_from_effective_annual(value),
        RateKind::NominalAnnual => {
            let ea = effective_annual_from_nominal(value, compounding_per_year);
            monthly_from_effective_annual(ea)
        }
    }
}

/// Annualize an effective monthly rate: (1 + i)^12 - 1.
///
/// Applied to the monthly IRR of the client cash flow, this is the TCEA.
pub fn annualize(monthly: f64) -> f64 {
    (1.0 + monthly).powi(12) - 1.0
}
