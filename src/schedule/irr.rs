//! Internal rate of return for the client cash-flow vector
//!
//! Newton-Raphson converges in a handful of iterations for well-behaved
//! loan flows, but can diverge or walk out of the economically meaningful
//! domain when long full-deferral grace phases push large outflows late in
//! the stream. Bisection always converges when a sign change exists, so it
//! runs as the fallback. Each method is an independent pure function;
//! `internal_rate` composes them.

/// Initial Newton guess: 1% monthly
pub const DEFAULT_IRR_GUESS: f64 = 0.01;

const TOLERANCE: f64 = 1e-8;
const MAX_ITERATIONS: usize = 200;
const BISECTION_LO: f64 = -0.9;
const BISECTION_HI: f64 = 5.0;

/// Present value of a cash-flow sequence at a periodic rate, t starting at 0
pub fn present_value(rate: f64, cashflows: &[f64]) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}

/// d/dr of `present_value`
fn present_value_derivative(rate: f64, cashflows: &[f64]) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| -(t as f64) * cf / (1.0 + rate).powi(t as i32 + 1))
        .sum()
}

/// Newton-Raphson phase. Returns None when the iteration stalls (zero
/// derivative), leaves the domain (r <= -0.9999 or r > 10), goes non-finite,
/// or runs out of iterations.
fn newton_phase(cashflows: &[f64], guess: f64) -> Option<f64> {
    let mut rate = guess;

    for _ in 0..MAX_ITERATIONS {
        let pv = present_value(rate, cashflows);
        if pv.abs() < TOLERANCE {
            return Some(rate);
        }

        let dpv = present_value_derivative(rate, cashflows);
        if dpv == 0.0 {
            return None;
        }

        rate -= pv / dpv;
        if !rate.is_finite() || rate <= -0.9999 || rate > 10.0 {
            return None;
        }
    }

    None
}

/// Bisection phase on [-0.9, 5]. Returns None when the endpoints do not
/// bracket a root; otherwise converges to tolerance or returns the bracket
/// midpoint once the iterations run out.
fn bisection_phase(cashflows: &[f64]) -> Option<f64> {
    let mut lo = BISECTION_LO;
    let mut hi = BISECTION_HI;
    let mut pv_lo = present_value(lo, cashflows);
    let pv_hi = present_value(hi, cashflows);

    if pv_lo * pv_hi > 0.0 {
        return None;
    }

    for _ in 0..MAX_ITERATIONS {
        let mid = (lo + hi) / 2.0;
        let pv_mid = present_value(mid, cashflows);

        if pv_mid.abs() < TOLERANCE {
            return Some(mid);
        }

        if pv_lo * pv_mid <= 0.0 {
            hi = mid;
        } else {
            lo = mid;
            pv_lo = pv_mid;
        }
    }

    Some((lo + hi) / 2.0)
}

/// Monthly IRR of a cash-flow sequence (index 0 = t0).
///
/// Returns None when no solution exists: an empty vector, or one with no
/// sign change, has no internal rate. This is a legitimate outcome that the
/// caller must surface as "unavailable", not an error.
pub fn internal_rate(cashflows: &[f64], guess: f64) -> Option<f64> {
    if cashflows.is_empty() {
        return None;
    }

    let has_inflow = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_outflow = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_inflow || !has_outflow {
        return None;
    }

    newton_phase(cashflows, guess).or_else(|| bisection_phase(cashflows))
}

/// TCEA (effective annual cost rate) of a client cash-flow vector, or None
/// when the flow has no internal rate.
pub fn tcea_from_cashflows(cashflows: &[f64]) -> Option<f64> {
    internal_rate(cashflows, DEFAULT_IRR_GUESS).map(crate::rates::annualize)
}
