//! Fixed monthly payment and lifetime interest for a fixed-rate loan.
//!
//! All amounts are rounded to cents with round-half-away-from-zero. The
//! rounded payment, not the theoretical one, feeds every other figure: the
//! lifetime interest and both schedule variants are computed from it.

use log::debug;

use crate::error::InvalidTermsError;

pub(crate) const MONTHS_PER_YEAR: u32 = 12;

/// Round a currency amount to cents, halves away from zero.
pub fn round_currency(amt: f64) -> f64 {
    if amt == 0. {
        0.
    } else {
        (amt * 100.).round() / 100.
    }
}

/// Monthly periodic rate for an APR expressed as a percentage (4.3 for 4.3%).
pub(crate) fn monthly_rate(apr: f64) -> f64 {
    apr / 100. / f64::from(MONTHS_PER_YEAR)
}

pub(crate) fn check_principal(principal: f64) -> Result<(), InvalidTermsError> {
    // written negated so NaN is rejected too
    if !(principal > 0. && principal.is_finite()) {
        return Err(InvalidTermsError::Principal(principal));
    }
    Ok(())
}

pub(crate) fn check_apr(apr: f64) -> Result<(), InvalidTermsError> {
    if !(apr > 0. && apr < 100.) {
        return Err(InvalidTermsError::Apr(apr));
    }
    Ok(())
}

pub(crate) fn check_term(term_years: u32) -> Result<(), InvalidTermsError> {
    // the month count must fit a u32
    if term_years == 0 || term_years.checked_mul(MONTHS_PER_YEAR).is_none() {
        return Err(InvalidTermsError::Term(term_years));
    }
    Ok(())
}

// Callers guarantee the loan invariants. `1 - (1 + rate)^-n` is evaluated
// through ln_1p/exp_m1 so it keeps precision for rates too small to change
// `1 + rate`; a rate that underflows to zero amortizes linearly.
pub(crate) fn amortized_payment(principal: f64, apr: f64, term_years: u32) -> f64 {
    let rate = monthly_rate(apr);
    let total_pmts = f64::from(term_years) * f64::from(MONTHS_PER_YEAR);
    let denom = -(-total_pmts * rate.ln_1p()).exp_m1();
    let pmt = if denom > 0. {
        round_currency((rate * principal) / denom)
    } else {
        round_currency(principal / total_pmts)
    };
    debug!(
        "payment for {} at {}% over {} years: {}",
        principal, apr, term_years, pmt
    );
    pmt
}

pub(crate) fn lifetime_interest(principal: f64, apr: f64, term_years: u32) -> f64 {
    let pmt = amortized_payment(principal, apr, term_years);
    round_currency(f64::from(term_years) * f64::from(MONTHS_PER_YEAR) * pmt - principal)
}

/// Fixed monthly payment, rounded to cents.
///
/// # Errors
///
/// Returns [`InvalidTermsError`] unless `principal > 0`, `0 < apr < 100` and
/// `term_years > 0`. The checks run before the formula is evaluated.
pub fn compute_monthly_payment(
    principal: f64,
    apr: f64,
    term_years: u32,
) -> Result<f64, InvalidTermsError> {
    check_principal(principal)?;
    check_apr(apr)?;
    check_term(term_years)?;
    Ok(amortized_payment(principal, apr, term_years))
}

/// Total interest paid over the full term: the rounded monthly payment times
/// the number of payments, less the principal.
///
/// # Errors
///
/// Same preconditions as [`compute_monthly_payment`].
pub fn compute_lifetime_interest(
    principal: f64,
    apr: f64,
    term_years: u32,
) -> Result<f64, InvalidTermsError> {
    check_principal(principal)?;
    check_apr(apr)?;
    check_term(term_years)?;
    Ok(lifetime_interest(principal, apr, term_years))
}
