//! What-if analysis for paying more than the contractual amount.
//!
//! A recurring overpayment keeps the fixed payment and shortens the payoff
//! trajectory. A lump sum re-amortizes the reduced balance over the same
//! remaining term, so the fixed payment itself drops.

use log::info;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::InvalidTermsError;
use crate::schedule::{
    generate_baseline_schedule, generate_extra_principal_schedule, ScheduleRow, ScheduleSummary,
};
use crate::terms::LoanTerms;

/// Derived figures for one set of terms, captured for a side-by-side report.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LoanFigures {
    pub terms: LoanTerms,
    pub monthly_payment: f64,
    pub lifetime_interest: f64,
}

impl LoanFigures {
    pub fn of(terms: &LoanTerms) -> Self {
        Self {
            terms: terms.clone(),
            monthly_payment: terms.monthly_payment(),
            lifetime_interest: terms.lifetime_interest(),
        }
    }
}

/// Current figures plus the accelerated schedule for a monthly overpayment.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct RecurringOverpayment {
    pub current: LoanFigures,
    pub extra_monthly_principal: f64,
    pub schedule: Vec<ScheduleRow>,
    baseline: ScheduleSummary,
}

impl RecurringOverpayment {
    /// Months dropped from the baseline schedule.
    pub fn months_saved(&self) -> usize {
        self.baseline.months.saturating_sub(self.schedule.len())
    }

    /// Interest across the accelerated schedule.
    pub fn scheduled_interest(&self) -> f64 {
        ScheduleSummary::from_rows(&self.schedule).total_interest
    }

    /// Interest across the baseline schedule for the same terms.
    pub fn baseline_interest(&self) -> f64 {
        self.baseline.total_interest
    }

    pub fn interest_saved(&self) -> f64 {
        self.baseline_interest() - self.scheduled_interest()
    }
}

/// Model paying `extra_monthly_principal` on top of every payment.
///
/// The contractual payment is not recomputed; only the schedule changes.
pub fn analyze_recurring(
    terms: &LoanTerms,
    extra_monthly_principal: f64,
) -> Result<RecurringOverpayment, InvalidTermsError> {
    let schedule = generate_extra_principal_schedule(terms, extra_monthly_principal)?;
    let baseline = ScheduleSummary::from_rows(&generate_baseline_schedule(terms));
    info!(
        "extra principal {} shortens schedule from {} to {} months",
        extra_monthly_principal,
        baseline.months,
        schedule.len()
    );
    Ok(RecurringOverpayment {
        current: LoanFigures::of(terms),
        extra_monthly_principal,
        schedule,
        baseline,
    })
}

/// Original and reduced-principal figures for a one-time overpayment.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LumpSumOverpayment {
    pub lump_sum: f64,
    pub original: LoanFigures,
    pub reduced: LoanFigures,
}

impl LumpSumOverpayment {
    pub fn payment_reduction(&self) -> f64 {
        self.original.monthly_payment - self.reduced.monthly_payment
    }

    pub fn interest_saved(&self) -> f64 {
        self.original.lifetime_interest - self.reduced.lifetime_interest
    }
}

/// Model paying `lump_sum` off the principal now and re-amortizing the rest
/// over the same remaining term.
///
/// # Errors
///
/// [`InvalidTermsError::LumpSum`] unless the lump sum is positive, and
/// [`InvalidTermsError::Principal`] if it clears the whole balance.
pub fn analyze_lump_sum(
    terms: &LoanTerms,
    lump_sum: f64,
) -> Result<LumpSumOverpayment, InvalidTermsError> {
    if !(lump_sum > 0. && lump_sum.is_finite()) {
        return Err(InvalidTermsError::LumpSum(lump_sum));
    }
    let reduced = terms.with_principal(terms.principal() - lump_sum)?;
    let analysis = LumpSumOverpayment {
        lump_sum,
        original: LoanFigures::of(terms),
        reduced: LoanFigures::of(&reduced),
    };
    info!(
        "lump sum {} lowers payment by {:.2}",
        lump_sum,
        analysis.payment_reduction()
    );
    Ok(analysis)
}
