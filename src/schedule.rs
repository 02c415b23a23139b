//! Month-by-month amortization tables.
//!
//! Both variants walk `total_payments - 1` months: the final payoff month is
//! never reached, so a schedule ends one payment short of the term. The two
//! variants differ in which months they emit, see [`RowEmission`].

use chrono::{Months, NaiveDate};
use log::{debug, trace, warn};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::InvalidTermsError;
use crate::terms::LoanTerms;

/// One elapsed month of a schedule.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleRow {
    pub month: u32,
    pub payments_remaining: u32,
    pub payment: f64,
    pub principal: f64,
    pub extra_principal: f64,
    pub interest: f64,
    pub balance: f64,
}

impl fmt::Display for ScheduleRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "month {}, {} left, payment {:.2}, principal {:.2}, extra {:.2}, interest {:.2}, balance {:.2}",
            self.month,
            self.payments_remaining,
            self.payment,
            self.principal,
            self.extra_principal,
            self.interest,
            self.balance
        )
    }
}

/// Which months of the amortization loop produce a row.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum RowEmission {
    /// Every month, including any whose balance has gone negative.
    Unconditional,
    /// Only months that leave a positive balance. Truncates an accelerated
    /// schedule at payoff.
    PositiveBalance,
}

impl RowEmission {
    fn emits(self, balance: f64) -> bool {
        match self {
            RowEmission::Unconditional => true,
            RowEmission::PositiveBalance => balance > 0.,
        }
    }
}

fn amortize(terms: &LoanTerms, extra_principal: f64, emission: RowEmission) -> Vec<ScheduleRow> {
    let rate = terms.monthly_rate();
    let pmt_amount = terms.monthly_payment();
    let total_pmts = terms.total_payments();

    let mut balance = terms.principal();
    let mut payments_remaining = total_pmts;
    let mut went_negative = false;
    let mut rows = Vec::new();

    for month in 1..total_pmts {
        let interest = balance * rate;
        let principal = pmt_amount - interest;
        balance -= principal + extra_principal;
        payments_remaining -= 1;
        trace!(
            "month {}, interest {}, principal {}, extra {}, balance {}",
            month,
            interest,
            principal,
            extra_principal,
            balance
        );

        if !emission.emits(balance) {
            continue;
        }
        if balance < 0. && !went_negative {
            went_negative = true;
            warn!("balance went negative in month {}: {}", month, balance);
        }
        rows.push(ScheduleRow {
            month,
            payments_remaining,
            payment: pmt_amount,
            principal,
            extra_principal,
            interest,
            balance,
        });
    }
    debug!(
        "{:?} schedule for {}: {} of {} months emitted",
        emission,
        terms,
        rows.len(),
        total_pmts
    );
    rows
}

/// Contractual schedule. Every month is emitted, even one whose balance has
/// gone negative.
pub fn generate_baseline_schedule(terms: &LoanTerms) -> Vec<ScheduleRow> {
    amortize(terms, 0., RowEmission::Unconditional)
}

/// Schedule with `extra_monthly_principal` paid on top of the fixed payment
/// each month. Months that bring the balance to zero or below are dropped, so
/// the table ends once the loan is paid off.
///
/// With no extra principal this is not guaranteed to match the baseline
/// length: a baseline month with a non-positive balance is still emitted there
/// but dropped here.
///
/// # Errors
///
/// Returns [`InvalidTermsError::ExtraPrincipal`] for a negative or non-finite
/// amount.
pub fn generate_extra_principal_schedule(
    terms: &LoanTerms,
    extra_monthly_principal: f64,
) -> Result<Vec<ScheduleRow>, InvalidTermsError> {
    check_extra_principal(extra_monthly_principal)?;
    Ok(extra_principal_rows(terms, extra_monthly_principal))
}

/// Extra-principal schedule for an amount the caller has already validated.
pub(crate) fn extra_principal_rows(
    terms: &LoanTerms,
    extra_monthly_principal: f64,
) -> Vec<ScheduleRow> {
    amortize(terms, extra_monthly_principal, RowEmission::PositiveBalance)
}

pub(crate) fn check_extra_principal(extra: f64) -> Result<(), InvalidTermsError> {
    if !(extra >= 0. && extra.is_finite()) {
        return Err(InvalidTermsError::ExtraPrincipal(extra));
    }
    Ok(())
}

/// Totals over a schedule.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScheduleSummary {
    pub months: usize,
    pub total_principal: f64,
    pub total_extra_principal: f64,
    pub total_interest: f64,
    pub total_paid: f64,
    pub closing_balance: Option<f64>,
}

impl ScheduleSummary {
    pub fn from_rows(rows: &[ScheduleRow]) -> Self {
        rows.iter().fold(
            ScheduleSummary {
                months: rows.len(),
                closing_balance: rows.last().map(|row| row.balance),
                ..Default::default()
            },
            |mut acc, row| {
                acc.total_principal += row.principal;
                acc.total_extra_principal += row.extra_principal;
                acc.total_interest += row.interest;
                acc.total_paid += row.payment + row.extra_principal;
                acc
            },
        )
    }
}

/// Calendar labels for `count` consecutive monthly payments starting at
/// `first_payment`. Days past the end of a shorter month clamp to its last
/// day. Interest is unaffected: every month is still an equal period.
pub fn payment_dates(first_payment: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (0..count)
        .map_while(|i| {
            u32::try_from(i)
                .ok()
                .and_then(|i| first_payment.checked_add_months(Months::new(i)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{
        generate_baseline_schedule, generate_extra_principal_schedule, payment_dates,
        ScheduleSummary,
    };
    use crate::error::InvalidTermsError;
    use crate::terms::LoanTerms;
    use chrono::NaiveDate;
    use test_log::test;

    fn close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn test_baseline_schedule() {
        let terms = LoanTerms::new(100000., 5., 15).unwrap();
        let rows = generate_baseline_schedule(&terms);

        // one short of the 180 month term
        assert_eq!(rows.len(), 179);

        let first = rows[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.payments_remaining, 179);
        assert_eq!(first.payment, 790.79);
        assert_eq!(first.extra_principal, 0.);
        assert!(close(first.interest, 416.6667, 0.0001));
        assert!(close(first.principal, 374.1233, 0.0001));
        assert!(close(first.balance, 99625.8767, 0.0001));

        let last = rows[178];
        assert_eq!(last.month, 179);
        assert_eq!(last.payments_remaining, 1);
        assert!(close(last.balance, 788.47, 0.01));
    }

    #[test]
    fn test_rows_are_ordered_by_month() {
        let terms = LoanTerms::new(350000., 4.3, 30).unwrap();
        let rows = generate_baseline_schedule(&terms);
        assert_eq!(rows.len(), 359);
        for (i, row) in rows.iter().enumerate() {
            assert_eq!(row.month as usize, i + 1);
            assert_eq!(row.payments_remaining as usize, 360 - (i + 1));
        }
    }

    #[test]
    fn test_baseline_reconciles_with_payment() {
        let terms = LoanTerms::new(100000., 5., 15).unwrap();
        let rows = generate_baseline_schedule(&terms);
        let summary = ScheduleSummary::from_rows(&rows);
        let expected = 179. * terms.monthly_payment();
        assert!(close(
            summary.total_principal + summary.total_interest,
            expected,
            0.01 * rows.len() as f64
        ));
        assert!(close(
            summary.total_principal + summary.closing_balance.unwrap(),
            terms.principal(),
            0.01
        ));
    }

    #[test]
    fn test_baseline_keeps_negative_balances() {
        // the rounded payment overshoots this tiny loan before the term ends
        let terms = LoanTerms::new(0.1, 1., 1).unwrap();
        let baseline = generate_baseline_schedule(&terms);
        assert_eq!(baseline.len(), 11);
        assert!(baseline[10].balance < 0.);

        let extra = generate_extra_principal_schedule(&terms, 0.).unwrap();
        assert_eq!(extra.len(), 10);
        assert!(extra.iter().all(|row| row.balance > 0.));
    }

    #[test]
    fn test_extra_principal_schedule() {
        let terms = LoanTerms::new(100000., 5., 15).unwrap();
        let rows = generate_extra_principal_schedule(&terms, 200.).unwrap();
        assert_eq!(rows.len(), 131);
        assert!(rows.len() < 179);

        let first = rows[0];
        assert_eq!(first.month, 1);
        assert_eq!(first.extra_principal, 200.);
        assert!(close(first.balance, 99425.8767, 0.0001));

        let last = rows[rows.len() - 1];
        assert_eq!(last.month, 131);
        assert_eq!(last.payments_remaining, 49);
        assert!(close(last.balance, 227.94, 0.01));
        assert!(rows.iter().all(|row| row.balance > 0.));
    }

    #[test]
    fn test_extra_principal_never_longer_than_baseline() {
        let terms = LoanTerms::new(350000., 4.3, 30).unwrap();
        let baseline = generate_baseline_schedule(&terms).len();
        for extra in [0.01, 50., 500., 5000., 400000.] {
            let rows = generate_extra_principal_schedule(&terms, extra).unwrap();
            assert!(rows.len() <= baseline);
        }
        assert_eq!(
            generate_extra_principal_schedule(&terms, 500.).unwrap().len(),
            230
        );
        assert!(generate_extra_principal_schedule(&terms, 400000.)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_rejects_negative_extra_principal() {
        let terms = LoanTerms::new(100000., 5., 15).unwrap();
        assert_eq!(
            generate_extra_principal_schedule(&terms, -1.),
            Err(InvalidTermsError::ExtraPrincipal(-1.))
        );
        assert!(generate_extra_principal_schedule(&terms, f64::NAN).is_err());
    }

    #[test]
    fn test_tiny_apr_schedule_stays_finite() {
        let terms = LoanTerms::new(120000., 1e-13, 10).unwrap();
        let rows = generate_baseline_schedule(&terms);
        assert_eq!(rows.len(), 119);
        assert_eq!(rows[0].payment, 1000.);
        assert!(rows
            .iter()
            .all(|row| row.balance.is_finite() && row.principal.is_finite()));
        assert!(close(rows[118].balance, 1000., 0.01));
    }

    #[test]
    fn test_schedule_is_restartable() {
        let terms = LoanTerms::new(250000., 3.5, 25).unwrap();
        assert_eq!(
            generate_baseline_schedule(&terms),
            generate_baseline_schedule(&terms)
        );
    }

    #[test]
    fn test_summary_of_empty_schedule() {
        let summary = ScheduleSummary::from_rows(&[]);
        assert_eq!(summary.months, 0);
        assert_eq!(summary.closing_balance, None);
        assert_eq!(summary.total_paid, 0.);
    }

    #[test]
    fn test_payment_dates() {
        let first = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let dates = payment_dates(first, 4);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
                NaiveDate::from_ymd_opt(2024, 2, 29).unwrap(),
                NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
                NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
            ]
        );

        let first = NaiveDate::from_ymd_opt(2023, 11, 15).unwrap();
        assert_eq!(
            payment_dates(first, 3)[2],
            NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
        );
        assert!(payment_dates(first, 0).is_empty());
    }
}
