//! Amortization engine for fixed-rate installment loans.
//!
//! Derives the fixed monthly payment and lifetime interest for a loan, builds
//! month-by-month schedules, models recurring and lump-sum overpayments, and
//! flattens a set of loans into comparison rows.
//!
//! ```
//! use mortgage_calc::{analyze_lump_sum, generate_extra_principal_schedule, LoanTerms};
//!
//! let terms = LoanTerms::new(100_000., 5., 15)?;
//! assert_eq!(terms.monthly_payment(), 790.79);
//!
//! let accelerated = generate_extra_principal_schedule(&terms, 200.)?;
//! assert_eq!(accelerated.len(), 131);
//!
//! let lump = analyze_lump_sum(&terms, 10_000.)?;
//! assert_eq!(lump.reduced.monthly_payment, 711.71);
//! # Ok::<(), mortgage_calc::InvalidTermsError>(())
//! ```

pub mod comparison;
pub mod error;
pub mod metrics;
pub mod overpayment;
pub mod payment;
pub mod profile;
pub mod schedule;
pub mod terms;

pub use comparison::{comparison_rows, format_currency, to_row, ComparisonRow};
pub use error::InvalidTermsError;
pub use metrics::{average, MortgageAverages, MortgageRecord};
pub use overpayment::{
    analyze_lump_sum, analyze_recurring, LoanFigures, LumpSumOverpayment, RecurringOverpayment,
};
pub use payment::{compute_lifetime_interest, compute_monthly_payment, round_currency};
pub use profile::{MortgageProfile, MortgageRegistry, ProfileId};
pub use schedule::{
    generate_baseline_schedule, generate_extra_principal_schedule, payment_dates, ScheduleRow,
    ScheduleSummary,
};
pub use terms::LoanTerms;
