//! Flat loan records for export, and averages over a collection of them.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::comparison::format_currency;
use crate::terms::LoanTerms;

/// One exported loan: the inputs plus the figures derived from them.
#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MortgageRecord {
    pub principal: f64,
    pub apr: f64,
    pub term_years: u32,
    pub monthly_payment: f64,
    pub lifetime_interest: f64,
}

impl MortgageRecord {
    pub fn from_terms(terms: &LoanTerms) -> Self {
        Self {
            principal: terms.principal(),
            apr: terms.apr(),
            term_years: terms.term_years(),
            monthly_payment: terms.monthly_payment(),
            lifetime_interest: terms.lifetime_interest(),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MortgageAverages {
    pub count: usize,
    pub principal: f64,
    pub apr: f64,
    pub term_years: f64,
    pub monthly_payment: f64,
    pub lifetime_interest: f64,
}

/// Column-wise means. `None` when there is nothing to average.
pub fn average(records: &[MortgageRecord]) -> Option<MortgageAverages> {
    if records.is_empty() {
        return None;
    }
    let n = records.len() as f64;
    let mean = |field: fn(&MortgageRecord) -> f64| records.iter().map(field).sum::<f64>() / n;
    Some(MortgageAverages {
        count: records.len(),
        principal: mean(|r| r.principal),
        apr: mean(|r| r.apr),
        term_years: mean(|r| f64::from(r.term_years)),
        monthly_payment: mean(|r| r.monthly_payment),
        lifetime_interest: mean(|r| r.lifetime_interest),
    })
}

impl fmt::Display for MortgageAverages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Mortgages: {}", self.count)?;
        writeln!(f, "Average Principal: {}", format_currency(self.principal))?;
        writeln!(f, "Average APR: {:.1}%", self.apr)?;
        writeln!(f, "Average Loan Length: {} years", self.term_years.floor())?;
        writeln!(
            f,
            "Average Monthly Payment: {}",
            format_currency(self.monthly_payment)
        )?;
        write!(
            f,
            "Average Lifetime Interest: {}",
            format_currency(self.lifetime_interest)
        )
    }
}
