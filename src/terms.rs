use std::fmt;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::error::InvalidTermsError;
use crate::payment::{
    amortized_payment, check_apr, check_principal, check_term, lifetime_interest, monthly_rate,
    MONTHS_PER_YEAR,
};

pub(crate) const MAX_NAME_LEN: usize = 10;

/// Validated, immutable description of a fixed-rate loan.
///
/// Only serializable: deserializing would bypass validation.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct LoanTerms {
    principal: f64,
    apr: f64,
    term_years: u32,
    name: Option<String>,
}

impl LoanTerms {
    /// `apr` is a percentage: 4.3 means 4.3% per year.
    pub fn new(principal: f64, apr: f64, term_years: u32) -> Result<Self, InvalidTermsError> {
        check_principal(principal)?;
        check_apr(apr)?;
        check_term(term_years)?;
        Ok(Self {
            principal,
            apr,
            term_years,
            name: None,
        })
    }

    /// Attach a display name of 1 to 10 characters.
    pub fn with_name(mut self, name: impl Into<String>) -> Result<Self, InvalidTermsError> {
        let name = name.into();
        let len = name.chars().count();
        if len == 0 || len > MAX_NAME_LEN {
            return Err(InvalidTermsError::Name(name));
        }
        self.name = Some(name);
        Ok(self)
    }

    pub fn principal(&self) -> f64 {
        self.principal
    }

    pub fn apr(&self) -> f64 {
        self.apr
    }

    pub fn term_years(&self) -> u32 {
        self.term_years
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn monthly_rate(&self) -> f64 {
        monthly_rate(self.apr)
    }

    /// Number of monthly payments over the term. Construction guarantees it
    /// fits a `u32`.
    pub fn total_payments(&self) -> u32 {
        self.term_years * MONTHS_PER_YEAR
    }

    /// Same loan, different principal. Used to model a reduced balance.
    pub(crate) fn with_principal(&self, principal: f64) -> Result<Self, InvalidTermsError> {
        check_principal(principal)?;
        Ok(Self {
            principal,
            ..self.clone()
        })
    }

    /// Fixed monthly payment, rounded to cents. Recomputed on every call.
    pub fn monthly_payment(&self) -> f64 {
        amortized_payment(self.principal, self.apr, self.term_years)
    }

    /// Interest over the full term, derived from the rounded payment.
    pub fn lifetime_interest(&self) -> f64 {
        lifetime_interest(self.principal, self.apr, self.term_years)
    }
}

impl fmt::Display for LoanTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(name) = &self.name {
            write!(f, "{}: ", name)?;
        }
        write!(
            f,
            "principal {:.2}, APR {}%, {} years",
            self.principal, self.apr, self.term_years
        )
    }
}
