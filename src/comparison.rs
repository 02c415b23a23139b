//! Flattening profiles into display-ready rows for a side-by-side table.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::payment::round_currency;
use crate::profile::MortgageProfile;

pub(crate) const CURRENCY_SYMBOL: char = '€';

/// Format an amount as `€1,234.56`, or `-€1,234.56` when negative.
pub fn format_currency(amt: f64) -> String {
    let rounded = round_currency(amt);
    let digits = format!("{:.2}", rounded.abs());
    let (whole, cents) = digits.split_once('.').unwrap_or((digits.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, c) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if rounded < 0. { "-" } else { "" };
    format!("{}{}{}.{}", sign, CURRENCY_SYMBOL, grouped, cents)
}

#[derive(Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ComparisonRow {
    pub label: String,
    pub principal: String,
    pub apr: String,
    pub term_years: String,
    pub monthly_payment: String,
    pub lifetime_interest: String,
}

impl ComparisonRow {
    pub const HEADERS: [&'static str; 6] = [
        "Mortgage",
        "Principal",
        "APR %",
        "Loan Length",
        "Monthly Payment",
        "Total Interest",
    ];

    /// Fields in [`Self::HEADERS`] order.
    pub fn fields(&self) -> [&str; 6] {
        [
            self.label.as_str(),
            self.principal.as_str(),
            self.apr.as_str(),
            self.term_years.as_str(),
            self.monthly_payment.as_str(),
            self.lifetime_interest.as_str(),
        ]
    }
}

pub fn to_row(profile: &MortgageProfile) -> ComparisonRow {
    let terms = profile.terms();
    ComparisonRow {
        label: profile.label(),
        principal: format_currency(terms.principal()),
        apr: terms.apr().to_string(),
        term_years: terms.term_years().to_string(),
        monthly_payment: format_currency(profile.monthly_payment()),
        lifetime_interest: format_currency(profile.lifetime_interest()),
    }
}

/// One row per profile, in iteration order. Callers decide how many profiles
/// make a meaningful comparison.
pub fn comparison_rows<'a, I>(profiles: I) -> Vec<ComparisonRow>
where
    I: IntoIterator<Item = &'a MortgageProfile>,
{
    profiles.into_iter().map(to_row).collect()
}
