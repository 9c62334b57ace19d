//! Type-safe price representation using decimal arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price with currency information.
///
/// Shopify reports amounts as decimal strings; keeping them as [`Decimal`]
/// avoids float rounding when line totals are summed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., dollars, not cents).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// Parse a decimal amount string as returned by the Storefront API.
    ///
    /// # Errors
    ///
    /// Returns an error if `amount` is not a valid decimal number.
    pub fn parse(amount: &str, currency_code: impl Into<String>) -> Result<Self, rust_decimal::Error> {
        Ok(Self::new(amount.trim().parse()?, currency_code))
    }

    /// Format for display (e.g., "$19.99", "12.50 CHF").
    #[must_use]
    pub fn display(&self) -> String {
        format_amount(self.amount, &self.currency_code)
    }
}

/// Format an amount with the symbol of common currencies, or the code as suffix.
#[must_use]
pub fn format_amount(amount: Decimal, currency_code: &str) -> String {
    let amount = amount.round_dp(2);
    match currency_code {
        "USD" | "CAD" | "AUD" | "NZD" => format!("${amount:.2}"),
        "EUR" => format!("€{amount:.2}"),
        "GBP" => format!("£{amount:.2}"),
        "" => format!("{amount:.2}"),
        code => format!("{amount:.2} {code}"),
    }
}
