//! Decimal money amounts with currency codes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Monetary amount with ISO 4217 currency code.
///
/// The Storefront API transmits amounts as decimal strings; `Decimal`
/// preserves that precision through arithmetic (no float rounding).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// Decimal amount, serialized as a string on the wire.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: String,
}

impl Money {
    /// Create a new amount.
    #[must_use]
    pub fn new(amount: Decimal, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// A zero amount in the given currency.
    #[must_use]
    pub fn zero(currency_code: impl Into<String>) -> Self {
        Self::new(Decimal::ZERO, currency_code)
    }

    /// Multiply the amount by a unit count, keeping the currency.
    #[must_use]
    pub fn times(&self, quantity: i64) -> Self {
        Self {
            amount: self.amount * Decimal::from(quantity),
            currency_code: self.currency_code.clone(),
        }
    }

    /// Format for display (e.g., "$19.99", "€5.00", "12.50 SEK").
    #[must_use]
    pub fn display(&self) -> String {
        let amount = self.amount.round_dp(2);
        match symbol(&self.currency_code) {
            Some(sym) => format!("{sym}{amount:.2}"),
            None => format!("{amount:.2} {}", self.currency_code),
        }
    }
}

/// Currency symbol for the common codes; everything else falls back to the
/// code-suffixed format.
fn symbol(code: &str) -> Option<&'static str> {
    match code {
        "USD" | "CAD" | "AUD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn usd(s: &str) -> Money {
        Money::new(s.parse().unwrap(), "USD")
    }

    #[test]
    fn test_display_usd() {
        assert_eq!(usd("19.99").display(), "$19.99");
        assert_eq!(usd("0").display(), "$0.00");
        assert_eq!(usd("10.5").display(), "$10.50");
    }

    #[test]
    fn test_display_unknown_currency() {
        let money = Money::new("12.5".parse().unwrap(), "SEK");
        assert_eq!(money.display(), "12.50 SEK");
    }

    #[test]
    fn test_times() {
        let unit = usd("10.00");
        assert_eq!(unit.times(3), usd("30.00"));
        assert_eq!(unit.times(0), usd("0.00"));
    }

    #[test]
    fn test_serde_string_amount() {
        let money: Money =
            serde_json::from_str(r#"{"amount":"42.15","currency_code":"USD"}"#).unwrap();
        assert_eq!(money, usd("42.15"));

        let json = serde_json::to_string(&money).unwrap();
        assert!(json.contains("\"42.15\""));
    }
}
