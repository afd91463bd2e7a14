use std::fmt;
use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::ValidationError;

/// SQLite stores DECIMAL columns as REAL, which round-trips this many digits.
pub const MAX_SIGNIFICANT_DIGITS: u32 = 15;

/// Exact decimal amount used for project budgets and invoice amounts.
///
/// Written to SQLite as its canonical text so the column's NUMERIC affinity
/// decides the storage class, and read back through `CAST(.. AS TEXT)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(Decimal);

impl Money {
    pub fn new(value: Decimal) -> Self {
        Money(value)
    }

    pub fn zero() -> Self {
        Money(Decimal::ZERO)
    }

    /// Parse user input for the named field.
    pub fn parse(field: &'static str, input: &str) -> Result<Self, ValidationError> {
        let money: Money = input.parse().map_err(|_| ValidationError::InvalidNumber {
            field,
            value: input.to_string(),
        })?;

        if money.significant_digits() > MAX_SIGNIFICANT_DIGITS {
            return Err(ValidationError::TooPrecise {
                field,
                value: input.to_string(),
                max_digits: MAX_SIGNIFICANT_DIGITS,
            });
        }

        Ok(money)
    }

    fn significant_digits(&self) -> u32 {
        let mantissa = self.0.normalize().mantissa().unsigned_abs();
        mantissa.checked_ilog10().map_or(1, |log| log + 1)
    }

    /// Text bound into INSERT statements.
    pub fn to_sql_text(&self) -> String {
        self.0.normalize().to_string()
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    /// Accepts plain (`1500.50`) and scientific (`1.5e3`) notation,
    /// ignoring surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Decimal::from_str(trimmed)
            .or_else(|_| Decimal::from_scientific(trimmed))
            .map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        write!(f, "{:.2}", rounded)
    }
}

impl From<Decimal> for Money {
    fn from(value: Decimal) -> Self {
        Money(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_scientific() {
        assert_eq!("1500.50".parse::<Money>().unwrap(), Money::new(Decimal::new(150050, 2)));
        assert_eq!(" 42 ".parse::<Money>().unwrap(), Money::new(Decimal::from(42)));
        assert_eq!("1.5e3".parse::<Money>().unwrap(), Money::new(Decimal::from(1500)));
        assert_eq!("-3.25".parse::<Money>().unwrap(), Money::new(Decimal::new(-325, 2)));
    }

    #[test]
    fn rejects_non_numbers() {
        for input in ["abc", "", "   ", "12abc", "inf", "NaN"] {
            assert!(input.parse::<Money>().is_err(), "accepted {input:?}");
        }
    }

    #[test]
    fn parse_reports_field_and_value() {
        let err = Money::parse("budget", "abc").unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidNumber {
                field: "budget",
                value: "abc".to_string()
            }
        );
    }

    #[test]
    fn parse_limits_significant_digits() {
        assert!(Money::parse("budget", "123456789012345").is_ok());
        assert!(Money::parse("budget", "1234567890123.45").is_ok());
        assert!(Money::parse("budget", "-0.000000000000001").is_ok());
        // trailing zeros are not significant
        assert!(Money::parse("budget", "1500.5000000000000000").is_ok());
        assert!(Money::parse("budget", "1e20").is_ok());

        for input in ["1234567890123456", "12345678901234567.89", "79228162514264337593543950335"] {
            let err = Money::parse("amount", input).unwrap_err();
            assert_eq!(
                err,
                ValidationError::TooPrecise {
                    field: "amount",
                    value: input.to_string(),
                    max_digits: MAX_SIGNIFICANT_DIGITS,
                },
            );
        }
    }

    #[test]
    fn displays_two_decimals() {
        assert_eq!(Money::new(Decimal::from(100)).to_string(), "100.00");
        assert_eq!("0.125".parse::<Money>().unwrap().to_string(), "0.13");
        assert_eq!("1500.5".parse::<Money>().unwrap().to_string(), "1500.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn sql_text_drops_trailing_zeros() {
        assert_eq!("1500.50".parse::<Money>().unwrap().to_sql_text(), "1500.5");
        assert_eq!("200.00".parse::<Money>().unwrap().to_sql_text(), "200");
    }
}
