//! [`Money`]-related definitions.

use std::{fmt, str::FromStr};

use rust_decimal::{prelude::ToPrimitive as _, Decimal};

use crate::define_kind;

/// Amount of money in some [`Currency`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Money {
    /// Amount of this [`Money`].
    pub amount: Decimal,

    /// [`Currency`] of this amount.
    pub currency: Currency,
}

impl Money {
    /// Creates a zero [`Money`] amount in the provided [`Currency`].
    #[must_use]
    pub const fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Indicates whether this [`Money`] amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self { amount, currency } = self;
        match amount.is_integer().then(|| amount.to_i128()).flatten() {
            Some(whole) => write!(f, "{whole}{currency}"),
            None => write!(f, "{}{currency}", amount.normalize()),
        }
    }
}

impl FromStr for Money {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < 4 || !s.is_char_boundary(s.len() - 3) {
            return Err("too short");
        }

        let (amount, currency) = s.split_at(s.len() - 3);
        Ok(Self {
            amount: amount.parse().map_err(|_| "invalid amount")?,
            currency: currency.parse().map_err(|_| "invalid currency")?,
        })
    }
}

define_kind! {
    #[doc = "Currency of a [`Money`] amount."]
    enum Currency {
        #[doc = "US Dollar."]
        Usd = 1,

        #[doc = "Euro."]
        Eur = 2,

        #[doc = "Russian Ruble."]
        Rub = 3,
    }
}

#[cfg(feature = "juniper")]
mod juniper {
    //! [`juniper`] integration.

    use juniper::{graphql_scalar, InputValue, ScalarValue, Value};

    /// Money in `{amount}{currency}` format, where `amount` is a decimal
    /// number and `currency` is a three-letter currency code (`USD`, `EUR` or
    /// `RUB`).
    #[graphql_scalar(with = Self, parse_token(String))]
    type Money = super::Money;

    impl Money {
        fn to_output<S: ScalarValue>(m: &Money) -> Value<S> {
            Value::scalar(m.to_string())
        }

        fn from_input<S: ScalarValue>(
            input: &InputValue<S>,
        ) -> Result<Self, String> {
            let s = input.as_string_value().ok_or_else(|| {
                format!(
                    "Cannot parse `Money` input scalar from non-string \
                     value: {input}",
                )
            })?;
            s.parse()
                .map_err(|e| format!("Cannot parse `Money` input scalar: {e}"))
        }
    }
}

#[cfg(test)]
mod spec {
    use rust_decimal::Decimal;

    use super::{Currency, Money};

    fn money(amount: &str, currency: Currency) -> Money {
        Money {
            amount: amount.parse::<Decimal>().unwrap(),
            currency,
        }
    }

    #[test]
    fn parses_amount_with_currency() {
        assert_eq!(
            "2500000RUB".parse::<Money>().unwrap(),
            money("2500000", Currency::Rub),
        );
        assert_eq!(
            "99.90EUR".parse::<Money>().unwrap(),
            money("99.90", Currency::Eur),
        );
        assert_eq!(
            "0.5USD".parse::<Money>().unwrap(),
            money("0.5", Currency::Usd),
        );
    }

    #[test]
    fn rejects_malformed_input() {
        assert!("USD".parse::<Money>().is_err());
        assert!("100".parse::<Money>().is_err());
        assert!("100GBP".parse::<Money>().is_err());
        assert!("100usd".parse::<Money>().is_err());
    }

    #[test]
    fn displays_without_trailing_zeros() {
        assert_eq!(money("150000.00", Currency::Usd).to_string(), "150000USD");
        assert_eq!(money("12.50", Currency::Eur).to_string(), "12.5EUR");
        assert_eq!(money("7", Currency::Rub).to_string(), "7RUB");
    }

    #[test]
    fn detects_negative_amounts() {
        assert!(money("-1", Currency::Usd).is_negative());
        assert!(!money("0", Currency::Usd).is_negative());
        assert!(!Money::zero(Currency::Eur).is_negative());
    }
}
