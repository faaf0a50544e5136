//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PriceError {
    /// The amount is zero or negative.
    #[error("Price must be positive")]
    NotPositive,
    /// The amount carries more than two decimal places.
    #[error("Price cannot have more than {max} decimal places")]
    TooManyDecimalPlaces {
        /// Maximum allowed decimal places.
        max: u32,
    },
    /// The amount exceeds the maximum representable price.
    #[error("Price must be at most {max}")]
    TooLarge {
        /// Maximum allowed amount.
        max: Decimal,
    },
}

/// A product price.
///
/// Prices are positive decimal amounts with at most two decimal places,
/// capped at `99999999.99`. The inner value always carries exactly two
/// decimal places, so a parsed `19.9` displays as `19.90`.
///
/// Persistence uses whole cents (`as_cents`), which keeps SQL comparisons
/// and sums exact integer arithmetic.
///
/// ## Examples
///
/// ```
/// use copperline_core::Price;
/// use rust_decimal::Decimal;
///
/// let price = Price::parse("19.99".parse::<Decimal>().unwrap()).unwrap();
/// assert_eq!(price.as_cents(), 1999);
/// assert_eq!(price.to_string(), "19.99");
///
/// assert!(Price::parse(Decimal::ZERO).is_err());              // not positive
/// assert!(Price::parse("0.001".parse().unwrap()).is_err());   // too precise
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Maximum representable price, in cents.
    pub const MAX_CENTS: i64 = 9_999_999_999;

    /// Maximum allowed decimal places.
    pub const MAX_SCALE: u32 = 2;

    /// Parse a `Price` from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount:
    /// - Is zero or negative
    /// - Has more than two decimal places
    /// - Exceeds `99999999.99`
    pub fn parse(amount: Decimal) -> Result<Self, PriceError> {
        if amount <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }

        let mut normalized = amount.normalize();
        if normalized.scale() > Self::MAX_SCALE {
            return Err(PriceError::TooManyDecimalPlaces {
                max: Self::MAX_SCALE,
            });
        }
        normalized.rescale(Self::MAX_SCALE);

        let cents = i64::try_from(normalized.mantissa()).map_err(|_| PriceError::TooLarge {
            max: Self::max_amount(),
        })?;
        if cents > Self::MAX_CENTS {
            return Err(PriceError::TooLarge {
                max: Self::max_amount(),
            });
        }

        Ok(Self(normalized))
    }

    /// Parse a `Price` from a whole cent count.
    ///
    /// # Errors
    ///
    /// Returns an error if the count is zero, negative, or above the maximum.
    pub fn from_cents(cents: i64) -> Result<Self, PriceError> {
        if cents <= 0 {
            return Err(PriceError::NotPositive);
        }
        if cents > Self::MAX_CENTS {
            return Err(PriceError::TooLarge {
                max: Self::max_amount(),
            });
        }
        Ok(Self(Decimal::new(cents, Self::MAX_SCALE)))
    }

    /// Returns the amount as a decimal with two decimal places.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Returns the amount as a whole cent count.
    #[must_use]
    pub fn as_cents(&self) -> i64 {
        // The inner value always carries scale 2, so the mantissa is the cent count.
        i64::try_from(self.0.mantissa()).unwrap_or(i64::MAX)
    }

    fn max_amount() -> Decimal {
        Decimal::new(Self::MAX_CENTS, Self::MAX_SCALE)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// SQLx support (with sqlite feature): prices live in INTEGER cent columns.
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Price {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Price {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let cents = <i64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(Decimal::new(cents, Self::MAX_SCALE)))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.as_cents(), buf)
    }
}
