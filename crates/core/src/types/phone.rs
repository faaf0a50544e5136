//! Phone number type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Phone`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone cannot be empty")]
    Empty,
    /// The input does not match any accepted format.
    #[error("phone must look like +1234567890 or 123-456-7890")]
    InvalidFormat,
}

/// A phone number.
///
/// Two formats are accepted:
///
/// - International: an optional leading `+` followed by 10 to 15 digits
///   (e.g., `+1234567890`)
/// - Dashed: three groups of 3, 3, and 4 digits separated by hyphens
///   (e.g., `123-456-7890`)
///
/// ## Examples
///
/// ```
/// use copperline_core::Phone;
///
/// assert!(Phone::parse("+1234567890").is_ok());
/// assert!(Phone::parse("1234567890").is_ok());
/// assert!(Phone::parse("123-456-7890").is_ok());
///
/// assert!(Phone::parse("").is_err());          // empty
/// assert!(Phone::parse("12345").is_err());     // too short
/// assert!(Phone::parse("12-34-56").is_err());  // wrong grouping
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Phone(String);

impl Phone {
    /// Minimum digit count for the international format.
    pub const MIN_DIGITS: usize = 10;
    /// Maximum digit count for the international format.
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `Phone` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or matches neither the
    /// international nor the dashed format.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        if s.is_empty() {
            return Err(PhoneError::Empty);
        }

        if is_international(s) || is_dashed(s) {
            Ok(Self(s.to_owned()))
        } else {
            Err(PhoneError::InvalidFormat)
        }
    }

    /// Returns the phone number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Phone` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// An optional `+` followed by 10-15 digits.
fn is_international(s: &str) -> bool {
    let digits = s.strip_prefix('+').unwrap_or(s);
    (Phone::MIN_DIGITS..=Phone::MAX_DIGITS).contains(&digits.len()) && all_digits(digits)
}

/// Exactly `DDD-DDD-DDDD`.
fn is_dashed(s: &str) -> bool {
    let mut parts = s.split('-');
    let (Some(area), Some(exchange), Some(line), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    area.len() == 3
        && exchange.len() == 3
        && line.len() == 4
        && all_digits(area)
        && all_digits(exchange)
        && all_digits(line)
}

fn all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for Phone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Phone {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Phone {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with sqlite feature)
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Phone {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Phone {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Phone {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
    }
}
