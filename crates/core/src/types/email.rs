//! Email address type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Longest accepted address, in bytes (RFC 5321 path limit).
const MAX_LEN: usize = 254;

/// Why a string was rejected as an [`Email`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    /// The input string is empty.
    #[error("email is empty")]
    Empty,
    /// The input string is over the length limit.
    #[error("email is longer than {} bytes", MAX_LEN)]
    TooLong,
    /// The input contains whitespace.
    #[error("email contains whitespace")]
    Whitespace,
    /// The input is not `local@domain` with exactly one `@` and text on
    /// both sides.
    #[error("email must be local@domain")]
    MissingParts,
    /// The domain contains no dot.
    #[error("email domain must contain a '.'")]
    BareDomain,
}

/// A validated email address.
///
/// Validation is structural rather than a full RFC 5322 parse: the address
/// must read `local@domain` with exactly one `@`, contain no whitespace,
/// have a dotted domain, and fit in 254 bytes. Anything the mail system
/// would bounce beyond that is out of scope here, as is uniqueness, which
/// the customer store enforces.
///
/// ## Examples
///
/// ```
/// use copperline_core::Email;
///
/// let email = Email::parse("ada@example.com").unwrap();
/// assert_eq!(email.as_str(), "ada@example.com");
///
/// assert!(Email::parse("not-an-email").is_err());
/// assert!(Email::parse("two@at@example.com").is_err());
/// assert!(Email::parse("spaced out@example.com").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an [`EmailError`] describing the first structural rule the
    /// input breaks.
    pub fn parse(s: &str) -> Result<Self, EmailError> {
        if s.is_empty() {
            return Err(EmailError::Empty);
        }
        if s.len() > MAX_LEN {
            return Err(EmailError::TooLong);
        }
        if s.chars().any(char::is_whitespace) {
            return Err(EmailError::Whitespace);
        }

        let (local, domain) = s.split_once('@').ok_or(EmailError::MissingParts)?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(EmailError::MissingParts);
        }
        if !domain.contains('.') {
            return Err(EmailError::BareDomain);
        }

        Ok(Self(s.to_owned()))
    }

    /// The address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the `Email` and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with sqlite feature)
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Email {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &sqlx::sqlite::SqliteTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Email {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Email {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
    }
}
