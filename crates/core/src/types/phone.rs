//! Phone number type for partner registrations.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input contains no digits at all.
    #[error("phone number cannot be empty")]
    Empty,
    /// The input does not contain exactly ten digits.
    #[error("phone number must have exactly {expected} digits (got {actual})")]
    WrongLength {
        /// Required digit count.
        expected: usize,
        /// Digits found in the input.
        actual: usize,
    },
}

/// A ten-digit phone number.
///
/// Formatting characters (spaces, dashes, parentheses, a leading `+`) are
/// stripped before counting, so `"98765-43210"` and `"(987) 654 3210"` are
/// both accepted and stored as `"9876543210"`.
///
/// ```
/// use tunenest_core::PhoneNumber;
///
/// assert_eq!(PhoneNumber::parse("98765 43210").unwrap().as_str(), "9876543210");
/// assert!(PhoneNumber::parse("987654321").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Number of digits a valid phone number carries.
    pub const DIGITS: usize = 10;

    /// Parse a `PhoneNumber`, keeping only the ASCII digits of `s`.
    ///
    /// # Errors
    ///
    /// Returns [`PhoneError::Empty`] if `s` has no digits, or
    /// [`PhoneError::WrongLength`] if the digit count is not ten.
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let digits: String = s.chars().filter(char::is_ascii_digit).collect();

        if digits.is_empty() {
            return Err(PhoneError::Empty);
        }

        if digits.len() != Self::DIGITS {
            return Err(PhoneError::WrongLength {
                expected: Self::DIGITS,
                actual: digits.len(),
            });
        }

        Ok(Self(digits))
    }

    /// Returns the digits as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_ten_digits_accepted() {
        let phone = PhoneNumber::parse("9876543210").unwrap();
        assert_eq!(phone.as_str(), "9876543210");
    }

    #[test]
    fn test_nine_digits_rejected() {
        assert_eq!(
            PhoneNumber::parse("987654321"),
            Err(PhoneError::WrongLength {
                expected: 10,
                actual: 9
            })
        );
    }

    #[test]
    fn test_eleven_digits_rejected() {
        assert!(matches!(
            PhoneNumber::parse("+919876543210"),
            Err(PhoneError::WrongLength { actual: 12, .. })
        ));
    }

    #[test]
    fn test_formatting_stripped() {
        let phone = PhoneNumber::parse("(987) 654-3210").unwrap();
        assert_eq!(phone.to_string(), "9876543210");
    }

    #[test]
    fn test_no_digits() {
        assert_eq!(PhoneNumber::parse("phone"), Err(PhoneError::Empty));
        assert_eq!(PhoneNumber::parse(""), Err(PhoneError::Empty));
    }

    proptest! {
        #[test]
        fn test_any_ten_digit_string_parses(digits in "[0-9]{10}") {
            let phone = PhoneNumber::parse(&digits).unwrap();
            prop_assert_eq!(phone.as_str(), digits.as_str());
        }

        #[test]
        fn test_wrong_digit_count_never_parses(digits in "[0-9]{1,9}|[0-9]{11,15}") {
            prop_assert!(PhoneNumber::parse(&digits).is_err());
        }
    }
}
