//! Station identifier normalization.

use std::{fmt, str::FromStr};

/// Prefix given to three-character identifiers (continental US convention).
const US_PREFIX: u8 = b'K';

/// Why a raw station argument was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum StationCodeError {
    #[error("station id must be three or four characters")]
    Length,

    #[error("station id must contain only alphanumeric characters")]
    NonAlphanumeric,
}

/// A validated four-character station code, e.g. `KSFO`.
///
/// Always uppercase ASCII alphanumeric. The only way to build one is through
/// [`StationCode::normalize`], so every value addresses a well-formed resource.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct StationCode([u8; 4]);

impl StationCode {
    /// Normalize a raw station argument.
    ///
    /// Four characters are uppercased as-is; three characters are completed
    /// with a leading `K`. Length is checked before the characters are scanned.
    pub fn normalize(raw: &str) -> Result<Self, StationCodeError> {
        Self::normalize_bytes(raw.as_bytes())
    }

    /// Byte form of [`StationCode::normalize`], for arguments that need not
    /// be UTF-8. Any non-ASCII byte fails the alphanumeric scan.
    pub fn normalize_bytes(bytes: &[u8]) -> Result<Self, StationCodeError> {
        let mut code = [US_PREFIX; 4];
        let start = match bytes.len() {
            4 => 0,
            3 => 1,
            _ => return Err(StationCodeError::Length),
        };

        for (slot, byte) in code[start..].iter_mut().zip(bytes) {
            if !byte.is_ascii_alphanumeric() {
                return Err(StationCodeError::NonAlphanumeric);
            }
            *slot = byte.to_ascii_uppercase();
        }

        Ok(Self(code))
    }

    pub fn as_str(&self) -> &str {
        // only ASCII alphanumerics are ever stored
        std::str::from_utf8(&self.0).unwrap_or_default()
    }
}

/// Free-function form of [`StationCode::normalize`].
pub fn normalize(raw: &str) -> Result<StationCode, StationCodeError> {
    StationCode::normalize(raw)
}

impl FromStr for StationCode {
    type Err = StationCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::normalize(s)
    }
}

impl TryFrom<&str> for StationCode {
    type Error = StationCodeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::normalize(value)
    }
}

impl fmt::Debug for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "StationCode({})", self.as_str())
    }
}

impl fmt::Display for StationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Three alphanumerics become 'K' + uppercase(input)
        #[test]
        fn three_alnum_gets_prefix(s in "[0-9A-Za-z]{3}") {
            let code = normalize(&s).unwrap();
            prop_assert_eq!(code.as_str(), format!("K{}", s.to_ascii_uppercase()));
        }

        /// Four alphanumerics become uppercase(input), order preserved
        #[test]
        fn four_alnum_uppercased(s in "[0-9A-Za-z]{4}") {
            let code = normalize(&s).unwrap();
            prop_assert_eq!(code.as_str(), s.to_ascii_uppercase());
        }

        /// Wrong-length strings are rejected
        #[test]
        fn wrong_length_rejected(s in "[0-9A-Za-z]{0,2}|[0-9A-Za-z]{5,12}") {
            prop_assert_eq!(normalize(&s), Err(StationCodeError::Length));
        }

        /// Any non-alphanumeric ASCII character at any position is rejected
        #[test]
        fn punctuation_rejected(
            s in "[0-9A-Za-z]{3}",
            bad in "[ !-/:-@\\[-`{-~]",
            pos in 0usize..4,
        ) {
            let mut raw = s.clone();
            raw.insert_str(pos, &bad);
            prop_assert_eq!(normalize(&raw), Err(StationCodeError::NonAlphanumeric));
        }

        /// Never panics, whatever the input
        #[test]
        fn total_over_strings(s in "\\PC{0,8}") {
            let _ = normalize(&s);
        }

        /// Arbitrary bytes either normalize or fail, never panic
        #[test]
        fn total_over_bytes(bytes in proptest::collection::vec(any::<u8>(), 0..8)) {
            if let Ok(code) = StationCode::normalize_bytes(&bytes) {
                prop_assert!(code.as_str().bytes().all(|b| b.is_ascii_alphanumeric()));
            }
        }
    }
}
