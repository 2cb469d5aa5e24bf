use std::fmt::{Display, Formatter};

use faststr::FastStr;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Characters a share code may contain. Uppercase alphanumerics only, so a
/// code survives being read aloud or retyped in either case.
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Fixed share code length.
pub const CODE_LENGTH: usize = 6;

/// A validated, uppercase share code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareCode(FastStr);

impl ShareCode {
    /// Draws a code uniformly at random from the fixed alphabet, independent
    /// of any prior call. Uniqueness is the caller's concern.
    pub fn generate() -> ShareCode {
        let mut rng = rand::thread_rng();
        let code: String = (0..CODE_LENGTH)
            .map(|_| {
                let idx = rng.gen_range(0..CODE_ALPHABET.len());
                CODE_ALPHABET[idx] as char
            })
            .collect();
        ShareCode(FastStr::new(code))
    }

    /// Trims and uppercases user input, then validates length and alphabet.
    pub fn normalize(input: &str) -> Result<ShareCode, CodeError> {
        let normalized = input.trim().to_uppercase();
        if normalized.len() != CODE_LENGTH {
            return Err(CodeError::InvalidLength(normalized.len()));
        }

        for c in normalized.chars() {
            if !c.is_ascii() || !CODE_ALPHABET.contains(&(c as u8)) {
                return Err(CodeError::InvalidCharacter(c));
            }
        }

        Ok(ShareCode(FastStr::new(normalized)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_fast_str(&self) -> FastStr {
        self.0.clone()
    }
}

impl Display for ShareCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CodeError {
    #[error("share code must be {CODE_LENGTH} characters, got {0}")]
    InvalidLength(usize),
    #[error("invalid character {0:?} in share code")]
    InvalidCharacter(char),
}

#[cfg(test)]
mod tests {
    use crate::code::{CODE_ALPHABET, CODE_LENGTH, CodeError, ShareCode};

    #[test]
    pub fn test_generate_conforms_to_alphabet() {
        for _ in 0..1000 {
            let code = ShareCode::generate();
            assert_eq!(code.as_str().len(), CODE_LENGTH);
            for c in code.as_str().bytes() {
                assert!(CODE_ALPHABET.contains(&c), "unexpected character {c}");
            }
        }
    }

    #[test]
    pub fn test_normalize() {
        let code = ShareCode::normalize("ab12cd").unwrap();
        assert_eq!(code.as_str(), "AB12CD");

        let code = ShareCode::normalize("  AB12CD  ").unwrap();
        assert_eq!(code.as_str(), "AB12CD");

        assert!(matches!(
            ShareCode::normalize("AB12"),
            Err(CodeError::InvalidLength(4))
        ));
        assert!(matches!(
            ShareCode::normalize("AB12CDEF"),
            Err(CodeError::InvalidLength(8))
        ));
        assert!(matches!(
            ShareCode::normalize("AB-2CD"),
            Err(CodeError::InvalidCharacter('-'))
        ));
    }
}
