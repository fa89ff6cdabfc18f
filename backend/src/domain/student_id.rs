//! Internal student identifier.
//!
//! A student ID is `S` followed by exactly six decimal digits, drawn
//! uniformly from `100000..=999999`. It is a human-facing reference that is
//! independent of any identifier the directory provider assigns. Uniqueness
//! is not checked here; see [`crate::domain::ports::StudentIdAllocator`].

use std::fmt;
use std::str::FromStr;

use rand::Rng;

const PREFIX: char = 'S';
const DIGITS: usize = 6;
const LOWEST: u32 = 100_000;
const HIGHEST: u32 = 999_999;

/// Errors returned when parsing a [`StudentId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StudentIdParseError {
    #[error("student id must start with 'S'")]
    MissingPrefix,
    #[error("student id must have six digits after the prefix, starting 1-9")]
    InvalidDigits,
}

/// Generated student identifier, for example `S482913`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StudentId(u32);

impl StudentId {
    /// Draw a fresh identifier from the supplied random source.
    ///
    /// # Examples
    /// ```
    /// use enrolment::domain::StudentId;
    /// use rand::SeedableRng;
    /// use rand::rngs::SmallRng;
    ///
    /// let mut rng = SmallRng::seed_from_u64(7);
    /// let id = StudentId::generate(&mut rng);
    /// assert_eq!(id.to_string().len(), 7);
    /// ```
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(LOWEST..=HIGHEST))
    }

    /// Parse the `S######` text form.
    pub fn parse(raw: &str) -> Result<Self, StudentIdParseError> {
        let digits = raw
            .strip_prefix(PREFIX)
            .ok_or(StudentIdParseError::MissingPrefix)?;
        if digits.len() != DIGITS || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(StudentIdParseError::InvalidDigits);
        }
        let value = digits
            .parse::<u32>()
            .map_err(|_| StudentIdParseError::InvalidDigits)?;
        if !(LOWEST..=HIGHEST).contains(&value) {
            return Err(StudentIdParseError::InvalidDigits);
        }
        Ok(Self(value))
    }

    /// Numeric part of the identifier.
    pub const fn number(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{PREFIX}{:0width$}", self.0, width = DIGITS)
    }
}

impl FromStr for StudentId {
    type Err = StudentIdParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
