use std::{fmt, ops::RangeInclusive};

use rand::Rng;

use crate::foundation::error::{SlipError, SlipResult};

/// Five-digit number stamped on each receipt for traceability.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TransactionCode(u32);

impl TransactionCode {
    /// Inclusive range every code falls in.
    pub const RANGE: RangeInclusive<u32> = 10_000..=99_999;

    /// Wrap a known code, rejecting values outside [`Self::RANGE`].
    pub fn new(value: u32) -> SlipResult<Self> {
        if !Self::RANGE.contains(&value) {
            return Err(SlipError::validation(format!(
                "transaction code {value} outside {}..={}",
                Self::RANGE.start(),
                Self::RANGE.end()
            )));
        }
        Ok(Self(value))
    }

    /// Draw a uniformly random code.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        Self(rng.random_range(Self::RANGE))
    }

    /// The raw number.
    pub fn value(self) -> u32 {
        self.0
    }

    /// `"<prefix>-<code>"`, e.g. `GNHS-48213`.
    pub fn identifier(self, prefix: &str) -> String {
        format!("{prefix}-{}", self.0)
    }
}

impl fmt::Display for TransactionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/receipt/code.rs"]
mod tests;
