//! 6-of-45 combination value object
//!
//! A `Combination` is always stored sorted ascending, so two combinations
//! built from the same numbers in any order compare, hash and serialize
//! identically.

use crate::error::CombinationError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Smallest number on a ticket
pub const MIN_NUMBER: u8 = 1;
/// Largest number on a ticket
pub const MAX_NUMBER: u8 = 45;
/// Numbers per combination
pub const NUMBERS_PER_COMBINATION: usize = 6;

/// Six distinct numbers in `1..=45`, sorted ascending.
///
/// Invariant: `len == 6 && all distinct && all in 1..=45 && sorted`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct Combination([u8; NUMBERS_PER_COMBINATION]);

impl Combination {
    /// Validate and sort six numbers.
    pub fn new(mut numbers: [u8; NUMBERS_PER_COMBINATION]) -> Result<Self, CombinationError> {
        if let Some(&number) = numbers
            .iter()
            .find(|n| !(MIN_NUMBER..=MAX_NUMBER).contains(*n))
        {
            return Err(CombinationError::OutOfRange { number });
        }

        numbers.sort_unstable();

        if let Some(pair) = numbers.windows(2).find(|w| w[0] == w[1]) {
            return Err(CombinationError::Duplicate { number: pair[0] });
        }

        Ok(Self(numbers))
    }

    /// Build from numbers already known to be distinct and in range.
    pub(crate) fn from_distinct_in_range(mut numbers: [u8; NUMBERS_PER_COMBINATION]) -> Self {
        numbers.sort_unstable();
        debug_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
        debug_assert!((MIN_NUMBER..=MAX_NUMBER).contains(&numbers[0]));
        debug_assert!((MIN_NUMBER..=MAX_NUMBER).contains(&numbers[5]));
        Self(numbers)
    }

    /// Numbers in ascending order
    pub fn numbers(&self) -> &[u8; NUMBERS_PER_COMBINATION] {
        &self.0
    }

    pub fn iter(&self) -> impl Iterator<Item = u8> + '_ {
        self.0.iter().copied()
    }

    pub fn sum(&self) -> u16 {
        self.0.iter().map(|&n| u16::from(n)).sum()
    }

    pub fn contains_number(&self, number: u8) -> bool {
        self.0.binary_search(&number).is_ok()
    }
}

impl TryFrom<&[u8]> for Combination {
    type Error = CombinationError;

    fn try_from(numbers: &[u8]) -> Result<Self, Self::Error> {
        let array: [u8; NUMBERS_PER_COMBINATION] = numbers
            .try_into()
            .map_err(|_| CombinationError::WrongLength { len: numbers.len() })?;
        Self::new(array)
    }
}

impl TryFrom<Vec<u8>> for Combination {
    type Error = CombinationError;

    fn try_from(numbers: Vec<u8>) -> Result<Self, Self::Error> {
        Self::try_from(numbers.as_slice())
    }
}

impl From<Combination> for Vec<u8> {
    fn from(combination: Combination) -> Self {
        combination.0.to_vec()
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, n) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", n)?;
        }
        write!(f, "]")
    }
}
