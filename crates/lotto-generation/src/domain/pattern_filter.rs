//! Rule-based rejection of implausible combinations
//!
//! Every rule is a fixed constant. Rules are ORed, never weighted, and are
//! evaluated in declaration order so the reported rule is deterministic.

use super::combination::{Combination, NUMBERS_PER_COMBINATION};
use serde::Serialize;
use std::fmt;

/// Longest run of consecutive integers that is still accepted is 4.
pub const MAX_CONSECUTIVE_RUN: usize = 4;
/// Lowest accepted sum (inclusive)
pub const MIN_SUM: u16 = 80;
/// Highest accepted sum (inclusive)
pub const MAX_SUM: u16 = 200;
/// A decile holding this many numbers is rejected
pub const DECILE_CLUSTER_LIMIT: usize = 5;

/// Decile boundaries, inclusive
const DECILES: [(u8, u8); 5] = [(1, 10), (11, 20), (21, 30), (31, 40), (41, 45)];

/// Reason a combination was rejected
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternRule {
    /// Five or more consecutive integers
    ConsecutiveRun,
    /// All gaps equal and greater than one
    ArithmeticProgression,
    /// Sum below 80 or above 200
    SumOutOfRange,
    /// All odd or all even
    UniformParity,
    /// Five or more numbers inside one decile
    DecileCluster,
}

impl PatternRule {
    pub const ALL: [PatternRule; 5] = [
        PatternRule::ConsecutiveRun,
        PatternRule::ArithmeticProgression,
        PatternRule::SumOutOfRange,
        PatternRule::UniformParity,
        PatternRule::DecileCluster,
    ];

    /// Whether this rule rejects the combination
    pub fn is_violated_by(self, combination: &Combination) -> bool {
        match self {
            PatternRule::ConsecutiveRun => longest_run(combination) > MAX_CONSECUTIVE_RUN,
            PatternRule::ArithmeticProgression => is_arithmetic_progression(combination),
            PatternRule::SumOutOfRange => {
                let sum = combination.sum();
                !(MIN_SUM..=MAX_SUM).contains(&sum)
            }
            PatternRule::UniformParity => {
                let odd = combination.iter().filter(|n| n % 2 == 1).count();
                odd == 0 || odd == NUMBERS_PER_COMBINATION
            }
            PatternRule::DecileCluster => largest_decile(combination) >= DECILE_CLUSTER_LIMIT,
        }
    }
}

impl fmt::Display for PatternRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatternRule::ConsecutiveRun => "consecutive run of 5 or more",
            PatternRule::ArithmeticProgression => "arithmetic progression",
            PatternRule::SumOutOfRange => "sum outside 80..=200",
            PatternRule::UniformParity => "all odd or all even",
            PatternRule::DecileCluster => "5 or more numbers in one decile",
        };
        f.write_str(name)
    }
}

/// Stateless pattern filter.
#[derive(Clone, Copy, Debug, Default)]
pub struct PatternFilter;

impl PatternFilter {
    /// First rule the combination violates, in rule order.
    pub fn first_violation(combination: &Combination) -> Option<PatternRule> {
        PatternRule::ALL
            .into_iter()
            .find(|rule| rule.is_violated_by(combination))
    }

    pub fn is_rejected(combination: &Combination) -> bool {
        Self::first_violation(combination).is_some()
    }
}

fn longest_run(combination: &Combination) -> usize {
    let numbers = combination.numbers();
    let mut longest = 1;
    let mut current = 1;
    for pair in numbers.windows(2) {
        if pair[1] == pair[0] + 1 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 1;
        }
    }
    longest
}

fn is_arithmetic_progression(combination: &Combination) -> bool {
    let numbers = combination.numbers();
    let gap = numbers[1] - numbers[0];
    gap > 1 && numbers.windows(2).all(|w| w[1] - w[0] == gap)
}

fn largest_decile(combination: &Combination) -> usize {
    DECILES
        .iter()
        .map(|&(lo, hi)| combination.iter().filter(|n| (lo..=hi).contains(n)).count())
        .max()
        .unwrap_or(0)
}
