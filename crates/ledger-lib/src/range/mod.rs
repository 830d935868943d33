//! Sets of closed ledger-index intervals and their compact text form.
//!
//! The text form is a comma-separated list of segments in ascending order,
//! where a segment is either a single index (`7`) or an inclusive span
//! (`9-12`): `"1-5,7,9-12"`. An empty set renders as the empty string.

use std::fmt;
use std::str::FromStr;

use crate::errors::{LedgerError, Result};

/// Value the server reports when it holds no complete ledgers.
const EMPTY_MARKER: &str = "empty";

/// An ordered set of disjoint, non-adjacent closed intervals.
///
/// Construction normalizes the input: intervals are sorted and contiguous
/// neighbours (`1-3` and `4-5`) are merged, so two sets holding the same
/// indices always compare equal and render identically.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    intervals: Vec<(u32, u32)>,
}

impl RangeSet {
    /// Creates an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a set from `(low, high)` pairs in any order.
    ///
    /// Fails with `InvalidRange` if a pair has `low > high` or two pairs
    /// share an index.
    pub fn from_intervals<I>(intervals: I) -> Result<Self>
    where
        I: IntoIterator<Item = (u32, u32)>,
    {
        let mut sorted: Vec<(u32, u32)> = intervals.into_iter().collect();
        if let Some(&(low, high)) = sorted.iter().find(|(low, high)| low > high) {
            return Err(LedgerError::InvalidRange(format!(
                "interval {}-{} has low > high",
                low, high
            )));
        }
        sorted.sort_unstable();

        let mut merged: Vec<(u32, u32)> = Vec::with_capacity(sorted.len());
        for (low, high) in sorted {
            match merged.last_mut() {
                Some(prev) if low <= prev.1 => {
                    return Err(LedgerError::InvalidRange(format!(
                        "interval {}-{} overlaps {}-{}",
                        low, high, prev.0, prev.1
                    )));
                }
                Some(prev) if low == prev.1 + 1 => prev.1 = high,
                _ => merged.push((low, high)),
            }
        }
        Ok(Self { intervals: merged })
    }

    /// Coalesces raw indices into intervals. Duplicates are ignored.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = u32>,
    {
        let mut values: Vec<u32> = values.into_iter().collect();
        values.sort_unstable();
        values.dedup();

        let mut intervals: Vec<(u32, u32)> = Vec::new();
        for v in values {
            match intervals.last_mut() {
                Some(prev) if prev.1.checked_add(1) == Some(v) => prev.1 = v,
                _ => intervals.push((v, v)),
            }
        }
        Self { intervals }
    }

    /// The normalized intervals, ascending.
    pub fn intervals(&self) -> &[(u32, u32)] {
        &self.intervals
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Lowest index in the set.
    pub fn first(&self) -> Option<u32> {
        self.intervals.first().map(|&(low, _)| low)
    }

    /// Highest index in the set.
    pub fn last(&self) -> Option<u32> {
        self.intervals.last().map(|&(_, high)| high)
    }

    /// Number of indices covered by the set.
    pub fn len(&self) -> u64 {
        self.intervals
            .iter()
            .map(|&(low, high)| u64::from(high - low) + 1)
            .sum()
    }

    pub fn contains(&self, index: u32) -> bool {
        let pos = self.intervals.partition_point(|&(_, high)| high < index);
        self.intervals
            .get(pos)
            .is_some_and(|&(low, _)| low <= index)
    }
}

impl fmt::Display for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &(low, high)) in self.intervals.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            if low == high {
                write!(f, "{}", low)?;
            } else {
                write!(f, "{}-{}", low, high)?;
            }
        }
        Ok(())
    }
}

impl FromStr for RangeSet {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self> {
        from_string(s)
    }
}

/// Renders `(low, high)` pairs in the compact text form.
///
/// Unsorted and contiguous input is accepted; invalid or overlapping
/// intervals fail with `InvalidRange`.
pub fn to_string(intervals: &[(u32, u32)]) -> Result<String> {
    RangeSet::from_intervals(intervals.iter().copied()).map(|set| set.to_string())
}

/// Parses the compact text form. Whitespace around segments is ignored, and
/// both `""` and `"empty"` yield the empty set.
pub fn from_string(text: &str) -> Result<RangeSet> {
    let text = text.trim();
    if text.is_empty() || text == EMPTY_MARKER {
        return Ok(RangeSet::new());
    }

    let intervals = text
        .split(',')
        .map(|segment| parse_segment(segment.trim()))
        .collect::<Result<Vec<_>>>()?;
    RangeSet::from_intervals(intervals)
}

fn parse_segment(segment: &str) -> Result<(u32, u32)> {
    let parse = |s: &str| {
        s.trim().parse::<u32>().map_err(|e| {
            LedgerError::InvalidRange(format!("bad segment {:?}: {}", segment, e))
        })
    };
    match segment.split_once('-') {
        Some((low, high)) => Ok((parse(low)?, parse(high)?)),
        None => {
            let v = parse(segment)?;
            Ok((v, v))
        }
    }
}
