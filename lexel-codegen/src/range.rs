use std::cmp::{Ord, Ordering};
use std::fmt::{self, Debug};
use std::ops::RangeInclusive;

/// A single Unicode scalar value, widened to the full `u32` space.
///
/// The alphabet of the automaton is `[0, u32::MAX]`; actual inputs only
/// ever produce values up to `char::MAX`, the headroom keeps negated
/// classes closed under complement.
pub type Scalar = u32;

/// An inclusive range of scalar values.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Hash)]
pub struct Range {
    pub start: Scalar,
    pub end: Scalar,
}

impl Range {
    pub fn new(start: Scalar, end: Scalar) -> Self {
        Range { start, end }
    }

    /// The full alphabet, produced by `.`.
    pub fn total() -> Self {
        Range {
            start: 0,
            end: Scalar::MAX,
        }
    }

    pub fn contains(&self, scalar: Scalar) -> bool {
        self.start <= scalar && scalar <= self.end
    }

    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

impl Ord for Range {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.start, self.end).cmp(&(other.start, other.end))
    }
}

impl From<Scalar> for Range {
    fn from(scalar: Scalar) -> Range {
        Range {
            start: scalar,
            end: scalar,
        }
    }
}

impl From<char> for Range {
    fn from(c: char) -> Range {
        Range::from(c as Scalar)
    }
}

impl From<RangeInclusive<Scalar>> for Range {
    fn from(range: RangeInclusive<Scalar>) -> Range {
        Range {
            start: *range.start(),
            end: *range.end(),
        }
    }
}

impl From<RangeInclusive<char>> for Range {
    fn from(range: RangeInclusive<char>) -> Range {
        Range {
            start: *range.start() as Scalar,
            end: *range.end() as Scalar,
        }
    }
}

fn write_scalar(scalar: Scalar, f: &mut fmt::Formatter) -> fmt::Result {
    match char::from_u32(scalar) {
        Some(c) if !c.is_control() && !c.is_whitespace() => write!(f, "{}", c),
        _ => write!(f, "{:02X}", scalar),
    }
}

impl Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write_scalar(self.start, f)?;
        if self.start != self.end {
            f.write_str("-")?;
            write_scalar(self.end, f)?;
        }
        Ok(())
    }
}

/// Sort a list of ranges ascending and fuse every overlapping or
/// adjacent pair, producing the canonical disjoint form used by
/// character classes.
pub fn coalesce(mut ranges: Vec<Range>) -> Vec<Range> {
    ranges.sort();

    let mut out: Vec<Range> = Vec::with_capacity(ranges.len());

    for range in ranges {
        if let Some(last) = out.last_mut() {
            if range.start <= last.end.saturating_add(1) {
                last.end = last.end.max(range.end);
                continue;
            }
        }
        out.push(range);
    }

    out
}

/// Complement a sorted disjoint range list against the full alphabet.
pub fn complement(ranges: Vec<Range>) -> Vec<Range> {
    let mut out = Vec::with_capacity(ranges.len() + 1);
    let mut next: Scalar = 0;

    for range in &ranges {
        if range.start > next {
            out.push(Range::new(next, range.start - 1));
        }
        match range.end.checked_add(1) {
            Some(n) => next = n,
            None => return out,
        }
    }

    out.push(Range::new(next, Scalar::MAX));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn coalesce_fuses_overlaps_and_neighbors() {
        let ranges = vec![
            Range::from('f'..='m'),
            Range::from('a'..='d'),
            Range::from('e'),
            Range::from('k'..='p'),
        ];

        assert_eq!(coalesce(ranges), vec![Range::from('a'..='p')]);
    }

    #[test]
    fn coalesce_keeps_gaps() {
        let ranges = vec![Range::from('a'..='b'), Range::from('d'..='e')];

        assert_eq!(
            coalesce(ranges),
            vec![Range::from('a'..='b'), Range::from('d'..='e')],
        );
    }

    #[test]
    fn complement_splits_alphabet() {
        let ranges = vec![Range::from('b'..='c')];

        assert_eq!(
            complement(ranges),
            vec![Range::new(0, 97), Range::new(100, Scalar::MAX)],
        );
    }

    #[test]
    fn complement_of_total_is_empty() {
        assert_eq!(complement(vec![Range::total()]), vec![]);
    }

    fn arbitrary_ranges() -> impl Strategy<Value = Vec<Range>> {
        prop::collection::vec((0u32..400, 0u32..400), 0..16).prop_map(|pairs| {
            pairs
                .into_iter()
                .map(|(a, b)| Range::new(a.min(b), a.max(b)))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn coalesced_ranges_are_sorted_and_disjoint(ranges in arbitrary_ranges()) {
            let out = coalesce(ranges.clone());

            for pair in out.windows(2) {
                prop_assert!(pair[0].end.saturating_add(1) < pair[1].start);
            }

            for point in 0u32..=401 {
                let before = ranges.iter().any(|r| r.contains(point));
                let after = out.iter().any(|r| r.contains(point));
                prop_assert_eq!(before, after);
            }
        }

        #[test]
        fn complement_inverts_membership(ranges in arbitrary_ranges()) {
            let normal = coalesce(ranges);
            let inverted = complement(normal.clone());

            for pair in inverted.windows(2) {
                prop_assert!(pair[0].end.saturating_add(1) < pair[1].start);
            }

            let mut probes: Vec<u32> = (0u32..=401).collect();
            probes.push(Scalar::MAX);

            for point in probes {
                let inside = normal.iter().any(|r| r.contains(point));
                let outside = inverted.iter().any(|r| r.contains(point));
                prop_assert!(inside != outside);
            }
        }
    }
}
