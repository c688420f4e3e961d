use crate::graph::{Graph, NodeId, Result};
use crate::range::{Range, Scalar};

/// A node dispatching on disjoint scalar ranges, with an optional
/// fallback taken when no range matches.
#[cfg_attr(test, derive(PartialEq))]
#[derive(Clone, Debug, Default)]
pub struct Branch {
    /// Sorted ascending and pairwise disjoint.
    branches: Vec<(Range, NodeId)>,
    pub miss: Option<NodeId>,
}

impl Branch {
    pub fn new() -> Self {
        Branch::default()
    }

    pub fn miss<M>(mut self, miss: M) -> Self
    where
        M: Into<Option<NodeId>>,
    {
        self.miss = miss.into();
        self
    }

    /// Insert a range that must not overlap the existing table. Used
    /// when building nodes from already-disjoint inputs.
    ///
    /// # Panics
    ///
    /// Panics on overlapping ranges.
    pub fn branch<R>(mut self, range: R, then: NodeId) -> Self
    where
        R: Into<Range>,
    {
        let range = range.into();
        let index = self
            .branches
            .partition_point(|(existing, _)| existing.start < range.start);

        let disjoint = self.branches[..index]
            .last()
            .map_or(true, |(prev, _)| prev.end < range.start)
            && self.branches[index..]
                .first()
                .map_or(true, |(next, _)| range.end < next.start);

        if !disjoint {
            panic!("Overlapping branches");
        }

        self.branches.insert(index, (range, then));
        self
    }

    /// Insert a range, resolving any overlap with the existing table by
    /// merging the targets.
    pub fn add_branch(&mut self, range: Range, then: NodeId, graph: &mut Graph) -> Result<()> {
        let single = Branch {
            branches: vec![(range, then)],
            miss: None,
        };

        self.merge(single, graph)
    }

    /// The target a scalar dispatches to, if any.
    pub fn contains(&self, scalar: Scalar) -> Option<NodeId> {
        let index = self
            .branches
            .partition_point(|(range, _)| range.start <= scalar);

        index.checked_sub(1).and_then(|index| {
            let (range, then) = self.branches[index];

            if range.contains(scalar) {
                Some(then)
            } else {
                None
            }
        })
    }

    pub fn branches(&self) -> impl Iterator<Item = (Range, NodeId)> + '_ {
        self.branches.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.branches.is_empty()
    }

    /// Merge another branch table into this one. The two miss targets
    /// fuse first, then the key ranges are swept left to right so that
    /// every scalar of the combined alphabet lands in exactly one key.
    pub fn merge(&mut self, other: Branch, graph: &mut Graph) -> Result<()> {
        self.miss = match (self.miss, other.miss) {
            (None, None) => None,
            (Some(id), None) | (None, Some(id)) => Some(id),
            (Some(a), Some(b)) => Some(graph.merge(a, b)?),
        };

        let mut work: Vec<(Range, NodeId)> = self.branches.drain(..).collect();
        work.extend(other.branches);
        work.sort();

        let mut out: Vec<(Range, NodeId)> = Vec::with_capacity(work.len());

        while !work.is_empty() {
            let (a, a_then) = work.remove(0);

            let (b, b_then) = match work.first() {
                Some(&next) => next,
                None => {
                    out.push((a, a_then));
                    break;
                }
            };

            if a.end < b.start {
                out.push((a, a_then));
                continue;
            }

            if b.start < a.start {
                return Err(crate::error::GraphError::MergingRangeError);
            }

            work.remove(0);

            if a.start < b.start {
                out.push((Range::new(a.start, b.start - 1), a_then));
            }

            let overlap_end = a.end.min(b.end);
            let overlap_then = if a_then == b_then {
                a_then
            } else {
                graph.merge(a_then, b_then)?
            };

            insert_sorted(&mut work, (Range::new(b.start, overlap_end), overlap_then));

            if a.end != b.end {
                let (tail, owner) = if a.end > b.end {
                    (Range::new(overlap_end + 1, a.end), a_then)
                } else {
                    (Range::new(overlap_end + 1, b.end), b_then)
                };

                insert_sorted(&mut work, (tail, owner));
            }
        }

        // Fuse contiguous keys that ended up with the same target.
        let mut fused: Vec<(Range, NodeId)> = Vec::with_capacity(out.len());

        for (range, then) in out {
            if let Some((last, last_then)) = fused.last_mut() {
                if *last_then == then && last.end.saturating_add(1) == range.start {
                    last.end = range.end;
                    continue;
                }
            }

            fused.push((range, then));
        }

        self.branches = fused;

        Ok(())
    }

    pub(crate) fn remap(&self, map: &[Option<NodeId>]) -> Result<Branch> {
        let miss = match self.miss {
            Some(id) => Some(crate::graph::remap_id(map, id)?),
            None => None,
        };

        let branches = self
            .branches
            .iter()
            .map(|&(range, then)| Ok((range, crate::graph::remap_id(map, then)?)))
            .collect::<Result<_>>()?;

        Ok(Branch { branches, miss })
    }
}

fn insert_sorted(work: &mut Vec<(Range, NodeId)>, entry: (Range, NodeId)) {
    let index = work.partition_point(|existing| *existing < entry);
    work.insert(index, entry);
}
