use crate::graph::{Branch, Graph, NodeId};
use crate::range::{Range, Scalar};

/// Fallback policy of a [`Seq`] node.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
pub enum SeqMiss {
    /// Taken only when the very first scalar of the run mismatches;
    /// a mismatch deeper into the run is a hard failure.
    First(NodeId),
    /// Taken on a mismatch anywhere within the run.
    Anytime(NodeId),
}

impl SeqMiss {
    pub fn node(self) -> NodeId {
        match self {
            SeqMiss::First(id) | SeqMiss::Anytime(id) => id,
        }
    }
}

/// A node consuming a fixed run of scalars before continuing to `then`.
#[cfg_attr(test, derive(PartialEq))]
#[derive(Clone, Debug)]
pub struct Seq {
    pub run: Vec<Scalar>,
    pub then: NodeId,
    pub miss: Option<SeqMiss>,
}

impl Seq {
    pub fn new<R>(run: R, then: NodeId) -> Self
    where
        R: Into<Vec<Scalar>>,
    {
        Seq {
            run: run.into(),
            then,
            miss: None,
        }
    }

    pub fn miss<M>(mut self, miss: M) -> Self
    where
        M: Into<Option<SeqMiss>>,
    {
        self.miss = miss.into();
        self
    }

    pub fn miss_first(mut self, node: NodeId) -> Self {
        self.miss = Some(SeqMiss::First(node));
        self
    }

    /// The miss a tail split off this run keeps: `Anytime` covers every
    /// position, `First` only ever applied to the head scalar.
    fn tail_miss(&self) -> Option<SeqMiss> {
        match self.miss {
            Some(SeqMiss::Anytime(id)) => Some(SeqMiss::Anytime(id)),
            _ => None,
        }
    }

    /// Node continuing this run after its first `at` scalars. Allocates
    /// a tail node unless the whole run is consumed.
    pub fn remainder(&self, at: usize, graph: &mut Graph) -> NodeId {
        if at >= self.run.len() {
            return self.then;
        }

        graph.push(Seq {
            run: self.run[at..].to_vec(),
            then: self.then,
            miss: self.tail_miss(),
        })
    }

    /// Keep the first `at` scalars, pushing the rest into a fresh tail
    /// node. Returns `None` for an empty head.
    pub fn split_at(self, at: usize, graph: &mut Graph) -> Option<Seq> {
        match at {
            0 => None,
            _ if at >= self.run.len() => Some(self),
            _ => {
                let then = graph.push(Seq {
                    run: self.run[at..].to_vec(),
                    then: self.then,
                    miss: self.tail_miss(),
                });

                Some(Seq {
                    run: self.run[..at].to_vec(),
                    then,
                    miss: self.miss,
                })
            }
        }
    }

    /// Longest common prefix of two runs, along with the miss the fused
    /// head would carry. `None` when there is no common prefix, or the
    /// two miss policies cannot be reconciled.
    pub fn prefix(&self, other: &Seq) -> Option<(Vec<Scalar>, Option<SeqMiss>)> {
        let count = self
            .run
            .iter()
            .zip(other.run.iter())
            .take_while(|(a, b)| a == b)
            .count();

        if count == 0 {
            return None;
        }

        let miss = match (self.miss, other.miss) {
            (None, miss) | (miss, None) => miss,
            (Some(a), Some(b)) if a == b => Some(a),
            _ => return None,
        };

        Some((self.run[..count].to_vec(), miss))
    }

    /// Reinterpret this run as a single-scalar branch, splitting off a
    /// tail node when more than one scalar remains.
    pub fn into_branch(self, graph: &mut Graph) -> Branch {
        let miss = self.miss.map(SeqMiss::node);

        let (&first, rest) = match self.run.split_first() {
            Some(split) => split,
            None => return Branch::new().miss(miss),
        };

        let then = if rest.is_empty() {
            self.then
        } else {
            graph.push(Seq {
                run: rest.to_vec(),
                then: self.then,
                miss: self.tail_miss(),
            })
        };

        Branch::new().miss(miss).branch(Range::from(first), then)
    }
}
