//! The multi-pattern automaton workspace.
//!
//! Terminals are pushed one at a time; each lowers its HIR into nodes
//! threaded towards the terminal's leaf. The per-terminal entry points
//! are then folded pairwise with [`Graph::merge`], which resolves
//! overlap between patterns and breaks accept ties by priority.
//! Forward references (merging with a slot that is reserved but not
//! yet written) park in a pending queue keyed on the empty slot and
//! are replayed once it fills. [`Graph::shake`] finally drops
//! unreachable slots and re-issues ids densely.

use std::fmt;
use std::ops::Index;

use fnv::FnvHashMap as Map;

use crate::error::GraphError;
use crate::hir::Hir;
use crate::input::{EndsId, GraphInput};
use crate::range::Scalar;

mod branch;
mod seq;

pub use branch::Branch;
pub use seq::{Seq, SeqMiss};

pub type Result<T> = std::result::Result<T, GraphError>;

/// Index of a node in the graph arena. Slot 0 stays reserved unused
/// while the graph is under construction; `shake` re-issues all ids
/// densely from 0.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> NodeId {
        NodeId(index as u32)
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, ":{}", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique handle to a reserved slot. Mustn't implement `Clone`; it is
/// consumed by `Graph::insert` so a slot can only be written once.
pub struct ReservedId(NodeId);

impl ReservedId {
    pub fn get(&self) -> NodeId {
        self.0
    }
}

#[cfg_attr(test, derive(PartialEq))]
#[derive(Clone, Debug)]
pub enum Node {
    /// Dispatch on disjoint scalar ranges, with an optional fallback.
    Branch(Branch),
    /// Consume a fixed scalar run, or fall back per its miss policy.
    Seq(Seq),
    /// Accept the terminal with this id.
    Leaf(EndsId),
}

impl Node {
    pub fn miss(&self) -> Option<NodeId> {
        match self {
            Node::Branch(branch) => branch.miss,
            Node::Seq(seq) => seq.miss.map(SeqMiss::node),
            Node::Leaf(_) => None,
        }
    }

    fn remap(&self, map: &[Option<NodeId>]) -> Result<Node> {
        match self {
            Node::Branch(branch) => Ok(Node::Branch(branch.remap(map)?)),
            Node::Seq(seq) => {
                let miss = match seq.miss {
                    Some(SeqMiss::First(id)) => Some(SeqMiss::First(remap_id(map, id)?)),
                    Some(SeqMiss::Anytime(id)) => Some(SeqMiss::Anytime(remap_id(map, id)?)),
                    None => None,
                };

                Ok(Node::Seq(Seq {
                    run: seq.run.clone(),
                    then: remap_id(map, seq.then)?,
                    miss,
                }))
            }
            Node::Leaf(ends) => Ok(Node::Leaf(*ends)),
        }
    }
}

impl From<Branch> for Node {
    fn from(branch: Branch) -> Node {
        Node::Branch(branch)
    }
}

impl From<Seq> for Node {
    fn from(seq: Seq) -> Node {
        Node::Seq(seq)
    }
}

pub(crate) fn remap_id(map: &[Option<NodeId>], id: NodeId) -> Result<NodeId> {
    map.get(id.get())
        .copied()
        .flatten()
        .ok_or(GraphError::ShakingError)
}

/// A merge that met a reserved-but-empty slot. Replayed when the
/// `waiting` slot is written.
struct Pending {
    waiting: NodeId,
    has: NodeId,
    into: NodeId,
}

pub struct Graph {
    /// All allocated nodes. Once a slot is written it is never mutated.
    nodes: Vec<Option<Node>>,
    /// Terminals in insertion order. Never renumbered.
    inputs: Vec<GraphInput>,
    /// Memo of performed (or in-flight) merges, so a looping graph
    /// can't re-enter the same merge and blow the stack.
    merges: Map<(NodeId, NodeId), NodeId>,
    /// Merges parked on a still-empty slot.
    pending: Vec<Pending>,
    /// Entry node of each pushed terminal.
    roots: Vec<NodeId>,
}

impl Graph {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Graph {
            nodes: vec![None],
            inputs: Vec::new(),
            merges: Map::default(),
            pending: Vec::new(),
            roots: Vec::new(),
        }
    }

    pub fn nodes(&self) -> &[Option<Node>] {
        &self.nodes
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.get())?.as_ref()
    }

    pub fn inputs(&self) -> &[GraphInput] {
        &self.inputs
    }

    pub fn input(&self, ends: EndsId) -> &GraphInput {
        &self.inputs[ends.0]
    }

    /// Reserve an empty slot. The returned handle cannot be cloned and
    /// must be consumed by `insert`.
    pub fn reserve(&mut self) -> ReservedId {
        ReservedId(self.reserve_slot())
    }

    fn reserve_slot(&mut self) -> NodeId {
        let id = NodeId::new(self.nodes.len());

        self.nodes.push(None);

        id
    }

    /// Write a node into a previously reserved slot.
    pub fn insert<N>(&mut self, id: ReservedId, node: N) -> Result<NodeId>
    where
        N: Into<Node>,
    {
        let id = id.0;

        self.fill(id, node.into())?;

        Ok(id)
    }

    /// Push a node into a fresh slot.
    pub fn push<N>(&mut self, node: N) -> NodeId
    where
        N: Into<Node>,
    {
        let id = NodeId::new(self.nodes.len());

        self.nodes.push(Some(node.into()));

        id
    }

    fn fill(&mut self, id: NodeId, node: Node) -> Result<()> {
        let slot = &mut self.nodes[id.get()];

        if slot.is_some() {
            return Err(GraphError::OverwriteNonReserved);
        }

        *slot = Some(node);

        self.ready_pendings(id)
    }

    /// Replay merges that were waiting for `id` to be written, newest
    /// first.
    fn ready_pendings(&mut self, id: NodeId) -> Result<()> {
        if self.pending.iter().all(|pending| pending.waiting != id) {
            return Ok(());
        }

        let (ready, parked): (Vec<_>, Vec<_>) = self
            .pending
            .drain(..)
            .partition(|pending| pending.waiting == id);

        self.pending = parked;

        for entry in ready.into_iter().rev() {
            self.merge_known(entry.has, entry.waiting, entry.into)?;
        }

        Ok(())
    }

    /// Append a terminal and thread its pattern into the graph,
    /// remembering the entry node for root finalisation.
    pub fn push_input(&mut self, input: GraphInput) -> Result<NodeId> {
        if let Some(existing) = self
            .inputs
            .iter()
            .position(|other| other.hir == input.hir && other.token == input.token)
        {
            return Err(GraphError::DuplicatedInputs(EndsId(existing)));
        }

        let ends = EndsId(self.inputs.len());
        let hir = input.hir.clone();

        self.inputs.push(input);

        let leaf = self.push(Node::Leaf(ends));
        let entry = self.push_hir(&hir, leaf, None, None)?;

        self.roots.push(entry);

        Ok(entry)
    }

    fn install(&mut self, reserved: Option<ReservedId>, node: Node) -> Result<NodeId> {
        match reserved {
            Some(id) => self.insert(id, node),
            None => Ok(self.push(node)),
        }
    }

    /// Thread a HIR towards `succ`, returning the entry node. `miss` is
    /// the fallback the subgraph's first step takes on a mismatch;
    /// `reserved` pins the entry into a pre-allocated slot, which is
    /// how loops tie back into themselves.
    pub fn push_hir(
        &mut self,
        hir: &Hir,
        succ: NodeId,
        miss: Option<NodeId>,
        reserved: Option<ReservedId>,
    ) -> Result<NodeId> {
        match hir {
            Hir::Empty => match reserved {
                Some(id) => self.insert(id, Branch::new().miss(succ)),
                None => Ok(succ),
            },
            Hir::Loop(inner) => {
                let miss = match miss {
                    Some(miss) => self.merge(succ, miss)?,
                    None => succ,
                };

                let slot = match reserved {
                    Some(slot) => slot,
                    None => self.reserve(),
                };
                let entry = slot.get();

                self.push_hir(inner, entry, Some(miss), Some(slot))
            }
            Hir::Maybe(inner) => {
                let miss = match miss {
                    Some(miss) => self.merge(succ, miss)?,
                    None => succ,
                };

                self.push_hir(inner, succ, Some(miss), reserved)
            }
            Hir::Literal(run) => {
                let seq = Seq::new(run.clone(), succ).miss(miss.map(SeqMiss::First));

                self.install(reserved, seq.into())
            }
            Hir::Class(ranges) => {
                let mut branch = Branch::new().miss(miss);

                for &range in ranges {
                    branch.add_branch(range, succ, self)?;
                }

                self.install(reserved, branch.into())
            }
            Hir::Alternation(children) => {
                let mut branch = Branch::new().miss(miss);

                for child in children {
                    let entry = self.push_hir(child, succ, None, None)?;
                    let alt = self.to_branch(entry)?;

                    branch.merge(alt, self)?;
                }

                self.install(reserved, branch.into())
            }
            Hir::Concat(children) => {
                let (head, tail) = match children.split_first() {
                    Some(split) => split,
                    None => return self.push_hir(&Hir::Empty, succ, miss, reserved),
                };

                let mut succ = succ;
                let mut run: Vec<Scalar> = Vec::new();

                // Fold from the right, fusing adjacent literal runs
                // into single sequences as we go.
                for child in tail.iter().rev() {
                    match child {
                        Hir::Literal(part) => {
                            run.splice(0..0, part.iter().copied());
                        }
                        child => {
                            if !run.is_empty() {
                                succ = self.push(Seq::new(std::mem::take(&mut run), succ));
                            }

                            succ = self.push_hir(child, succ, None, None)?;
                        }
                    }
                }

                match head {
                    Hir::Literal(part) => {
                        let mut full = part.clone();
                        full.extend(run);

                        let seq = Seq::new(full, succ).miss(miss.map(SeqMiss::First));

                        self.install(reserved, seq.into())
                    }
                    head => {
                        if !run.is_empty() {
                            succ = self.push(Seq::new(std::mem::take(&mut run), succ));
                        }

                        self.push_hir(head, succ, miss, reserved)
                    }
                }
            }
        }
    }

    /// Project any node into branch form: branches clone, sequences
    /// explode their first scalar, leaves (and still-empty slots)
    /// become a pure fallback.
    pub fn to_branch(&mut self, id: NodeId) -> Result<Branch> {
        match self.get(id) {
            Some(Node::Branch(branch)) => Ok(branch.clone()),
            Some(Node::Seq(seq)) => {
                let seq = seq.clone();

                Ok(seq.into_branch(self))
            }
            Some(Node::Leaf(_)) | None => Ok(Branch::new().miss(id)),
        }
    }

    /// Merge the nodes at `a` and `b`, returning the id of the node
    /// accepting either. Accept ties resolve by terminal priority;
    /// identical priorities are a design conflict and fail.
    pub fn merge(&mut self, a: NodeId, b: NodeId) -> Result<NodeId> {
        if a == b {
            return Ok(a);
        }

        let (a, b) = if a > b { (b, a) } else { (a, b) };

        if let Some(&merged) = self.merges.get(&(a, b)) {
            return Ok(merged);
        }

        match (self.get(a), self.get(b)) {
            (None, None) => Err(GraphError::EmptyMerging),
            (Some(Node::Leaf(left)), Some(Node::Leaf(right))) => {
                let (left, right) = (*left, *right);
                let left_priority = self.input(left).priority;
                let right_priority = self.input(right).priority;

                if left_priority > right_priority {
                    Ok(a)
                } else if right_priority > left_priority {
                    Ok(b)
                } else {
                    Err(GraphError::IdenticalPriority(left, right))
                }
            }
            (None, Some(_)) | (Some(_), None) => {
                let (waiting, has) = match self.get(a) {
                    None => (a, b),
                    Some(_) => (b, a),
                };

                let into = self.reserve_slot();

                self.pending.push(Pending { waiting, has, into });
                self.memoize(a, b, into);
                self.memoize(a, into, into);
                self.memoize(b, into, into);

                Ok(into)
            }
            _ => {
                let into = self.reserve_slot();

                self.memoize(a, b, into);
                self.merge_known(a, b, into)?;

                Ok(into)
            }
        }
    }

    fn memoize(&mut self, a: NodeId, b: NodeId, merged: NodeId) {
        let key = if a > b { (b, a) } else { (a, b) };

        self.merges.insert(key, merged);
    }

    /// Merge two written nodes into the reserved slot `into`.
    fn merge_known(&mut self, a: NodeId, b: NodeId, into: NodeId) -> Result<()> {
        let merged_seq = match (self.get(a), self.get(b)) {
            (Some(Node::Leaf(_)), Some(Node::Leaf(_))) => {
                return Err(GraphError::MergingLeaves)
            }
            (None, _) | (_, None) => return Err(GraphError::EmptyMerging),
            (Some(Node::Seq(seq)), _) => {
                let seq = seq.clone();

                self.merge_seq(seq, b)?
            }
            (_, Some(Node::Seq(seq))) => {
                let seq = seq.clone();

                self.merge_seq(seq, a)?
            }
            _ => None,
        };

        if let Some(seq) = merged_seq {
            return self.fill(into, Node::Seq(seq));
        }

        let mut branch = self.to_branch(a)?;
        let other = self.to_branch(b)?;

        branch.merge(other, self)?;

        self.fill(into, Node::Branch(branch))
    }

    /// Sequence-preserving merge attempts. `None` means the pair gets
    /// the generic branch-projection treatment instead.
    fn merge_seq(&mut self, seq: Seq, other: NodeId) -> Result<Option<Seq>> {
        match self.get(other) {
            Some(Node::Branch(branch)) if seq.miss.is_none() => {
                let branch = branch.clone();

                // Count how many leading scalars of this run would
                // branch right back into `other`; for a self-looping
                // branch those scalars stay on the shared path.
                //
                // e.g.: for run "foobar" and a looping branch [a-z]: 6
                let count = seq
                    .run
                    .iter()
                    .take_while(|&&scalar| branch.contains(scalar) == Some(other))
                    .count();

                let head = match seq.split_at(count, self) {
                    Some(head) => head,
                    None => return Ok(None),
                };

                let then = self.merge(head.then, other)?;

                Ok(Some(Seq {
                    run: head.run,
                    then,
                    miss: Some(SeqMiss::Anytime(other)),
                }))
            }
            Some(Node::Seq(other_seq)) => {
                let other_seq = other_seq.clone();

                let (prefix, miss) = match seq.prefix(&other_seq) {
                    Some(found) => found,
                    None => return Ok(None),
                };

                let a_tail = seq.remainder(prefix.len(), self);
                let b_tail = other_seq.remainder(prefix.len(), self);
                let then = self.merge(a_tail, b_tail)?;

                Ok(Some(Seq {
                    run: prefix,
                    then,
                    miss,
                }))
            }
            Some(Node::Leaf(_)) if seq.miss.is_none() => Ok(Some(seq.miss_first(other))),
            _ => Ok(None),
        }
    }

    /// Fold all terminal entry points into the canonical start node,
    /// then drain any merges still parked on the queue.
    pub fn make_root(&mut self) -> Result<NodeId> {
        let roots = std::mem::take(&mut self.roots);
        let mut iter = roots.into_iter();

        let mut root = match iter.next() {
            Some(root) => root,
            None => return Err(GraphError::EmptyRoot),
        };

        for next in iter {
            root = self.merge(root, next)?;
        }

        self.merge_all_pendings()?;

        Ok(root)
    }

    fn merge_all_pendings(&mut self) -> Result<()> {
        while !self.pending.is_empty() {
            let position = self
                .pending
                .iter()
                .rposition(|pending| self.get(pending.waiting).is_some());

            let entry = match position {
                Some(position) => self.pending.remove(position),
                None => return Err(GraphError::EmptyMerging),
            };

            self.merge_known(entry.has, entry.waiting, entry.into)?;
        }

        Ok(())
    }

    /// Drop every node unreachable from `root` and re-issue ids
    /// densely: a slot's new index is the number of reachable slots
    /// above it, so the latest-allocated reachable node lands at 0.
    /// Returns the remapped root.
    pub fn shake(&mut self, root: NodeId) -> Result<NodeId> {
        let mut marks = vec![false; self.nodes.len()];
        let mut stack = vec![root];

        while let Some(id) = stack.pop() {
            let mark = marks.get_mut(id.get()).ok_or(GraphError::ShakingError)?;

            if *mark {
                continue;
            }

            *mark = true;

            match self.get(id) {
                Some(Node::Branch(branch)) => {
                    stack.extend(branch.branches().map(|(_, then)| then));
                    stack.extend(branch.miss);
                }
                Some(Node::Seq(seq)) => {
                    stack.push(seq.then);
                    stack.extend(seq.miss.map(SeqMiss::node));
                }
                Some(Node::Leaf(_)) => (),
                None => return Err(GraphError::ShakingError),
            }
        }

        let mut map: Vec<Option<NodeId>> = vec![None; self.nodes.len()];
        let mut counter = 0;

        for index in (0..self.nodes.len()).rev() {
            if marks[index] {
                map[index] = Some(NodeId::new(counter));
                counter += 1;
            }
        }

        let mut nodes: Vec<Option<Node>> = vec![None; counter];

        for (index, slot) in self.nodes.iter().enumerate() {
            if let (Some(new_id), Some(node)) = (map[index], slot) {
                nodes[new_id.get()] = Some(node.remap(&map)?);
            }
        }

        self.nodes = nodes;
        self.merges.clear();

        remap_id(&map, root)
    }
}

impl Index<NodeId> for Graph {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        self.get(id).expect("Indexing into an empty node")
    }
}

impl fmt::Debug for Graph {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut map = f.debug_map();

        for (index, slot) in self.nodes.iter().enumerate() {
            if let Some(node) = slot {
                map.entry(&index, node);
            }
        }

        map.finish()
    }
}
