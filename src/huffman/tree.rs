use super::alphabet::HuffmanAlphabet;
use crate::error::{Error, Result};
use std::cmp::Reverse;
use std::collections::{BTreeMap, BinaryHeap, VecDeque};

type NodeId = usize;

#[derive(Clone, Copy, Debug)]
enum NodeKind {
    Leaf { symbol: usize },
    Internal { left: NodeId, right: NodeId },
}

#[derive(Clone, Debug)]
struct Node {
    weight: u64,
    parent: Option<NodeId>,
    kind: NodeKind,
}

/// Length-limited Huffman tree over a symbol histogram.
///
/// Nodes live in an arena and refer to each other by index, parent links
/// included. After the usual two-lowest merge, the tree is rebalanced one leaf
/// at a time until no leaf sits deeper than `limit`:
///
/// 1. take the first leaf at the maximum depth,
/// 2. let its sibling take the place of their parent,
/// 3. pair the leaf with the first leaf found at depth `max - 2` or shallower.
///
/// Every step keeps the tree full, so the resulting code always satisfies
/// Kraft equality.
#[derive(Clone, Debug)]
pub struct HuffmanTree {
    nodes: Vec<Node>,
    root: NodeId,
    num_symbols: usize,
    /// Leaves at each depth, in breadth-first order
    depths: BTreeMap<usize, Vec<NodeId>>,
    max_depth: usize,
}

impl HuffmanTree {
    /// Build a tree whose codes are at most `limit` bits long.
    ///
    /// Fewer than two used symbols are padded with dummy one-bit codes so a
    /// valid code always exists.
    pub fn new(frequencies: &[u32], limit: u8) -> Result<Self> {
        let mut tree = Self {
            nodes: Vec::with_capacity(frequencies.len() * 2 + 2),
            root: 0,
            num_symbols: frequencies.len(),
            depths: BTreeMap::new(),
            max_depth: 0,
        };
        tree.root = tree.build(frequencies);
        tree.build_depths();

        while tree.max_depth > limit as usize {
            tree.rebalance(limit)?;
        }

        Ok(tree)
    }

    /// Deepest leaf
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Code length per symbol (0 for symbols without a leaf)
    pub fn code_lengths(&self) -> Vec<u8> {
        let mut lengths = vec![0u8; self.num_symbols];
        for (&depth, leaves) in &self.depths {
            for &leaf in leaves {
                if let NodeKind::Leaf { symbol } = self.nodes[leaf].kind {
                    if let Some(slot) = lengths.get_mut(symbol) {
                        *slot = depth as u8;
                    }
                }
            }
        }
        lengths
    }

    /// Canonical LSB-first code for this tree
    pub fn to_alphabet(&self) -> Result<HuffmanAlphabet> {
        HuffmanAlphabet::from_lengths(&self.code_lengths())
    }

    fn push_leaf(&mut self, symbol: usize, weight: u64) -> NodeId {
        self.nodes.push(Node { weight, parent: None, kind: NodeKind::Leaf { symbol } });
        self.nodes.len() - 1
    }

    fn push_internal(&mut self, left: NodeId, right: NodeId) -> NodeId {
        let id = self.nodes.len();
        let weight = self.nodes[left].weight + self.nodes[right].weight;
        self.nodes.push(Node { weight, parent: None, kind: NodeKind::Internal { left, right } });
        self.nodes[left].parent = Some(id);
        self.nodes[right].parent = Some(id);
        id
    }

    /// Standard merge of the two lightest nodes; ties go to the older node
    fn build(&mut self, frequencies: &[u32]) -> NodeId {
        let mut heap: BinaryHeap<Reverse<(u64, NodeId)>> = BinaryHeap::new();
        for (symbol, &freq) in frequencies.iter().enumerate() {
            if freq > 0 {
                let id = self.push_leaf(symbol, freq as u64);
                heap.push(Reverse((freq as u64, id)));
            }
        }

        // Ensure at least two leaves
        let n = self.num_symbols;
        match heap.len() {
            0 => {
                let a = self.push_leaf(0, 1);
                let b = self.push_leaf(if n > 1 { 1 } else { 0 }, 1);
                heap.push(Reverse((1, a)));
                heap.push(Reverse((1, b)));
            }
            1 => {
                let s0 = heap
                    .peek()
                    .map(|&Reverse((_, id))| match self.nodes[id].kind {
                        NodeKind::Leaf { symbol } => symbol,
                        NodeKind::Internal { .. } => 0,
                    })
                    .unwrap_or(0);
                let s1 = if n > 1 {
                    if s0 != 0 {
                        0
                    } else {
                        1
                    }
                } else {
                    s0
                };
                let id = self.push_leaf(s1, 1);
                heap.push(Reverse((1, id)));
            }
            _ => {}
        }

        while heap.len() > 1 {
            let (Some(Reverse((_, left))), Some(Reverse((_, right)))) = (heap.pop(), heap.pop())
            else {
                break;
            };
            let id = self.push_internal(left, right);
            heap.push(Reverse((self.nodes[id].weight, id)));
        }

        heap.pop().map(|Reverse((_, id))| id).unwrap_or(0)
    }

    /// Breadth-first walk recording the depth of every leaf
    fn build_depths(&mut self) {
        self.depths.clear();
        self.max_depth = 0;

        let mut queue = VecDeque::new();
        queue.push_back((self.root, 0usize));

        while let Some((id, depth)) = queue.pop_front() {
            match self.nodes[id].kind {
                NodeKind::Internal { left, right } => {
                    queue.push_back((left, depth + 1));
                    queue.push_back((right, depth + 1));
                }
                NodeKind::Leaf { .. } => {
                    self.depths.entry(depth).or_default().push(id);
                    self.max_depth = self.max_depth.max(depth);
                }
            }
        }
    }

    fn other_child(&self, parent: NodeId, child: NodeId) -> Option<NodeId> {
        match self.nodes[parent].kind {
            NodeKind::Internal { left, right } if left == child => Some(right),
            NodeKind::Internal { left, right } if right == child => Some(left),
            _ => None,
        }
    }

    /// Put `new` where `old` hangs under `parent`
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if let NodeKind::Internal { left, right } = &mut self.nodes[parent].kind {
            if *left == old {
                *left = new;
            } else if *right == old {
                *right = new;
            }
        }
        self.nodes[new].parent = Some(parent);
    }

    /// Move one deepest leaf up the tree
    fn rebalance(&mut self, limit: u8) -> Result<()> {
        let depth = self.max_depth;
        let stuck = Error::CodeLengthLimit { limit, depth: depth.saturating_sub(1) };

        let Some(selected) = self.depths.get(&depth).and_then(|l| l.first().copied()) else {
            return Err(stuck);
        };
        let Some(parent) = self.nodes[selected].parent else {
            return Err(stuck);
        };
        let (Some(sibling), Some(grandparent)) =
            (self.other_child(parent, selected), self.nodes[parent].parent)
        else {
            return Err(stuck);
        };

        // Sibling takes the parent's place
        self.replace_child(grandparent, parent, sibling);

        // Pair the selected leaf with the first leaf at depth - 2 or above
        let target = (1..=depth.saturating_sub(2))
            .rev()
            .find_map(|d| self.depths.get(&d).and_then(|l| l.first().copied()));
        let Some(leaf) = target else {
            return Err(stuck);
        };
        let Some(leaf_parent) = self.nodes[leaf].parent else {
            return Err(stuck);
        };

        let joint = self.push_internal(selected, leaf);
        self.replace_child(leaf_parent, leaf, joint);

        log::trace!(
            "huffman rebalance: leaf moved from depth {} next to a leaf at depth {}",
            depth,
            self.depths.iter().find(|(_, l)| l.contains(&leaf)).map(|(&d, _)| d).unwrap_or(0)
        );

        self.build_depths();
        Ok(())
    }
}

/// Build a length-limited canonical alphabet straight from a histogram
pub fn build_alphabet(frequencies: &[u32], limit: u8) -> Result<HuffmanAlphabet> {
    HuffmanTree::new(frequencies, limit)?.to_alphabet()
}
