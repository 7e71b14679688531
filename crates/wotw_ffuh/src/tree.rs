//! Huffman decode tree built from a [`FrequencyTable`].

use std::cmp::{Ordering, Reverse};
use std::collections::{BTreeMap, BinaryHeap};

use tracing::trace;

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;

/// A node of the decode tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// Emits one byte value
    Leaf(u8),

    /// Branches on the next bit: `0` goes left, `1` goes right
    Internal {
        /// Child for a `0` bit
        left: Box<Node>,
        /// Child for a `1` bit
        right: Box<Node>,
    },

    /// Unreachable placeholder completing a single symbol tree
    Vacant,
}

impl Node {
    /// The child selected by `bit`, if this node branches
    #[inline]
    pub fn child(&self, bit: bool) -> Option<&Node> {
        match self {
            Node::Internal { left, right } => Some(if bit { &**right } else { &**left }),
            _ => None,
        }
    }

    fn depth(&self) -> usize {
        match self {
            Node::Internal { left, right } => 1 + left.depth().max(right.depth()),
            _ => 0,
        }
    }

    fn is_full(&self) -> bool {
        match self {
            Node::Leaf(_) => true,
            Node::Vacant => false,
            Node::Internal { left, right } => left.is_full() && right.is_full(),
        }
    }
}

/// Queue entry ordered by weight, then by the order it was queued in
struct Pending {
    weight: u64,
    sequence: u64,
    node: Node,
}

impl Pending {
    fn key(&self) -> (u64, u64) {
        (self.weight, self.sequence)
    }
}

impl PartialEq for Pending {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Pending {}

impl PartialOrd for Pending {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Pending {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

#[derive(Default)]
struct MergeQueue {
    heap: BinaryHeap<Reverse<Pending>>,
    sequence: u64,
}

impl MergeQueue {
    fn push(&mut self, weight: u64, node: Node) {
        self.heap.push(Reverse(Pending {
            weight,
            sequence: self.sequence,
            node,
        }));
        self.sequence += 1;
    }

    fn pop(&mut self) -> Option<Pending> {
        self.heap.pop().map(|Reverse(pending)| pending)
    }
}

/// Binary decode tree mapping bit sequences to byte values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree {
    root: Node,
    leaves: usize,
}

impl HuffmanTree {
    /// Build the tree by repeatedly merging the two lightest nodes.
    ///
    /// The first node taken becomes the left child. Ties go to the node queued first, leaves being
    /// queued in ascending symbol order and merged nodes after them as they are created.
    pub fn from_frequencies(table: &FrequencyTable) -> Result<Self> {
        let mut queue = MergeQueue::default();
        for (symbol, count) in table.iter() {
            queue.push(count as u64, Node::Leaf(symbol));
        }

        if table.len() == 1 {
            let only = queue.pop().ok_or_else(Self::no_symbols)?;
            return Ok(Self {
                root: Node::Internal {
                    left: Box::new(only.node),
                    right: Box::new(Node::Vacant),
                },
                leaves: 1,
            });
        }

        let root = loop {
            match (queue.pop(), queue.pop()) {
                (Some(left), Some(right)) => {
                    trace!(left = left.weight, right = right.weight, "merge");
                    queue.push(
                        left.weight + right.weight,
                        Node::Internal {
                            left: Box::new(left.node),
                            right: Box::new(right.node),
                        },
                    );
                }
                (Some(last), None) => break last.node,
                _ => return Err(Self::no_symbols()),
            }
        };

        Ok(Self {
            root,
            leaves: table.len(),
        })
    }

    /// Read a frequency table region and build its tree
    pub fn from_bytes(region: &[u8]) -> Result<Self> {
        Self::from_frequencies(&FrequencyTable::from_bytes(region)?)
    }

    /// The root node, where every code starts
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Number of symbols the tree can emit
    pub fn leaf_count(&self) -> usize {
        self.leaves
    }

    /// Length of the longest code
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Whether every branch has two real children.
    ///
    /// False only for a single symbol tree, whose second branch is a placeholder.
    pub fn is_full(&self) -> bool {
        self.root.is_full()
    }

    /// The bit path, root first, leading to each symbol
    pub fn codes(&self) -> BTreeMap<u8, Vec<bool>> {
        let mut codes = BTreeMap::new();
        let mut stack = vec![(&self.root, Vec::new())];

        while let Some((node, path)) = stack.pop() {
            match node {
                Node::Leaf(symbol) => {
                    codes.insert(*symbol, path);
                }
                Node::Internal { left, right } => {
                    let mut right_path = path.clone();
                    right_path.push(true);
                    stack.push((&**right, right_path));

                    let mut left_path = path;
                    left_path.push(false);
                    stack.push((&**left, left_path));
                }
                Node::Vacant => {}
            }
        }

        codes
    }

    fn no_symbols() -> Error {
        Error::MalformedFrequencyTable("no symbols to build a tree from".into())
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeMap;

    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::frequency::FrequencyTable;
    use crate::tree::{HuffmanTree, Node};

    fn code(bits: &str) -> Vec<bool> {
        bits.chars().map(|c| c == '1').collect()
    }

    #[test]
    fn three_symbols() -> Result<()> {
        let table = FrequencyTable::from_counts(&[2, 1, 1])?;
        let tree = HuffmanTree::from_frequencies(&table)?;

        assert_eq!(tree.leaf_count(), 3);
        assert!(tree.is_full());
        assert_eq!(tree.depth(), 2);
        assert_eq!(
            tree.codes(),
            BTreeMap::from([(0, code("0")), (1, code("10")), (2, code("11"))])
        );

        Ok(())
    }

    #[test]
    fn ties_leave_in_queue_order() -> Result<()> {
        let table = FrequencyTable::from_counts(&[4, 2, 1, 1])?;
        let tree = HuffmanTree::from_frequencies(&table)?;

        assert_eq!(
            tree.codes(),
            BTreeMap::from([
                (0, code("0")),
                (1, code("10")),
                (2, code("110")),
                (3, code("111")),
            ])
        );

        Ok(())
    }

    #[test]
    fn equal_weights_build_a_balanced_tree() -> Result<()> {
        let table = FrequencyTable::from_counts(&[1, 1, 1, 1])?;
        let tree = HuffmanTree::from_frequencies(&table)?;

        assert_eq!(
            tree.codes(),
            BTreeMap::from([
                (0, code("00")),
                (1, code("01")),
                (2, code("10")),
                (3, code("11")),
            ])
        );

        Ok(())
    }

    #[test]
    fn single_symbol_gets_a_one_bit_code() -> Result<()> {
        let mut counts = vec![0u32; 64];
        counts[0x2A] = 17;
        let tree = HuffmanTree::from_frequencies(&FrequencyTable::from_counts(&counts)?)?;

        assert_eq!(tree.leaf_count(), 1);
        assert_eq!(tree.depth(), 1);
        assert!(!tree.is_full());
        assert_eq!(tree.codes(), BTreeMap::from([(0x2A, code("0"))]));
        assert_eq!(tree.root().child(false), Some(&Node::Leaf(0x2A)));
        assert_eq!(tree.root().child(true), Some(&Node::Vacant));

        Ok(())
    }

    #[test]
    fn leaf_count_matches_symbols() -> Result<()> {
        let tables: Vec<Vec<u32>> = vec![
            vec![1, 0, 1],
            (1..=256).collect(),
            (0..256).map(|i| if i % 3 == 0 { i * 7 + 1 } else { 0 }).collect(),
            (0..256).map(|i| 1 << (i % 20)).collect(),
            vec![u32::MAX; 256],
        ];

        for counts in tables {
            let table = FrequencyTable::from_counts(&counts)?;
            let tree = HuffmanTree::from_frequencies(&table)?;

            assert_eq!(tree.leaf_count(), table.len());
            assert_eq!(tree.codes().len(), table.len());
            assert!(tree.is_full());
            assert!(tree.depth() < table.len());

            // Prefix free: no code is the start of another
            let codes: Vec<Vec<bool>> = tree.codes().into_values().collect();
            for (i, a) in codes.iter().enumerate() {
                for b in codes.iter().skip(i + 1) {
                    assert!(!a.starts_with(b) && !b.starts_with(a));
                }
            }
        }

        Ok(())
    }

    #[test]
    fn from_region() -> Result<()> {
        #[rustfmt::skip]
        let region = [
            0x02, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
            0x01, 0x00, 0x00, 0x00,
        ];

        let tree = HuffmanTree::from_bytes(&region)?;
        assert_eq!(tree.leaf_count(), 3);

        Ok(())
    }
}
