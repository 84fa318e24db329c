use super::{BPlusTree, Node, NodeId};
use crate::error::{Error, Result};
use std::fmt::Debug;

struct Walk {
    leaf_depth: Option<usize>,
    leaves: Vec<NodeId>,
    entries: usize,
    nodes: usize,
}

fn corrupted<T>(msg: String) -> Result<T> {
    Err(Error::Corrupted(msg))
}

impl<K: Ord + Clone + Debug, V> BPlusTree<K, V> {
    /// Walks the whole node graph and reports the first broken structural
    /// invariant: parent links, child counts, key order and separator bounds,
    /// fill limits, equal leaf depth, the leaf chain, and the entry count.
    pub fn check_invariants(&self) -> Result<()> {
        let mut walk = Walk {
            leaf_depth: None,
            leaves: Vec::new(),
            entries: 0,
            nodes: 0,
        };

        let root = self.arena.try_get(self.root);
        if let Some(Node::Interior(interior)) = root {
            if interior.keys.is_empty() {
                return corrupted(format!("internal root {} has no keys", self.root));
            }
        }

        self.check_node(self.root, None, None, None, 1, &mut walk)?;

        if walk.entries != self.len {
            return corrupted(format!(
                "tree reports {} entries but leaves hold {}",
                self.len, walk.entries
            ));
        }
        if walk.nodes != self.arena.len() {
            return corrupted(format!(
                "{} nodes reachable from the root but {} allocated",
                walk.nodes,
                self.arena.len()
            ));
        }

        self.check_leaf_chain(&walk.leaves)
    }

    fn check_node(
        &self,
        id: NodeId,
        parent: Option<NodeId>,
        lower: Option<&K>,
        upper: Option<&K>,
        depth: usize,
        walk: &mut Walk,
    ) -> Result<()> {
        let Some(node) = self.arena.try_get(id) else {
            return corrupted(format!("dangling node handle {}", id));
        };
        walk.nodes += 1;

        if node.parent() != parent {
            return corrupted(format!(
                "node {} points at parent {:?}, expected {:?}",
                id,
                node.parent(),
                parent
            ));
        }

        let keys = node.keys();
        if keys.len() > self.policy.max_keys() {
            return corrupted(format!("node {} overflows with {} keys", id, keys.len()));
        }
        if id != self.root && keys.len() < self.policy.min_keys() {
            return corrupted(format!("node {} underflows with {} keys", id, keys.len()));
        }
        if let Some(pair) = keys.windows(2).find(|pair| pair[0] >= pair[1]) {
            return corrupted(format!("node {} keys out of order: {:?}", id, pair));
        }
        if let (Some(lower), Some(first)) = (lower, keys.first()) {
            if first < lower {
                return corrupted(format!("node {} key {:?} below bound {:?}", id, first, lower));
            }
        }
        if let (Some(upper), Some(last)) = (upper, keys.last()) {
            if last >= upper {
                return corrupted(format!("node {} key {:?} not below bound {:?}", id, last, upper));
            }
        }

        match node {
            Node::Leaf(leaf) => {
                if leaf.values.len() != leaf.keys.len() {
                    return corrupted(format!(
                        "leaf {} has {} keys but {} values",
                        id,
                        leaf.keys.len(),
                        leaf.values.len()
                    ));
                }
                match walk.leaf_depth {
                    Some(expected) if expected != depth => {
                        return corrupted(format!(
                            "leaf {} at depth {}, other leaves at depth {}",
                            id, depth, expected
                        ));
                    }
                    Some(_) => {}
                    None => walk.leaf_depth = Some(depth),
                }
                walk.leaves.push(id);
                walk.entries += leaf.keys.len();
            }
            Node::Interior(interior) => {
                if interior.children.len() != interior.keys.len() + 1 {
                    return corrupted(format!(
                        "internal node {} has {} keys but {} children",
                        id,
                        interior.keys.len(),
                        interior.children.len()
                    ));
                }
                for (i, &child) in interior.children.iter().enumerate() {
                    let child_lower = if i == 0 { lower } else { interior.keys.get(i - 1) };
                    let child_upper = interior.keys.get(i).or(upper);
                    self.check_node(child, Some(id), child_lower, child_upper, depth + 1, walk)?;
                }
            }
        }

        Ok(())
    }

    /// The `next` chain from the leftmost leaf must visit exactly the leaves
    /// found by the depth-first walk, in the same order.
    fn check_leaf_chain(&self, leaves: &[NodeId]) -> Result<()> {
        let mut current = leaves.first().copied();
        let mut previous_key: Option<&K> = None;

        for &expected in leaves {
            let Some(id) = current else {
                return corrupted(format!("leaf chain ends before leaf {}", expected));
            };
            if id != expected {
                return corrupted(format!("leaf chain reaches {} where {} was expected", id, expected));
            }
            let Some(leaf) = self.arena.get(id).as_leaf() else {
                return corrupted(format!("leaf chain enters internal node {}", id));
            };
            for key in &leaf.keys {
                if previous_key.is_some_and(|prev| prev >= key) {
                    return corrupted(format!("leaf chain not ascending at {:?}", key));
                }
                previous_key = Some(key);
            }
            current = leaf.next;
        }

        if let Some(extra) = current {
            return corrupted(format!("rightmost leaf links on to {}", extra));
        }
        Ok(())
    }
}
