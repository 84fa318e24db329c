use plustree_core::{BPlusTree, Error, NodeRef, TreeConfig};
use proptest::prelude::*;
use std::collections::{BTreeSet, VecDeque};

fn build(order: usize, keys: impl IntoIterator<Item = i32>) -> BPlusTree<i32, String> {
    let mut tree = BPlusTree::new(order).unwrap();
    for key in keys {
        tree.insert(key, format!("v{}", key));
    }
    tree
}

fn leaf_chain_keys(tree: &BPlusTree<i32, String>) -> Vec<i32> {
    tree.leaves().flat_map(|leaf| leaf.keys().iter().copied()).collect()
}

/// Every node reachable from the root, breadth first, rebuilt purely from
/// the read-only view.
fn all_nodes(tree: &BPlusTree<i32, String>) -> Vec<NodeRef<'_, i32, String>> {
    let mut nodes = Vec::new();
    let mut queue = VecDeque::from([tree.root()]);
    while let Some(node) = queue.pop_front() {
        if let Some(children) = node.children() {
            for &child in children {
                queue.push_back(tree.node(child).unwrap());
            }
        }
        nodes.push(node);
    }
    nodes
}

fn assert_fill(tree: &BPlusTree<i32, String>) {
    let max = tree.order() - 1;
    let min = tree.order().div_ceil(2) - 1;
    let root = tree.root().id();
    for node in all_nodes(tree) {
        assert!(node.keys().len() <= max, "node {} overflows: {:?}", node.id(), node.keys());
        if node.id() != root {
            assert!(node.keys().len() >= min, "node {} underflows: {:?}", node.id(), node.keys());
        }
    }
}

#[test]
fn test_invalid_order_is_rejected() {
    for order in 0..3 {
        assert_eq!(
            BPlusTree::<i32, i32>::new(order).unwrap_err(),
            Error::InvalidOrder { order }
        );
    }
    assert!(BPlusTree::<i32, i32>::with_config(TreeConfig::new(3)).is_ok());
}

#[test]
fn test_minimum_order_inserts() {
    let mut tree = BPlusTree::new(3).unwrap();
    let mut max_height = 1;

    for key in [10, 20, 5, 6, 12, 30, 7, 17] {
        tree.insert(key, key.to_string());
        tree.check_invariants().unwrap();

        let root = tree.root().id();
        for node in all_nodes(&tree) {
            assert!(node.keys().len() <= 2);
            if node.id() != root {
                assert!(!node.keys().is_empty());
            }
        }
        max_height = max_height.max(tree.height());
    }

    assert!(max_height >= 3, "root should have split at least twice");
    assert_eq!(
        tree.iter().map(|(k, _)| *k).collect::<Vec<_>>(),
        vec![5, 6, 7, 10, 12, 17, 20, 30]
    );
}

#[test]
fn test_minimum_order_shape() {
    let tree = build(3, [10, 20, 5, 6, 12, 30, 7, 17]);

    assert_eq!(
        tree.to_string(),
        "[Internal: 10]\n\
         [Internal: 7] [Internal: 17, 20]\n\
         [Leaf: 5, 6] [Leaf: 7] [Leaf: 10, 12] [Leaf: 17] [Leaf: 20, 30]"
    );
}

#[test]
fn test_underflow_cascade_collapses_root() {
    let mut tree = build(4, 1..=12);
    let start_height = tree.height();
    assert!(start_height >= 3);
    let mut collapsed = false;

    for key in 1..=10 {
        let before = tree.height();
        assert_eq!(tree.delete(&key), Ok(format!("v{}", key)));
        tree.check_invariants().unwrap();
        assert_fill(&tree);
        if tree.height() < before {
            collapsed = true;
        }
    }

    assert!(collapsed, "deleting 1..=10 should shrink the tree");
    assert!(tree.height() < start_height);
    for key in 1..=10 {
        assert!(!tree.search(&key));
    }
    assert!(tree.search(&11));
    assert!(tree.search(&12));
    assert_eq!(leaf_chain_keys(&tree), vec![11, 12]);
}

#[test]
fn test_left_sibling_is_preferred_for_borrowing() {
    // Leaves: [1, 2, 3] [10, 11] [20, 21, 22] under separators [10, 20].
    let mut tree = build(4, [1, 2, 10, 20, 21, 3, 11, 22]);
    let leaves: Vec<Vec<i32>> = tree.leaves().map(|l| l.keys().to_vec()).collect();
    assert_eq!(leaves, vec![vec![1, 2, 3], vec![10, 11], vec![20, 21, 22]]);

    tree.remove(&10).unwrap();
    tree.remove(&11).unwrap();
    tree.check_invariants().unwrap();

    let leaves: Vec<Vec<i32>> = tree.leaves().map(|l| l.keys().to_vec()).collect();
    assert_eq!(leaves, vec![vec![1, 2], vec![3], vec![20, 21, 22]]);
    assert_eq!(tree.root().keys(), &[3, 20]);
}

#[test]
fn test_right_sibling_lends_when_left_cannot() {
    let mut tree = build(4, [1, 2, 10, 20, 21, 3, 11, 22]);
    tree.remove(&1).unwrap();
    // Left leaf [2, 3] can still lend; drain it to the minimum.
    tree.remove(&2).unwrap();
    tree.remove(&10).unwrap();
    tree.remove(&11).unwrap();
    tree.check_invariants().unwrap();

    let leaves: Vec<Vec<i32>> = tree.leaves().map(|l| l.keys().to_vec()).collect();
    assert_eq!(leaves, vec![vec![3], vec![20], vec![21, 22]]);
    assert_eq!(tree.root().keys(), &[10, 21]);
}

#[test]
fn test_leftmost_leaf_merges_with_right_sibling() {
    let mut tree = build(4, [1, 2, 3, 4]);
    assert_eq!(tree.height(), 2);

    tree.remove(&4).unwrap();
    tree.remove(&1).unwrap();
    tree.remove(&2).unwrap();
    tree.check_invariants().unwrap();

    assert_eq!(tree.height(), 1);
    assert!(tree.root().is_leaf());
    assert_eq!(tree.root().keys(), &[3]);
    assert_eq!(tree.root().parent(), None);
    assert_eq!(tree.node_count(), 1);
}

#[test]
fn test_duplicate_insert_keeps_first_value() {
    let mut tree = build(4, 0..20);
    assert!(!tree.insert(7, "replacement".to_string()));
    assert_eq!(tree.get(&7), Some(&"v7".to_string()));
    assert!(tree.search(&7));
    assert_eq!(tree.len(), 20);
    tree.check_invariants().unwrap();
}

#[test]
fn test_missing_delete_leaves_tree_unchanged() {
    let mut tree = build(3, (0..40).step_by(3));
    let before = tree.to_string();
    let nodes = tree.node_count();

    assert_eq!(tree.delete(&1), Err(Error::KeyNotFound));
    assert_eq!(tree.to_string(), before);
    assert_eq!(tree.node_count(), nodes);
}

#[test]
fn test_range_scan_is_restartable() {
    let tree = build(5, 0..100);
    let first: Vec<_> = tree.range_scan(&40).take(5).map(|(k, _)| *k).collect();
    assert_eq!(first, vec![40, 41, 42, 43, 44]);

    let again: Vec<_> = tree.range_scan(&95).map(|(k, v)| (*k, v.clone())).collect();
    assert_eq!(again.len(), 5);
    assert_eq!(again[0], (95, "v95".to_string()));
}

#[test]
fn test_traversal_surface_reconstructs_graph() {
    let tree = build(4, 0..50);
    let nodes = all_nodes(&tree);
    assert_eq!(nodes.len(), tree.node_count());

    for node in &nodes {
        match node.children() {
            Some(children) => {
                assert!(!node.is_leaf());
                assert_eq!(children.len(), node.keys().len() + 1);
                assert!(node.values().is_none());
                for &child in children {
                    assert_eq!(tree.node(child).unwrap().parent(), Some(node.id()));
                }
            }
            None => {
                assert!(node.is_leaf());
                assert_eq!(node.values().unwrap().len(), node.keys().len());
            }
        }
    }

    let chain: Vec<_> = tree.leaves().map(|l| l.id()).collect();
    let by_level: Vec<_> = nodes.iter().filter(|n| n.is_leaf()).map(|n| n.id()).collect();
    assert_eq!(chain, by_level);
}

#[derive(Debug, Clone)]
enum Op {
    Insert(i32),
    Delete(i32),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0i32..300).prop_map(Op::Insert),
        (0i32..300).prop_map(Op::Delete),
    ]
}

proptest! {
    #[test]
    fn prop_invariants_hold_after_every_operation(order in 3usize..9, ops in prop::collection::vec(op(), 1..300)) {
        let mut tree = BPlusTree::new(order).unwrap();
        let mut expected = BTreeSet::new();

        for op in ops {
            match op {
                Op::Insert(k) => {
                    tree.insert(k, k.to_string());
                    expected.insert(k);
                }
                Op::Delete(k) => {
                    prop_assert_eq!(tree.delete(&k).is_ok(), expected.remove(&k));
                }
            }
            prop_assert_eq!(tree.check_invariants(), Ok(()));
        }

        let chain: Vec<i32> = leaf_chain_keys(&tree);
        let sorted: Vec<i32> = expected.iter().copied().collect();
        prop_assert_eq!(chain, sorted);
    }

    #[test]
    fn prop_insert_then_delete_all_restores_empty_tree(
        order in 3usize..9,
        keys in prop::collection::btree_set(0i32..10_000, 0..300),
        seed in any::<u64>(),
    ) {
        let mut tree = build(order, keys.iter().copied());
        prop_assert_eq!(tree.len(), keys.len());

        let mut order_of_removal: Vec<i32> = keys.into_iter().collect();
        let len = order_of_removal.len();
        if len > 1 {
            let mut state = seed;
            for i in (1..len).rev() {
                state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
                order_of_removal.swap(i, (state >> 33) as usize % (i + 1));
            }
        }

        for key in &order_of_removal {
            prop_assert!(tree.remove(key).is_some());
        }

        let empty: BPlusTree<i32, String> = BPlusTree::new(order).unwrap();
        prop_assert!(tree.is_empty());
        prop_assert_eq!(tree.height(), 1);
        prop_assert_eq!(tree.node_count(), 1);
        prop_assert!(tree.root().is_leaf());
        prop_assert!(tree.root().keys().is_empty());
        prop_assert!(tree.root().next().is_none());
        prop_assert_eq!(tree.to_string(), empty.to_string());
    }

    #[test]
    fn prop_duplicate_insert_is_noop(keys in prop::collection::vec(0i32..200, 2..200)) {
        let mut tree = BPlusTree::new(4).unwrap();
        for &k in &keys {
            tree.insert(k, k);
        }
        let snapshot = tree.to_string();
        for &k in &keys {
            prop_assert!(!tree.insert(k, -k));
            prop_assert_eq!(tree.get(&k), Some(&k));
        }
        prop_assert_eq!(tree.to_string(), snapshot);
    }
}
