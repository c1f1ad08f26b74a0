//! Tests for node insertion, branch uniqueness and detachment

use rstest::{fixture, rstest};

use settree::util::testing;
use settree::{NodeId, SetTree, TreeError};

#[ctor::ctor]
fn init() {
    testing::init_test_setup();
}

/// ```text
///        1
///       / \
///      2   3
///     /   / \
///    4   5   7
/// ```
struct Sample {
    tree: SetTree<i32>,
    n1: NodeId,
    n2: NodeId,
    n3: NodeId,
    n4: NodeId,
    n5: NodeId,
    n7: NodeId,
}

#[fixture]
fn sample() -> Sample {
    let mut tree = SetTree::new(1);
    let n1 = tree.root();
    let n2 = tree.add_child(n1, 2).unwrap();
    let n3 = tree.add_child(n1, 3).unwrap();
    let n4 = tree.add_child(n2, 4).unwrap();
    let n5 = tree.add_child(n3, 5).unwrap();
    let n7 = tree.add_child(n3, 7).unwrap();
    Sample {
        tree,
        n1,
        n2,
        n3,
        n4,
        n5,
        n7,
    }
}

// ============================================================
// Insertion
// ============================================================

#[rstest]
fn given_tree_when_adding_children_then_keeps_insertion_order(sample: Sample) {
    assert_eq!(sample.tree.children(sample.n1), &[sample.n2, sample.n3]);
    assert_eq!(sample.tree.children(sample.n3), &[sample.n5, sample.n7]);
    assert_eq!(sample.tree.parent(sample.n7), Some(sample.n3));
    assert_eq!(sample.tree.len(), 6);
}

#[rstest]
#[case::own_value(4, 4)]
#[case::parent_value(4, 2)]
#[case::root_value(4, 1)]
#[case::root_on_itself(1, 1)]
fn given_value_on_branch_when_adding_child_then_duplicate_error(
    sample: Sample,
    #[case] at: i32,
    #[case] value: i32,
) {
    let Sample { mut tree, .. } = sample;
    let node = tree
        .iter_preorder(tree.root())
        .find(|(_, n)| n.value == at)
        .map(|(id, _)| id)
        .unwrap();
    let before = tree.display(tree.root()).to_string();

    let result = tree.add_child(node, value);

    match result {
        Err(TreeError::DuplicateValue { node: conflict, value: rendered }) => {
            assert_eq!(tree.value(conflict), Some(&value));
            assert_eq!(rendered, value.to_string());
        }
        other => panic!("expected duplicate error, got {:?}", other),
    }
    assert_eq!(tree.display(tree.root()).to_string(), before);
    assert_eq!(tree.len(), 6);
}

#[rstest]
#[case::sibling_of_parent(4, 3)]
#[case::cousin(4, 5)]
#[case::sibling(3, 5)]
#[case::nephew(2, 7)]
fn given_value_outside_branch_when_adding_child_then_succeeds(
    sample: Sample,
    #[case] at: i32,
    #[case] value: i32,
) {
    let Sample { mut tree, .. } = sample;
    let node = tree
        .iter_preorder(tree.root())
        .find(|(_, n)| n.value == at)
        .map(|(id, _)| id)
        .unwrap();

    let child = tree.add_child(node, value).unwrap();

    assert_eq!(tree.parent(child), Some(node));
    assert_eq!(tree.children(node).last(), Some(&child));
}

#[test]
fn given_duplicate_error_when_formatting_then_names_value() {
    let mut tree = SetTree::new("a");
    let root = tree.root();
    let b = tree.add_child(root, "b").unwrap();

    let err = tree.add_child(b, "a").unwrap_err();

    assert_eq!(
        err.to_string(),
        "Node with value '\"a\"' already exists in this branch"
    );
}

#[test]
fn given_returned_child_when_chaining_then_builds_deep_branch() {
    let mut tree = SetTree::new(0);
    let mut cursor = tree.root();
    for value in 1..50 {
        cursor = tree.add_child(cursor, value).unwrap();
    }

    assert_eq!(tree.depth(cursor), 49);
    assert_eq!(tree.height(tree.root()), 50);
    assert!(tree.add_child(cursor, 25).is_err());
}

// ============================================================
// Navigation
// ============================================================

#[rstest]
fn given_any_node_when_finding_root_then_terminates_within_depth(sample: Sample) {
    for id in [sample.n1, sample.n2, sample.n3, sample.n4, sample.n5, sample.n7] {
        let steps = sample.tree.ancestors(id).count();
        assert_eq!(steps, sample.tree.depth(id));
        assert_eq!(sample.tree.find_root(id), sample.n1);
    }
}

#[rstest]
fn given_leaf_when_walking_ancestors_then_nearest_first(sample: Sample) {
    let chain: Vec<i32> = sample
        .tree
        .ancestors(sample.n5)
        .map(|(_, node)| node.value)
        .collect();
    assert_eq!(chain, vec![3, 1]);
}

#[rstest]
fn given_values_when_checking_ancestors_then_excludes_self(sample: Sample) {
    assert_eq!(sample.tree.ancestor_contains(sample.n7, &3), Some(sample.n3));
    assert_eq!(sample.tree.ancestor_contains(sample.n7, &7), None);
    assert_eq!(sample.tree.ancestor_contains(sample.n7, &5), None);
    assert_eq!(sample.tree.ancestor_contains(sample.n1, &1), None);
}

// ============================================================
// Detachment
// ============================================================

#[rstest]
fn given_child_when_removing_then_subtree_becomes_parentless(sample: Sample) {
    let Sample {
        mut tree, n1, n3, n5, n7, ..
    } = sample;

    assert!(tree.remove(n1, n3));

    assert_eq!(tree.parent(n3), None);
    assert_eq!(tree.find_root(n7), n3);
    assert_eq!(tree.children(n3), &[n5, n7]);
    assert_eq!(tree.display(n1).to_string(), "1 -> [2 -> [4 -> []]]");
}

#[rstest]
fn given_non_child_when_removing_then_nothing_changes(sample: Sample) {
    let Sample {
        mut tree, n1, n2, n5, ..
    } = sample;

    assert!(!tree.remove(n2, n5));
    assert!(!tree.remove(n1, n1));
    assert_eq!(tree.parent(n5).map(|p| tree.value(p)), Some(Some(&3)));
}

#[rstest]
fn given_detached_node_when_adding_former_ancestor_value_then_allowed(sample: Sample) {
    let Sample {
        mut tree, n1, n3, ..
    } = sample;
    tree.remove(n1, n3);

    assert!(tree.add_child(n3, 1).is_ok());
}

#[rstest]
fn given_predicate_when_removing_where_then_detaches_matches(sample: Sample) {
    let Sample {
        mut tree, n3, n5, n7, ..
    } = sample;
    tree.add_child(n3, 9).unwrap();

    let removed = tree.remove_where(n3, |value| value % 2 == 1 && *value > 5);

    assert_eq!(removed.len(), 2);
    assert_eq!(removed[0], n7);
    assert_eq!(tree.children(n3), &[n5]);
    assert!(removed.iter().all(|&id| tree.parent(id).is_none()));
}

#[rstest]
fn given_detached_subtree_when_releasing_then_frees_all_nodes(sample: Sample) {
    let Sample {
        mut tree, n1, n3, n5, ..
    } = sample;
    tree.remove(n1, n3);

    assert_eq!(tree.release(n3), Ok(3));

    assert_eq!(tree.len(), 3);
    assert!(!tree.contains(n5));
    assert_eq!(tree.release(n3), Err(TreeError::NodeNotFound(n3)));
}

#[rstest]
fn given_attached_node_when_releasing_then_refuses(sample: Sample) {
    let Sample {
        mut tree, n1, n4, ..
    } = sample;

    assert_eq!(tree.release(n4), Err(TreeError::NotReleasable(n4)));
    assert_eq!(tree.release(n1), Err(TreeError::NotReleasable(n1)));
    assert_eq!(tree.len(), 6);
}

#[test]
fn given_extra_root_when_adding_then_independent_tree() {
    let mut tree = SetTree::new(1);
    let other = tree.add_root(1);
    let child = tree.add_child(other, 2).unwrap();

    assert_eq!(tree.find_root(child), other);
    assert!(tree.children(tree.root()).is_empty());
    assert_eq!(tree.release(other), Ok(1));
}
