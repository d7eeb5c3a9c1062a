//! Shared fixtures for the skeleton integration tests.
#![allow(dead_code)]

use std::collections::BTreeSet;

use itertools::Itertools;
use skelmerge::domain::{NodeIndex, NodeTree, SourceBone, SourceNode};
use skelmerge::util::testing;

pub fn unit(_: &str) -> Option<()> {
    Some(())
}

pub fn leaf(name: &str) -> SourceBone {
    SourceBone::new(name)
}

pub fn bone(name: &str, children: Vec<SourceBone>) -> SourceBone {
    SourceBone::with_children(name, children)
}

/// a(b(d), c(e, f(g(h))))
pub fn complex_tree_1() -> Vec<SourceBone> {
    vec![bone(
        "a",
        vec![
            bone("b", vec![leaf("d")]),
            bone(
                "c",
                vec![leaf("e"), bone("f", vec![bone("g", vec![leaf("h")])])],
            ),
        ],
    )]
}

/// a(b(c, d), e); f(g, h(i))
pub fn complex_tree_2() -> Vec<SourceBone> {
    vec![
        bone("a", vec![bone("b", vec![leaf("c"), leaf("d")]), leaf("e")]),
        bone("f", vec![leaf("g"), bone("h", vec![leaf("i")])]),
    ]
}

/// Merges `roots` in order into a fresh tree, failing the test on rejection.
pub fn merged(roots: &[SourceBone]) -> NodeTree<()> {
    testing::init_test_setup();
    let mut tree = NodeTree::new();
    for root in roots {
        tree.try_merge_subtree(root, &unit)
            .unwrap_or_else(|e| panic!("merge of '{}' rejected: {e}", root.identifier()));
    }
    tree
}

/// Canonical form of a source hierarchy; children are sorted so that
/// sibling order does not matter.
pub fn source_shape(bone: &SourceBone) -> String {
    if bone.children.is_empty() {
        return bone.name.clone();
    }
    let children = bone.children.iter().map(source_shape).sorted().join(",");
    format!("{}({})", bone.name, children)
}

/// Canonical form of the merged hierarchy below `index`.
pub fn tree_shape<H>(tree: &NodeTree<H>, index: NodeIndex) -> String {
    let node = tree.node(index);
    if node.children().is_empty() {
        return node.identifier().to_string();
    }
    let children = node
        .children()
        .iter()
        .map(|&child| tree_shape(tree, child))
        .sorted()
        .join(",");
    format!("{}({})", node.identifier(), children)
}

pub fn forest_shape<H>(tree: &NodeTree<H>) -> BTreeSet<String> {
    tree.roots().map(|root| tree_shape(tree, root)).collect()
}

/// Checks that `tree` holds exactly the hierarchies `expected_roots`.
pub fn assert_forest<H>(tree: &NodeTree<H>, expected_roots: &[&SourceBone]) {
    let identifiers: Vec<&str> = expected_roots
        .iter()
        .flat_map(|root| root.walk())
        .map(|bone| bone.identifier())
        .collect();

    assert_eq!(tree.root_count(), expected_roots.len(), "root count");
    assert_eq!(tree.node_count(), identifiers.len(), "node count");

    let mut positions = BTreeSet::new();
    for identifier in &identifiers {
        let index = tree
            .node_index(identifier)
            .unwrap_or_else(|| panic!("'{identifier}' not found"));
        assert_eq!(tree.node(index).identifier(), *identifier);
        positions.insert(index.position());
    }
    assert_eq!(positions.len(), identifiers.len(), "lookup is not one to one");

    for root in expected_roots {
        let index = tree.node_index(root.identifier()).unwrap();
        assert!(tree.node(index).is_root(), "'{}' has a parent", root.name);
    }
    let expected: BTreeSet<String> = expected_roots.iter().map(|r| source_shape(r)).collect();
    assert_eq!(forest_shape(tree), expected);
    assert_eq!(tree.verify(), Ok(()));
}

/// Identifiers along a path of node indices.
pub fn names<'a, H>(tree: &'a NodeTree<H>, path: &[NodeIndex]) -> Vec<&'a str> {
    path.iter().map(|&index| tree.node(index).identifier()).collect()
}
