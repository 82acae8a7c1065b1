//! Path extraction over the canonical `while (x < y) { if (x == 100) {
//! print(x) } }` fixture: exact path lists, order included.

use treepath_core::kind::kind_of_shadow;
use treepath_core::paths::{leaf_paths, path_kinds, root_path};
use treepath_core::shadow::ShadowTree;
use treepath_core::testing::scenario_tree;
use treepath_core::ShadowId;

fn find_kind(
    tree: &treepath_core::SourceTree,
    shadow: &ShadowTree,
    kind: &str,
) -> ShadowId {
    shadow
        .ids()
        .find(|&id| kind_of_shadow(tree, shadow, id) == kind)
        .unwrap_or_else(|| panic!("fixture has no {kind}"))
}

#[test]
fn root_paths_of_references() {
    let tree = scenario_tree();
    let shadow = ShadowTree::build(&tree);

    let loop_prefix = vec!["FILE", "CLASS", "CLASS_BODY", "FUN", "BLOCK", "WHILE"];
    let cond = vec!["CONDITION", "BINARY_EXPRESSION"];

    let x = find_kind(&tree, &shadow, "REFERENCE_EXPRESSION x");
    let mut expected: Vec<String> = loop_prefix.iter().chain(cond.iter()).map(|s| s.to_string()).collect();
    expected.push("REFERENCE_EXPRESSION x".to_string());
    assert_eq!(
        path_kinds(&tree, &shadow, &root_path(&shadow, x)),
        expected
    );

    let print = find_kind(&tree, &shadow, "REFERENCE_EXPRESSION print");
    let expected_print: Vec<String> = loop_prefix
        .iter()
        .copied()
        .chain(["BODY", "BLOCK", "IF", "THEN", "BLOCK", "CALL_EXPRESSION"])
        .map(str::to_string)
        .chain(["REFERENCE_EXPRESSION print".to_string()])
        .collect();
    assert_eq!(
        path_kinds(&tree, &shadow, &root_path(&shadow, print)),
        expected_print
    );
}

#[test]
fn all_leaf_paths_converge_at_the_if() {
    let tree = scenario_tree();
    let shadow = ShadowTree::build(&tree);
    let if_node = find_kind(&tree, &shadow, "IF");

    let actual: Vec<Vec<String>> = leaf_paths(&shadow, if_node, 0, false)
        .iter()
        .map(|path| path_kinds(&tree, &shadow, path))
        .collect();

    let from_while = ["WHILE", "BODY", "BLOCK", "IF"];
    let expected: Vec<Vec<&str>> = vec![
        vec!["REFERENCE_EXPRESSION x", "BINARY_EXPRESSION", "CONDITION", "IF"],
        vec!["OPERATION_REFERENCE ==", "BINARY_EXPRESSION", "CONDITION", "IF"],
        vec!["INTEGER_CONSTANT 100", "BINARY_EXPRESSION", "CONDITION", "IF"],
        vec!["REFERENCE_EXPRESSION print", "CALL_EXPRESSION", "BLOCK", "THEN", "IF"],
        vec![
            "REFERENCE_EXPRESSION x",
            "VALUE_ARGUMENT",
            "VALUE_ARGUMENT_LIST",
            "CALL_EXPRESSION",
            "BLOCK",
            "THEN",
            "IF",
        ],
        ["REFERENCE_EXPRESSION x", "BINARY_EXPRESSION", "CONDITION"]
            .iter()
            .copied()
            .chain(from_while)
            .collect(),
        ["OPERATION_REFERENCE <", "BINARY_EXPRESSION", "CONDITION"]
            .iter()
            .copied()
            .chain(from_while)
            .collect(),
        ["REFERENCE_EXPRESSION y", "BINARY_EXPRESSION", "CONDITION"]
            .iter()
            .copied()
            .chain(from_while)
            .collect(),
        ["VALUE_PARAMETER_LIST", "FUN", "BLOCK"]
            .iter()
            .copied()
            .chain(from_while)
            .collect(),
        ["PACKAGE_DIRECTIVE", "FILE", "CLASS", "CLASS_BODY", "FUN", "BLOCK"]
            .iter()
            .copied()
            .chain(from_while)
            .collect(),
        ["IMPORT_LIST", "FILE", "CLASS", "CLASS_BODY", "FUN", "BLOCK"]
            .iter()
            .copied()
            .chain(from_while)
            .collect(),
    ];

    let expected: Vec<Vec<String>> = expected
        .into_iter()
        .map(|path| path.into_iter().map(str::to_string).collect())
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn dropping_successors_hides_the_ifs_own_subtree() {
    let tree = scenario_tree();
    let shadow = ShadowTree::build(&tree);
    let if_node = find_kind(&tree, &shadow, "IF");

    let actual: Vec<Vec<String>> = leaf_paths(&shadow, if_node, 0, true)
        .iter()
        .map(|path| path_kinds(&tree, &shadow, path))
        .collect();

    // Only paths entering the IF from outside remain.
    assert_eq!(actual.len(), 6);
    assert!(actual
        .iter()
        .all(|path| path.contains(&"WHILE".to_string()) || path.contains(&"FILE".to_string())));
    assert_eq!(
        actual[0],
        vec![
            "REFERENCE_EXPRESSION x",
            "BINARY_EXPRESSION",
            "CONDITION",
            "WHILE",
            "BODY",
            "BLOCK",
            "IF"
        ]
    );
}

#[test]
fn partial_successor_drop_keeps_left_siblings() {
    let tree = scenario_tree();
    let shadow = ShadowTree::build(&tree);
    let call = find_kind(&tree, &shadow, "CALL_EXPRESSION");

    // Anchor at the call with index 1: the callee reference is already in
    // place, the argument list is the future.
    let actual: Vec<Vec<String>> = leaf_paths(&shadow, call, 1, true)
        .iter()
        .map(|path| path_kinds(&tree, &shadow, path))
        .collect();

    assert!(actual
        .iter()
        .any(|path| path[0] == "REFERENCE_EXPRESSION print"));
    assert!(!actual
        .iter()
        .any(|path| path.contains(&"VALUE_ARGUMENT".to_string())));
}
