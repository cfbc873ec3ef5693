//! Integration tests for sequence construction and plain rendering.
//!
//! No symbols are involved here: rendered text must equal the concatenation
//! of children's text in final list order, whatever mix of append, insert,
//! and extend built that order.

use code_assembler::{render, render_with_config, CodeTree, EngineConfig};
use pretty_assertions::assert_eq;

/// Collapse whitespace so assertions survive separator choices
fn simplify(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[test]
fn test_list_operations_of_sequence_node() {
    let mut tree = CodeTree::new();
    let root = tree.new_sequence();

    let two = tree.new_simple("2");
    let four = tree.new_simple("4");
    tree.extend(root, [two, four]);

    let three = tree.new_simple("3");
    tree.insert(root, 1, three);
    let one = tree.new_simple("1");
    tree.insert(root, 0, one);
    let five = tree.new_simple("5");
    tree.insert(root, 100, five);
    let six = tree.new_simple("6");
    tree.append(root, six);

    let text = render(&mut tree, root).unwrap();
    assert_eq!(simplify(&text), "1 2 3 4 5 6");
}

#[test]
fn test_nested_sequence_flattens() {
    let mut tree = CodeTree::new();
    let root = tree.new_sequence();
    let nested = tree.new_sequence();

    let two = tree.new_simple("2");
    let three = tree.new_simple("3");
    let four = tree.new_simple("4");
    tree.extend(nested, [two, three, four]);

    let one = tree.new_simple("1");
    let five = tree.new_simple("5");
    tree.append(root, one);
    tree.append(root, nested);
    tree.append(root, five);

    let text = render(&mut tree, root).unwrap();
    assert_eq!(simplify(&text), "1 2 3 4 5");
    // No extra delimiters around the nested children.
    assert_eq!(text, "1\n2\n3\n4\n5");
}

#[test]
fn test_empty_sequence_renders_empty() {
    let mut tree = CodeTree::new();
    let root = tree.new_sequence();
    assert_eq!(render(&mut tree, root).unwrap(), "");
}

#[test]
fn test_custom_separator() {
    let mut tree = CodeTree::new();
    let root = tree.new_sequence();
    let a = tree.new_simple("a");
    let b = tree.new_simple("b");
    let c = tree.new_simple("c");
    tree.extend(root, [a, b, c]);

    let config = EngineConfig::new().with_separator("; ");
    let text = render_with_config(&mut tree, root, &config).unwrap();
    assert_eq!(text, "a; b; c");
}

#[test]
fn test_deeply_nested_sequences() {
    let mut tree = CodeTree::new();
    let root = tree.new_sequence();
    let mid = tree.new_sequence();
    let leaf_seq = tree.new_sequence();

    let c = tree.new_simple("c");
    tree.append(leaf_seq, c);
    let b = tree.new_simple("b");
    tree.append(mid, b);
    tree.append(mid, leaf_seq);
    let a = tree.new_simple("a");
    tree.append(root, a);
    tree.append(root, mid);

    let text = render(&mut tree, root).unwrap();
    assert_eq!(simplify(&text), "a b c");
}
