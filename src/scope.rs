//! Lexical symbol scopes with explicit parent links
//!
//! Each sequence node owns one scope. Lookup walks the parent chain outward
//! toward the root, so a descendant sequence sees everything its ancestors
//! define, and a local registration of the same name shadows the ancestor's
//! within that subtree.

use std::collections::HashMap;

use crate::node::{CodeTree, NodeId};

/// Index of a scope in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub(crate) usize);

/// Symbol table for one sequence node
#[derive(Debug)]
pub(crate) struct Scope {
    /// The sequence node this scope belongs to
    pub(crate) seq: NodeId,
    /// Enclosing sequence's scope, `None` for a detached or root sequence
    pub(crate) parent: Option<ScopeId>,
    /// name -> symbol node
    pub(crate) symbols: HashMap<String, NodeId>,
}

impl Scope {
    pub(crate) fn new(seq: NodeId) -> Self {
        Self {
            seq,
            parent: None,
            symbols: HashMap::new(),
        }
    }
}

impl CodeTree {
    /// Resolve a name along the scope chain, nearest table first
    ///
    /// Returns the symbol node together with the sequence node whose table
    /// produced it (the symbol's owning sequence, where its definition gets
    /// spliced in).
    pub(crate) fn lookup(&self, from: ScopeId, name: &str) -> Option<(NodeId, NodeId)> {
        let mut current = Some(from);
        while let Some(id) = current {
            let scope = &self.scopes[id.0];
            if let Some(&symbol) = scope.symbols.get(name) {
                return Some((symbol, scope.seq));
            }
            current = scope.parent;
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_walks_to_ancestor() {
        let mut tree = CodeTree::new();
        let outer = tree.new_sequence();
        let inner = tree.new_sequence();
        tree.append(outer, inner);
        let symbol = tree.add_symbol(outer, "x", "int x = 1;");

        let from = tree.sequence_scope(inner);
        assert_eq!(tree.lookup(from, "x"), Some((symbol, outer)));
    }

    #[test]
    fn test_local_definition_shadows_ancestor() {
        let mut tree = CodeTree::new();
        let outer = tree.new_sequence();
        let inner = tree.new_sequence();
        tree.append(outer, inner);
        tree.add_symbol(outer, "x", "int x = 1;");
        let shadow = tree.add_symbol(inner, "x", "int x = 2;");

        let from = tree.sequence_scope(inner);
        assert_eq!(tree.lookup(from, "x"), Some((shadow, inner)));
    }

    #[test]
    fn test_lookup_miss() {
        let mut tree = CodeTree::new();
        let seq = tree.new_sequence();
        let from = tree.sequence_scope(seq);
        assert_eq!(tree.lookup(from, "missing"), None);
    }

    #[test]
    fn test_shadow_does_not_leak_upward() {
        let mut tree = CodeTree::new();
        let outer = tree.new_sequence();
        let inner = tree.new_sequence();
        tree.append(outer, inner);
        let original = tree.add_symbol(outer, "x", "int x = 1;");
        tree.add_symbol(inner, "x", "int x = 2;");

        let from = tree.sequence_scope(outer);
        assert_eq!(tree.lookup(from, "x"), Some((original, outer)));
    }
}
