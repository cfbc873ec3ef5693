//! Pass-based symbol resolution and rendering
//!
//! The driver walks the tree in document order, expanding every text node
//! not yet expanded in this render. The first reference to a symbol takes
//! the symbol's constructor, creates its definition node, and inserts it at
//! the front of the symbol's owning sequence; the placeholder itself
//! substitutes to the symbol's name. Definitions inserted during a pass are
//! expanded in the next pass, so a dependency's defining statement always
//! lands ahead of the statement that first needed it. When a pass finds
//! nothing pending, one final walk concatenates the stable text.
//!
//! All per-render state lives in an explicit [`ResolveContext`]; mutation of
//! the tree mid-render is confined to definition insertion.

use std::collections::{HashMap, HashSet};

use crate::config::EngineConfig;
use crate::error::{RenderError, Span};
use crate::expand::TemplateExpander;
use crate::node::{CodeTree, NodeId, NodeKind};
use crate::scope::ScopeId;

/// Per-render state threaded through resolution passes
#[derive(Debug, Default)]
pub struct ResolveContext {
    /// node -> expanded text, for text nodes expanded so far this render
    expanded: HashMap<NodeId, String>,
    /// symbol -> symbols its definition references, for cycle detection
    deps: HashMap<NodeId, Vec<NodeId>>,
    passes: usize,
    debug: bool,
}

/// Resolve all symbols reachable from `root` and render the stable text
pub fn render_tree(
    tree: &mut CodeTree,
    root: NodeId,
    expander: &dyn TemplateExpander,
    config: &EngineConfig,
) -> Result<String, RenderError> {
    let mut cx = ResolveContext {
        debug: config.debug,
        ..ResolveContext::default()
    };

    loop {
        let pending = collect_pending(tree, root, &cx);
        if pending.is_empty() {
            break;
        }
        cx.passes += 1;
        if cx.passes > config.max_passes {
            return Err(RenderError::PassLimitExceeded { passes: cx.passes });
        }
        if cx.debug {
            eprintln!(
                "=== resolve pass {} ({} pending) ===",
                cx.passes,
                pending.len()
            );
        }
        for (node, scope) in pending {
            let text = expand_node(tree, node, scope, expander, &mut cx)?;
            cx.expanded.insert(node, text);
        }
    }

    Ok(concat(tree, root, &cx, &config.separator))
}

/// Snapshot, in document order, of text nodes not yet expanded
///
/// Definitions inserted while this snapshot is being worked through are
/// picked up by the next pass.
fn collect_pending(
    tree: &CodeTree,
    root: NodeId,
    cx: &ResolveContext,
) -> Vec<(NodeId, Option<ScopeId>)> {
    let mut pending = Vec::new();
    walk(tree, root, None, cx, &mut pending);
    pending
}

fn walk(
    tree: &CodeTree,
    node: NodeId,
    enclosing: Option<ScopeId>,
    cx: &ResolveContext,
    pending: &mut Vec<(NodeId, Option<ScopeId>)>,
) {
    match tree.kind(node) {
        NodeKind::Sequence { children, scope } => {
            let scope = *scope;
            for &child in children {
                walk(tree, child, Some(scope), cx, pending);
            }
        }
        NodeKind::Simple { .. } | NodeKind::Definition { .. } => {
            if !cx.expanded.contains_key(&node) {
                pending.push((node, enclosing));
            }
        }
        // Symbols live in tables, never in a child list.
        NodeKind::Symbol { .. } => {}
    }
}

fn expand_node(
    tree: &mut CodeTree,
    node: NodeId,
    scope: Option<ScopeId>,
    expander: &dyn TemplateExpander,
    cx: &mut ResolveContext,
) -> Result<String, RenderError> {
    let (template, current_symbol) = match tree.kind(node) {
        NodeKind::Simple { template } => (template.clone(), None),
        NodeKind::Definition { symbol, template } => (template.clone(), Some(*symbol)),
        other => panic!("expand_node on non-text node: {:?}", other),
    };

    let mut resolve = |name: &str, span: Span| {
        resolve_placeholder(tree, scope, current_symbol, name, span, &template, cx)
    };
    expander.expand(&template, &mut resolve)
}

/// The lookup-and-lazy-materialize protocol behind one placeholder
fn resolve_placeholder(
    tree: &mut CodeTree,
    scope: Option<ScopeId>,
    current_symbol: Option<NodeId>,
    name: &str,
    span: Span,
    template: &str,
    cx: &mut ResolveContext,
) -> Result<String, RenderError> {
    let (symbol, owner) = scope.and_then(|s| tree.lookup(s, name)).ok_or_else(|| {
        RenderError::UnresolvedSymbol {
            name: name.to_string(),
            span,
            template: template.to_string(),
        }
    })?;

    // References made from inside a definition are dependency edges; a new
    // edge closing a loop back to the referencing symbol is a cycle.
    if let Some(current) = current_symbol {
        check_cycle(tree, cx, current, symbol)?;
        cx.deps.entry(current).or_default().push(symbol);
    }

    if tree.symbol_definition(symbol).is_none() {
        let constructor = tree.take_constructor(symbol)?;
        let def = constructor(tree, symbol);
        tree.set_definition(symbol, def);
        tree.insert(owner, 0, def);
        if cx.debug {
            eprintln!("  materialized '{}' into {:?}", name, owner);
        }
    }

    Ok(tree.symbol_name(symbol).to_string())
}

fn check_cycle(
    tree: &CodeTree,
    cx: &ResolveContext,
    current: NodeId,
    referenced: NodeId,
) -> Result<(), RenderError> {
    let mut seen = HashSet::new();
    if let Some(path) = path_to(cx, referenced, current, &mut seen) {
        let mut names = vec![tree.symbol_name(current)];
        names.extend(path.iter().map(|&s| tree.symbol_name(s)));
        return Err(RenderError::CyclicDependency {
            chain: names.join(" -> "),
        });
    }
    Ok(())
}

fn path_to(
    cx: &ResolveContext,
    from: NodeId,
    target: NodeId,
    seen: &mut HashSet<NodeId>,
) -> Option<Vec<NodeId>> {
    if from == target {
        return Some(vec![from]);
    }
    if !seen.insert(from) {
        return None;
    }
    for &next in cx.deps.get(&from).into_iter().flatten() {
        if let Some(mut path) = path_to(cx, next, target, seen) {
            path.insert(0, from);
            return Some(path);
        }
    }
    None
}

/// Concatenate the fully expanded tree in current list order
fn concat(tree: &CodeTree, node: NodeId, cx: &ResolveContext, separator: &str) -> String {
    match tree.kind(node) {
        NodeKind::Sequence { children, .. } => children
            .iter()
            .map(|&child| concat(tree, child, cx, separator))
            .collect::<Vec<_>>()
            .join(separator),
        NodeKind::Simple { .. } | NodeKind::Definition { .. } => cx.expanded[&node].clone(),
        NodeKind::Symbol { .. } => String::new(),
    }
}
