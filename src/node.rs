//! Code node arena and tree mutation
//!
//! All nodes live in a [`CodeTree`] arena and are addressed by [`NodeId`]
//! handles, so a node's render can splice new children into an enclosing
//! sequence without any shared mutable ownership. A tree is built once by a
//! generator (append/insert/extend plus symbol registration) and then handed
//! to the resolution driver.

use std::fmt;

use crate::error::RenderError;
use crate::scope::{Scope, ScopeId};

/// Index of a node in the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) usize);

/// Constructor invoked on the first reference to a symbol
///
/// Given the tree and the symbol's own id, it allocates and returns the
/// definition node that will define the symbol. Consumed on first use, which
/// makes the single-materialization invariant structural.
pub type DefinitionConstructor = Box<dyn FnOnce(&mut CodeTree, NodeId) -> NodeId>;

/// A unit of renderable template text in the composition tree
pub enum NodeKind {
    /// Fixed template text, terminal. Immutable after construction.
    Simple { template: String },

    /// Ordered, mutable composite of child nodes. Owns one scope whose
    /// parent link is wired when the sequence is attached under another
    /// sequence.
    Sequence { children: Vec<NodeId>, scope: ScopeId },

    /// Named lazy handle to a not-yet-materialized definition. Renders as
    /// its name; the defining statement is spliced in separately.
    Symbol {
        name: String,
        constructor: Option<DefinitionConstructor>,
        definition: Option<NodeId>,
    },

    /// The materialized defining statement for a symbol, created at most
    /// once and inserted at the front of the symbol's owning sequence.
    Definition { symbol: NodeId, template: String },
}

impl fmt::Debug for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeKind::Simple { template } => {
                f.debug_struct("Simple").field("template", template).finish()
            }
            NodeKind::Sequence { children, scope } => f
                .debug_struct("Sequence")
                .field("children", children)
                .field("scope", scope)
                .finish(),
            NodeKind::Symbol {
                name,
                constructor,
                definition,
            } => f
                .debug_struct("Symbol")
                .field("name", name)
                .field("constructor", &constructor.is_some())
                .field("definition", definition)
                .finish(),
            NodeKind::Definition { symbol, template } => f
                .debug_struct("Definition")
                .field("symbol", symbol)
                .field("template", template)
                .finish(),
        }
    }
}

/// Arena of code nodes plus their scopes
///
/// The tree is exclusively owned by one in-flight build/render at a time;
/// there is no internal synchronization.
#[derive(Debug, Default)]
pub struct CodeTree {
    pub(crate) nodes: Vec<NodeKind>,
    pub(crate) scopes: Vec<Scope>,
}

impl CodeTree {
    /// Create an empty tree
    pub fn new() -> Self {
        Self::default()
    }

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(kind);
        id
    }

    /// Create a terminal node holding literal template text
    pub fn new_simple(&mut self, template: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Simple {
            template: template.into(),
        })
    }

    /// Create an empty sequence node with its own symbol scope
    pub fn new_sequence(&mut self) -> NodeId {
        let id = NodeId(self.nodes.len());
        let scope = ScopeId(self.scopes.len());
        self.scopes.push(Scope::new(id));
        self.nodes.push(NodeKind::Sequence {
            children: Vec::new(),
            scope,
        });
        id
    }

    /// Create a symbol node with an explicit definition constructor
    pub fn new_symbol_with(
        &mut self,
        name: impl Into<String>,
        constructor: DefinitionConstructor,
    ) -> NodeId {
        self.alloc(NodeKind::Symbol {
            name: name.into(),
            constructor: Some(constructor),
            definition: None,
        })
    }

    /// Create the definition node for a symbol
    ///
    /// Typically called from inside a definition constructor.
    pub fn new_definition(&mut self, symbol: NodeId, template: impl Into<String>) -> NodeId {
        self.alloc(NodeKind::Definition {
            symbol,
            template: template.into(),
        })
    }

    /// Look at a node's variant
    pub fn kind(&self, id: NodeId) -> &NodeKind {
        &self.nodes[id.0]
    }

    /// Children of a sequence node, in current list order
    pub fn children(&self, seq: NodeId) -> &[NodeId] {
        match &self.nodes[seq.0] {
            NodeKind::Sequence { children, .. } => children,
            _ => panic!("{:?} is not a sequence node", seq),
        }
    }

    pub(crate) fn sequence_scope(&self, seq: NodeId) -> ScopeId {
        match &self.nodes[seq.0] {
            NodeKind::Sequence { scope, .. } => *scope,
            _ => panic!("{:?} is not a sequence node", seq),
        }
    }

    fn children_mut(&mut self, seq: NodeId) -> &mut Vec<NodeId> {
        match &mut self.nodes[seq.0] {
            NodeKind::Sequence { children, .. } => children,
            _ => panic!("{:?} is not a sequence node", seq),
        }
    }

    // A sequence attached under another sequence inherits the parent's
    // scope chain through its own scope's parent link.
    fn attach(&mut self, parent: NodeId, child: NodeId) {
        let parent_scope = self.sequence_scope(parent);
        if let NodeKind::Sequence { scope, .. } = &self.nodes[child.0] {
            self.scopes[scope.0].parent = Some(parent_scope);
        }
    }

    /// Add a child at the end of a sequence
    pub fn append(&mut self, seq: NodeId, child: NodeId) {
        self.attach(seq, child);
        self.children_mut(seq).push(child);
    }

    /// Insert a child so it occupies `index` after the call
    ///
    /// An index past the current end behaves as append; this is permissive
    /// clamping, not a bounds failure.
    pub fn insert(&mut self, seq: NodeId, index: usize, child: NodeId) {
        self.attach(seq, child);
        let children = self.children_mut(seq);
        let index = index.min(children.len());
        children.insert(index, child);
    }

    /// Append many children, preserving input order
    pub fn extend(&mut self, seq: NodeId, nodes: impl IntoIterator<Item = NodeId>) {
        for node in nodes {
            self.append(seq, node);
        }
    }

    /// Install name -> symbol entries into a sequence's own symbol table
    ///
    /// Registering a name that already exists in the same table replaces the
    /// local mapping only; ancestor tables are never touched.
    pub fn add_template_vars(
        &mut self,
        seq: NodeId,
        vars: impl IntoIterator<Item = (String, NodeId)>,
    ) {
        let scope = self.sequence_scope(seq);
        for (name, symbol) in vars {
            self.scopes[scope.0].symbols.insert(name, symbol);
        }
    }

    /// Register a symbol whose definition is plain template text
    ///
    /// Convenience wrapper over [`CodeTree::add_symbol_with`] covering the
    /// common case where the definition node is a single statement.
    pub fn add_symbol(&mut self, seq: NodeId, name: &str, definition_template: &str) -> NodeId {
        let template = definition_template.to_string();
        self.add_symbol_with(
            seq,
            name,
            Box::new(move |tree, symbol| tree.new_definition(symbol, template)),
        )
    }

    /// Register a symbol with an explicit definition constructor
    pub fn add_symbol_with(
        &mut self,
        seq: NodeId,
        name: &str,
        constructor: DefinitionConstructor,
    ) -> NodeId {
        let symbol = self.new_symbol_with(name, constructor);
        self.add_template_vars(seq, [(name.to_string(), symbol)]);
        symbol
    }

    /// The name a symbol node renders as
    pub fn symbol_name(&self, symbol: NodeId) -> &str {
        match &self.nodes[symbol.0] {
            NodeKind::Symbol { name, .. } => name,
            _ => panic!("{:?} is not a symbol node", symbol),
        }
    }

    pub(crate) fn symbol_definition(&self, symbol: NodeId) -> Option<NodeId> {
        match &self.nodes[symbol.0] {
            NodeKind::Symbol { definition, .. } => *definition,
            _ => panic!("{:?} is not a symbol node", symbol),
        }
    }

    pub(crate) fn take_constructor(
        &mut self,
        symbol: NodeId,
    ) -> Result<DefinitionConstructor, RenderError> {
        match &mut self.nodes[symbol.0] {
            NodeKind::Symbol {
                name, constructor, ..
            } => constructor
                .take()
                .ok_or_else(|| RenderError::DuplicateDefinition { name: name.clone() }),
            _ => panic!("{:?} is not a symbol node", symbol),
        }
    }

    pub(crate) fn set_definition(&mut self, symbol: NodeId, def: NodeId) {
        match &mut self.nodes[symbol.0] {
            NodeKind::Symbol { definition, .. } => *definition = Some(def),
            _ => panic!("{:?} is not a symbol node", symbol),
        }
    }
}
