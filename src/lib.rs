//! Code Assembler - dependency-ordered assembly of generated source text
//!
//! A generator builds a tree of code nodes: literal statements, ordered
//! sequences, and named symbols whose defining statement does not exist yet.
//! Rendering materializes each referenced symbol's definition exactly once,
//! splices it in ahead of its first use, and returns the stable text, so the
//! caller never sequences definitions by hand.
//!
//! # Example
//!
//! ```rust
//! use code_assembler::{render, CodeTree};
//!
//! let mut tree = CodeTree::new();
//! let root = tree.new_sequence();
//! tree.add_symbol(root, "buf", "char* buf = alloc();");
//! let use_site = tree.new_simple("use(${buf});");
//! tree.append(root, use_site);
//!
//! let text = render(&mut tree, root).unwrap();
//! assert_eq!(text, "char* buf = alloc();\nuse(buf);");
//! ```

pub mod config;
pub mod error;
pub mod expand;
pub mod node;
pub mod resolve;
pub mod scope;

pub use config::{ConfigError, EngineConfig};
pub use error::{RenderError, Span};
pub use expand::{PlaceholderExpander, TemplateExpander};
pub use node::{CodeTree, DefinitionConstructor, NodeId, NodeKind};
pub use scope::ScopeId;

/// Render a tree to its stable text with default configuration
///
/// This is the main entry point. Symbol definitions triggered during the
/// render are inserted into the tree, so the tree reflects the final
/// document structure afterwards; rendering again yields the same text.
pub fn render(tree: &mut CodeTree, root: NodeId) -> Result<String, RenderError> {
    render_with_config(tree, root, &EngineConfig::default())
}

/// Render a tree to its stable text with custom configuration
///
/// # Example
///
/// ```rust
/// use code_assembler::{render_with_config, CodeTree, EngineConfig};
///
/// let mut tree = CodeTree::new();
/// let root = tree.new_sequence();
/// let a = tree.new_simple("left");
/// let b = tree.new_simple("right");
/// tree.extend(root, [a, b]);
///
/// let config = EngineConfig::new().with_separator(" ");
/// let text = render_with_config(&mut tree, root, &config).unwrap();
/// assert_eq!(text, "left right");
/// ```
pub fn render_with_config(
    tree: &mut CodeTree,
    root: NodeId,
    config: &EngineConfig,
) -> Result<String, RenderError> {
    render_with_expander(tree, root, &PlaceholderExpander, config)
}

/// Render a tree through a caller-supplied template expander
pub fn render_with_expander(
    tree: &mut CodeTree,
    root: NodeId,
    expander: &dyn TemplateExpander,
    config: &EngineConfig,
) -> Result<String, RenderError> {
    let text = resolve::render_tree(tree, root, expander, config)?;

    if config.debug {
        fn print_tree(tree: &CodeTree, node: NodeId, depth: usize) {
            let indent = "  ".repeat(depth);
            match tree.kind(node) {
                NodeKind::Sequence { children, .. } => {
                    eprintln!("{}[seq] {} children", indent, children.len());
                    for &child in children {
                        print_tree(tree, child, depth + 1);
                    }
                }
                NodeKind::Simple { template } => {
                    eprintln!("{}[simple] {:?}", indent, template);
                }
                NodeKind::Definition { symbol, template } => {
                    eprintln!(
                        "{}[def '{}'] {:?}",
                        indent,
                        tree.symbol_name(*symbol),
                        template
                    );
                }
                NodeKind::Symbol { name, .. } => {
                    eprintln!("{}[symbol] {}", indent, name);
                }
            }
        }
        eprintln!("=== Tree Debug ===");
        print_tree(tree, root, 0);
        eprintln!("==================");
    }

    Ok(text)
}
