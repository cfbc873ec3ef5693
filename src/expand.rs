//! Template-expansion shim
//!
//! The engine does not care what the placeholder syntax looks like, only
//! that substitution is synchronous, deterministic, left-to-right, and runs
//! once per node per render. [`TemplateExpander`] is that seam;
//! [`PlaceholderExpander`] is the stock `${name}` implementation.

use logos::Logos;

use crate::error::{RenderError, Span};

/// Collaborator that substitutes placeholders within one node's template text
///
/// The resolver callback maps a placeholder name to the referenced node's
/// current text, triggering lazy symbol materialization as a side effect.
pub trait TemplateExpander {
    fn expand(
        &self,
        template: &str,
        resolve: &mut dyn FnMut(&str, Span) -> Result<String, RenderError>,
    ) -> Result<String, RenderError>;
}

#[derive(Logos, Debug, Clone, PartialEq)]
enum Token {
    // Longest match wins, so a well-formed placeholder beats the bare
    // opener below.
    #[regex(r"\$\{[a-zA-Z_][a-zA-Z0-9_]*\}", |lex| {
        let s = lex.slice();
        s[2..s.len() - 1].to_string()
    })]
    Placeholder(String),

    /// Literal dollar sign
    #[token("$$")]
    EscapedDollar,

    /// A `${` that did not form a valid placeholder
    #[token("${")]
    UnclosedOpener,

    #[regex(r"[^$]+")]
    Text,

    #[token("$")]
    Dollar,
}

/// Stock expander for `${name}` placeholders
///
/// `$$` escapes a literal dollar; any other text, including a lone `$`,
/// passes through verbatim.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderExpander;

impl TemplateExpander for PlaceholderExpander {
    fn expand(
        &self,
        template: &str,
        resolve: &mut dyn FnMut(&str, Span) -> Result<String, RenderError>,
    ) -> Result<String, RenderError> {
        let mut out = String::with_capacity(template.len());
        for (token, span) in Token::lexer(template).spanned() {
            match token {
                Ok(Token::Placeholder(name)) => out.push_str(&resolve(&name, span)?),
                Ok(Token::EscapedDollar) => out.push('$'),
                Ok(Token::Text) | Ok(Token::Dollar) => out.push_str(&template[span]),
                Ok(Token::UnclosedOpener) | Err(()) => {
                    return Err(RenderError::MalformedTemplate {
                        span,
                        template: template.to_string(),
                    })
                }
            }
        }
        Ok(out)
    }
}
