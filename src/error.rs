//! Error types for symbol resolution and rendering

use ariadne::{Color, Label, Report, ReportKind, Source};
use thiserror::Error;

/// Byte range in template text
pub type Span = std::ops::Range<usize>;

/// Errors that can occur while resolving symbols and rendering a tree
#[derive(Error, Debug)]
pub enum RenderError {
    /// A placeholder named a symbol absent from every scope reachable
    /// from the referencing node
    #[error("unresolved symbol: {name}")]
    UnresolvedSymbol {
        name: String,
        span: Span,
        template: String,
    },

    /// A symbol's definition transitively references itself
    #[error("cyclic symbol dependency: {chain}")]
    CyclicDependency { chain: String },

    /// A definition was requested twice for the same symbol. This is an
    /// internal invariant breach, not a caller input error.
    #[error("definition constructed twice for symbol: {name}")]
    DuplicateDefinition { name: String },

    /// A `${` opener that never closes into a valid placeholder
    #[error("malformed placeholder at {span:?}")]
    MalformedTemplate { span: Span, template: String },

    /// Resolution failed to settle within the configured pass ceiling
    #[error("symbol resolution did not settle after {passes} passes")]
    PassLimitExceeded { passes: usize },
}

impl RenderError {
    /// Format the error with template-text context using ariadne
    ///
    /// Errors that carry a placeholder site render as a report pointing at
    /// the offending span; the rest fall back to their display form.
    pub fn format(&self, filename: &str) -> String {
        let (span, template, message) = match self {
            RenderError::UnresolvedSymbol {
                name,
                span,
                template,
            } => (
                span.clone(),
                template,
                format!("no scope in the chain defines '{}'", name),
            ),
            RenderError::MalformedTemplate { span, template } => (
                span.clone(),
                template,
                "placeholder is never closed".to_string(),
            ),
            other => return other.to_string(),
        };

        let mut buf = Vec::new();
        Report::build(ReportKind::Error, filename, span.start)
            .with_message(self.to_string())
            .with_label(
                Label::new((filename, span))
                    .with_message(message)
                    .with_color(Color::Red),
            )
            .finish()
            .write((filename, Source::from(template.as_str())), &mut buf)
            .unwrap();
        String::from_utf8(buf).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_unresolved() {
        let err = RenderError::UnresolvedSymbol {
            name: "buf".to_string(),
            span: 4..10,
            template: "use(${buf});".to_string(),
        };
        assert_eq!(err.to_string(), "unresolved symbol: buf");
    }

    #[test]
    fn test_display_cycle() {
        let err = RenderError::CyclicDependency {
            chain: "a -> b -> a".to_string(),
        };
        assert_eq!(err.to_string(), "cyclic symbol dependency: a -> b -> a");
    }

    #[test]
    fn test_format_points_at_placeholder() {
        let err = RenderError::UnresolvedSymbol {
            name: "buf".to_string(),
            span: 4..10,
            template: "use(${buf});".to_string(),
        };
        let report = err.format("snippet");
        assert!(report.contains("unresolved symbol: buf"));
        assert!(report.contains("snippet"));
    }
}
