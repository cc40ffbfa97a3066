use std::sync::Arc;

use syntect::{highlighting::Theme, html::highlighted_html_for_string, parsing::SyntaxSet};
use thiserror::Error;

use crate::domain::highlight::LexerHandle;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("lexer `{0}` is not part of the loaded syntax set")]
    UnknownLexer(String),
    #[error("syntax highlighting failed: {language}: {message}")]
    Highlighting { language: String, message: String },
}

/// Turns text plus a resolved lexer into markup. Implementations must be
/// deterministic: identical inputs produce identical output.
pub trait HighlightRenderer: Send + Sync {
    fn render(&self, text: &str, lexer: &LexerHandle) -> Result<String, RenderError>;
}

/// Emits HTML with every colour inlined as `style` attributes, so the output
/// needs no accompanying stylesheet.
pub struct InlineHtmlRenderer {
    syntax_set: Arc<SyntaxSet>,
    theme: Theme,
    wrap_div: bool,
}

impl InlineHtmlRenderer {
    pub fn new(syntax_set: Arc<SyntaxSet>, theme: Theme) -> Self {
        Self {
            syntax_set,
            theme,
            wrap_div: true,
        }
    }

    /// Wrap the `<pre>` block in `<div class="highlight">`.
    pub fn with_wrap_div(mut self, wrap_div: bool) -> Self {
        self.wrap_div = wrap_div;
        self
    }
}

impl HighlightRenderer for InlineHtmlRenderer {
    fn render(&self, text: &str, lexer: &LexerHandle) -> Result<String, RenderError> {
        let syntax = self
            .syntax_set
            .find_syntax_by_name(lexer.name())
            .ok_or_else(|| RenderError::UnknownLexer(lexer.name().to_string()))?;

        let mut source = text.to_string();
        if !source.ends_with('\n') {
            source.push('\n');
        }

        let highlighted = highlighted_html_for_string(&source, &self.syntax_set, syntax, &self.theme)
            .map_err(|err| RenderError::Highlighting {
                language: lexer.name().to_string(),
                message: err.to_string(),
            })?;

        if self.wrap_div {
            Ok(format!("<div class=\"highlight\">{highlighted}</div>"))
        } else {
            Ok(highlighted)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::highlight::bundle::{bundled_syntaxes, find_theme};
    use crate::domain::highlight::Resolution;

    fn renderer() -> InlineHtmlRenderer {
        let theme = find_theme("InspiredGitHub").expect("bundled theme");
        InlineHtmlRenderer::new(bundled_syntaxes(), theme)
    }

    #[test]
    fn renders_inline_styles_without_classes() {
        let lexer = LexerHandle::new("Python", Resolution::Named);
        let html = renderer().render("print(1)", &lexer).expect("renders");

        assert!(html.starts_with("<div class=\"highlight\"><pre"));
        assert!(html.contains("style=\""));
        assert!(html.contains("print"));
        assert!(html.contains('1'));
        assert!(!html.contains("class=\"syntax-"));
    }

    #[test]
    fn escapes_markup_in_source() {
        let lexer = LexerHandle::new("Plain Text", Resolution::Guessed);
        let html = renderer()
            .with_wrap_div(false)
            .render("<script>alert(1)</script>", &lexer)
            .expect("renders");

        assert!(html.starts_with("<pre"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn unknown_lexer_is_a_render_error() {
        let lexer = LexerHandle::new("Klingon", Resolution::Named);
        let err = renderer().render("qapla'", &lexer).expect_err("unknown lexer");
        assert!(matches!(err, RenderError::UnknownLexer(name) if name == "Klingon"));
    }
}
