//! Highlighting pipeline: resolve a lexer (by name, else by guessing) and render.

mod bundle;
mod guess;
mod renderer;
mod resolver;

use std::{sync::Arc, time::Instant};

use metrics::{counter, histogram};
use thiserror::Error;
use tracing::info;

use crate::config::RenderSettings;
use crate::domain::highlight::{HighlightRequest, LexerHandle};

pub use bundle::{bundled_syntaxes, find_theme, theme_names};
pub use renderer::{HighlightRenderer, InlineHtmlRenderer, RenderError};
pub use resolver::{LanguageResolver, SyntectResolver};

const SOURCE: &str = "pygments_service::highlight";

#[derive(Debug, Error)]
pub enum HighlightError {
    #[error("rendering failed for lexer `{lexer}`")]
    RenderFailed {
        lexer: String,
        #[source]
        source: RenderError,
    },
    #[error("theme `{name}` is not bundled")]
    UnknownTheme { name: String },
}

/// Markup produced for a request together with the lexer that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighted {
    pub lexer: LexerHandle,
    pub markup: String,
}

pub struct HighlightService {
    resolver: Arc<dyn LanguageResolver>,
    renderer: Arc<dyn HighlightRenderer>,
}

impl HighlightService {
    pub fn new(resolver: Arc<dyn LanguageResolver>, renderer: Arc<dyn HighlightRenderer>) -> Self {
        Self { resolver, renderer }
    }

    /// Build the production pipeline from the bundled grammars and the
    /// configured theme.
    pub fn from_settings(settings: &RenderSettings) -> Result<Self, HighlightError> {
        let theme = find_theme(&settings.theme).ok_or_else(|| HighlightError::UnknownTheme {
            name: settings.theme.clone(),
        })?;
        let syntaxes = bundled_syntaxes();

        let resolver = SyntectResolver::new(Arc::clone(&syntaxes));
        let renderer = InlineHtmlRenderer::new(syntaxes, theme).with_wrap_div(settings.wrap_div);

        Ok(Self::new(Arc::new(resolver), Arc::new(renderer)))
    }

    /// Lookup by the language hint, falling back to guessing from the text.
    /// The hint is ignored entirely once the fallback is taken.
    pub fn resolve(&self, request: &HighlightRequest) -> LexerHandle {
        match self.resolver.find_by_name(&request.language) {
            Some(lexer) => lexer,
            None => {
                counter!("pygments_lexer_guess_total").increment(1);
                self.resolver.guess(&request.text)
            }
        }
    }

    pub fn highlight(&self, request: &HighlightRequest) -> Result<Highlighted, HighlightError> {
        counter!("pygments_highlight_requests_total").increment(1);
        info!(target = SOURCE, text = %request.text, "received code");
        info!(target = SOURCE, language = %request.language, "marked as language");

        let lexer = self.resolve(request);
        info!(
            target = SOURCE,
            lexer = lexer.name(),
            resolution = lexer.resolution().as_str(),
            "chose lexer"
        );

        let start = Instant::now();
        let rendered = self.renderer.render(&request.text, &lexer);
        histogram!("pygments_render_ms").record(start.elapsed().as_secs_f64() * 1000.0);

        match rendered {
            Ok(markup) => Ok(Highlighted { lexer, markup }),
            Err(source) => {
                counter!("pygments_render_failures_total").increment(1);
                Err(HighlightError::RenderFailed {
                    lexer: lexer.name().to_string(),
                    source,
                })
            }
        }
    }
}
