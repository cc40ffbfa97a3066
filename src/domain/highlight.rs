/// Form payload accepted by the highlight endpoint. Missing fields are empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HighlightRequest {
    pub language: String,
    pub text: String,
}

impl HighlightRequest {
    pub fn new(language: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            text: text.into(),
        }
    }
}

/// How a lexer was obtained for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// The language hint matched a known lexer name or alias.
    Named,
    /// The hint did not match and the lexer was guessed from the text.
    Guessed,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::Named => "named",
            Resolution::Guessed => "guessed",
        }
    }

    pub fn is_fallback(self) -> bool {
        matches!(self, Resolution::Guessed)
    }
}

/// Opaque reference to a grammar held by a resolver. Only resolvers create these;
/// renderers look the grammar back up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexerHandle {
    name: String,
    resolution: Resolution,
}

impl LexerHandle {
    pub fn new(name: impl Into<String>, resolution: Resolution) -> Self {
        Self {
            name: name.into(),
            resolution,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }
}
