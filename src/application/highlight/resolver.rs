use std::sync::Arc;

use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::domain::highlight::{LexerHandle, Resolution};

use super::guess::guess_syntax;

/// Language names that do not match a grammar token, file extension or
/// display name, mapped to a token that does.
const ALIASES: &[(&str, &str)] = &[
    ("python3", "py"),
    ("py3", "py"),
    ("golang", "go"),
    ("c++", "cpp"),
    ("shell", "sh"),
    ("shell-session", "sh"),
    ("zsh", "sh"),
    ("console", "sh"),
    ("node", "js"),
    ("nodejs", "js"),
    ("postgresql", "sql"),
    ("mysql", "sql"),
    ("sqlite3", "sql"),
    ("text", "txt"),
    ("plain", "txt"),
    ("plaintext", "txt"),
    ("udiff", "diff"),
    ("patch", "diff"),
];

/// Finds the grammar used to highlight a snippet.
pub trait LanguageResolver: Send + Sync {
    /// Exact or alias-based lookup. `None` means the name is unknown.
    fn find_by_name(&self, name: &str) -> Option<LexerHandle>;

    /// Best-effort detection from content alone. Must always return a lexer,
    /// including for empty text.
    fn guess(&self, text: &str) -> LexerHandle;
}

/// Resolver backed by a syntect grammar set.
pub struct SyntectResolver {
    syntax_set: Arc<SyntaxSet>,
}

impl SyntectResolver {
    pub fn new(syntax_set: Arc<SyntaxSet>) -> Self {
        Self { syntax_set }
    }

    fn lookup(&self, token: &str) -> Option<&SyntaxReference> {
        let lowercase = token.to_ascii_lowercase();
        let syntax_set = self.syntax_set.as_ref();
        syntax_set
            .find_syntax_by_token(&lowercase)
            .or_else(|| syntax_set.find_syntax_by_name(token))
            .or_else(|| syntax_set.find_syntax_by_extension(&lowercase))
            .or_else(|| {
                ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == lowercase)
                    .and_then(|(_, target)| syntax_set.find_syntax_by_token(target))
            })
    }
}

impl LanguageResolver for SyntectResolver {
    fn find_by_name(&self, name: &str) -> Option<LexerHandle> {
        let token = name.trim();
        if token.is_empty() {
            return None;
        }

        self.lookup(token)
            .map(|syntax| LexerHandle::new(syntax.name.as_str(), Resolution::Named))
    }

    fn guess(&self, text: &str) -> LexerHandle {
        let syntax = guess_syntax(&self.syntax_set, text);
        LexerHandle::new(syntax.name.as_str(), Resolution::Guessed)
    }
}
